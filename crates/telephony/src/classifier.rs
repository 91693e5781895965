//! Call-state classifier.
//!
//! The OS only reports the current state, never the kind of transition. To
//! tell a hang-up from a missed call when the phone goes idle we remember
//! whether the call since the last idle was last seen ringing or off-hook.

use calldetect_events::{CallEvent, PhoneCallStateUpdate};

use crate::state::RawState;

/// Event derived from a raw transition, with the triggering phone number.
pub type DerivedEvent = PhoneCallStateUpdate;

/// The classifier's entire memory. At most one flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierState {
    was_off_hook: bool,
    was_ringing: bool,
}

impl ClassifierState {
    const OFF_HOOK: Self = Self {
        was_off_hook: true,
        was_ringing: false,
    };

    const RINGING: Self = Self {
        was_off_hook: false,
        was_ringing: true,
    };

    /// Last non-idle state since the last idle was off-hook.
    pub fn was_off_hook(&self) -> bool {
        self.was_off_hook
    }

    /// Last non-idle state since the last idle was ringing.
    pub fn was_ringing(&self) -> bool {
        self.was_ringing
    }
}

/// Converts raw phone states into call lifecycle events.
///
/// Not reentrant: callers serialize access (the detector holds it behind a
/// mutex).
#[derive(Debug, Default)]
pub struct CallStateClassifier {
    state: ClassifierState,
}

impl CallStateClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ClassifierState {
        self.state
    }

    /// Apply one raw state and return the event it produces, if any.
    ///
    /// Repeated identical states are not deduplicated: every `Ringing` yields
    /// `Incoming` and every `OffHook` yields `Offhook`.
    pub fn transition(
        &mut self,
        raw_state: RawState,
        phone_number: Option<&str>,
    ) -> Option<DerivedEvent> {
        let event = match raw_state {
            RawState::Idle => {
                let event = if self.state.was_off_hook {
                    Some(CallEvent::Disconnected)
                } else if self.state.was_ringing {
                    Some(CallEvent::Missed)
                } else {
                    None
                };
                self.state = ClassifierState::default();
                event
            }
            RawState::OffHook => {
                self.state = ClassifierState::OFF_HOOK;
                Some(CallEvent::Offhook)
            }
            RawState::Ringing => {
                self.state = ClassifierState::RINGING;
                Some(CallEvent::Incoming)
            }
        };

        event.map(|event| PhoneCallStateUpdate::new(event, phone_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RawState::{Idle, OffHook, Ringing};

    fn run(states: &[RawState]) -> Vec<CallEvent> {
        let mut classifier = CallStateClassifier::new();
        states
            .iter()
            .filter_map(|state| classifier.transition(*state, None))
            .map(|update| update.event)
            .collect()
    }

    #[test]
    fn test_outgoing_call() {
        assert_eq!(
            run(&[OffHook, Idle]),
            vec![CallEvent::Offhook, CallEvent::Disconnected]
        );
    }

    #[test]
    fn test_missed_call() {
        assert_eq!(run(&[Ringing, Idle]), vec![CallEvent::Incoming, CallEvent::Missed]);
    }

    #[test]
    fn test_answered_call() {
        assert_eq!(
            run(&[Ringing, OffHook, Idle]),
            vec![
                CallEvent::Incoming,
                CallEvent::Offhook,
                CallEvent::Disconnected
            ]
        );
    }

    #[test]
    fn test_first_idle_emits_nothing() {
        assert!(run(&[Idle]).is_empty());
        assert!(run(&[Idle, Idle, Idle]).is_empty());
    }

    #[test]
    fn test_repeated_states_are_not_deduplicated() {
        assert_eq!(
            run(&[OffHook, OffHook]),
            vec![CallEvent::Offhook, CallEvent::Offhook]
        );
        assert_eq!(
            run(&[Ringing, Ringing]),
            vec![CallEvent::Incoming, CallEvent::Incoming]
        );
    }

    #[test]
    fn test_call_waiting_while_off_hook() {
        // A second call rings during an active one, then everything hangs up.
        assert_eq!(
            run(&[OffHook, Ringing, Idle]),
            vec![CallEvent::Offhook, CallEvent::Incoming, CallEvent::Missed]
        );
    }

    #[test]
    fn test_idle_clears_history() {
        let mut classifier = CallStateClassifier::new();
        classifier.transition(Ringing, None);
        assert!(classifier.state().was_ringing());

        classifier.transition(Idle, None);
        assert_eq!(classifier.state(), ClassifierState::default());

        assert!(classifier.transition(Idle, None).is_none());
    }

    #[test]
    fn test_flags_are_exclusive() {
        let mut classifier = CallStateClassifier::new();

        classifier.transition(Ringing, None);
        assert!(classifier.state().was_ringing());
        assert!(!classifier.state().was_off_hook());

        classifier.transition(OffHook, None);
        assert!(classifier.state().was_off_hook());
        assert!(!classifier.state().was_ringing());
    }

    #[test]
    fn test_phone_number_is_carried() {
        let mut classifier = CallStateClassifier::new();

        let incoming = classifier.transition(Ringing, Some("+441234")).unwrap();
        assert_eq!(incoming.phone_number, "+441234");

        let missed = classifier.transition(Idle, None).unwrap();
        assert_eq!(missed.event, CallEvent::Missed);
        assert_eq!(missed.phone_number, "");
    }
}
