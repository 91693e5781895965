use std::sync::Arc;

use calldetect_events::EventBusRef;
use calldetect_telephony::{
    emit_permission_denied, CallDetector, DetectorConfig, HostLifecycle, HostPermissionProvider,
    HostTelephonySource,
};
use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, RunEvent, Runtime,
};
use tokio::sync::Mutex;

mod commands;
mod events;

pub use events::TauriEventBus;

const PLUGIN_NAME: &str = "calldetect";

pub type SharedState = Mutex<State>;

pub struct State {
    pub(crate) detector: CallDetector,
    pub(crate) source: Arc<HostTelephonySource>,
    pub(crate) permissions: Arc<HostPermissionProvider>,
}

pub fn init<R: Runtime>() -> TauriPlugin<R, Option<DetectorConfig>> {
    Builder::<R, Option<DetectorConfig>>::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![
            commands::start_listener,
            commands::stop_listener,
            commands::get_constants,
            commands::report_call_state,
            commands::report_permission,
        ])
        .setup(|app, api| {
            let config = api.config().clone().unwrap_or_default();
            tracing::info!(
                read_phone_number = config.read_phone_number,
                "calldetect plugin setup"
            );

            let source = Arc::new(HostTelephonySource::new());
            let permissions = Arc::new(HostPermissionProvider::new());
            let bus: EventBusRef = Arc::new(TauriEventBus::new(app.app_handle().clone()));
            let detector = CallDetector::new(source.clone(), bus.clone())
                .with_config(config)
                .with_permissions(permissions.clone())
                .on_permission_denied(emit_permission_denied(bus));

            app.manage(SharedState::new(State {
                detector,
                source,
                permissions,
            }));
            Ok(())
        })
        .on_event(|app, event| {
            let lifecycle = match event {
                RunEvent::Resumed => HostLifecycle::Resumed,
                RunEvent::Exit => HostLifecycle::Destroyed,
                _ => return,
            };
            forward_lifecycle(app, lifecycle);
        })
        .on_drop(|app| {
            forward_lifecycle(&app, HostLifecycle::Destroyed);
        })
        .build()
}

fn forward_lifecycle<R: Runtime>(app: &tauri::AppHandle<R>, lifecycle: HostLifecycle) {
    let Some(state) = app.try_state::<SharedState>() else {
        return;
    };
    // Lifecycle callbacks run on the event loop thread; never block it. A
    // skipped Destroyed still releases the subscription once the managed
    // state is dropped, through `CallDetector`'s `Drop`.
    let Ok(mut state_guard) = state.try_lock() else {
        tracing::warn!(?lifecycle, "calldetect state busy, skipping lifecycle event");
        return;
    };
    if let Err(e) = state_guard.detector.on_host_lifecycle(lifecycle) {
        tracing::error!("calldetect lifecycle {:?} failed: {}", lifecycle, e);
    }
}
