//! Example: Replay raw call state codes and print the host payloads.
//!
//! Run with: cargo run -p calldetect-telephony --example replay_calls -- 1 2 0 1 0
//!
//! Codes: 0 = idle, 1 = ringing, 2 = off-hook.

use calldetect_events::EventBus;
use calldetect_telephony::{CallDetector, DetectorConfig, HostTelephonySource};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct PrintBus;

impl EventBus for PrintBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        println!("{topic}: {}", payload.as_str().unwrap_or_default());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,calldetect_telephony=debug")),
        )
        .init();

    let mut codes = Vec::new();
    for arg in std::env::args().skip(1) {
        codes.push(arg.parse::<i32>()?);
    }
    if codes.is_empty() {
        codes = vec![1, 2, 0, 1, 0];
    }

    let source = Arc::new(HostTelephonySource::new());
    let mut detector =
        CallDetector::new(source.clone(), Arc::new(PrintBus)).with_config(DetectorConfig {
            read_phone_number: true,
            ..Default::default()
        });
    detector.start_listener()?;

    for code in codes {
        source.notify(code, Some("+15550100"));
    }

    detector.stop_listener()?;
    Ok(())
}
