const COMMANDS: &[&str] = &[
    "start_listener",
    "stop_listener",
    "get_constants",
    "report_call_state",
    "report_permission",
];

fn main() {
    tauri_plugin::Builder::new(COMMANDS).build();
}
