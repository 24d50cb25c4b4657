const COMMANDS: &[&str] = &[
    "initialize",
    "show_banner",
    "remove_banner",
    "prepare_interstitial",
    "show_interstitial",
    "prepare_app_open_ad",
    "show_app_open_ad",
    "track_content_open",
    "app_backgrounded",
    "app_foregrounded",
    "notify_network_event",
    "get_surface_state",
];

fn main() {
    tauri_plugin::Builder::new(COMMANDS).build();
}
