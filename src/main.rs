//! rClockfill main entrypoint.

use rclockfill::run;
use rclockfill::ui::messages::error;
use std::env;

fn main() {
    let filters = env::var("RCLOCKFILL_LOG").unwrap_or_else(|_| "info".to_string());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();

    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
