use crate::cli::commands::Services;
use crate::config::Config;
use crate::core::cutover::run_cutover;
use crate::errors::AppResult;
use crate::ui::messages::{scheduled, success, warning};

/// Replay every deferred fill now.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let services = Services::open(cfg)?;

    let report = run_cutover(
        &services.fill,
        services.store.as_ref(),
        services.notifier.as_ref(),
    )?;

    services.flush_queue(cfg);

    if report.failed > 0 {
        warning(format!(
            "Cutover: {} job(s) replayed, {} failed (cleared anyway).",
            report.attempted, report.failed
        ));
    } else {
        success(format!("Cutover: {} job(s) replayed.", report.attempted));
    }
    if report.kept > 0 {
        scheduled(format!(
            "{} job(s) for a day not over yet kept for the next cutover.",
            report.kept
        ));
    }

    Ok(())
}
