use crate::cli::commands::Services;
use crate::config::Config;
use crate::core::daemon::Daemon;
use crate::errors::AppResult;
use crate::ui::messages::info;
use std::sync::atomic::AtomicBool;

/// Run drains and the nightly cutover until the process is killed.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let services = Services::open(cfg)?;
    let cutover_at = cfg.cutover_at()?;

    info(format!(
        "Scheduler running: queue drain every {}s, cutover at {}",
        cfg.drain_interval_secs,
        cutover_at.format("%H:%M")
    ));

    let daemon = Daemon::new(
        services.fill.clone(),
        services.store.clone(),
        services.notifier.clone(),
        cutover_at,
        cfg.drain_interval(),
    );

    let stop = AtomicBool::new(false);
    daemon.run(&stop);
    Ok(())
}
