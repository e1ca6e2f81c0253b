use crate::cli::commands::{Services, parse_date_or_today};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::time::parse_optional_time;

/// Submit a single action for a user.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Clock {
        user,
        action,
        date,
        at,
    } = cmd
    {
        let d = parse_date_or_today(date.as_ref())?;
        let time = parse_optional_time(at.as_ref())?;

        let services = Services::open(cfg)?;
        let cred = services.credential(user)?;

        match services.fill.clock(&cred, *action, d, time)? {
            0 => success(format!("Done! {} recorded for {}", action, user)),
            depth => warning(format!(
                "Rate limited: {} queued at position {}",
                action, depth
            )),
        }

        services.flush_queue(cfg);
    }

    Ok(())
}
