use crate::cli::commands::{Services, parse_date_or_today};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::outcome::FillOutcome;
use crate::models::policy::FillOptions;
use crate::ui::messages::{error, info, scheduled, success, warning};
use crate::utils::date;

fn print_outcome(day: &str, outcome: &FillOutcome) {
    match outcome {
        FillOutcome::Scheduled => {
            scheduled(format!("{} is still in progress: I'll fill it tonight.", day))
        }
        FillOutcome::Completed {
            submitted,
            queued: 0,
        } => success(format!("{}: done, {} event(s) recorded.", day, submitted)),
        FillOutcome::Completed { submitted, queued } => warning(format!(
            "{}: {} event(s) recorded, {} waiting in the retry queue.",
            day, submitted, queued
        )),
    }
}

/// Handle `fill-day`.
pub fn handle_day(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::FillDay {
        user,
        date,
        policy,
        start_early,
    } = cmd
    {
        let d = parse_date_or_today(date.as_ref())?;
        let options = FillOptions {
            start_early: *start_early,
        };

        let services = Services::open(cfg)?;
        let cred = services.credential(user)?;

        info(format!("Filling {} ({}) for {}…", d, policy, user));
        let outcome = services.fill.fill_day(&cred, d, *policy, options)?;
        print_outcome(&d.to_string(), &outcome);

        services.flush_queue(cfg);
    }

    Ok(())
}

/// Handle `fill-range`.
pub fn handle_range(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::FillRange {
        user,
        start,
        end,
        policy,
        start_early,
    } = cmd
    {
        let s = date::parse_date(start).ok_or_else(|| AppError::InvalidDate(start.to_string()))?;
        let e = date::parse_date(end).ok_or_else(|| AppError::InvalidDate(end.to_string()))?;
        let options = FillOptions {
            start_early: *start_early,
        };

        let services = Services::open(cfg)?;
        let cred = services.credential(user)?;

        info(format!(
            "Filling weekdays from {} to {} ({}) for {}…",
            s.min(e),
            s.max(e),
            policy,
            user
        ));
        let report = services.fill.fill_range(&cred, s, e, *policy, options);

        for (day, res) in &report.days {
            match res {
                Ok(outcome) => print_outcome(&day.to_string(), outcome),
                Err(msg) => error(format!("{}: {}", day, msg)),
            }
        }

        services.flush_queue(cfg);

        if !report.is_complete() {
            return Err(AppError::Other(format!(
                "{} of {} day(s) failed",
                report.failures().count(),
                report.processed()
            )));
        }
    }

    Ok(())
}
