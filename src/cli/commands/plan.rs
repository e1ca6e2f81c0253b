use crate::cli::commands::parse_date_or_today;
use crate::cli::parser::Commands;
use crate::core::schedule::compute_events;
use crate::errors::AppResult;
use crate::models::policy::FillOptions;
use crate::ui::messages::header;

/// Print the events of a policy for a date (dry run, no network).
pub fn handle(cmd: &Commands) -> AppResult<()> {
    if let Commands::Plan {
        date,
        policy,
        start_early,
    } = cmd
    {
        let d = parse_date_or_today(date.as_ref())?;
        let options = FillOptions {
            start_early: *start_early,
        };

        let events = compute_events(*policy, d, options)?;

        header(format!("{} · {}", d.format("%Y-%m-%d %A"), policy));
        for ev in &events {
            println!("  {}  {}", ev.time_str(), ev.action);
        }
    }

    Ok(())
}
