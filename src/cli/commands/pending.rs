use crate::config::Config;
use crate::db::store::{FillJobStore, SqliteStore};
use crate::errors::AppResult;

/// List the fills waiting for the nightly cutover.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let store = SqliteStore::open(&cfg.database)?;
    let jobs = store.list_pending_fill_jobs()?;

    if jobs.is_empty() {
        println!("🌙 No fills scheduled for tonight.");
        return Ok(());
    }

    println!("🌙 Fills scheduled for tonight:\n");
    for job in jobs {
        println!(
            "{:>4}: {:<12} {} {}{}",
            job.id,
            job.owner(),
            job.date_str(),
            job.policy,
            if job.options.start_early { " (start at 8)" } else { "" }
        );
    }

    Ok(())
}
