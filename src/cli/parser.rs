use crate::models::clock_action::ClockAction;
use crate::models::policy::FillPolicy;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rClockfill
/// Operator front end for the clocking scheduler
#[derive(Parser)]
#[command(
    name = "rclockfill",
    version = env!("CARGO_PKG_VERSION"),
    about = "Fill work days against a remote time-tracking service, with retry queue and nightly cutover",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override configuration file path
    #[arg(global = true, long = "config")]
    pub config: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Store (or replace) the upstream token of a user
    Register {
        #[arg(long = "user", help = "User id (owner of notifications)")]
        user: String,

        #[arg(long = "token", help = "Upstream bearer token (JWT or opaque)")]
        token: String,
    },

    /// Show the events a policy produces for a date, without submitting
    Plan {
        /// Date (YYYY-MM-DD or DD-MM-YYYY), default today
        date: Option<String>,

        #[arg(long, value_enum, default_value = "all-day")]
        policy: FillPolicy,

        #[arg(long = "start-at-8", help = "Mon–Thu WorkDay from 08:00 to 17:30")]
        start_early: bool,
    },

    /// Submit a single clocking action
    Clock {
        #[arg(long = "user")]
        user: String,

        #[arg(value_enum)]
        action: ClockAction,

        #[arg(long = "date", help = "Date (YYYY-MM-DD or DD-MM-YYYY), default today")]
        date: Option<String>,

        #[arg(long = "at", help = "Time (HH:MM or HH:MM:SS), default time of the action")]
        at: Option<String>,
    },

    /// Fill one day (today is deferred to the nightly cutover)
    FillDay {
        #[arg(long = "user")]
        user: String,

        /// Date (YYYY-MM-DD or DD-MM-YYYY), default today
        date: Option<String>,

        #[arg(long, value_enum, default_value = "all-day")]
        policy: FillPolicy,

        #[arg(long = "start-at-8", help = "Mon–Thu WorkDay from 08:00 to 17:30")]
        start_early: bool,
    },

    /// Fill every weekday of an inclusive date range
    FillRange {
        #[arg(long = "user")]
        user: String,

        start: String,

        end: String,

        #[arg(long, value_enum, default_value = "work-day")]
        policy: FillPolicy,

        #[arg(long = "start-at-8", help = "Mon–Thu WorkDay from 08:00 to 17:30")]
        start_early: bool,
    },

    /// List fills waiting for the nightly cutover
    Pending,

    /// Replay all deferred fills now and clear them
    Cutover,

    /// Run the scheduler in the foreground (queue drains + nightly cutover)
    Daemon,

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
