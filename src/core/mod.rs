pub mod cutover;
pub mod daemon;
pub mod deferred;
pub mod fill;
pub mod log;
pub mod notify;
pub mod retry_queue;
pub mod schedule;
pub mod submitter;
