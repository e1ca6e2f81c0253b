pub mod clock_action;
pub mod credential;
pub mod event;
pub mod fill_job;
pub mod outcome;
pub mod policy;
