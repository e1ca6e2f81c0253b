use crate::errors::AppResult;
use log::info;

/// Sink for messages addressed to a user (owned by the chat layer).
pub trait Notifier: Send + Sync {
    fn notify(&self, owner: &str, text: &str) -> AppResult<()>;
}

/// Writes notifications to the application log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, owner: &str, text: &str) -> AppResult<()> {
        info!("[notify {}] {}", owner, text);
        Ok(())
    }
}
