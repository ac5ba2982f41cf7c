//! Stdout notifier used by watch mode

use crate::output::report::render_notice;
use crate::subscription::{Notice, Notifier, NotifyError};
use async_trait::async_trait;

/// Prints notices to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, chat_id: i64, notice: &Notice) -> Result<(), NotifyError> {
        tracing::debug!("Delivering notice for {} to chat {}", notice.case_id(), chat_id);
        println!("{}", render_notice(notice));
        Ok(())
    }
}
