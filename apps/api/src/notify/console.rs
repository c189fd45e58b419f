use async_trait::async_trait;
use tracing::info;

use crate::notify::templates::render;
use crate::notify::{Decision, Notifier, NotifierMode, NotifyError};

/// Simulation mode: logs the message that would have been sent.
pub struct ConsoleNotifier {
    sender_name: String,
}

impl ConsoleNotifier {
    pub fn new(sender_name: String) -> Self {
        Self { sender_name }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn mode(&self) -> NotifierMode {
        NotifierMode::Simulation
    }

    async fn notify(
        &self,
        recipient: &str,
        candidate_name: &str,
        decision: Decision,
    ) -> Result<String, NotifyError> {
        let message = render(decision, candidate_name, &self.sender_name);
        info!(
            recipient,
            candidate = candidate_name,
            %decision,
            subject = message.subject,
            "Simulated email: {}",
            message.preview
        );
        Ok(format!("Simulated email sent to {recipient}"))
    }
}
