//! Candidate notifications: accept/reject emails.
//!
//! `AppState` holds an `Arc<dyn Notifier>` picked once at startup:
//! `ConsoleNotifier` (simulation, logs only) or `SmtpNotifier` (real delivery).

pub mod console;
pub mod handlers;
pub mod smtp;
pub mod templates;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::EmailConfig;

pub use console::ConsoleNotifier;
pub use smtp::SmtpNotifier;

/// Hiring decision communicated to the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
}

#[derive(Debug, Error)]
#[error("Invalid status '{0}'. Use 'accepted' or 'rejected'.")]
pub struct UnknownDecision(pub String);

impl FromStr for Decision {
    type Err = UnknownDecision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(Decision::Accepted),
            "rejected" => Ok(Decision::Rejected),
            other => Err(UnknownDecision(other.to_string())),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::Accepted => "accepted",
            Decision::Rejected => "rejected",
        })
    }
}

/// Reported to clients so they can tell a simulated send from a real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierMode {
    Real,
    Simulation,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid email address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Sends a templated decision message. Implementations must not touch the
/// result store; a failed send leaves stored results untouched.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn mode(&self) -> NotifierMode;

    /// Returns a human-readable confirmation on success.
    async fn notify(
        &self,
        recipient: &str,
        candidate_name: &str,
        decision: Decision,
    ) -> Result<String, NotifyError>;
}

/// Picks the notifier implementation from configuration.
pub fn build_notifier(config: &EmailConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    match &config.smtp {
        Some(smtp) => {
            info!(
                "Email mode: REAL (sender {} via {}:{})",
                smtp.sender_email, smtp.server, smtp.port
            );
            Ok(Arc::new(SmtpNotifier::new(smtp, &config.sender_name)?))
        }
        None => {
            info!("Email mode: SIMULATION (messages are logged, not sent)");
            Ok(Arc::new(ConsoleNotifier::new(config.sender_name.clone())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmtpConfig;

    #[test]
    fn test_decision_parses_exact_values() {
        assert_eq!("accepted".parse::<Decision>().unwrap(), Decision::Accepted);
        assert_eq!("rejected".parse::<Decision>().unwrap(), Decision::Rejected);
        assert!("Accepted".parse::<Decision>().is_err());
        assert!("maybe".parse::<Decision>().is_err());
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&NotifierMode::Simulation).unwrap(),
            r#""simulation""#
        );
    }

    #[test]
    fn test_build_simulation_notifier_by_default() {
        let notifier = build_notifier(&EmailConfig::default()).unwrap();
        assert_eq!(notifier.mode(), NotifierMode::Simulation);
    }

    #[tokio::test]
    async fn test_build_smtp_notifier_when_configured() {
        let config = EmailConfig {
            sender_name: "HR Team".to_string(),
            smtp: Some(SmtpConfig {
                server: "smtp.example.com".to_string(),
                port: 587,
                sender_email: "hr@example.com".to_string(),
                sender_password: "secret".to_string(),
            }),
        };
        let notifier = build_notifier(&config).unwrap();
        assert_eq!(notifier.mode(), NotifierMode::Real);
    }
}
