use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::config::SmtpConfig;
use crate::notify::templates::render;
use crate::notify::{Decision, Notifier, NotifierMode, NotifyError};

/// Real delivery over an authenticated STARTTLS relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    sender_name: String,
}

impl SmtpNotifier {
    /// Builds the transport; no connection is opened until the first send.
    pub fn new(config: &SmtpConfig, sender_name: &str) -> Result<Self, NotifyError> {
        let credentials = Credentials::new(
            config.sender_email.clone(),
            config.sender_password.clone(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from: Mailbox::new(
                Some(sender_name.to_string()),
                parse_address(&config.sender_email)?,
            ),
            sender_name: sender_name.to_string(),
        })
    }
}

fn parse_address(address: &str) -> Result<Address, NotifyError> {
    address
        .trim()
        .parse::<Address>()
        .map_err(|source| NotifyError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn mode(&self) -> NotifierMode {
        NotifierMode::Real
    }

    async fn notify(
        &self,
        recipient: &str,
        candidate_name: &str,
        decision: Decision,
    ) -> Result<String, NotifyError> {
        let to = Mailbox::new(None, parse_address(recipient)?);
        let rendered = render(decision, candidate_name, &self.sender_name);

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(rendered.subject)
            .header(ContentType::TEXT_HTML)
            .body(rendered.html_body)?;

        debug!(recipient, %decision, "Sending email over SMTP");
        self.transport.send(message).await?;
        info!(recipient, %decision, "Email sent");

        Ok(format!("Email successfully sent to {recipient}"))
    }
}
