use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if a present variable is malformed, or if SMTP delivery is
/// enabled without its credentials.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub matchers: MatcherConfig,
    pub email: EmailConfig,
}

/// Literal values the field matchers check before falling back to heuristics.
#[derive(Debug, Clone, Default)]
pub struct MatcherConfig {
    pub known_candidate_name: Option<String>,
    pub known_institution: Option<String>,
    /// Appended to the built-in skills denylist.
    pub skill_denylist_extra: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub sender_name: String,
    /// `None` keeps notifications in simulation mode.
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub sender_email: String,
    pub sender_password: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sender_name: "HR Team".to_string(),
            smtp: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            upload_dir: PathBuf::from(
                std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            ),
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            matchers: MatcherConfig {
                known_candidate_name: optional_env("KNOWN_CANDIDATE_NAME"),
                known_institution: optional_env("KNOWN_INSTITUTION"),
                skill_denylist_extra: optional_env("SKILL_DENYLIST_EXTRA")
                    .map(|v| parse_list(&v))
                    .unwrap_or_default(),
            },
            email: email_from_env()?,
        })
    }
}

fn email_from_env() -> Result<EmailConfig> {
    let sender_name = optional_env("SENDER_NAME").unwrap_or_else(|| "HR Team".to_string());

    let enabled = match optional_env("EMAIL_ENABLED") {
        Some(v) => parse_bool(&v).context("EMAIL_ENABLED must be true or false")?,
        None => false,
    };
    if !enabled {
        return Ok(EmailConfig {
            sender_name,
            smtp: None,
        });
    }

    let smtp = SmtpConfig {
        server: require_env("SMTP_SERVER")?,
        port: std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .context("SMTP_PORT must be a valid port number")?,
        sender_email: require_env("SENDER_EMAIL")?,
        sender_password: require_env("SENDER_PASSWORD")?,
    };

    Ok(EmailConfig {
        sender_name,
        smtp: Some(smtp),
    })
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Returns the variable's value, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
