//! Server configuration from the environment

use anyhow::{Context, Result};
use pagecraft_core::generate::GeminiConfig;
use pagecraft_core::mail::SmtpConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings, read once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,

    /// Holds `documents.json` and the `uploads/` directory
    pub storage_path: PathBuf,

    pub gemini: GeminiConfig,

    /// `None` when SMTP is not configured; codes are then only logged
    pub smtp: Option<SmtpConfig>,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ServerConfig {
    /// Read settings from environment variables (a `.env` file is loaded by `main`)
    pub fn from_env() -> Result<Self> {
        let bind_addr = var("PAGECRAFT_BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3001".to_string())
            .parse()
            .context("PAGECRAFT_BIND_ADDR is not a socket address")?;

        let storage_path =
            PathBuf::from(var("PAGECRAFT_STORAGE_PATH").unwrap_or_else(|| "./pagecraft_data".into()));

        let mut gemini = GeminiConfig::new(var("GEMINI_API_KEY").unwrap_or_default());
        if gemini.api_key.is_empty() {
            tracing::warn!("GEMINI_API_KEY is not set, generation requests will be rejected upstream");
        }
        if let Some(base_url) = var("GEMINI_BASE_URL") {
            gemini.base_url = base_url;
        }
        if let Some(model) = var("GEMINI_MODEL") {
            gemini.model = model;
        }
        if let Some(secs) = var("PAGECRAFT_AI_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .context("PAGECRAFT_AI_TIMEOUT_SECS must be a whole number of seconds")?;
            gemini.timeout = Duration::from_secs(secs);
        }

        let smtp = match (var("SMTP_HOST"), var("EMAIL_USER"), var("EMAIL_PASS")) {
            (Some(host), Some(username), Some(password)) => {
                let port = match var("SMTP_PORT") {
                    Some(port) => port.parse().context("SMTP_PORT must be a port number")?,
                    None => 587,
                };
                Some(SmtpConfig {
                    host,
                    port,
                    username,
                    password,
                    from: None,
                })
            }
            _ => None,
        };

        Ok(Self {
            bind_addr,
            storage_path,
            gemini,
            smtp,
        })
    }

    pub fn documents_path(&self) -> PathBuf {
        self.storage_path.join("documents.json")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.storage_path.join("uploads")
    }
}
