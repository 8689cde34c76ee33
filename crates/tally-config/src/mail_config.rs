use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_FROM_ADDRESS, DEFAULT_LINK_BASE_URL, DEFAULT_SMTP_PORT,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// SMTP relay host; when unset, verification links go to the log
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
    /// Base URL embedded in verification links
    pub link_base_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: String::from(DEFAULT_FROM_ADDRESS),
            link_base_url: String::from(DEFAULT_LINK_BASE_URL),
        }
    }
}

impl MailConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.link_base_url.trim().is_empty() {
            return Err(ConfigError::mail("mail.link_base_url cannot be empty"));
        }

        if self.smtp_host.is_some() {
            if self.from_address.trim().is_empty() {
                return Err(ConfigError::mail(
                    "mail.from_address is required when mail.smtp_host is set",
                ));
            }
            if !self.from_address.contains('@') {
                return Err(ConfigError::mail(format!(
                    "mail.from_address '{}' is not a valid address",
                    self.from_address
                )));
            }
        }

        Ok(())
    }
}
