//! Outbound email delivery
//!
//! One capability: `deliver(to, subject, body)`. The mailer is configured
//! from the environment; running without configuration is a supported mode
//! in which verification codes are surfaced to the caller instead of mailed.

use serde::Serialize;
use tracing::info;

use crate::error::{AppError, AppResult};

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Mail delivery channel
#[derive(Clone)]
pub enum Mailer {
    /// SendGrid-backed delivery
    Sendgrid {
        http: reqwest::Client,
        api_key: String,
        from_email: String,
        from_name: String,
    },
    /// No channel configured; codes are returned to the caller instead
    Disabled,
}

impl Mailer {
    /// Build the mailer from environment variables.
    ///
    /// # Environment Variables
    /// - `SENDGRID_API_KEY`: API key for the delivery provider
    /// - `MAIL_FROM`: sender address
    /// - `MAIL_FROM_NAME`: sender display name (default: "ERailTicket")
    ///
    /// When `SENDGRID_API_KEY` or `MAIL_FROM` is missing the mailer is
    /// disabled.
    pub fn from_env() -> Self {
        let api_key = std::env::var("SENDGRID_API_KEY").ok();
        let from_email = std::env::var("MAIL_FROM").ok();
        let from_name =
            std::env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "ERailTicket".to_string());

        match (api_key, from_email) {
            (Some(api_key), Some(from_email)) => {
                info!("Mail delivery configured for sender {}", from_email);
                Mailer::Sendgrid {
                    http: reqwest::Client::new(),
                    api_key,
                    from_email,
                    from_name,
                }
            }
            _ => {
                info!("No mail delivery configured; codes will be returned to callers");
                Mailer::Disabled
            }
        }
    }

    /// Whether a delivery channel is available
    pub fn is_configured(&self) -> bool {
        matches!(self, Mailer::Sendgrid { .. })
    }

    /// Send a plain-text message
    pub async fn deliver(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let Mailer::Sendgrid {
            http,
            api_key,
            from_email,
            from_name,
        } = self
        else {
            return Err(AppError::DeliveryFailed);
        };

        let mail = SgMail {
            personalizations: vec![SgPersonalization {
                to: vec![SgEmail {
                    email: to.to_string(),
                    name: None,
                }],
                subject: Some(subject.to_string()),
            }],
            from: SgEmail {
                email: from_email.clone(),
                name: Some(from_name.clone()),
            },
            content: vec![SgContent {
                content_type: "text/plain".to_string(),
                value: body.to_string(),
            }],
        };

        let res = http
            .post(SENDGRID_URL)
            .bearer_auth(api_key)
            .json(&mail)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Mail request failed: {}", e);
                AppError::DeliveryFailed
            })?;

        // SendGrid success = 202 Accepted
        if res.status() == reqwest::StatusCode::ACCEPTED {
            info!("Email sent to {}", to);
            Ok(())
        } else {
            let code = res.status().as_u16();
            tracing::error!("Mail provider refused message: status={}", code);
            Err(AppError::DeliveryFailed)
        }
    }
}

#[derive(Serialize)]
struct SgMail {
    personalizations: Vec<SgPersonalization>,
    from: SgEmail,
    content: Vec<SgContent>,
}

#[derive(Serialize)]
struct SgPersonalization {
    to: Vec<SgEmail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
}

#[derive(Serialize)]
struct SgEmail {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Serialize)]
struct SgContent {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_mailer_disabled_without_config() {
        unsafe {
            std::env::remove_var("SENDGRID_API_KEY");
            std::env::remove_var("MAIL_FROM");
        }

        assert!(!Mailer::from_env().is_configured());
    }

    #[test]
    #[serial]
    fn test_mailer_configured_from_env() {
        unsafe {
            std::env::set_var("SENDGRID_API_KEY", "SG.test-key");
            std::env::set_var("MAIL_FROM", "noreply@example.com");
        }

        assert!(Mailer::from_env().is_configured());

        // Clean up
        unsafe {
            std::env::remove_var("SENDGRID_API_KEY");
            std::env::remove_var("MAIL_FROM");
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_disabled_mailer_reports_delivery_failure() {
        let err = Mailer::Disabled
            .deliver("bob@example.com", "subject", "body")
            .await
            .expect_err("disabled mailer delivered");
        assert!(matches!(err, AppError::DeliveryFailed));
    }
}
