//! Client for the transactional email API.

use serde::Serialize;

use crate::server::{config::Config, error::Error, provider::ensure_success};

const PROVIDER: &str = "email";

/// A rendered transactional email.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html: String,
    /// Plain text body
    pub text: String,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Transactional email API client.
#[derive(Clone)]
pub struct Mailer {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl Mailer {
    /// Creates a client for the email API at `config.email_api_url`.
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_url: config.email_api_url.clone(),
            api_key: config.email_api_key.clone(),
            from: config.email_from.clone(),
        }
    }

    /// Sends `message` through `POST {api_url}/emails`.
    pub async fn send(&self, message: &EmailMessage) -> Result<(), Error> {
        let body = SendEmailRequest {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };

        let response = self
            .http
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        ensure_success(PROVIDER, response).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use linkdex_test_utils::prelude::*;

    use super::EmailMessage;
    use crate::server::{
        error::{provider::ProviderError, Error},
        util::test::TestContextExt,
    };

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: "Hello".to_string(),
            html: "<p>Hello</p>".to_string(),
            text: "Hello".to_string(),
        }
    }

    #[tokio::test]
    /// Expect the message to be posted to the recipient
    async fn sends_email() -> Result<(), TestError> {
        let mut test = TestBuilder::new().build().await?;
        let mock = test.mail().create_email_endpoint_to("user@example.com", 1);
        let mailer = test.app_state().mailer;

        let result = mailer.send(&message("user@example.com")).await;

        assert!(result.is_ok());
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    /// Expect ProviderError when the API rejects the message
    async fn returns_error_on_rejection() -> Result<(), TestError> {
        let mut test = TestBuilder::new().build().await?;
        let mock = test.mail().create_email_endpoint_with_status(422, 1);
        let mailer = test.app_state().mailer;

        let result = mailer.send(&message("user@example.com")).await;

        assert!(matches!(
            result,
            Err(Error::ProviderError(ProviderError::Api { status: 422, .. }))
        ));
        mock.assert();

        Ok(())
    }
}
