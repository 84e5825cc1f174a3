use std::time::Duration;

use anyhow::Context as _;
use reqwest::Client;
use serde::Serialize;

use crate::domain::repository::{MailPort, OutgoingMail};
use crate::error::AccountsServiceError;

/// Sends mail through a Resend-compatible HTTP API.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, from: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("errant-accounts/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .context("build mail http client")?;
        Ok(Self {
            client,
            api_url,
            api_key,
            from,
        })
    }
}

impl MailPort for HttpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AccountsServiceError> {
        let body = SendEmailRequest {
            from: &self.from,
            to: [&mail.to],
            subject: &mail.subject,
            html: &mail.html,
        };

        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("send mail request")?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            tracing::warn!(%status, %detail, "mail api rejected message");
            return Err(anyhow::anyhow!("mail api returned {status}").into());
        }
        tracing::debug!(%status, subject = %mail.subject, "mail accepted");
        Ok(())
    }
}
