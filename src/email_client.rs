use crate::configuration::{CloudMailinCredentials, MailgunCredentials, SendGridCredentials};
use crate::domain::{Provider, RecipientEmail};
use crate::error::error_chain_fmt;
use anyhow::Context;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use std::fmt::Formatter;

/// Provider-agnostic outgoing email. Each client adds its own sender.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: RecipientEmail,
    pub subject: String,
    pub text: String,
}

#[derive(thiserror::Error)]
pub enum SendError {
    #[error("Could not build the provider request")]
    InvalidRequest(#[source] anyhow::Error),
    #[error("The provider did not accept the email")]
    Delivery(#[from] reqwest::Error),
}

impl std::fmt::Debug for SendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

fn endpoint(base_url: &str, path: &str) -> Result<Url, SendError> {
    Url::parse(base_url)
        .and_then(|base| base.join(path))
        .with_context(|| format!("Invalid provider base url {}", base_url))
        .map_err(SendError::InvalidRequest)
}

/// Capability interface over the supported backends.
pub enum EmailClient {
    Mailgun(MailgunClient),
    SendGrid(SendGridClient),
    CloudMailin(CloudMailinClient),
}

impl EmailClient {
    pub fn provider(&self) -> Provider {
        match self {
            EmailClient::Mailgun(_) => Provider::Mailgun,
            EmailClient::SendGrid(_) => Provider::SendGrid,
            EmailClient::CloudMailin(_) => Provider::CloudMailin,
        }
    }

    /// Send `message`, returning the provider's response body.
    pub async fn send(&self, message: &EmailMessage) -> Result<String, SendError> {
        match self {
            EmailClient::Mailgun(client) => client.send(message).await,
            EmailClient::SendGrid(client) => client.send(message).await,
            EmailClient::CloudMailin(client) => client.send(message).await,
        }
    }
}

pub struct MailgunClient {
    http_client: Client,
    base_url: String,
    domain: String,
    api_key: Secret<String>,
}

#[derive(serde::Serialize)]
struct MailgunRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl MailgunClient {
    pub fn new(http_client: Client, credentials: MailgunCredentials) -> Self {
        Self {
            http_client,
            base_url: credentials.base_url,
            domain: credentials.domain,
            api_key: credentials.api_key,
        }
    }

    pub fn sender(&self) -> String {
        format!("ciro@{}", self.domain)
    }

    #[tracing::instrument(
        name = "Send email through Mailgun",
        skip(self, message),
        fields(recipient = %message.to)
    )]
    pub async fn send(&self, message: &EmailMessage) -> Result<String, SendError> {
        let url = endpoint(&self.base_url, &format!("/v3/{}/messages", self.domain))?;
        let sender = self.sender();
        let request_body = MailgunRequest {
            from: &sender,
            to: message.to.as_ref(),
            subject: &message.subject,
            text: &message.text,
        };
        let response = self
            .http_client
            .post(url)
            .basic_auth("api", Some(self.api_key.expose_secret()))
            .form(&request_body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

pub struct SendGridClient {
    http_client: Client,
    base_url: String,
    sender: String,
    api_key: Secret<String>,
}

#[derive(serde::Serialize)]
struct SendGridRequest<'a> {
    personalizations: [SendGridPersonalization<'a>; 1],
    from: SendGridAddress<'a>,
    subject: &'a str,
    content: [SendGridContent<'a>; 1],
}

#[derive(serde::Serialize)]
struct SendGridPersonalization<'a> {
    to: [SendGridAddress<'a>; 1],
}

#[derive(serde::Serialize)]
struct SendGridAddress<'a> {
    email: &'a str,
}

#[derive(serde::Serialize)]
struct SendGridContent<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

impl SendGridClient {
    pub fn new(http_client: Client, credentials: SendGridCredentials) -> Self {
        Self {
            http_client,
            base_url: credentials.base_url,
            sender: credentials.sender,
            api_key: credentials.api_key,
        }
    }

    #[tracing::instrument(
        name = "Send email through SendGrid",
        skip(self, message),
        fields(recipient = %message.to)
    )]
    pub async fn send(&self, message: &EmailMessage) -> Result<String, SendError> {
        let url = endpoint(&self.base_url, "/v3/mail/send")?;
        let request_body = SendGridRequest {
            personalizations: [SendGridPersonalization {
                to: [SendGridAddress {
                    email: message.to.as_ref(),
                }],
            }],
            from: SendGridAddress {
                email: &self.sender,
            },
            subject: &message.subject,
            content: [SendGridContent {
                content_type: "text/plain",
                value: &message.text,
            }],
        };
        let response = self
            .http_client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

pub struct CloudMailinClient {
    http_client: Client,
    base_url: String,
    username: String,
    sender: String,
    password: Secret<String>,
}

#[derive(serde::Serialize)]
struct CloudMailinRequest<'a> {
    to: &'a str,
    from: &'a str,
    subject: &'a str,
    plain: &'a str,
}

impl CloudMailinClient {
    pub fn new(http_client: Client, credentials: CloudMailinCredentials) -> Self {
        Self {
            http_client,
            base_url: credentials.base_url,
            username: credentials.username,
            sender: credentials.sender,
            password: credentials.password,
        }
    }

    #[tracing::instrument(
        name = "Send email through CloudMailin",
        skip(self, message),
        fields(recipient = %message.to)
    )]
    pub async fn send(&self, message: &EmailMessage) -> Result<String, SendError> {
        let url = endpoint(
            &self.base_url,
            &format!("/api/v0.1/{}/messages", self.username),
        )?;
        let request_body = CloudMailinRequest {
            to: message.to.as_ref(),
            from: &self.sender,
            subject: &message.subject,
            plain: &message.text,
        };
        let response = self
            .http_client
            .post(url)
            .bearer_auth(self.password.expose_secret())
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}
