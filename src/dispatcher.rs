use crate::configuration::Settings;
use crate::domain::{FormSubmission, Provider, RecipientEmail};
use crate::email_client::{
    CloudMailinClient, EmailClient, EmailMessage, MailgunClient, SendError, SendGridClient,
};
use crate::error::AppError;
use anyhow::Context;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

/// What a dispatch did. Only used for logging and tests: the caller is
/// redirected whatever the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Rejected,
    UnknownProvider,
    ProviderUnavailable(Provider),
    InvalidRecipient,
    Sent(Provider),
    Failed(Provider),
}

/// Forwards form submissions to the provider they name.
pub struct NotificationDispatcher {
    secret_password: Option<Secret<String>>,
    clients: Vec<EmailClient>,
}

impl NotificationDispatcher {
    pub fn new(secret_password: Option<Secret<String>>, clients: Vec<EmailClient>) -> Self {
        Self {
            secret_password,
            clients,
        }
    }

    /// One client per provider whose credentials are configured.
    pub fn from_settings(settings: &Settings) -> Result<Self, anyhow::Error> {
        let http_client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build the email HTTP client")?;

        let credentials = settings.provider_credentials();
        let mut clients = Vec::new();
        if let Some(mailgun) = credentials.mailgun {
            clients.push(EmailClient::Mailgun(MailgunClient::new(
                http_client.clone(),
                mailgun,
            )));
        }
        if let Some(sendgrid) = credentials.sendgrid {
            clients.push(EmailClient::SendGrid(SendGridClient::new(
                http_client.clone(),
                sendgrid,
            )));
        }
        if let Some(cloudmailin) = credentials.cloudmailin {
            clients.push(EmailClient::CloudMailin(CloudMailinClient::new(
                http_client,
                cloudmailin,
            )));
        }

        let providers: Vec<Provider> = clients.iter().map(EmailClient::provider).collect();
        tracing::info!(?providers, "Email providers configured");
        Ok(Self::new(settings.secret_password(), clients))
    }

    fn client_for(&self, provider: Provider) -> Option<&EmailClient> {
        self.clients
            .iter()
            .find(|client| client.provider() == provider)
    }

    // Plaintext equality against the single shared secret
    fn password_matches(&self, candidate: &Secret<String>) -> bool {
        match &self.secret_password {
            Some(secret) => secret.expose_secret() == candidate.expose_secret(),
            None => false,
        }
    }

    /// Provider failures are logged and reported as `Failed`; only a request
    /// that cannot even be built surfaces as an error.
    #[tracing::instrument(
        name = "Dispatch a form submission",
        skip(self, submission),
        fields(provider = %submission.provider)
    )]
    pub async fn dispatch(&self, submission: FormSubmission) -> Result<DispatchOutcome, AppError> {
        if !self.password_matches(&submission.password) {
            tracing::info!("Wrong password, nothing to send");
            return Ok(DispatchOutcome::Rejected);
        }

        let provider = match Provider::parse(&submission.provider) {
            Some(provider) => provider,
            None => {
                tracing::warn!("Unknown provider, nothing to send");
                return Ok(DispatchOutcome::UnknownProvider);
            }
        };

        let client = match self.client_for(provider) {
            Some(client) => client,
            None => {
                tracing::warn!("Provider has no credentials configured, nothing to send");
                return Ok(DispatchOutcome::ProviderUnavailable(provider));
            }
        };

        let to = match RecipientEmail::parse(submission.to) {
            Ok(to) => to,
            Err(e) => {
                tracing::warn!(error.message = %e, "Skipping an invalid recipient");
                return Ok(DispatchOutcome::InvalidRecipient);
            }
        };

        let message = EmailMessage {
            to,
            subject: submission.title,
            text: submission.body,
        };

        tracing::info!("Will send through {}", provider);
        match client.send(&message).await {
            Ok(response) => {
                tracing::info!(provider.response = %response, "{} success", provider);
                Ok(DispatchOutcome::Sent(provider))
            }
            Err(SendError::InvalidRequest(e)) => Err(AppError::Unexpected(
                e.context(format!("Failed to prepare a {} request", provider)),
            )),
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, "{} error", provider);
                Ok(DispatchOutcome::Failed(provider))
            }
        }
    }
}
