use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub secret_password: Option<Secret<String>>,
    pub email_timeout_milliseconds: u64,
    pub mailgun_api_key: Option<Secret<String>>,
    pub mailgun_domain: Option<String>,
    pub mailgun_base_url: String,
    pub sendgrid_api_key: Option<Secret<String>>,
    pub sendgrid_base_url: String,
    pub sendgrid_sender: String,
    pub cloudmailin_username: Option<String>,
    pub cloudmailin_password: Option<Secret<String>>,
    pub cloudmailin_base_url: String,
    pub cloudmailin_sender: String,
}

#[derive(Clone)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
}

/// Per-provider credentials. `None` disables that provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderCredentials {
    pub mailgun: Option<MailgunCredentials>,
    pub sendgrid: Option<SendGridCredentials>,
    pub cloudmailin: Option<CloudMailinCredentials>,
}

#[derive(Debug, Clone)]
pub struct MailgunCredentials {
    pub api_key: Secret<String>,
    pub domain: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct SendGridCredentials {
    pub api_key: Secret<String>,
    pub sender: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct CloudMailinCredentials {
    pub username: String,
    pub password: Secret<String>,
    pub sender: String,
    pub base_url: String,
}

impl Settings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.email_timeout_milliseconds)
    }

    pub fn secret_password(&self) -> Option<Secret<String>> {
        present_secret(&self.secret_password)
    }

    pub fn provider_credentials(&self) -> ProviderCredentials {
        let mailgun = match (
            present_secret(&self.mailgun_api_key),
            present(&self.mailgun_domain),
        ) {
            (Some(api_key), Some(domain)) => Some(MailgunCredentials {
                api_key,
                domain,
                base_url: self.mailgun_base_url.clone(),
            }),
            _ => None,
        };

        let sendgrid = present_secret(&self.sendgrid_api_key).map(|api_key| SendGridCredentials {
            api_key,
            sender: self.sendgrid_sender.clone(),
            base_url: self.sendgrid_base_url.clone(),
        });

        let cloudmailin = match (
            present(&self.cloudmailin_username),
            present_secret(&self.cloudmailin_password),
        ) {
            (Some(username), Some(password)) => Some(CloudMailinCredentials {
                username,
                password,
                sender: self.cloudmailin_sender.clone(),
                base_url: self.cloudmailin_base_url.clone(),
            }),
            _ => None,
        };

        ProviderCredentials {
            mailgun,
            sendgrid,
            cloudmailin,
        }
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

fn present_secret(value: &Option<Secret<String>>) -> Option<Secret<String>> {
    value
        .as_ref()
        .filter(|v| !v.expose_secret().is_empty())
        .cloned()
}

/// Flat view of the configuration sources: every key is a lower-cased
/// environment variable name (`PORT` -> `port`).
#[derive(serde::Deserialize)]
struct RawSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
    host: String,
    secret_password: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    email_timeout_milliseconds: u64,
    mailgun_api_key: Option<Secret<String>>,
    mailgun_domain: Option<String>,
    mailgun_base_url: String,
    sendgrid_api_key: Option<Secret<String>>,
    sendgrid_base_url: String,
    sendgrid_sender: String,
    cloudmailin_username: Option<String>,
    cloudmailin_password: Option<Secret<String>>,
    cloudmailin_base_url: String,
    cloudmailin_sender: String,
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        Self {
            application: ApplicationSettings {
                port: raw.port,
                host: raw.host,
            },
            secret_password: raw.secret_password,
            email_timeout_milliseconds: raw.email_timeout_milliseconds,
            mailgun_api_key: raw.mailgun_api_key,
            mailgun_domain: raw.mailgun_domain,
            mailgun_base_url: raw.mailgun_base_url,
            sendgrid_api_key: raw.sendgrid_api_key,
            sendgrid_base_url: raw.sendgrid_base_url,
            sendgrid_sender: raw.sendgrid_sender,
            cloudmailin_username: raw.cloudmailin_username,
            cloudmailin_password: raw.cloudmailin_password,
            cloudmailin_base_url: raw.cloudmailin_base_url,
            cloudmailin_sender: raw.cloudmailin_sender,
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let mut settings = config::Config::default();

    settings.set_default("host", "0.0.0.0")?;
    settings.set_default("port", 3000)?;
    settings.set_default("email_timeout_milliseconds", 10_000)?;
    settings.set_default("mailgun_base_url", "https://api.mailgun.net")?;
    settings.set_default("sendgrid_base_url", "https://api.sendgrid.com")?;
    settings.set_default("sendgrid_sender", "notifications@example.com")?;
    settings.set_default("cloudmailin_base_url", "https://api.cloudmailin.com")?;
    settings.set_default("cloudmailin_sender", "admin@example.com")?;

    // Optional file, then the process environment on top
    settings.merge(config::File::with_name("configuration").required(false))?;
    settings.merge(config::Environment::new())?;

    let raw: RawSettings = settings.try_into()?;
    Ok(raw.into())
}
