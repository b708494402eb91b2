use once_cell::sync::Lazy;
use routing_demo::configuration::{ApplicationSettings, Settings};
use routing_demo::dispatcher::NotificationDispatcher;
use routing_demo::startup::run;
use routing_demo::telemetry::{get_subscriber, init_subscriber};
use secrecy::Secret;
use std::net::TcpListener;
use wiremock::MockServer;

// Ensure that the `tracing` stack is only initialised once
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub const SECRET_PASSWORD: &str = "correct horse battery staple";

pub struct TestApp {
    pub address: String,
    pub mailgun_server: MockServer,
    pub sendgrid_server: MockServer,
    pub cloudmailin_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn request(&self, method: reqwest::Method, path: &str) -> reqwest::Response {
        self.api_client
            .request(method, &format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_mail_form(&self, fields: &[(&str, &str)]) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/mailgun", &self.address))
            .form(fields)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_mail_body(&self, content_type: &str, body: &'static str) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/mailgun", &self.address))
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub fn assert_is_redirect_to(response: &reqwest::Response, location: &str) {
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(response.headers().get("Location").unwrap(), location);
}

/// App with every provider configured against its own mock server.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Like `spawn_app`, letting the caller adjust settings before startup.
pub async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);

    let mailgun_server = MockServer::start().await;
    let sendgrid_server = MockServer::start().await;
    let cloudmailin_server = MockServer::start().await;

    let mut settings = Settings {
        application: ApplicationSettings {
            port: 0,
            host: "127.0.0.1".into(),
        },
        secret_password: Some(Secret::new(SECRET_PASSWORD.into())),
        email_timeout_milliseconds: 2_000,
        mailgun_api_key: Some(Secret::new("mailgun-key".into())),
        mailgun_domain: Some("mg.example.com".into()),
        mailgun_base_url: mailgun_server.uri(),
        sendgrid_api_key: Some(Secret::new("sendgrid-key".into())),
        sendgrid_base_url: sendgrid_server.uri(),
        sendgrid_sender: "notifications@example.com".into(),
        cloudmailin_username: Some("cloud-user".into()),
        cloudmailin_password: Some(Secret::new("cloud-pass".into())),
        cloudmailin_base_url: cloudmailin_server.uri(),
        cloudmailin_sender: "admin@example.com".into(),
    };
    customise(&mut settings);

    let listener = TcpListener::bind(format!(
        "{}:{}",
        settings.application.host, settings.application.port
    ))
    .expect("Failed to bind random port");
    // We retrieve the port assigned to us by the OS
    let port = listener.local_addr().unwrap().port();

    let dispatcher = NotificationDispatcher::from_settings(&settings)
        .expect("Failed to build the dispatcher");
    let server = run(listener, dispatcher).expect("Failed to build the server");
    let _ = tokio::spawn(server);

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        mailgun_server,
        sendgrid_server,
        cloudmailin_server,
        api_client,
    }
}
