use crate::helpers::{assert_is_redirect_to, spawn_app, spawn_app_with, TestApp, SECRET_PASSWORD};
use std::time::{Duration, Instant};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn expect_no_email(app: &TestApp) {
    for server in [&app.mailgun_server, &app.sendgrid_server, &app.cloudmailin_server] {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(server)
            .await;
    }
}

fn form<'a>(password: &'a str, provider: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("to", "ursula@example.com"),
        ("title", "Greetings"),
        ("body", "Body\n\nof email"),
        ("password", password),
        ("provider", provider),
    ]
}

#[tokio::test]
async fn the_form_is_rendered() {
    let app = spawn_app().await;

    let response = app.get("/mailgun").await;

    assert_eq!(response.status().as_u16(), 200);
    let html_page = response.text().await.unwrap();
    assert!(html_page.contains(r#"<form action="/mailgun" method="post">"#));
    assert!(html_page.contains(r#"<option value="sendgrid">sendgrid</option>"#));
}

#[tokio::test]
async fn wrong_password_redirects_without_sending() {
    let app = spawn_app().await;
    expect_no_email(&app).await;

    for provider in ["mailgun", "sendgrid", "cloudmailin"] {
        let response = app.post_mail_form(&form("wrong", provider)).await;
        assert_is_redirect_to(&response, "/mailgun");
    }
}

#[tokio::test]
async fn provider_without_credentials_redirects_without_sending() {
    let app = spawn_app_with(|settings| settings.sendgrid_api_key = None).await;
    expect_no_email(&app).await;

    let response = app.post_mail_form(&form(SECRET_PASSWORD, "sendgrid")).await;

    assert_is_redirect_to(&response, "/mailgun");
}

#[tokio::test]
async fn unknown_provider_redirects_without_sending() {
    let app = spawn_app().await;
    expect_no_email(&app).await;

    let response = app.post_mail_form(&form(SECRET_PASSWORD, "postmark")).await;

    assert_is_redirect_to(&response, "/mailgun");
}

#[tokio::test]
async fn mailgun_submission_is_forwarded_to_mailgun_only() {
    let app = spawn_app().await;
    Mock::given(path("/v3/mg.example.com/messages"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.mailgun_server)
        .await;
    for server in [&app.sendgrid_server, &app.cloudmailin_server] {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(server)
            .await;
    }

    let response = app.post_mail_form(&form(SECRET_PASSWORD, "mailgun")).await;

    assert_is_redirect_to(&response, "/mailgun");
}

#[tokio::test]
async fn sendgrid_submission_is_forwarded_to_sendgrid() {
    let app = spawn_app().await;
    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&app.sendgrid_server)
        .await;

    let response = app.post_mail_form(&form(SECRET_PASSWORD, "sendgrid")).await;

    assert_is_redirect_to(&response, "/mailgun");
    let request = &app.sendgrid_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["subject"], "Greetings");
    assert_eq!(body["from"]["email"], "notifications@example.com");
    assert_eq!(body["personalizations"][0]["to"][0]["email"], "ursula@example.com");
}

#[tokio::test]
async fn cloudmailin_submission_is_forwarded_to_cloudmailin() {
    let app = spawn_app().await;
    Mock::given(path("/api/v0.1/cloud-user/messages"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&app.cloudmailin_server)
        .await;

    let response = app.post_mail_form(&form(SECRET_PASSWORD, "cloudmailin")).await;

    assert_is_redirect_to(&response, "/mailgun");
    let request = &app.cloudmailin_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["from"], "admin@example.com");
    assert_eq!(body["plain"], "Body\n\nof email");
}

#[tokio::test]
async fn provider_failures_still_redirect() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.mailgun_server)
        .await;

    let response = app.post_mail_form(&form(SECRET_PASSWORD, "mailgun")).await;

    assert_is_redirect_to(&response, "/mailgun");
}

#[tokio::test]
async fn a_body_that_is_not_a_form_redirects_without_sending() {
    let app = spawn_app().await;
    expect_no_email(&app).await;
    let test_cases = vec![
        ("application/json", r#"{"password":"correct horse battery staple"}"#),
        ("text/plain", "hello"),
    ];

    for (content_type, body) in test_cases {
        let response = app.post_mail_body(content_type, body).await;
        assert_is_redirect_to(&response, "/mailgun");
    }
}

#[tokio::test]
async fn a_misconfigured_provider_url_is_a_500() {
    let app = spawn_app_with(|settings| settings.mailgun_base_url = "not a url".into()).await;

    let response = app.post_mail_form(&form(SECRET_PASSWORD, "mailgun")).await;

    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(response.text().await.unwrap(), "");
}

#[tokio::test]
async fn a_slow_provider_does_not_block_other_requests() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(1)))
        .expect(1)
        .mount(&app.mailgun_server)
        .await;
    let fields = form(SECRET_PASSWORD, "mailgun");

    let submit = async {
        let response = app.post_mail_form(&fields).await;
        (response, Instant::now())
    };
    let hello = async {
        // Let the submission reach the provider first
        tokio::time::sleep(Duration::from_millis(200)).await;
        let sent_at = Instant::now();
        let response = app.get("/hello").await;
        (response, sent_at, Instant::now())
    };
    let ((submitted, submitted_at), (greeted, greeting_sent_at, greeted_at)) =
        tokio::join!(submit, hello);

    assert_is_redirect_to(&submitted, "/mailgun");
    assert_eq!(greeted.text().await.unwrap(), "hello world");
    assert!(greeted_at < submitted_at);
    assert!(greeted_at - greeting_sent_at < Duration::from_millis(500));
}
