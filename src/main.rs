use anyhow::Context;
use routing_demo::configuration::get_configuration;
use routing_demo::dispatcher::NotificationDispatcher;
use routing_demo::startup::run;
use routing_demo::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        "routing_demo".into(),
        "info".into(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    let config = get_configuration()
        .context("Failed to read configuration")?;
    let address = format!(
        "{address}:{port}",
        address = config.application.host,
        port = config.application.port
    );
    let listener = TcpListener::bind(&address)
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("listening: http://localhost:{}", listener.local_addr()?.port());

    let dispatcher = NotificationDispatcher::from_settings(&config)?;
    run(listener, dispatcher)?.await?;
    Ok(())
}
