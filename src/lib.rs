pub mod configuration;
pub mod dispatcher;
pub mod domain;
pub mod email_client;
pub mod error;
pub mod routes;
pub mod routing;
pub mod startup;
pub mod telemetry;
