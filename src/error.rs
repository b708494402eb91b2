use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt::Formatter;

/// Failure raised by a handler instead of a normal response.
#[derive(thiserror::Error)]
pub enum AppError {
    /// Application-raised error, optionally carrying the status to answer with.
    #[error("Request failed: {stack}")]
    Status { status: Option<i64>, stack: String },
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    pub fn with_status(status: Option<i64>, stack: impl Into<String>) -> Self {
        AppError::Status {
            status,
            stack: stack.into(),
        }
    }

    pub fn stack(&self) -> String {
        match self {
            AppError::Status { stack, .. } => stack.clone(),
            AppError::Unexpected(e) => format!("{:?}", e),
        }
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for AppError {
    /// Statuses in `[400, 599]` are kept, everything else becomes a 500.
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Status {
                status: Some(status),
                ..
            } => u16::try_from(*status)
                .ok()
                .filter(|status| (400..=599).contains(status))
                .and_then(|status| StatusCode::from_u16(status).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).finish()
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

pub enum Flow {
    Next,
    Respond(HttpResponse),
}

/// One step of a custom error pipeline. Stages share the accumulated messages.
pub type ErrorStage = fn(&AppError, &mut Vec<String>) -> Flow;

/// Ordered error handlers attached to a route.
///
/// An empty chain, or one whose stages all pass, ends in the default responder.
#[derive(Clone, Default)]
pub struct ErrorChain {
    stages: Vec<ErrorStage>,
}

impl ErrorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, stage: ErrorStage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn respond(&self, error: &AppError) -> HttpResponse {
        // The stack never reaches the response body
        tracing::error!(
            error.cause_chain = ?error,
            error.stack = %error.stack(),
            "Request handler failed"
        );

        let mut messages = Vec::new();
        for stage in &self.stages {
            if let Flow::Respond(response) = stage(error, &mut messages) {
                return response;
            }
        }
        error.error_response()
    }
}
