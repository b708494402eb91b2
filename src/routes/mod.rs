use crate::dispatcher::NotificationDispatcher;
use crate::error::{AppError, ErrorChain};
use crate::routing::{Params, QueryParams};
use actix_web::dev::Payload;
use actix_web::{HttpRequest, HttpResponse};

pub mod check_helper;
pub mod env;
pub mod error;
pub mod hello;
pub mod home;
pub mod mailgun;
pub mod query;
pub mod splat;

/// Everything a handler may look at for one request.
pub struct RequestContext {
    pub request: HttpRequest,
    pub payload: Payload,
    pub params: Params,
    pub query: QueryParams,
}

/// Handlers registered in the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Index,
    Env,
    Hello,
    Query,
    Splat,
    CheckHelper,
    Error,
    ErrorCode,
    ErrorCustomHandler,
    MailForm,
    MailSubmit,
}

impl Endpoint {
    pub async fn call(
        &self,
        ctx: RequestContext,
        dispatcher: &NotificationDispatcher,
    ) -> Result<HttpResponse, AppError> {
        match self {
            Endpoint::Index => Ok(home::index()),
            Endpoint::Env => Ok(env::print_env()),
            Endpoint::Hello => Ok(hello::hello()),
            Endpoint::Query => Ok(query::echo_query(&ctx.query)),
            Endpoint::Splat => Ok(splat::echo_splat(&ctx.params)),
            Endpoint::CheckHelper => Ok(check_helper::check(&ctx.params)),
            Endpoint::Error | Endpoint::ErrorCustomHandler => error::always_fail(),
            Endpoint::ErrorCode => error::fail_with_code(&ctx.params),
            Endpoint::MailForm => Ok(mailgun::mail_form()),
            Endpoint::MailSubmit => mailgun::submit_mail(ctx, dispatcher).await,
        }
    }

    /// Error handlers run when `call` fails.
    pub fn error_chain(&self) -> ErrorChain {
        match self {
            Endpoint::ErrorCustomHandler => error::custom_error_chain(),
            _ => ErrorChain::new(),
        }
    }
}
