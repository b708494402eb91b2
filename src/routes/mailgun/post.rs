use crate::dispatcher::NotificationDispatcher;
use crate::domain::FormSubmission;
use crate::error::AppError;
use crate::routes::RequestContext;
use actix_web::http::header::LOCATION;
use actix_web::{web, FromRequest, HttpResponse};
use secrecy::Secret;

#[derive(serde::Deserialize, Default)]
pub struct FormData {
    to: Option<String>,
    title: Option<String>,
    body: Option<String>,
    password: Option<Secret<String>>,
    provider: Option<String>,
}

impl From<FormData> for FormSubmission {
    fn from(form: FormData) -> Self {
        Self {
            to: form.to.unwrap_or_default(),
            title: form.title.unwrap_or_default(),
            body: form.body.unwrap_or_default(),
            password: form.password.unwrap_or_else(|| Secret::new(String::new())),
            provider: form.provider.unwrap_or_default(),
        }
    }
}

fn back_to_form() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, "/mailgun"))
        .finish()
}

/// Always redirects back to the form, whether or not an email went out.
#[tracing::instrument(name = "Submit the contact form", skip(ctx, dispatcher))]
pub async fn submit_mail(
    ctx: RequestContext,
    dispatcher: &NotificationDispatcher,
) -> Result<HttpResponse, AppError> {
    let RequestContext {
        request,
        mut payload,
        ..
    } = ctx;

    let form = match web::Form::<FormData>::from_request(&request, &mut payload).await {
        Ok(form) => form.into_inner(),
        Err(e) => {
            tracing::warn!(error.message = %e, "Body is not a usable form, treating it as empty");
            FormData::default()
        }
    };

    let outcome = dispatcher.dispatch(form.into()).await?;
    tracing::info!(?outcome, "Form submission handled");

    Ok(back_to_form())
}
