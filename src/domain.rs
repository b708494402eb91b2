mod form_submission;
mod provider;
mod recipient_email;

pub use form_submission::FormSubmission;
pub use provider::Provider;
pub use recipient_email::RecipientEmail;
