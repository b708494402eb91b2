use secrecy::Secret;

/// A contact-form submission, built per request and consumed by one dispatch.
///
/// Fields are kept as submitted; the dispatcher decides what is valid.
#[derive(Debug)]
pub struct FormSubmission {
    pub to: String,
    pub title: String,
    pub body: String,
    pub password: Secret<String>,
    pub provider: String,
}
