mod get;
mod post;

pub use get::mail_form;
pub use post::submit_mail;
