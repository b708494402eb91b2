mod helpers;
mod mailgun;
