/// Email delivery backend named by a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Mailgun,
    SendGrid,
    CloudMailin,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Mailgun, Provider::SendGrid, Provider::CloudMailin];

    /// Exact, case-sensitive match on the form value.
    pub fn parse(s: &str) -> Option<Provider> {
        Self::ALL.into_iter().find(|provider| provider.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Mailgun => "mailgun",
            Provider::SendGrid => "sendgrid",
            Provider::CloudMailin => "cloudmailin",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
