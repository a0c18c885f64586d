//! Outbound mail seam.
//!
//! Verification and password-reset tokens leave the server through a
//! [`Mailer`]. No SMTP transport is wired in; [`LogMailer`] records each
//! delivery in the log (without the token) and tests substitute their own
//! implementation to capture tokens.

use std::fmt;

use async_trait::async_trait;

/// What a message asks the recipient to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    /// Confirm ownership of an email address.
    VerifyEmail,
    /// Choose a new password.
    PasswordReset,
}

/// A message carrying a one-shot token.
#[derive(Clone)]
pub struct Mail {
    pub to: String,
    pub kind: MailKind,
    pub token: String,
}

impl fmt::Debug for Mail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mail")
            .field("to", &self.to)
            .field("kind", &self.kind)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("mail delivery failed: {0}")]
pub struct MailError(pub String);

/// Delivers [`Mail`].
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Mail) -> Result<(), MailError>;
}

/// Writes deliveries to the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, kind = ?mail.kind, "Mail queued for delivery");
        Ok(())
    }
}

/// Hand `mail` to the mailer, logging rather than failing on error.
///
/// The token is already stored; the user can ask for another message.
pub async fn deliver(mailer: &dyn Mailer, mail: Mail) {
    let to = mail.to.clone();
    let kind = mail.kind;
    if let Err(e) = mailer.send(mail).await {
        tracing::error!(error = %e, %to, ?kind, "Mail delivery failed");
    }
}
