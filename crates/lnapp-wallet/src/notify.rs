//! Navigation and user notification collaborators.

use lnapp_core::Error;

/// Screen changes requested by channel workflows.
pub trait Navigator: Send + Sync {
    /// Show the channel list.
    fn go_channels(&self);

    /// Show the create channel form.
    fn go_channel_create(&self);

    /// Show the selected channel.
    fn go_channel_detail(&self);
}

/// A message for the user.
#[derive(Debug)]
pub struct Notification {
    /// Text shown to the user.
    pub message: String,
    /// Underlying error, for diagnostics.
    pub error: Option<Error>,
}

impl Notification {
    /// A plain message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    /// A message caused by `error`.
    pub fn with_error(message: impl Into<String>, error: Error) -> Self {
        Self {
            message: message.into(),
            error: Some(error),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error {
            Some(error) => write!(f, "{} ({error})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Displays notifications to the user.
pub trait Notifier: Send + Sync {
    /// Show `notification`.
    fn display(&self, notification: Notification);
}
