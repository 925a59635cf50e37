use std::fmt;

use crate::error::{ProtoError, Result};
use crate::message::PROTOCOL_VERSION;
use crate::sent::{GuiMessage, EXTENSION_POLL};

/// Credentials and session options sent right after connecting.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginConfig {
    /// Protocol version announced to the core.
    pub protocol_version: u32,
    /// Ask the core to wait for explicit requests instead of pushing updates.
    pub poll_mode: bool,
    pub user: String,
    /// Sent in clear over the GUI socket; never logged.
    pub password: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            poll_mode: false,
            user: "admin".to_string(),
            password: String::new(),
        }
    }
}

impl LoginConfig {
    /// Reject settings the core would refuse before anything is sent.
    pub fn validate(&self) -> Result<()> {
        if self.protocol_version == 0 {
            return Err(ProtoError::InvalidField {
                field: "protocol_version",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.user.is_empty() {
            return Err(ProtoError::InvalidField {
                field: "user",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for LoginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginConfig")
            .field("protocol_version", &self.protocol_version)
            .field("poll_mode", &self.poll_mode)
            .field("user", &self.user)
            .field(
                "password",
                &format_args!("<redacted:{} bytes>", self.password.len()),
            )
            .finish()
    }
}

/// Messages that open a session, in the order the core expects them.
pub fn login_messages(config: &LoginConfig) -> Vec<GuiMessage> {
    let mut messages = vec![GuiMessage::ProtocolVersion {
        version: config.protocol_version,
    }];
    if config.poll_mode {
        messages.push(GuiMessage::GuiExtensions {
            extensions: vec![(EXTENSION_POLL, true)],
        });
    }
    messages.push(GuiMessage::PassWord {
        password: config.password.clone(),
        user: config.user.clone(),
    });
    messages
}
