use crate::schema::validate::DefinitionError;

/// User-facing text for every failure that has no more specific message.
pub const GENERIC_ERROR: &str = "Please check URL and try again.";

/// Classified outcome of a failed resolve. Every variant is recoverable.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// No response was received.
    #[error("network unavailable")]
    NetworkUnavailable,

    /// HTTP 401: the caller should prompt for credentials and retry.
    #[error("authentication required")]
    AuthenticationRequired,

    /// Any other non-200 status.
    #[error("unexpected http status {status}")]
    HttpError {
        /// Status code.
        status: u16,
    },

    /// A required field is missing or has the wrong type.
    #[error("malformed widget definition: missing or invalid property '{field}'")]
    MalformedDefinition {
        /// Name of the offending field.
        field: String,
        /// Dotted path of the containing object, when known.
        parent: Option<String>,
    },

    /// Any other decoding failure.
    #[error("could not decode widget definition: {0}")]
    DecodeError(String),
}

impl ResolveError {
    /// Message shown to the user, with [`GENERIC_ERROR`] as the fallback text.
    pub fn user_message(&self) -> String {
        self.user_message_or(GENERIC_ERROR)
    }

    /// Message shown to the user, with a caller-chosen fallback text.
    pub fn user_message_or(&self, generic: &str) -> String {
        match self {
            Self::MalformedDefinition { field, parent } => {
                let mut msg = format!(
                    "Malformed widget definition\n\nMissing or invalid property: '{field}'"
                );
                if let Some(parent) = parent {
                    msg.push_str(&format!(" in object '{parent}'"));
                }
                msg
            }
            _ => generic.to_owned(),
        }
    }

    /// `true` only for [`ResolveError::AuthenticationRequired`].
    pub fn needs_credentials(&self) -> bool {
        matches!(self, Self::AuthenticationRequired)
    }
}

impl From<DefinitionError> for ResolveError {
    fn from(value: DefinitionError) -> Self {
        match value {
            DefinitionError::MissingProperty { field, parent } => {
                Self::MalformedDefinition { field, parent }
            }
            DefinitionError::Deserialize(msg) => Self::DecodeError(msg),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/error.rs"]
mod tests;
