use thiserror::Error;

/// Errors raised while parsing or resolving key templates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("malformed template `{template}` at byte {position}: {reason}")]
    Malformed {
        template: String,
        position: usize,
        reason: &'static str,
    },
    #[error("placeholder `{name}` is not bound")]
    Unbound { name: String },
    #[error("search list must contain at least one template")]
    EmptySearchList,
}

impl KeyError {
    pub(crate) fn malformed(template: &str, position: usize, reason: &'static str) -> Self {
        Self::Malformed { template: template.to_string(), position, reason }
    }

    pub(crate) fn unbound(name: &str) -> Self {
        Self::Unbound { name: name.to_string() }
    }

    /// Name of the missing placeholder, if this is an unbound error.
    pub fn unbound_name(&self) -> Option<&str> {
        match self {
            KeyError::Unbound { name } => Some(name),
            _ => None,
        }
    }
}
