//! Template resolution: bind every placeholder or fail.

use std::fmt;

use crate::errors::KeyError;
use crate::params::ParameterSet;
use crate::template::{Segment, Template};

/// A concrete storage key produced by fully substituting a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedKey(String);

impl ResolvedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ResolvedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ResolvedKey> for String {
    fn from(k: ResolvedKey) -> Self {
        k.0
    }
}

/// Substitute every placeholder of `template` with its value in `params`.
///
/// All-or-nothing: the first placeholder without a binding aborts with
/// [`KeyError::Unbound`]. Values are copied verbatim, no trimming or case
/// folding.
pub fn resolve(template: &Template, params: &ParameterSet) -> Result<ResolvedKey, KeyError> {
    let mut key = String::with_capacity(template.as_str().len());
    for segment in template.segments() {
        match segment {
            Segment::Literal(text) => key.push_str(text),
            Segment::Placeholder(name) => {
                let value = params.get(name).ok_or_else(|| KeyError::unbound(name))?;
                key.push_str(value);
            }
        }
    }
    Ok(ResolvedKey(key))
}
