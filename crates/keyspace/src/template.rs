//! Key template parsing.
//!
//! A template is literal text with `{name}` placeholders, e.g.
//! `{context}.someapp.{customer_id}.{key}`. Parsing happens once, when the
//! search list is loaded; the parsed segments are reused for every request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::KeyError;
use crate::params::ParameterSet;
use crate::resolver::{self, ResolvedKey};

const OPEN: char = '{';
const CLOSE: char = '}';

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed, immutable key template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Template {
    raw: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a raw template string into literal and placeholder segments.
    ///
    /// Fails with [`KeyError::Malformed`] when the template is empty, a `{`
    /// is never closed, a `}` has no opening `{`, placeholders nest, or a
    /// placeholder has no name.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        if raw.is_empty() {
            return Err(KeyError::malformed(raw, 0, "template is empty"));
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut open_at: Option<usize> = None;

        for (pos, ch) in raw.char_indices() {
            match (ch, open_at) {
                (OPEN, Some(_)) => {
                    return Err(KeyError::malformed(raw, pos, "nested `{` inside placeholder"));
                }
                (OPEN, None) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    open_at = Some(pos);
                }
                (CLOSE, None) => {
                    return Err(KeyError::malformed(raw, pos, "`}` without matching `{`"));
                }
                (CLOSE, Some(start)) => {
                    let name = &raw[start + OPEN.len_utf8()..pos];
                    if name.is_empty() {
                        return Err(KeyError::malformed(raw, start, "placeholder has no name"));
                    }
                    segments.push(Segment::Placeholder(name.to_string()));
                    open_at = None;
                }
                (_, Some(_)) => {}
                (_, None) => literal.push(ch),
            }
        }

        if let Some(start) = open_at {
            return Err(KeyError::malformed(raw, start, "`{` is never closed"));
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { raw: raw.to_string(), segments })
    }

    /// The template text exactly as configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in template order. Repeated names are yielded each time.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// True when the template has no placeholders and always resolves to itself.
    pub fn is_literal(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// Shorthand for [`resolver::resolve`].
    pub fn resolve(&self, params: &ParameterSet) -> Result<ResolvedKey, KeyError> {
        resolver::resolve(self, params)
    }
}

impl FromStr for Template {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Template {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Template> for String {
    fn from(t: Template) -> Self {
        t.raw
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Segment {
        Segment::Literal(s.to_string())
    }

    fn ph(s: &str) -> Segment {
        Segment::Placeholder(s.to_string())
    }

    #[test]
    fn parses_segments_in_order() {
        let t = Template::parse("{context}.someapp.{customer_id}.{key}").unwrap();
        assert_eq!(
            t.segments(),
            &[ph("context"), lit(".someapp."), ph("customer_id"), lit("."), ph("key")]
        );
        assert_eq!(t.placeholders().collect::<Vec<_>>(), vec!["context", "customer_id", "key"]);
        assert_eq!(t.as_str(), "{context}.someapp.{customer_id}.{key}");
    }

    #[test]
    fn leading_and_trailing_literals_are_kept() {
        let t = Template::parse("app:{key}:v1").unwrap();
        assert_eq!(t.segments(), &[lit("app:"), ph("key"), lit(":v1")]);
    }

    #[test]
    fn adjacent_placeholders() {
        let t = Template::parse("{a}{b}").unwrap();
        assert_eq!(t.segments(), &[ph("a"), ph("b")]);
    }

    #[test]
    fn literal_only_template() {
        let t = Template::parse("global.feature_flags").unwrap();
        assert!(t.is_literal());
        assert_eq!(t.segments(), &[lit("global.feature_flags")]);
    }

    #[test]
    fn multibyte_literals_survive() {
        let t = Template::parse("租户.{key}.é").unwrap();
        assert_eq!(t.segments(), &[lit("租户."), ph("key"), lit(".é")]);
    }

    #[test]
    fn rejects_empty_template() {
        let err = Template::parse("").unwrap_err();
        assert!(matches!(err, KeyError::Malformed { position: 0, .. }));
    }

    #[test]
    fn rejects_unclosed_placeholder() {
        let err = Template::parse("{context}.{key").unwrap_err();
        assert!(matches!(err, KeyError::Malformed { position: 10, .. }), "{err}");
    }

    #[test]
    fn rejects_stray_close() {
        let err = Template::parse("context}.{key}").unwrap_err();
        assert!(matches!(err, KeyError::Malformed { position: 7, .. }), "{err}");
    }

    #[test]
    fn rejects_nested_and_empty_placeholders() {
        assert!(matches!(Template::parse("{a{b}}"), Err(KeyError::Malformed { .. })));
        assert!(matches!(Template::parse("x.{}.y"), Err(KeyError::Malformed { .. })));
    }

    #[test]
    fn deserializes_from_string() {
        let t: Template = serde_json::from_str("\"{context}.{key}\"").unwrap();
        assert_eq!(t.to_string(), "{context}.{key}");

        let bad = serde_json::from_str::<Template>("\"{context\"");
        assert!(bad.is_err());
    }
}
