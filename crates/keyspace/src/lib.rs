//! Key template resolution engine.
//!
//! Turns configured key templates such as `{context}.someapp.{key}` plus
//! per-request parameters into concrete storage keys. Everything here is
//! pure and synchronous; storage lookups are injected by the caller.

pub mod errors;
pub mod params;
pub mod resolver;
pub mod search;
pub mod template;

pub use errors::KeyError;
pub use params::ParameterSet;
pub use resolver::{resolve, ResolvedKey};
pub use search::{KeyResolver, SearchList};
pub use template::{Segment, Template};
