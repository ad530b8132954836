//! Service layer: storage backends plus the read/write workflow that ties
//! the key template engine to them.
//! - `storage` hides the concrete backend behind [`storage::KvBackend`].
//! - `lode` resolves keys and talks to the selected backend.

pub mod errors;
pub mod lode;
pub mod storage;

pub use lode::{Entry, LodeService};
