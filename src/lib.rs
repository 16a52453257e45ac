//! # poset_store
//!
//! A registry of independent partially-ordered sets over named elements.
//!
//! Each poset keeps the full transitive closure of its order: adding a
//! relation immediately stores every pair it implies, so a precedence
//! query is one set lookup. Relations may only be added between
//! incomparable elements, and only cover pairs (no element in between)
//! may be deleted. Deletion removes that single pair and never re-derives
//! the closure, so pairs once implied by it stay stored.
//!
//! Calls that cannot be carried out return `false` (or a typed error from
//! the `try_` variants) and leave every poset untouched.
//!
//! ```
//! use poset_store::Registry;
//!
//! let mut reg = Registry::new();
//! let p = reg.create();
//! for name in ["x", "y", "z"] {
//!     assert!(reg.insert(p, name));
//! }
//! assert!(reg.add(p, "x", "y"));
//! assert!(reg.add(p, "y", "z"));
//! assert!(reg.test(p, "x", "z"));
//! assert!(!reg.del(p, "x", "z"));
//! ```
pub mod error;
pub mod registry;
pub mod relation_store;
pub mod script;

pub use error::{PosetError, RelationError};
pub use registry::{PosetId, Registry};
pub use relation_store::{ElementId, ElementSnapshot, PosetSnapshot, RelationStore};
