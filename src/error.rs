use thiserror::Error;

use crate::registry::PosetId;

/// Why a relation store refused an operation. The store is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationError {
    #[error("element \"{0}\" does not exist")]
    UnknownElement(String),
    #[error("element \"{0}\" already exists")]
    DuplicateElement(String),
    #[error("element \"{0}\" cannot be related to itself")]
    Reflexive(String),
    #[error("\"{v1}\" and \"{v2}\" are already comparable")]
    Comparable { v1: String, v2: String },
    #[error("\"{v1}\" does not precede \"{v2}\"")]
    NotRelated { v1: String, v2: String },
    #[error("relation (\"{v1}\", \"{v2}\") is implied through \"{via}\"")]
    Implied { v1: String, v2: String, via: String },
}

/// Why a registry call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PosetError {
    #[error("poset {0} does not exist")]
    UnknownPoset(PosetId),
    #[error("element name missing")]
    MissingName,
    #[error(transparent)]
    Relation(#[from] RelationError),
}
