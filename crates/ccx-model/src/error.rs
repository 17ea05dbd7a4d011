//! Error types for ccx-model

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("name {name:?} is longer than {max} characters")]
    NameTooLong { name: String, max: usize },

    #[error("duplicate element {0}")]
    DuplicateElement(i32),

    #[error("element {id} of type {element_type} has {actual} nodes but expected {expected}")]
    NodeCount {
        id: i32,
        element_type: String,
        actual: usize,
        expected: usize,
    },

    #[error("element {element} references non-existent node {node}")]
    MissingNode { element: i32, node: i32 },

    #[error("unknown element type {0}")]
    UnknownElementType(String),

    #[error("element {0} is not a beam element")]
    NotBeamEligible(i32),

    #[error("element {0} already has a beam section")]
    SectionAlreadyAssigned(i32),

    #[error("generate step must not be zero (set {set})")]
    ZeroStep { set: String },

    #[error("invalid generate range {from}..{to} step {step} (set {set})")]
    InvalidRange {
        set: String,
        from: i32,
        to: i32,
        step: i32,
    },

    #[error("generate step entry at position {position} has no preceding bounds (set {set})")]
    DanglingStep { set: String, position: usize },

    #[error("set {0} is not defined")]
    UndefinedSet(String),

    #[error("arena write of {len} values at offset {offset} exceeds length {capacity}")]
    ArenaBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    #[error(
        "property table capacity {capacity} exceeded (needs {needed}); increase the property capacity"
    )]
    PropertyCapacity { needed: usize, capacity: usize },

    #[error("node slot {slot} is out of range ({total} slots)")]
    SlotOutOfRange { slot: usize, total: usize },

    #[error("{card} card: {message} (line {line})")]
    Card {
        card: String,
        message: String,
        line: usize,
    },
}

impl ModelError {
    pub(crate) fn card(card: &str, line: usize, message: impl Into<String>) -> Self {
        ModelError::Card {
            card: card.to_string(),
            message: message.into(),
            line,
        }
    }
}
