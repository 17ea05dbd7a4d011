//! Error types for ccx-section

use ccx_model::ModelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SectionError>;

/// Fatal conditions of a `*BEAM SECTION` block. Each one aborts the block.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SectionError {
    #[error("*BEAM SECTION: nonexistent material {0}")]
    UndefinedMaterial(String),

    #[error("*BEAM SECTION: nonexistent orientation {0}")]
    UndefinedOrientation(String),

    #[error("*BEAM SECTION: element set {0} has not been defined")]
    UndefinedSet(String),

    #[error("*BEAM SECTION: missing {parameter} parameter (line {line})")]
    MissingParameter {
        parameter: &'static str,
        line: usize,
    },

    #[error("*BEAM SECTION: section {value} is not supported, use RECT or CIRC (line {line})")]
    UnsupportedShape { value: String, line: usize },

    #[error("*BEAM SECTION: missing {what} line after line {line}")]
    MissingDataLine { what: &'static str, line: usize },

    #[error("*BEAM SECTION: invalid {what} {token:?} (line {line})")]
    InvalidNumber {
        what: &'static str,
        token: String,
        line: usize,
    },

    #[error("*BEAM SECTION: element {element} of type {element_type} is not a beam element")]
    NotBeamElement { element: i32, element_type: String },

    #[error("*BEAM SECTION: element {0} of the set does not exist")]
    UnknownElement(i32),

    #[error("*BEAM SECTION: element {0} already has a beam section")]
    AlreadyAssigned(i32),

    #[error("*BEAM SECTION: normal direction has zero length (line {line})")]
    ZeroNormal { line: usize },

    #[error("*BEAM SECTION: nodal thickness is not allowed for user beam element {0}")]
    NodalThicknessOnUserBeam(i32),

    #[error("*BEAM SECTION: {0}")]
    Model(#[from] ModelError),
}
