//! Beam section definitions for the CalculiX model-construction stage.
//!
//! A `*BEAM SECTION` block resolves its material, orientation and element set,
//! checks that every member is a beam, writes thickness pairs and one shared
//! normal direction into the model arenas and, for user-defined beam elements,
//! appends a packed record of derived section properties.

pub mod beam_section;
pub mod config;
pub mod error;
pub mod options;
pub mod properties;
pub mod reader;
pub mod report;
pub mod resolve;
pub mod validate;
pub mod writer;

pub use beam_section::{BlockReport, KEYWORD, apply_beam_section};
pub use config::SectionConfig;
pub use error::{Result, SectionError};
pub use options::BeamSectionOptions;
pub use properties::{CIRC_SHEAR_FACTOR, RECT_SHEAR_FACTOR, SectionProperties};
pub use reader::{SectionOutcome, build_sections, read_sections};
pub use report::{ElementSectionView, element_views};
pub use resolve::{resolve_material, resolve_orientation, resolve_set};
pub use validate::beam_member;
pub use writer::{MIN_NORMAL_LENGTH, unit_normal, write_normal, write_thickness};
