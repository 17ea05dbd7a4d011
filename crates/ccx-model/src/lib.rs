//! Model registries and section arenas for CalculiX beam section definitions.
//!
//! This crate holds everything the section stage reads (materials,
//! orientations, element sets) and everything it writes (element section
//! fields, per-slot thickness and normal offsets, property records), plus the
//! builder that fills the registries from a deck and the work partitioner
//! that consumes the frozen result.

pub mod arena;
pub mod builder;
pub mod element;
pub mod error;
pub mod model;
pub mod names;
pub mod partition;
pub mod registry;
pub mod sets;

pub use arena::{
    Arena, FrozenArenas, NODAL_THICKNESS, NORMAL_STRIDE, NormalArena, PROPERTY_RECORD_LEN,
    PropertyTable, SectionArenas, SlotTable,
};
pub use builder::ModelBuilder;
pub use element::{Element, ElementFamily, ElementTable, ElementType, SectionShape};
pub use error::{ModelError, Result};
pub use model::{FrozenModel, Model, ModelStatistics};
pub use names::{MAX_NAME_LEN, normalize_name};
pub use partition::partition_ranges;
pub use registry::{
    MaterialId, MaterialTable, Orientation, OrientationId, OrientationSystem, OrientationTable,
};
pub use sets::{ElementSets, MemberIds, ResolvedSet, SetMember, decode_flat};
