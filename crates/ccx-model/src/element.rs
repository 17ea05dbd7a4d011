//! Elements, element families and the element table.
//!
//! Every element owns a contiguous run of node slots. The slot run starts at
//! [`Element::slot_start`] and is as long as the element's node count; per-slot
//! section data (thickness pairs, normal offsets) lives in the model arenas and
//! is addressed through these slot indices.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::error::{ModelError, Result};
use crate::registry::{MaterialId, OrientationId};

/// Element type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 2-node truss element
    T3D2,
    /// 3-node truss element
    T3D3,
    /// 4-node tetrahedral element
    C3D4,
    /// 6-node wedge element
    C3D6,
    /// 8-node brick element
    C3D8,
    /// 10-node tetrahedral element
    C3D10,
    /// 15-node wedge element
    C3D15,
    /// 20-node brick element
    C3D20,
    /// 3-node shell element
    S3,
    /// 4-node shell element
    S4,
    /// 6-node shell element
    S6,
    /// 8-node shell element
    S8,
    /// 2-node beam element
    B31,
    /// 2-node beam element, reduced integration
    B31R,
    /// 3-node beam element
    B32,
    /// 3-node beam element, reduced integration
    B32R,
    /// 2-node user-defined beam element
    U1,
}

/// Coarse grouping used to decide whether a beam section may be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementFamily {
    Beam,
    UserBeam,
    Other,
}

/// Cross-section shape recorded on an element by a beam section definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SectionShape {
    Rectangular,
    Circular,
}

impl SectionShape {
    /// Parses the `SECTION=` keyword value.
    pub fn from_keyword(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "RECT" => Some(SectionShape::Rectangular),
            "CIRC" => Some(SectionShape::Circular),
            _ => None,
        }
    }

    /// Letter stored in the last column of the family tag.
    pub fn letter(self) -> char {
        match self {
            SectionShape::Rectangular => 'R',
            SectionShape::Circular => 'C',
        }
    }
}

impl ElementType {
    /// Get the number of nodes for this element type
    pub fn num_nodes(&self) -> usize {
        match self {
            ElementType::T3D2 => 2,
            ElementType::T3D3 => 3,
            ElementType::C3D4 => 4,
            ElementType::C3D6 => 6,
            ElementType::C3D8 => 8,
            ElementType::C3D10 => 10,
            ElementType::C3D15 => 15,
            ElementType::C3D20 => 20,
            ElementType::S3 => 3,
            ElementType::S4 => 4,
            ElementType::S6 => 6,
            ElementType::S8 => 8,
            ElementType::B31 | ElementType::B31R => 2,
            ElementType::B32 | ElementType::B32R => 3,
            ElementType::U1 => 2,
        }
    }

    pub fn family(&self) -> ElementFamily {
        match self {
            ElementType::B31 | ElementType::B31R | ElementType::B32 | ElementType::B32R => {
                ElementFamily::Beam
            }
            ElementType::U1 => ElementFamily::UserBeam,
            _ => ElementFamily::Other,
        }
    }

    /// Canonical type label as written in the deck.
    pub fn label(&self) -> &'static str {
        match self {
            ElementType::T3D2 => "T3D2",
            ElementType::T3D3 => "T3D3",
            ElementType::C3D4 => "C3D4",
            ElementType::C3D6 => "C3D6",
            ElementType::C3D8 => "C3D8",
            ElementType::C3D10 => "C3D10",
            ElementType::C3D15 => "C3D15",
            ElementType::C3D20 => "C3D20",
            ElementType::S3 => "S3",
            ElementType::S4 => "S4",
            ElementType::S6 => "S6",
            ElementType::S8 => "S8",
            ElementType::B31 => "B31",
            ElementType::B31R => "B31R",
            ElementType::B32 => "B32",
            ElementType::B32R => "B32R",
            ElementType::U1 => "U1",
        }
    }

    /// Parse element type from CalculiX type string
    pub fn from_calculix_type(type_str: &str) -> Option<Self> {
        let type_upper = type_str.trim().to_uppercase();
        match type_upper.as_str() {
            "T3D2" => Some(ElementType::T3D2),
            "T3D3" => Some(ElementType::T3D3),
            "C3D4" => Some(ElementType::C3D4),
            "C3D6" => Some(ElementType::C3D6),
            "C3D8" | "C3D8R" | "C3D8I" => Some(ElementType::C3D8),
            "C3D10" | "C3D10T" => Some(ElementType::C3D10),
            "C3D15" => Some(ElementType::C3D15),
            "C3D20" | "C3D20R" => Some(ElementType::C3D20),
            "S3" | "S3R" => Some(ElementType::S3),
            "S4" | "S4R" => Some(ElementType::S4),
            "S6" => Some(ElementType::S6),
            "S8" | "S8R" => Some(ElementType::S8),
            "B31" => Some(ElementType::B31),
            "B31R" => Some(ElementType::B31R),
            "B32" => Some(ElementType::B32),
            "B32R" => Some(ElementType::B32R),
            "U1" => Some(ElementType::U1),
            _ => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Width of the rendered family tag; the shape letter sits in the last column.
pub const FAMILY_TAG_WIDTH: usize = 8;

/// An element in the finite element mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Element ID (1-based indexing from input file)
    pub id: i32,
    /// Element type
    pub element_type: ElementType,
    /// Node connectivity (node IDs)
    pub nodes: Vec<i32>,
    /// First node slot owned by this element
    pub slot_start: usize,
    pub material: Option<MaterialId>,
    pub orientation: Option<OrientationId>,
    /// Eccentricity along the two local transverse axes
    pub offsets: [f64; 2],
    section: Option<SectionShape>,
    property: Option<usize>,
}

impl Element {
    pub fn new(id: i32, element_type: ElementType, nodes: Vec<i32>, slot_start: usize) -> Self {
        Self {
            id,
            element_type,
            nodes,
            slot_start,
            material: None,
            orientation: None,
            offsets: [0.0; 2],
            section: None,
            property: None,
        }
    }

    /// Validate that the element has the correct number of nodes
    pub fn validate(&self) -> Result<()> {
        let expected = self.element_type.num_nodes();
        let actual = self.nodes.len();
        if actual != expected {
            return Err(ModelError::NodeCount {
                id: self.id,
                element_type: self.element_type.to_string(),
                actual,
                expected,
            });
        }
        Ok(())
    }

    pub fn family(&self) -> ElementFamily {
        self.element_type.family()
    }

    pub fn is_beam_eligible(&self) -> bool {
        matches!(
            self.family(),
            ElementFamily::Beam | ElementFamily::UserBeam
        )
    }

    pub fn is_user_beam(&self) -> bool {
        self.family() == ElementFamily::UserBeam
    }

    /// Node slots owned by this element.
    pub fn slots(&self) -> Range<usize> {
        self.slot_start..self.slot_start + self.nodes.len()
    }

    /// Shape recorded for a standard beam; user beams never report one.
    pub fn section_shape(&self) -> Option<SectionShape> {
        match self.family() {
            ElementFamily::Beam => self.section,
            _ => None,
        }
    }

    pub fn has_section(&self) -> bool {
        self.section.is_some()
    }

    /// Offset of this element's record in the property table (user beams only).
    pub fn property_offset(&self) -> Option<usize> {
        self.property
    }

    /// Records the resolved section shape. Allowed once, on beam-eligible elements.
    pub fn assign_section(&mut self, shape: SectionShape) -> Result<()> {
        if !self.is_beam_eligible() {
            return Err(ModelError::NotBeamEligible(self.id));
        }
        if self.section.is_some() {
            return Err(ModelError::SectionAlreadyAssigned(self.id));
        }
        self.section = Some(shape);
        Ok(())
    }

    pub fn set_property_offset(&mut self, offset: usize) -> Result<()> {
        if !self.is_user_beam() {
            return Err(ModelError::NotBeamEligible(self.id));
        }
        self.property = Some(offset);
        Ok(())
    }

    /// Fixed-width family tag, e.g. `"B31    R"` for a rectangular B31.
    ///
    /// User beam tags are never marked.
    pub fn family_tag(&self) -> String {
        let mut tag = format!("{:<width$}", self.element_type.label(), width = FAMILY_TAG_WIDTH);
        if let Some(shape) = self.section_shape() {
            tag.truncate(FAMILY_TAG_WIDTH - 1);
            tag.push(shape.letter());
        }
        tag
    }
}

/// All elements of the model, addressable by id.
#[derive(Debug, Clone, Default)]
pub struct ElementTable {
    elements: Vec<Element>,
    index: HashMap<i32, usize>,
    total_slots: usize,
}

impl ElementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element and hands it the next run of node slots.
    pub fn insert(&mut self, id: i32, element_type: ElementType, nodes: Vec<i32>) -> Result<()> {
        if self.index.contains_key(&id) {
            return Err(ModelError::DuplicateElement(id));
        }
        let element = Element::new(id, element_type, nodes, self.total_slots);
        element.validate()?;
        self.total_slots += element.nodes.len();
        self.index.insert(id, self.elements.len());
        self.elements.push(element);
        Ok(())
    }

    pub fn get(&self, id: i32) -> Option<&Element> {
        self.index.get(&id).map(|&i| &self.elements[i])
    }

    pub fn get_mut(&mut self, id: i32) -> Option<&mut Element> {
        self.index.get(&id).map(|&i| &mut self.elements[i])
    }

    pub fn contains(&self, id: i32) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Total number of node slots handed out so far.
    pub fn total_slots(&self) -> usize {
        self.total_slots
    }

    /// Element ids in ascending order.
    pub fn sorted_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.index.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn count_family(&self, family: ElementFamily) -> usize {
        self.elements.iter().filter(|e| e.family() == family).count()
    }
}
