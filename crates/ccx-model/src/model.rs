//! The model assembled by the builder and completed by section definitions.

use std::collections::HashMap;

use ccx_inp::Deck;

use crate::arena::{FrozenArenas, SectionArenas};
use crate::builder::ModelBuilder;
use crate::element::{Element, ElementFamily, ElementTable};
use crate::error::Result;
use crate::partition::partition_ranges;
use crate::registry::{MaterialTable, OrientationTable};
use crate::sets::ElementSets;

/// Model under construction. Registries are read-only once built; the
/// element table and the arenas are what section definitions write into.
#[derive(Debug, Clone)]
pub struct Model {
    pub nodes: HashMap<i32, [f64; 3]>,
    pub elements: ElementTable,
    pub materials: MaterialTable,
    pub orientations: OrientationTable,
    pub sets: ElementSets,
    pub arenas: SectionArenas,
}

impl Model {
    pub fn from_deck(deck: &Deck) -> Result<Self> {
        ModelBuilder::build_from_deck(deck)
    }

    /// Ends construction; the arenas can no longer grow afterwards.
    pub fn freeze(self) -> FrozenModel {
        let active_ids = self.elements.sorted_ids().into_boxed_slice();
        FrozenModel {
            elements: self.elements,
            materials: self.materials,
            orientations: self.orientations,
            arenas: self.arenas.freeze(),
            active_ids,
        }
    }

    pub fn statistics(&self) -> ModelStatistics {
        ModelStatistics {
            num_nodes: self.nodes.len(),
            num_elements: self.elements.len(),
            num_beams: self.elements.count_family(ElementFamily::Beam),
            num_user_beams: self.elements.count_family(ElementFamily::UserBeam),
            num_node_slots: self.elements.total_slots(),
            num_materials: self.materials.len(),
            num_orientations: self.orientations.len(),
            num_element_sets: self.sets.len(),
        }
    }
}

/// Model statistics for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStatistics {
    pub num_nodes: usize,
    pub num_elements: usize,
    pub num_beams: usize,
    pub num_user_beams: usize,
    pub num_node_slots: usize,
    pub num_materials: usize,
    pub num_orientations: usize,
    pub num_element_sets: usize,
}

impl ModelStatistics {
    /// Format as a human-readable string
    pub fn format(&self) -> String {
        [
            format!("Nodes: {}", self.num_nodes),
            format!("Elements: {}", self.num_elements),
            format!("  beams: {}", self.num_beams),
            format!("  user beams: {}", self.num_user_beams),
            format!("Node slots: {}", self.num_node_slots),
            format!("Materials: {}", self.num_materials),
            format!("Orientations: {}", self.num_orientations),
            format!("Element sets: {}", self.num_element_sets),
        ]
        .join("\n")
    }
}

/// Read-only model handed to assembly.
#[derive(Debug, Clone)]
pub struct FrozenModel {
    pub elements: ElementTable,
    pub materials: MaterialTable,
    pub orientations: OrientationTable,
    pub arenas: FrozenArenas,
    active_ids: Box<[i32]>,
}

impl FrozenModel {
    /// Active element ids in ascending order.
    pub fn active_ids(&self) -> &[i32] {
        &self.active_ids
    }

    /// Splits the active elements into `num_workers` contiguous id ranges.
    pub fn partitions(&self, num_workers: usize) -> Vec<&[i32]> {
        partition_ranges(self.active_ids.len(), num_workers)
            .into_iter()
            .map(|range| &self.active_ids[range])
            .collect()
    }

    /// Runs `work` on every partition in parallel, results in partition order.
    pub fn par_map_partitions<R, F>(&self, num_workers: usize, work: F) -> Vec<R>
    where
        R: Send,
        F: Fn(&[&Element]) -> R + Sync,
    {
        use rayon::prelude::*;

        self.partitions(num_workers)
            .par_iter()
            .map(|ids| {
                let elements: Vec<&Element> =
                    ids.iter().filter_map(|&id| self.elements.get(id)).collect();
                work(&elements)
            })
            .collect()
    }
}
