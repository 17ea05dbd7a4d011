//! Per-element view of the frozen section data, for printing and JSON output.

use ccx_model::{FrozenModel, PROPERTY_RECORD_LEN};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSectionView {
    pub id: i32,
    pub family_tag: String,
    pub material: Option<String>,
    pub orientation: Option<String>,
    pub offsets: [f64; 2],
    pub thickness: Vec<[f64; 2]>,
    pub normal_offset: Option<usize>,
    pub normal: Option<[f64; 3]>,
    pub property_offset: Option<usize>,
    pub property_record: Option<Vec<f64>>,
}

/// Views of all elements carrying a beam section, by ascending id.
pub fn element_views(model: &FrozenModel) -> Vec<ElementSectionView> {
    model
        .active_ids()
        .iter()
        .filter_map(|&id| model.elements.get(id))
        .filter(|element| element.has_section())
        .map(|element| {
            let normal_offset = model.arenas.slot_normal(element.slot_start);
            let property_offset = element.property_offset();
            ElementSectionView {
                id: element.id,
                family_tag: element.family_tag(),
                material: element
                    .material
                    .and_then(|m| model.materials.name(m))
                    .map(str::to_string),
                orientation: element
                    .orientation
                    .and_then(|o| model.orientations.get(o))
                    .map(|o| o.name.clone()),
                offsets: element.offsets,
                thickness: element
                    .slots()
                    .filter_map(|slot| model.arenas.thickness(slot))
                    .collect(),
                normal_offset,
                normal: normal_offset.and_then(|offset| model.arenas.normal(offset)),
                property_offset,
                property_record: property_offset
                    .and_then(|offset| model.arenas.property_record(offset))
                    .map(|record| record[..PROPERTY_RECORD_LEN].to_vec()),
            }
        })
        .collect()
}
