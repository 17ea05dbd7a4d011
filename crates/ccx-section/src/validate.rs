//! Applicability check of set members.

use ccx_model::{Element, ElementTable};

use crate::error::{Result, SectionError};

/// Returns the member element if a beam section may be attached to it.
pub fn beam_member(elements: &mut ElementTable, id: i32) -> Result<&mut Element> {
    let element = elements
        .get_mut(id)
        .ok_or(SectionError::UnknownElement(id))?;
    if !element.is_beam_eligible() {
        return Err(SectionError::NotBeamElement {
            element: id,
            element_type: element.element_type.to_string(),
        });
    }
    Ok(element)
}
