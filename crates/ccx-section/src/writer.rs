//! Writes thickness pairs and normal directions into the section arenas.

use std::ops::Range;

use ccx_model::SectionArenas;
use nalgebra::Vector3;

use crate::error::{Result, SectionError};

/// Normals shorter than this cannot be normalized.
pub const MIN_NORMAL_LENGTH: f64 = 1e-10;

/// Scales `raw` to unit length; `None` if it is (nearly) zero.
pub fn unit_normal(raw: [f64; 3]) -> Option<[f64; 3]> {
    Vector3::from(raw)
        .try_normalize(MIN_NORMAL_LENGTH)
        .map(|n| [n.x, n.y, n.z])
}

/// Stores one normal for the whole block and points every slot at it.
///
/// Returns the arena offset shared by all slots and the stored unit normal.
pub fn write_normal(
    arenas: &mut SectionArenas,
    raw: [f64; 3],
    line: usize,
    slots: &[Range<usize>],
) -> Result<(usize, [f64; 3])> {
    let normal = unit_normal(raw).ok_or(SectionError::ZeroNormal { line })?;
    let offset = arenas.normals.push(normal)?;
    for slot in slots.iter().cloned().flatten() {
        arenas.slots.set_normal(slot, offset)?;
    }
    Ok((offset, normal))
}

/// Copies the thickness pair into every slot.
pub fn write_thickness(
    arenas: &mut SectionArenas,
    pair: [f64; 2],
    slots: &[Range<usize>],
) -> Result<()> {
    for slot in slots.iter().cloned().flatten() {
        arenas.slots.set_thickness(slot, pair)?;
    }
    Ok(())
}
