//! Resolution of material, orientation and element set names.

use ccx_model::{
    MaterialId, MaterialTable, ModelError, OrientationId, OrientationTable, normalize_name,
};
use ccx_model::{ElementSets, ResolvedSet};

use crate::error::{Result, SectionError};

/// Resolves a material name; there is no default material.
pub fn resolve_material(materials: &MaterialTable, raw: &str) -> Result<MaterialId> {
    let name = normalize_name(raw)?;
    materials
        .lookup(&name)
        .ok_or(SectionError::UndefinedMaterial(name))
}

/// Resolves an optional orientation name. A missing or blank name means no
/// orientation and is not an error.
pub fn resolve_orientation(
    orientations: &OrientationTable,
    raw: Option<&str>,
) -> Result<Option<OrientationId>> {
    let name = match raw {
        Some(raw) => normalize_name(raw)?,
        None => return Ok(None),
    };
    if name.is_empty() {
        return Ok(None);
    }
    orientations
        .lookup(&name)
        .map(Some)
        .ok_or(SectionError::UndefinedOrientation(name))
}

pub fn resolve_set<'a>(sets: &'a ElementSets, raw: &str) -> Result<ResolvedSet<'a>> {
    sets.resolve(raw).map_err(|err| match err {
        ModelError::UndefinedSet(name) => SectionError::UndefinedSet(name),
        other => SectionError::Model(other),
    })
}
