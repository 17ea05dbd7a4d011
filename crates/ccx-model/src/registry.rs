//! Named material and orientation registries.
//!
//! Both registries are filled by the model builder and are read-only
//! afterwards. Lookups are linear scans over normalized names.

use crate::error::Result;
use crate::names::normalize_name;

/// Handle of a material, an index into [`MaterialTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// Handle of an orientation, an index into [`OrientationTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrientationId(pub usize);

fn position(names: &[String], name: &str) -> Option<usize> {
    names.iter().position(|n| n == name)
}

#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    names: Vec<String>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a material; redefining a name returns the existing handle.
    pub fn define(&mut self, raw_name: &str) -> Result<MaterialId> {
        let name = normalize_name(raw_name)?;
        if let Some(i) = position(&self.names, &name) {
            return Ok(MaterialId(i));
        }
        self.names.push(name);
        Ok(MaterialId(self.names.len() - 1))
    }

    pub fn lookup(&self, name: &str) -> Option<MaterialId> {
        position(&self.names, name).map(MaterialId)
    }

    pub fn name(&self, id: MaterialId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Coordinate system kind of an orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationSystem {
    Rectangular,
    Cylindrical,
}

/// Local axes given by two points (a, b), as on the `*ORIENTATION` data line.
#[derive(Debug, Clone, PartialEq)]
pub struct Orientation {
    pub name: String,
    pub system: OrientationSystem,
    pub point_a: [f64; 3],
    pub point_b: [f64; 3],
}

#[derive(Debug, Clone, Default)]
pub struct OrientationTable {
    names: Vec<String>,
    definitions: Vec<Orientation>,
}

impl OrientationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(
        &mut self,
        raw_name: &str,
        system: OrientationSystem,
        point_a: [f64; 3],
        point_b: [f64; 3],
    ) -> Result<OrientationId> {
        let name = normalize_name(raw_name)?;
        let orientation = Orientation {
            name: name.clone(),
            system,
            point_a,
            point_b,
        };
        if let Some(i) = position(&self.names, &name) {
            self.definitions[i] = orientation;
            return Ok(OrientationId(i));
        }
        self.names.push(name);
        self.definitions.push(orientation);
        Ok(OrientationId(self.names.len() - 1))
    }

    pub fn lookup(&self, name: &str) -> Option<OrientationId> {
        position(&self.names, name).map(OrientationId)
    }

    pub fn get(&self, id: OrientationId) -> Option<&Orientation> {
        self.definitions.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
