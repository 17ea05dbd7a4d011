//! Append-only arenas holding per-slot section data.
//!
//! Offsets handed out by an arena are permanent: storage only grows, nothing is
//! compacted or reused, and elements keep raw offsets instead of references.
//! Once the read pass is over the arenas are frozen into boxed slices, which
//! cannot grow any more.

use log::debug;

use crate::error::{ModelError, Result};

/// Slots reserved per normal-vector allocation: the normal itself plus room
/// for the paired second direction.
pub const NORMAL_STRIDE: usize = 6;

/// Thickness sentinel meaning "take the nodal thickness supplied elsewhere".
pub const NODAL_THICKNESS: f64 = -1.0;

/// Values per packed user-beam property record.
pub const PROPERTY_RECORD_LEN: usize = 10;

/// Growable, append-only buffer addressed by stable offsets.
#[derive(Debug, Clone, Default)]
pub struct Arena<T> {
    data: Vec<T>,
}

impl<T: Copy + Default> Arena<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Reserves `n` default-initialized values and returns their offset.
    pub fn allocate(&mut self, n: usize) -> usize {
        let offset = self.data.len();
        self.data.resize(offset + n, T::default());
        offset
    }

    /// Overwrites already allocated values starting at `offset`.
    pub fn write(&mut self, offset: usize, values: &[T]) -> Result<()> {
        let end = offset + values.len();
        if end > self.data.len() {
            return Err(ModelError::ArenaBounds {
                offset,
                len: values.len(),
                capacity: self.data.len(),
            });
        }
        self.data[offset..end].copy_from_slice(values);
        Ok(())
    }

    pub fn read(&self, offset: usize, len: usize) -> Option<&[T]> {
        self.data.get(offset..offset + len)
    }

    /// Next offset `allocate` would return.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn freeze(self) -> Box<[T]> {
        self.data.into_boxed_slice()
    }
}

/// Unit normal directions, one [`NORMAL_STRIDE`]-sized block per allocation.
#[derive(Debug, Clone, Default)]
pub struct NormalArena {
    slots: Arena<f64>,
}

impl NormalArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an (already normalized) direction in a fresh block.
    pub fn push(&mut self, direction: [f64; 3]) -> Result<usize> {
        let offset = self.slots.allocate(NORMAL_STRIDE);
        self.slots.write(offset, &direction)?;
        debug!("normal {direction:?} stored at offset {offset}");
        Ok(offset)
    }

    pub fn direction(&self, offset: usize) -> Option<[f64; 3]> {
        self.slots.read(offset, 3).map(to_vec3)
    }

    /// Paired second direction of the block; zero until something fills it.
    pub fn second_direction(&self, offset: usize) -> Option<[f64; 3]> {
        self.slots.read(offset + 3, 3).map(to_vec3)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn to_vec3(values: &[f64]) -> [f64; 3] {
    [values[0], values[1], values[2]]
}

/// Per node slot: a thickness pair and the offset of its normal block.
#[derive(Debug, Clone, Default)]
pub struct SlotTable {
    thickness: Vec<[f64; 2]>,
    normal: Vec<Option<usize>>,
}

impl SlotTable {
    pub fn with_slots(total: usize) -> Self {
        Self {
            thickness: vec![[0.0; 2]; total],
            normal: vec![None; total],
        }
    }

    fn check(&self, slot: usize) -> Result<()> {
        if slot >= self.thickness.len() {
            return Err(ModelError::SlotOutOfRange {
                slot,
                total: self.thickness.len(),
            });
        }
        Ok(())
    }

    pub fn set_thickness(&mut self, slot: usize, pair: [f64; 2]) -> Result<()> {
        self.check(slot)?;
        self.thickness[slot] = pair;
        Ok(())
    }

    pub fn set_normal(&mut self, slot: usize, offset: usize) -> Result<()> {
        self.check(slot)?;
        self.normal[slot] = Some(offset);
        Ok(())
    }

    pub fn thickness(&self, slot: usize) -> Option<[f64; 2]> {
        self.thickness.get(slot).copied()
    }

    pub fn normal(&self, slot: usize) -> Option<usize> {
        self.normal.get(slot).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.thickness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thickness.is_empty()
    }
}

/// Flat table of packed property records with a fixed capacity.
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    values: Arena<f64>,
    capacity: usize,
}

impl PropertyTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Arena::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Appends a record and returns its starting offset.
    pub fn append(&mut self, record: &[f64]) -> Result<usize> {
        let needed = self.values.len() + record.len();
        if needed > self.capacity {
            return Err(ModelError::PropertyCapacity {
                needed,
                capacity: self.capacity,
            });
        }
        let offset = self.values.allocate(record.len());
        self.values.write(offset, record)?;
        debug!("property record of {} values at offset {offset}", record.len());
        Ok(offset)
    }

    pub fn record(&self, offset: usize, len: usize) -> Option<&[f64]> {
        self.values.read(offset, len)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Every arena written while section definitions are read.
#[derive(Debug, Clone, Default)]
pub struct SectionArenas {
    pub normals: NormalArena,
    pub slots: SlotTable,
    pub properties: PropertyTable,
}

impl SectionArenas {
    pub fn new(total_slots: usize, property_capacity: usize) -> Self {
        Self {
            normals: NormalArena::new(),
            slots: SlotTable::with_slots(total_slots),
            properties: PropertyTable::with_capacity(property_capacity),
        }
    }

    pub fn freeze(self) -> FrozenArenas {
        FrozenArenas {
            normals: self.normals.slots.freeze(),
            thickness: self.slots.thickness.into_boxed_slice(),
            slot_normals: self.slots.normal.into_boxed_slice(),
            properties: self.properties.values.freeze(),
        }
    }
}

/// Immutable arena contents handed to assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenArenas {
    pub normals: Box<[f64]>,
    pub thickness: Box<[[f64; 2]]>,
    pub slot_normals: Box<[Option<usize>]>,
    pub properties: Box<[f64]>,
}

impl FrozenArenas {
    pub fn thickness(&self, slot: usize) -> Option<[f64; 2]> {
        self.thickness.get(slot).copied()
    }

    pub fn slot_normal(&self, slot: usize) -> Option<usize> {
        self.slot_normals.get(slot).copied().flatten()
    }

    pub fn normal(&self, offset: usize) -> Option<[f64; 3]> {
        self.normals.get(offset..offset + 3).map(to_vec3)
    }

    pub fn second_normal(&self, offset: usize) -> Option<[f64; 3]> {
        self.normal(offset + 3)
    }

    pub fn property_record(&self, offset: usize) -> Option<&[f64]> {
        self.properties.get(offset..offset + PROPERTY_RECORD_LEN)
    }
}
