//! Settings of the section read pass.

/// Options of [`crate::read_sections`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionConfig {
    /// Capacity of the property table in values. `None` keeps the builder's
    /// estimate of one record per user beam element.
    pub property_capacity: Option<usize>,
}

impl SectionConfig {
    pub fn with_property_capacity(mut self, capacity: usize) -> Self {
        self.property_capacity = Some(capacity);
        self
    }
}
