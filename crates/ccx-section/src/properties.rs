//! Closed-form cross-section properties.

use std::f64::consts::PI;

use ccx_model::{PROPERTY_RECORD_LEN, SectionShape};

/// Shear correction factor of a rectangular section.
pub const RECT_SHEAR_FACTOR: f64 = 5.0 / 6.0;
/// Shear correction factor of a solid circular section.
pub const CIRC_SHEAR_FACTOR: f64 = 6.0 / 7.0;

/// Derived properties of a beam cross-section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionProperties {
    /// Cross-sectional area
    pub area: f64,
    /// Second moment of area about the first local axis
    pub i11: f64,
    /// Second moment of area about the second local axis
    pub i22: f64,
    pub shear_factor: f64,
}

impl SectionProperties {
    /// Rectangle of `width` (thickness 1) by `height` (thickness 2).
    pub fn rectangular(width: f64, height: f64) -> Self {
        Self {
            area: width * height,
            i11: width * height.powi(3) / 12.0,
            i22: height * width.powi(3) / 12.0,
            shear_factor: RECT_SHEAR_FACTOR,
        }
    }

    /// Solid circle; thickness 1 is the diameter.
    pub fn circular(diameter: f64) -> Self {
        let radius = diameter / 2.0;
        let i = PI * radius.powi(4) / 4.0;
        Self {
            area: PI * radius.powi(2),
            i11: i,
            i22: i,
            shear_factor: CIRC_SHEAR_FACTOR,
        }
    }

    /// Properties for `shape`; a circle ignores `t2`.
    pub fn for_shape(shape: SectionShape, t1: f64, t2: f64) -> Self {
        match shape {
            SectionShape::Rectangular => Self::rectangular(t1, t2),
            SectionShape::Circular => Self::circular(t1),
        }
    }

    /// Packed user-beam record:
    /// `area, I11, I12 (0), I22, k, n1, n2, n3, offset1, offset2`.
    pub fn record(&self, normal: [f64; 3], offsets: [f64; 2]) -> [f64; PROPERTY_RECORD_LEN] {
        [
            self.area,
            self.i11,
            0.0,
            self.i22,
            self.shear_factor,
            normal[0],
            normal[1],
            normal[2],
            offsets[0],
            offsets[1],
        ]
    }
}
