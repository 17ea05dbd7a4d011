//! Header parameters of a `*BEAM SECTION` card.

use ccx_inp::Card;
use ccx_model::SectionShape;
use log::warn;

use crate::error::{Result, SectionError};

/// Parsed and checked header of one block.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamSectionOptions {
    pub material: String,
    pub orientation: Option<String>,
    pub elset: String,
    pub shape: SectionShape,
    pub offsets: [f64; 2],
    pub nodal_thickness: bool,
    /// Unrecognized parameters, already logged
    pub warnings: Vec<String>,
}

impl BeamSectionOptions {
    pub fn parse(card: &Card) -> Result<Self> {
        let line = card.line_start;
        let mut material = None;
        let mut orientation = None;
        let mut elset = None;
        let mut section = None;
        let mut offsets = [0.0; 2];
        let mut nodal_thickness = false;
        let mut warnings = Vec::new();

        for parameter in &card.parameters {
            let value = parameter.value.as_deref();
            match parameter.key.as_str() {
                "MATERIAL" => material = value,
                "ORIENTATION" => orientation = value,
                "ELSET" => elset = value,
                "SECTION" => section = value,
                "OFFSET1" => offsets[0] = parse_offset(value, "OFFSET1", line)?,
                "OFFSET2" => offsets[1] = parse_offset(value, "OFFSET2", line)?,
                "NODAL THICKNESS" => nodal_thickness = true,
                other => {
                    let message =
                        format!("*BEAM SECTION: parameter not recognized: {other} (line {line})");
                    warn!("{message}");
                    warnings.push(message);
                }
            }
        }

        let section = section.ok_or(SectionError::MissingParameter {
            parameter: "SECTION",
            line,
        })?;
        let shape =
            SectionShape::from_keyword(section).ok_or_else(|| SectionError::UnsupportedShape {
                value: section.to_string(),
                line,
            })?;
        let material = material.ok_or(SectionError::MissingParameter {
            parameter: "MATERIAL",
            line,
        })?;
        let elset = elset.ok_or(SectionError::MissingParameter {
            parameter: "ELSET",
            line,
        })?;

        Ok(Self {
            material: material.to_string(),
            orientation: orientation.map(str::to_string),
            elset: elset.to_string(),
            shape,
            offsets,
            nodal_thickness,
            warnings,
        })
    }
}

fn parse_offset(value: Option<&str>, what: &'static str, line: usize) -> Result<f64> {
    let token = value.unwrap_or_default();
    token.parse::<f64>().map_err(|_| SectionError::InvalidNumber {
        what,
        token: token.to_string(),
        line,
    })
}
