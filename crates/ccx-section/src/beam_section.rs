//! The `*BEAM SECTION` block.
//!
//! One block assigns a material, an optional orientation, offsets and a
//! cross-section to every member of an element set:
//!
//! ```text
//! *BEAM SECTION, ELSET=COLS, MATERIAL=STEEL, SECTION=RECT[, ORIENTATION=..]
//!   [, OFFSET1=..][, OFFSET2=..][, NODAL THICKNESS]
//! t1[, t2]            (absent with NODAL THICKNESS)
//! n1, n2, n3          first normal direction
//! ```
//!
//! A fatal error stops the block where it is found. Whatever was already
//! written for earlier members stays written; the caller is expected to end
//! the read pass.

use std::collections::HashSet;
use std::ops::Range;
use std::slice::Iter;

use ccx_inp::{Card, DataLine};
use ccx_model::{Model, ModelError, NODAL_THICKNESS, SectionShape};
use log::{debug, error, warn};
use serde::Serialize;

use crate::error::{Result, SectionError};
use crate::options::BeamSectionOptions;
use crate::properties::SectionProperties;
use crate::resolve::{resolve_material, resolve_orientation, resolve_set};
use crate::validate::beam_member;
use crate::writer::{write_normal, write_thickness};

pub const KEYWORD: &str = "BEAM SECTION";

/// Progress of a block, logged as it advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    ParsingOptions,
    ResolvingReferences,
    ValidatingSet,
    AssigningThickness,
    AssigningOrientation,
    ComputingUserProperties,
    Done,
}

/// What one block wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockReport {
    pub line: usize,
    pub elset: String,
    pub shape: SectionShape,
    pub members: usize,
    pub thickness: [f64; 2],
    pub normal_offset: usize,
    pub property_offset: Option<usize>,
    pub warnings: Vec<String>,
}

/// Applies one `*BEAM SECTION` card to the model.
///
/// Fatal errors are logged here, where they are detected, and returned.
pub fn apply_beam_section(model: &mut Model, card: &Card) -> Result<BlockReport> {
    apply(model, card).inspect_err(|err| error!("{err}"))
}

fn apply(model: &mut Model, card: &Card) -> Result<BlockReport> {
    let line = card.line_start;
    enter(line, Stage::ParsingOptions);
    let mut options = BeamSectionOptions::parse(card)?;

    enter(line, Stage::ResolvingReferences);
    let material = resolve_material(&model.materials, &options.material)?;
    let orientation = resolve_orientation(&model.orientations, options.orientation.as_deref())?;
    let set = resolve_set(&model.sets, &options.elset)?;
    let elset = set.name.to_string();
    // Overlapping set entries name an element once per block.
    let mut seen = HashSet::new();
    let member_ids: Vec<i32> = set.ids().filter(|&id| seen.insert(id)).collect();

    enter(line, Stage::ValidatingSet);
    let mut slots: Vec<Range<usize>> = Vec::with_capacity(member_ids.len());
    let mut user_beams = Vec::new();
    for &id in &member_ids {
        let element = beam_member(&mut model.elements, id)?;
        element.material = Some(material);
        element.orientation = orientation;
        element.offsets = options.offsets;
        element
            .assign_section(options.shape)
            .map_err(|err| match err {
                ModelError::SectionAlreadyAssigned(id) => SectionError::AlreadyAssigned(id),
                other => SectionError::Model(other),
            })?;
        if element.is_user_beam() {
            user_beams.push(id);
        }
        slots.push(element.slots());
    }

    let mut rows = card.data_lines.iter();
    let mut last_line = line;

    enter(line, Stage::AssigningThickness);
    let thickness = if options.nodal_thickness {
        [NODAL_THICKNESS; 2]
    } else {
        let row = next_row(&mut rows, &mut last_line, "thickness")?;
        read_thickness(row)?
    };
    write_thickness(&mut model.arenas, thickness, &slots)?;

    enter(line, Stage::AssigningOrientation);
    let row = next_row(&mut rows, &mut last_line, "normal direction")?;
    let raw_normal = read_normal(row)?;
    let (normal_offset, normal) = write_normal(&mut model.arenas, raw_normal, row.line, &slots)?;

    let mut property_offset = None;
    if let Some(&first_user_beam) = user_beams.first() {
        enter(line, Stage::ComputingUserProperties);
        if options.nodal_thickness {
            return Err(SectionError::NodalThicknessOnUserBeam(first_user_beam));
        }
        let properties = SectionProperties::for_shape(options.shape, thickness[0], thickness[1]);
        let record = properties.record(normal, options.offsets);
        let offset = model
            .arenas
            .properties
            .append(&record)?;
        for &id in &user_beams {
            if let Some(element) = model.elements.get_mut(id) {
                element.set_property_offset(offset)?;
            }
        }
        property_offset = Some(offset);
    }

    for surplus in rows {
        let message = format!(
            "*BEAM SECTION: data line {} ignored, the block takes a thickness line and a normal line",
            surplus.line
        );
        warn!("{message}");
        options.warnings.push(message);
    }

    enter(line, Stage::Done);
    Ok(BlockReport {
        line,
        elset,
        shape: options.shape,
        members: member_ids.len(),
        thickness,
        normal_offset,
        property_offset,
        warnings: options.warnings,
    })
}

fn enter(line: usize, stage: Stage) {
    debug!("*BEAM SECTION at line {line}: {stage:?}");
}

fn next_row<'a>(
    rows: &mut Iter<'a, DataLine>,
    last_line: &mut usize,
    what: &'static str,
) -> Result<&'a DataLine> {
    let row = rows.next().ok_or(SectionError::MissingDataLine {
        what,
        line: *last_line,
    })?;
    *last_line = row.line;
    Ok(row)
}

fn real(row: &DataLine, index: usize, what: &'static str) -> Result<f64> {
    let token = row.field(index).unwrap_or_default();
    token.parse::<f64>().map_err(|_| SectionError::InvalidNumber {
        what,
        token: token.to_string(),
        line: row.line,
    })
}

/// One or two thicknesses; a single value serves both directions.
fn read_thickness(row: &DataLine) -> Result<[f64; 2]> {
    let t1 = real(row, 0, "thickness")?;
    let t2 = match row.field(1) {
        Some(token) if !token.is_empty() => real(row, 1, "thickness")?,
        _ => t1,
    };
    Ok([t1, t2])
}

fn read_normal(row: &DataLine) -> Result<[f64; 3]> {
    Ok([
        real(row, 0, "normal component")?,
        real(row, 1, "normal component")?,
        real(row, 2, "normal component")?,
    ])
}
