//! Identifier handling at the input/output boundary.
//!
//! Names arrive from the deck as free text and are stored trimmed and
//! upper-cased, so lookups inside the model are plain string equality.

use crate::error::{ModelError, Result};

/// Longest identifier accepted for materials, orientations and sets.
pub const MAX_NAME_LEN: usize = 80;

/// Trims and upper-cases a raw identifier, rejecting names over [`MAX_NAME_LEN`].
pub fn normalize_name(raw: &str) -> Result<String> {
    let name = raw.trim().to_ascii_uppercase();
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ModelError::NameTooLong {
            name,
            max: MAX_NAME_LEN,
        });
    }
    Ok(name)
}
