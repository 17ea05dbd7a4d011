//! Read pass over all section definitions of a deck.

use ccx_inp::Deck;
use ccx_model::{FrozenModel, Model};
use log::info;

use crate::beam_section::{BlockReport, KEYWORD, apply_beam_section};
use crate::config::SectionConfig;
use crate::error::Result;

/// Applies every `*BEAM SECTION` card in deck order, stopping at the first
/// fatal error.
pub fn read_sections(
    model: &mut Model,
    deck: &Deck,
    config: &SectionConfig,
) -> Result<Vec<BlockReport>> {
    if let Some(capacity) = config.property_capacity {
        model.arenas.properties.set_capacity(capacity);
    }

    let mut reports = Vec::new();
    for card in deck.cards_named(KEYWORD) {
        reports.push(apply_beam_section(model, card)?);
    }
    info!(
        "{} beam section block(s) read, {} normal slot(s), {} property value(s)",
        reports.len(),
        model.arenas.normals.len(),
        model.arenas.properties.len()
    );
    Ok(reports)
}

/// Frozen model plus the per-block reports of the read pass.
#[derive(Debug, Clone)]
pub struct SectionOutcome {
    pub model: FrozenModel,
    pub blocks: Vec<BlockReport>,
}

/// Builds the model, reads all section definitions and freezes the result.
pub fn build_sections(deck: &Deck, config: &SectionConfig) -> Result<SectionOutcome> {
    let mut model = Model::from_deck(deck)?;
    let blocks = read_sections(&mut model, deck, config)?;
    Ok(SectionOutcome {
        model: model.freeze(),
        blocks,
    })
}
