//! Model builder for constructing the registries from input decks.
//!
//! This is the stage that runs before section definitions are read: it
//! collects nodes, elements, materials, orientations and element sets, then
//! sizes the section arenas for the element table it produced.

use std::collections::HashMap;

use ccx_inp::{Card, DataLine, Deck};
use log::debug;

use crate::arena::{PROPERTY_RECORD_LEN, SectionArenas};
use crate::element::{ElementFamily, ElementTable, ElementType};
use crate::error::{ModelError, Result};
use crate::model::Model;
use crate::registry::{MaterialTable, OrientationSystem, OrientationTable};
use crate::sets::{ElementSets, SetMember};

/// Builds a [`Model`] from a parsed input deck
#[derive(Debug, Default)]
pub struct ModelBuilder {
    nodes: HashMap<i32, [f64; 3]>,
    elements: ElementTable,
    materials: MaterialTable,
    orientations: OrientationTable,
    sets: ElementSets,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from the given deck
    pub fn build_from_deck(deck: &Deck) -> Result<Model> {
        let mut builder = Self::new();
        for card in &deck.cards {
            builder.process_card(card)?;
        }
        builder.finish()
    }

    /// Process one card; keywords this stage does not own are skipped.
    pub fn process_card(&mut self, card: &Card) -> Result<()> {
        match card.keyword.as_str() {
            "NODE" => self.process_node_card(card),
            "ELEMENT" => self.process_element_card(card),
            "MATERIAL" => self.process_material_card(card),
            "ORIENTATION" => self.process_orientation_card(card),
            "ELSET" => self.process_elset_card(card),
            _ => Ok(()),
        }
    }

    /// Validates connectivity and sizes the arenas.
    pub fn finish(self) -> Result<Model> {
        if !self.nodes.is_empty() {
            for element in self.elements.iter() {
                if let Some(&node) = element.nodes.iter().find(|n| !self.nodes.contains_key(n)) {
                    return Err(ModelError::MissingNode {
                        element: element.id,
                        node,
                    });
                }
            }
        }

        let property_capacity =
            PROPERTY_RECORD_LEN * self.elements.count_family(ElementFamily::UserBeam);
        let arenas = SectionArenas::new(self.elements.total_slots(), property_capacity);
        debug!(
            "model built: {} nodes, {} elements, {} node slots, property capacity {}",
            self.nodes.len(),
            self.elements.len(),
            self.elements.total_slots(),
            property_capacity
        );

        Ok(Model {
            nodes: self.nodes,
            elements: self.elements,
            materials: self.materials,
            orientations: self.orientations,
            sets: self.sets,
            arenas,
        })
    }

    /// Process a *NODE card
    fn process_node_card(&mut self, card: &Card) -> Result<()> {
        for data_line in &card.data_lines {
            let id = parse_int(card, data_line, 0, "node ID")?;
            let mut coords = [0.0; 3];
            for (axis, coord) in coords.iter_mut().enumerate() {
                if data_line.field(axis + 1).is_some_and(|f| !f.is_empty()) {
                    *coord = parse_real(card, data_line, axis + 1, "coordinate")?;
                }
            }
            self.nodes.insert(id, coords);
        }
        Ok(())
    }

    /// Process an *ELEMENT card
    fn process_element_card(&mut self, card: &Card) -> Result<()> {
        let type_value = card.value_of("TYPE").ok_or_else(|| {
            ModelError::card(&card.keyword, card.line_start, "missing TYPE parameter")
        })?;
        let element_type = ElementType::from_calculix_type(type_value)
            .ok_or_else(|| ModelError::UnknownElementType(type_value.to_string()))?;
        let expected_nodes = element_type.num_nodes();

        let mut created = Vec::new();
        let mut current: Option<(i32, Vec<i32>)> = None;

        for data_line in &card.data_lines {
            // An element whose node list is still short continues on this line.
            let (id, mut nodes, first_node_field) = match current.take() {
                Some((id, nodes)) => (id, nodes, 0),
                None => (parse_int(card, data_line, 0, "element ID")?, Vec::new(), 1),
            };
            for index in first_node_field..data_line.len() {
                nodes.push(parse_int(card, data_line, index, "node ID")?);
            }
            if nodes.len() < expected_nodes {
                current = Some((id, nodes));
                continue;
            }
            self.elements.insert(id, element_type, nodes)?;
            created.push(SetMember::Literal(id));
        }

        if let Some((id, nodes)) = current {
            // Let the table report the short connectivity.
            self.elements.insert(id, element_type, nodes)?;
        }

        if let Some(elset) = card.value_of("ELSET") {
            self.sets.define(elset, &created)?;
        }
        Ok(())
    }

    /// Process a *MATERIAL card
    fn process_material_card(&mut self, card: &Card) -> Result<()> {
        let name = card.value_of("NAME").ok_or_else(|| {
            ModelError::card(&card.keyword, card.line_start, "missing NAME parameter")
        })?;
        self.materials.define(name)?;
        Ok(())
    }

    /// Process an *ORIENTATION card
    fn process_orientation_card(&mut self, card: &Card) -> Result<()> {
        let name = card.value_of("NAME").ok_or_else(|| {
            ModelError::card(&card.keyword, card.line_start, "missing NAME parameter")
        })?;
        let system = match card.value_of("SYSTEM").map(str::to_ascii_uppercase).as_deref() {
            None | Some("R") | Some("RECTANGULAR") => OrientationSystem::Rectangular,
            Some("C") | Some("CYLINDRICAL") => OrientationSystem::Cylindrical,
            Some(other) => {
                return Err(ModelError::card(
                    &card.keyword,
                    card.line_start,
                    format!("unknown SYSTEM {other}"),
                ));
            }
        };
        let data_line = card.data_lines.first().ok_or_else(|| {
            ModelError::card(&card.keyword, card.line_start, "missing definition line")
        })?;
        let mut values = [0.0; 6];
        for (index, value) in values.iter_mut().enumerate() {
            *value = parse_real(card, data_line, index, "axis point coordinate")?;
        }
        self.orientations.define(
            name,
            system,
            [values[0], values[1], values[2]],
            [values[3], values[4], values[5]],
        )?;
        Ok(())
    }

    /// Process an *ELSET card
    fn process_elset_card(&mut self, card: &Card) -> Result<()> {
        let name = card.value_of("ELSET").ok_or_else(|| {
            ModelError::card(&card.keyword, card.line_start, "missing ELSET parameter")
        })?;
        let generate = card.has("GENERATE");

        let mut members = Vec::new();
        for data_line in &card.data_lines {
            if generate {
                let from = parse_int(card, data_line, 0, "first element")?;
                let to = parse_int(card, data_line, 1, "last element")?;
                let step = match data_line.field(2) {
                    Some(f) if !f.is_empty() => parse_int(card, data_line, 2, "increment")?,
                    _ => 1,
                };
                members.push(SetMember::range(name, from, to, step)?);
                continue;
            }
            for (index, field) in data_line.fields.iter().enumerate() {
                if field.is_empty() {
                    continue;
                }
                if field.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+') {
                    members.push(SetMember::Literal(parse_int(card, data_line, index, "element ID")?));
                } else {
                    // A name refers to a previously defined set.
                    let nested = self.sets.resolve(field)?;
                    members.extend_from_slice(nested.members);
                }
            }
        }

        self.sets.define(name, &members)
    }
}

fn parse_int(card: &Card, line: &DataLine, index: usize, what: &str) -> Result<i32> {
    let field = line.field(index).unwrap_or_default();
    field
        .parse::<i32>()
        .map_err(|_| ModelError::card(&card.keyword, line.line, format!("invalid {what}: {field:?}")))
}

fn parse_real(card: &Card, line: &DataLine, index: usize, what: &str) -> Result<f64> {
    let field = line.field(index).unwrap_or_default();
    field
        .parse::<f64>()
        .map_err(|_| ModelError::card(&card.keyword, line.line, format!("invalid {what}: {field:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(input: &str) -> Result<Model> {
        let deck = Deck::parse_str(input).expect("Failed to parse deck");
        ModelBuilder::build_from_deck(&deck)
    }

    #[test]
    fn builds_registries_from_deck() {
        let model = build(
            r#"
*NODE
1, 0, 0, 0
2, 1, 0, 0
3, 2, 0, 0
*ELEMENT, TYPE=B31, ELSET=COLS
1, 1, 2
2, 2, 3
*ELEMENT, TYPE=U1, ELSET=USER
3, 1, 3
*MATERIAL, NAME=Steel
*ORIENTATION, NAME=OR1
1, 0, 0, 0, 1, 0
"#,
        )
        .unwrap();

        assert_eq!(model.nodes.len(), 3);
        assert_eq!(model.elements.len(), 3);
        assert_eq!(model.elements.total_slots(), 6);
        assert!(model.materials.lookup("STEEL").is_some());
        assert!(model.orientations.lookup("OR1").is_some());
        let cols: Vec<i32> = model.sets.resolve("COLS").unwrap().ids().collect();
        assert_eq!(cols, vec![1, 2]);
        assert_eq!(model.arenas.properties.capacity(), PROPERTY_RECORD_LEN);
        assert_eq!(model.arenas.slots.len(), 6);
    }

    #[test]
    fn elements_continue_over_lines() {
        let model = build(
            r#"
*ELEMENT, TYPE=B32
1, 1, 2,
3
2, 3, 4, 5
"#,
        )
        .unwrap();
        assert_eq!(model.elements.get(1).unwrap().nodes, vec![1, 2, 3]);
        assert_eq!(model.elements.get(2).unwrap().slots(), 3..6);
    }

    #[test]
    fn generate_and_nested_sets() {
        let model = build(
            r#"
*ELSET, ELSET=EVEN, GENERATE
10, 100, 2
*ELSET, ELSET=ALL
1, EVEN
"#,
        )
        .unwrap();
        let mut all: Vec<i32> = model.sets.resolve("ALL").unwrap().ids().collect();
        assert_eq!(all.len(), 47);
        all.sort_unstable();
        assert_eq!(all[0], 1);
        assert_eq!(all[1], 10);
        assert_eq!(all[46], 100);
    }

    #[test]
    fn rejects_missing_nodes() {
        let result = build(
            r#"
*NODE
1, 0, 0, 0
*ELEMENT, TYPE=B31
1, 1, 2
"#,
        );
        assert_eq!(
            result.unwrap_err(),
            ModelError::MissingNode {
                element: 1,
                node: 2
            }
        );
    }

    #[test]
    fn reports_bad_fields_with_line_numbers() {
        let err = build("*ELSET, ELSET=A, GENERATE\n1, x\n").unwrap_err();
        assert_eq!(
            err,
            ModelError::Card {
                card: "ELSET".to_string(),
                message: "invalid last element: \"x\"".to_string(),
                line: 2,
            }
        );
        assert!(matches!(
            build("*ELSET, ELSET=A, GENERATE\n1, 9, 0\n").unwrap_err(),
            ModelError::ZeroStep { .. }
        ));
    }

    #[test]
    fn material_requires_a_name() {
        let err = build("*MATERIAL\n").unwrap_err();
        assert!(err.to_string().contains("NAME"));
    }
}
