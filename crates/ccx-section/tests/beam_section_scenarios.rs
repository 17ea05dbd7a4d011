/// End-to-end tests: decks with *BEAM SECTION blocks driven through the
/// model builder, the read pass and the frozen arenas.
use std::f64::consts::PI;

use ccx_inp::Deck;
use ccx_model::{
    ElementType, Model, NODAL_THICKNESS, NORMAL_STRIDE, PROPERTY_RECORD_LEN, SectionShape,
};
use ccx_section::{
    SectionConfig, SectionError, build_sections, element_views, read_sections,
};

const FRAME: &str = r#"
*NODE
1, 0, 0, 0
2, 0, 0, 3
3, 4, 0, 0
4, 4, 0, 3
5, 2, 0, 3
*ELEMENT, TYPE=B31, ELSET=COLS
1, 1, 2
2, 3, 4
*ELEMENT, TYPE=B32, ELSET=GIRDER
3, 2, 5, 4
*ELEMENT, TYPE=U1, ELSET=BRACES
4, 1, 4
5, 3, 2
*ELEMENT, TYPE=S4, ELSET=WALL
6, 1, 3, 4, 2
*MATERIAL, NAME=STEEL
*MATERIAL, NAME=TIMBER
*ORIENTATION, NAME=LOCAL
1, 0, 0, 0, 1, 0
"#;

fn deck_with(sections: &str) -> Deck {
    Deck::parse_str(&format!("{FRAME}{sections}")).expect("Failed to parse deck")
}

#[test]
fn rectangular_columns_end_to_end() {
    let deck = deck_with(
        r#"
*BEAM SECTION, MATERIAL=STEEL, ELSET=COLS, SECTION=RECT
0.4, 0.6
0, 0, 1
"#,
    );
    let outcome = build_sections(&deck, &SectionConfig::default()).unwrap();
    let model = &outcome.model;
    let steel = model.materials.lookup("STEEL").unwrap();

    let block = &outcome.blocks[0];
    assert_eq!(block.elset, "COLS");
    assert_eq!(block.members, 2);
    assert_eq!(model.arenas.normal(block.normal_offset), Some([0.0, 0.0, 1.0]));

    for id in [1, 2] {
        let element = model.elements.get(id).unwrap();
        assert_eq!(element.material, Some(steel));
        assert_eq!(element.orientation, None);
        assert_eq!(element.section_shape(), Some(SectionShape::Rectangular));
        assert_eq!(element.family_tag().chars().nth(7), Some('R'));
        for slot in element.slots() {
            assert_eq!(model.arenas.thickness(slot), Some([0.4, 0.6]));
            assert_eq!(model.arenas.slot_normal(slot), Some(block.normal_offset));
        }
    }

    // Untouched elements keep their plain tag.
    assert_eq!(model.elements.get(3).unwrap().family_tag(), "B32     ");
}

#[test]
fn circular_user_beams_share_one_record() {
    let deck = deck_with(
        r#"
*BEAM SECTION, MATERIAL=TIMBER, ELSET=BRACES, SECTION=CIRC, ORIENTATION=LOCAL, OFFSET1=0.05
0.3
1, 1, 0
"#,
    );
    let outcome = build_sections(&deck, &SectionConfig::default()).unwrap();
    let model = &outcome.model;
    let offset = outcome.blocks[0].property_offset.unwrap();

    let record = model.arenas.property_record(offset).unwrap();
    let r: f64 = 0.15;
    let s = 1.0 / 2.0_f64.sqrt();
    assert!((record[0] - PI * r.powi(2)).abs() < 1e-15);
    assert!((record[1] - PI * r.powi(4) / 4.0).abs() < 1e-18);
    assert_eq!(record[2], 0.0);
    assert_eq!(record[3], record[1]);
    assert_eq!(record[4], 6.0 / 7.0);
    assert!((record[5] - s).abs() < 1e-15);
    assert!((record[6] - s).abs() < 1e-15);
    assert_eq!(record[7], 0.0);
    assert_eq!(record[8], 0.05);
    assert_eq!(record[9], 0.0);

    for id in [4, 5] {
        let element = model.elements.get(id).unwrap();
        assert_eq!(element.property_offset(), Some(offset));
        assert_eq!(element.family_tag(), "U1      ");
        assert_eq!(element.offsets, [0.05, 0.0]);
        assert!(element.orientation.is_some());
    }
    assert_eq!(model.arenas.properties.len(), PROPERTY_RECORD_LEN);
}

#[test]
fn each_block_gets_its_own_normal() {
    let deck = deck_with(
        r#"
*BEAM SECTION, MATERIAL=STEEL, ELSET=COLS, SECTION=RECT
0.4, 0.6
0, 0, 1
*BEAM SECTION, MATERIAL=STEEL, ELSET=GIRDER, SECTION=RECT
0.3, 0.5
0, 0, 1
"#,
    );
    let outcome = build_sections(&deck, &SectionConfig::default()).unwrap();
    let [cols, girder] = [&outcome.blocks[0], &outcome.blocks[1]];
    assert_ne!(cols.normal_offset, girder.normal_offset);
    assert_eq!(girder.normal_offset - cols.normal_offset, NORMAL_STRIDE);

    let model = &outcome.model;
    let girder_slots: Vec<Option<usize>> = model
        .elements
        .get(3)
        .unwrap()
        .slots()
        .map(|slot| model.arenas.slot_normal(slot))
        .collect();
    assert_eq!(girder_slots, vec![Some(girder.normal_offset); 3]);
    assert_eq!(model.arenas.second_normal(cols.normal_offset), Some([0.0; 3]));
}

#[test]
fn non_beam_member_names_the_element() {
    let deck = deck_with(
        r#"
*ELSET, ELSET=ALL
1, 6, 2
*BEAM SECTION, MATERIAL=STEEL, ELSET=ALL, SECTION=RECT
0.4, 0.6
0, 0, 1
"#,
    );
    let err = build_sections(&deck, &SectionConfig::default()).unwrap_err();
    assert_eq!(
        err,
        SectionError::NotBeamElement {
            element: 6,
            element_type: "S4".to_string()
        }
    );
    assert!(err.to_string().starts_with("*BEAM SECTION"));
    assert!(err.to_string().contains("element 6"));
}

#[test]
fn nodal_thickness_sets_sentinel_on_every_slot() {
    let deck = deck_with(
        r#"
*BEAM SECTION, MATERIAL=STEEL, ELSET=GIRDER, SECTION=CIRC, NODAL THICKNESS
0, 1, 0
"#,
    );
    let outcome = build_sections(&deck, &SectionConfig::default()).unwrap();
    let model = &outcome.model;
    for slot in model.elements.get(3).unwrap().slots() {
        assert_eq!(model.arenas.thickness(slot), Some([NODAL_THICKNESS; 2]));
    }
}

#[test]
fn nodal_thickness_is_rejected_for_user_beams() {
    let deck = deck_with(
        r#"
*BEAM SECTION, MATERIAL=STEEL, ELSET=BRACES, SECTION=RECT, NODAL THICKNESS
0, 0, 1
"#,
    );
    let err = build_sections(&deck, &SectionConfig::default()).unwrap_err();
    assert_eq!(err, SectionError::NodalThicknessOnUserBeam(4));
}

#[test]
fn generate_set_expands_inclusively() {
    let mut elements = String::from("*ELEMENT, TYPE=B31\n");
    for id in (10..=100).step_by(2) {
        elements.push_str(&format!("{id}, 1, 2\n"));
    }
    let text = format!(
        "{elements}*MATERIAL, NAME=STEEL\n*ELSET, ELSET=EVEN, GENERATE\n10, 100, 2\n\
         *BEAM SECTION, MATERIAL=STEEL, ELSET=EVEN, SECTION=RECT\n0.1, 0.2\n1, 0, 0\n"
    );
    let deck = Deck::parse_str(&text).unwrap();
    let mut model = Model::from_deck(&deck).unwrap();

    let descending: Vec<i32> = model.sets.resolve("EVEN").unwrap().ids().collect();
    assert_eq!(descending.first(), Some(&100));
    let mut ascending = descending.clone();
    ascending.sort_unstable();
    assert_eq!(ascending, (10..=100).step_by(2).collect::<Vec<_>>());
    assert_eq!(
        model.sets.resolve("EVEN").unwrap().ids().collect::<Vec<_>>(),
        descending
    );

    let reports = read_sections(&mut model, &deck, &SectionConfig::default()).unwrap();
    assert_eq!(reports[0].members, 46);
    assert!(
        model
            .elements
            .iter()
            .all(|e| e.section_shape() == Some(SectionShape::Rectangular))
    );
}

#[test]
fn reference_errors_are_fatal() {
    let cases = [
        (
            "*BEAM SECTION, MATERIAL=IRON, ELSET=COLS, SECTION=RECT\n0.4\n0, 0, 1\n",
            SectionError::UndefinedMaterial("IRON".to_string()),
        ),
        (
            "*BEAM SECTION, MATERIAL=STEEL, ELSET=ROOF, SECTION=RECT\n0.4\n0, 0, 1\n",
            SectionError::UndefinedSet("ROOF".to_string()),
        ),
        (
            "*BEAM SECTION, MATERIAL=STEEL, ELSET=COLS, SECTION=RECT, ORIENTATION=GLOBAL\n0.4\n0, 0, 1\n",
            SectionError::UndefinedOrientation("GLOBAL".to_string()),
        ),
    ];
    for (block, expected) in cases {
        let err = build_sections(&deck_with(block), &SectionConfig::default()).unwrap_err();
        assert_eq!(err, expected);
    }
}

#[test]
fn zero_normal_is_fatal() {
    let deck = deck_with("*BEAM SECTION, MATERIAL=STEEL, ELSET=COLS, SECTION=RECT\n0.4\n0, 0, 0\n");
    let err = build_sections(&deck, &SectionConfig::default()).unwrap_err();
    assert!(matches!(err, SectionError::ZeroNormal { .. }));
}

#[test]
fn property_capacity_overflow_asks_for_more_room() {
    let deck = deck_with(
        "*BEAM SECTION, MATERIAL=STEEL, ELSET=BRACES, SECTION=RECT\n0.4, 0.6\n0, 0, 1\n",
    );
    let config = SectionConfig::default().with_property_capacity(5);
    let err = build_sections(&deck, &config).unwrap_err();
    assert!(matches!(err, SectionError::Model(_)));
    assert!(err.to_string().contains("increase the property capacity"));
}

#[test]
fn read_pass_stops_at_first_error() {
    let deck = deck_with(
        r#"
*BEAM SECTION, MATERIAL=STEEL, ELSET=COLS, SECTION=RECT
0.4, 0.6
0, 0, 1
*BEAM SECTION, MATERIAL=STEEL, ELSET=WALL, SECTION=RECT
0.4, 0.6
0, 0, 1
*BEAM SECTION, MATERIAL=STEEL, ELSET=GIRDER, SECTION=RECT
0.4, 0.6
0, 0, 1
"#,
    );
    let mut model = Model::from_deck(&deck).unwrap();
    let err = read_sections(&mut model, &deck, &SectionConfig::default()).unwrap_err();
    assert!(matches!(err, SectionError::NotBeamElement { element: 6, .. }));
    assert!(model.elements.get(1).unwrap().has_section());
    assert!(!model.elements.get(3).unwrap().has_section());
    assert_eq!(model.arenas.normals.len(), NORMAL_STRIDE);
}

#[test]
fn element_views_describe_sectioned_elements() {
    let deck = deck_with(
        r#"
*BEAM SECTION, MATERIAL=STEEL, ELSET=COLS, SECTION=RECT, ORIENTATION=LOCAL
0.4, 0.6
0, 0, 1
*BEAM SECTION, MATERIAL=TIMBER, ELSET=BRACES, SECTION=CIRC
0.3
1, 0, 0
"#,
    );
    let outcome = build_sections(&deck, &SectionConfig::default()).unwrap();
    let views = element_views(&outcome.model);
    let ids: Vec<i32> = views.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![1, 2, 4, 5]);

    let column = &views[0];
    assert_eq!(column.family_tag, "B31    R");
    assert_eq!(column.material.as_deref(), Some("STEEL"));
    assert_eq!(column.orientation.as_deref(), Some("LOCAL"));
    assert_eq!(column.thickness, vec![[0.4, 0.6]; 2]);
    assert_eq!(column.normal, Some([0.0, 0.0, 1.0]));
    assert_eq!(column.property_record, None);

    let brace = &views[2];
    assert_eq!(brace.material.as_deref(), Some("TIMBER"));
    assert_eq!(brace.property_record.as_ref().map(Vec::len), Some(PROPERTY_RECORD_LEN));
    assert_eq!(
        outcome.model.elements.get(4).map(|e| e.element_type),
        Some(ElementType::U1)
    );
}

#[test]
fn overlapping_set_entries_assign_each_element_once() {
    let deck = deck_with(
        r#"
*ELSET, ELSET=FRAME
COLS, 1
*ELSET, ELSET=FRAME
2, 3
*BEAM SECTION, MATERIAL=STEEL, ELSET=FRAME, SECTION=RECT
0.4, 0.6
0, 0, 1
"#,
    );
    let outcome = build_sections(&deck, &SectionConfig::default()).unwrap();
    assert_eq!(outcome.blocks[0].members, 3);
    for id in [1, 2, 3] {
        assert!(outcome.model.elements.get(id).unwrap().has_section());
    }

    // A second block on the same elements is still rejected.
    let deck = deck_with(
        r#"
*BEAM SECTION, MATERIAL=STEEL, ELSET=COLS, SECTION=RECT
0.4, 0.6
0, 0, 1
*BEAM SECTION, MATERIAL=TIMBER, ELSET=COLS, SECTION=CIRC
0.2
0, 0, 1
"#,
    );
    let err = build_sections(&deck, &SectionConfig::default()).unwrap_err();
    assert_eq!(err, SectionError::AlreadyAssigned(1));
}

#[test]
fn overlong_names_are_reported_against_the_block() {
    let name = "M".repeat(81);
    let deck = deck_with(&format!(
        "*BEAM SECTION, MATERIAL={name}, ELSET=COLS, SECTION=RECT\n0.4\n0, 0, 1\n"
    ));
    let err = build_sections(&deck, &SectionConfig::default()).unwrap_err();
    assert!(matches!(err, SectionError::Model(_)));
    assert!(err.to_string().starts_with("*BEAM SECTION: "));
}
