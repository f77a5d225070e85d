//! Item inheritance across files.

use std::sync::Arc;

use templar::engine::{LoadState, Template};
use templar::foundation::ErrorKind;
use templar::stdlib::{IntRange, ItemTemplate, Quality};

use crate::game;

const BASE: &str = r#"[
    {"type": "TOOL", "abstract": "tool_base", "name": "tool", "weight": 500,
     "max_charges": 100, "material": ["steel"], "symbol": ";"},
    {"type": "GENERIC", "abstract": "knife_base", "name": "knife",
     "qualities": [{"id": "CUT", "level": 1}], "damage": [1, 4],
     "flags": ["SHEATH_KNIFE"]}
]"#;

const MOD: &str = r#"[
    {"type": "TOOL", "id": "wrench", "copy-from": "tool_base", "name": "wrench",
     "max_charges": {"relative": -20}},
    {"type": "GENERIC", "id": "knife_sharp", "copy-from": "knife_base",
     "name": "sharp knife",
     "qualities": {"extend": [{"id": "BUTCHER", "level": 1}]}},
    {"type": "GENERIC", "id": "knife_dull", "copy-from": "knife_base",
     "name": "dull knife", "delete": {"flags": ["SHEATH_KNIFE"]}}
]"#;

#[test]
fn wrench_inherits_across_files() {
    let mut game = game(&[("base.json", BASE), ("mod.json", MOD)]);
    let wrench = game.resolve::<ItemTemplate>("wrench").unwrap();
    assert_eq!(wrench.max_charges, 80);
    assert_eq!(wrench.weight, 500);
    assert_eq!(wrench.material, ["steel"]);
    assert_eq!(wrench.header().type_tag, "TOOL");
    assert!(!wrench.header().is_abstract());
}

#[test]
fn sharp_knife_gains_a_quality() {
    let mut game = game(&[("base.json", BASE), ("mod.json", MOD)]);
    let knife = game.resolve::<ItemTemplate>("knife_sharp").unwrap();
    assert_eq!(
        knife.qualities,
        [Quality::new("CUT", 1), Quality::new("BUTCHER", 1)]
    );
    assert!(knife.has_flag("SHEATH_KNIFE"));
    assert_eq!(knife.name, "sharp knife");
}

#[test]
fn siblings_do_not_leak_into_each_other() {
    let mut game = game(&[("base.json", BASE), ("mod.json", MOD)]);
    let dull = game.resolve::<ItemTemplate>("knife_dull").unwrap();
    let sharp = game.resolve::<ItemTemplate>("knife_sharp").unwrap();
    assert!(!dull.has_flag("SHEATH_KNIFE"));
    assert_eq!(dull.qualities.len(), 1);
    assert!(sharp.has_flag("SHEATH_KNIFE"));

    let base = game.resolve_abstract::<ItemTemplate>("knife_base").unwrap();
    assert_eq!(base.qualities.len(), 1);
    assert!(base.header().is_abstract());
}

#[test]
fn ranges_reject_numeric_modifiers() {
    let mut game = game(&[
        ("base.json", BASE),
        (
            "broken.json",
            r#"{"type": "GENERIC", "id": "knife_big", "copy-from": "knife_base",
                "name": "big knife", "proportional": {"damage": 2}}"#,
        ),
    ]);
    let err = game.resolve::<ItemTemplate>("knife_big").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ModifierTypeMismatch { .. }));
    assert_eq!(err.context.unwrap().source.as_deref(), Some("broken.json"));
}

#[test]
fn ranges_accept_every_shape() {
    let mut game = game(&[
        ("base.json", BASE),
        ("mod.json", MOD),
        (
            "ranges.json",
            r#"[
                {"type": "GENERIC", "id": "cleaver", "copy-from": "knife_base",
                 "name": "cleaver", "damage": {"min": 3, "max": 8}},
                {"type": "GENERIC", "id": "pin", "name": "pin", "damage": 1}
            ]"#,
        ),
    ]);
    assert_eq!(
        game.resolve::<ItemTemplate>("knife_sharp").unwrap().damage,
        IntRange::new(1, 4)
    );
    assert_eq!(
        game.resolve::<ItemTemplate>("cleaver").unwrap().damage,
        IntRange::new(3, 8)
    );
    assert_eq!(game.resolve::<ItemTemplate>("pin").unwrap().damage, IntRange::new(1, 1));
}

#[test]
fn obsolete_fields_are_still_inherited() {
    let mut game = game(&[("base.json", BASE), ("mod.json", MOD)]);
    let wrench = game.resolve::<ItemTemplate>("wrench").unwrap();
    assert_eq!(wrench.symbol, ";");
}

#[test]
fn load_all_then_lookup_is_cached() {
    let mut game = game(&[("base.json", BASE), ("mod.json", MOD)]);
    assert_eq!(game.load_all().unwrap(), 3);
    assert_eq!(game.state("item"), Some(LoadState::ConcreteLoaded));

    let cached = game.get::<ItemTemplate>("wrench").unwrap();
    let resolved = game.resolve::<ItemTemplate>("wrench").unwrap();
    assert!(Arc::ptr_eq(&cached, &resolved));

    let err = game.resolve::<ItemTemplate>("tool_base").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownTemplate { .. }));
}

#[test]
fn concrete_parents_can_be_extended() {
    let mut game = game(&[(
        "knives.json",
        r#"[
            {"type": "GENERIC", "id": "knife", "name": "knife",
             "qualities": [{"id": "CUT", "level": 1}]},
            {"type": "GENERIC", "id": "knife_sharp", "copy-from": "knife",
             "qualities": {"extend": [{"id": "CUT", "level": 2}]}}
        ]"#,
    )]);
    let sharp = game.resolve::<ItemTemplate>("knife_sharp").unwrap();
    assert_eq!(sharp.qualities.len(), 2);
    assert_eq!(sharp.quality_level("CUT"), Some(2));
    assert_eq!(game.resolve::<ItemTemplate>("knife").unwrap().qualities.len(), 1);
}

#[test]
fn delete_matches_what_the_parent_wrote() {
    let mut game = game(&[(
        "knives.json",
        r#"[
            {"type": "GENERIC", "abstract": "blade", "name": "blade",
             "qualities": [{"id": "CUT"}, {"id": "BUTCHER", "level": 2}]},
            {"type": "GENERIC", "id": "dull_blade", "copy-from": "blade",
             "qualities": {"delete": [{"id": "CUT"}]}},
            {"type": "GENERIC", "id": "dull_cleaver", "copy-from": "blade",
             "delete": {"qualities": [{"id": "BUTCHER", "level": 2}, {"id": "CUT", "level": 1}]}}
        ]"#,
    )]);
    let blade = game.resolve_abstract::<ItemTemplate>("blade").unwrap();
    assert_eq!(blade.quality_level("CUT"), Some(1));

    let dull = game.resolve::<ItemTemplate>("dull_blade").unwrap();
    assert_eq!(dull.qualities, [Quality::new("BUTCHER", 2)]);

    let cleaver = game.resolve::<ItemTemplate>("dull_cleaver").unwrap();
    assert!(cleaver.qualities.is_empty());
}
