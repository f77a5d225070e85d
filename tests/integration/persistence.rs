//! Saving and reloading a game against freshly loaded templates.

use std::sync::Arc;

use templar::foundation::ErrorKind;
use templar::runtime::{Instance, SaveFile, SerialCounter};
use templar::stdlib::ItemTemplate;

use crate::game;

const ITEMS: &str = r#"[
    {"type": "TOOL", "abstract": "tool_base", "name": "tool", "max_charges": 100},
    {"type": "TOOL", "id": "wrench", "copy-from": "tool_base", "name": "wrench",
     "max_charges": {"relative": -20}},
    {"type": "TOOL", "id": "flashlight", "copy-from": "tool_base", "name": "flashlight"}
]"#;

#[test]
fn save_and_reload_a_session() {
    let path = std::env::temp_dir().join("templar_integration_session.msgpack");

    // First session: spawn entities and spend some charges.
    {
        let mut game = game(&[("items.json", ITEMS)]);
        let counter = SerialCounter::new();
        let mut wrench =
            Instance::<ItemTemplate>::from_templates(&mut game, "wrench", &counter).unwrap();
        let mut light =
            Instance::<ItemTemplate>::from_templates(&mut game, "flashlight", &counter).unwrap();
        let spent = wrench.max_charges - 5;
        wrench.data_mut().set("charges", spent);
        light.data_mut().set("charges", 12i64);
        light.data_mut().set("lit", true);

        let mut save = SaveFile::new(&counter);
        save.push(&wrench);
        save.push(&light);
        save.save_to_file(&path).unwrap();
    }

    // Second session: templates are rebuilt from data, entities from the save.
    let save = SaveFile::load_from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let mut game = game(&[("items.json", ITEMS)]);
    let counter = save.counter();
    let restored: Vec<_> = save
        .instances
        .iter()
        .map(|saved| {
            let template = game.resolve::<ItemTemplate>(&saved.template_id).unwrap();
            Instance::restore(template, saved).unwrap()
        })
        .collect();

    assert_eq!(restored[0].data().get_as::<i64>("charges"), Some(75));
    assert_eq!(restored[1].data().get_as::<bool>("lit"), Some(true));
    assert_eq!(restored[1].max_charges, 100);
    assert!(Arc::ptr_eq(
        restored[0].template(),
        &game.get::<ItemTemplate>("wrench").unwrap()
    ));

    let spawned = Instance::<ItemTemplate>::from_templates(&mut game, "wrench", &counter).unwrap();
    assert!(restored.iter().all(|r| r.serial() != spawned.serial()));
}

#[test]
fn saves_do_not_survive_a_renamed_template() {
    let mut game = game(&[("items.json", ITEMS)]);
    let counter = SerialCounter::new();
    let wrench = Instance::<ItemTemplate>::from_templates(&mut game, "wrench", &counter).unwrap();
    let saved = wrench.serialize();

    let renamed = ITEMS.replace("\"wrench\"", "\"spanner\"");
    let mut modded = crate::game(&[("items.json", renamed.as_str())]);
    let err = modded
        .resolve::<ItemTemplate>(&saved.template_id)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownTemplate { .. }));

    let spanner = modded.resolve::<ItemTemplate>("spanner").unwrap();
    let err = Instance::restore(spanner, &saved).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RehydrationMismatch { .. }));
}

#[test]
fn private_copies_leave_the_game_untouched() {
    let mut game = game(&[("items.json", ITEMS)]);
    let wrench =
        Instance::<ItemTemplate>::from_templates(&mut game, "wrench", &SerialCounter::new()).unwrap();
    let mut copy = wrench.copy_data().unwrap();
    copy.name = "rusty wrench".into();
    copy.max_charges = 0;

    assert_eq!(wrench.name, "wrench");
    assert_eq!(game.resolve::<ItemTemplate>("wrench").unwrap().max_charges, 80);
}
