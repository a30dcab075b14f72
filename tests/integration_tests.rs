//! Integration tests for the template editor

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use template_editor::store::{Field, HISTORY_LIMIT, TEMPLATE_KEY};
use template_editor::{
    parse, render, variable_names, EditorConfig, FieldStore, StoreError, TemplateEditor,
};

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_documented_substitutions() {
    let grohl = vars(&[("NAME", "Davey Grohley")]);
    assert_eq!(render("{NAME[0]} {NAME[1]}", &grohl), "Davey Grohley");
    assert_eq!(render("{NAME[2]}", &grohl), "Davey Grohley");

    let madonna = vars(&[("NAME", "Madonna")]);
    assert_eq!(render("{NAME[0]}", &madonna), "Madonna");
}

#[test]
fn test_parse_stops_at_hyphen() {
    let names = variable_names("{USER_NAME} and {bad-token} and {OK_2}");
    assert_eq!(names, vec!["USER_NAME", "OK_2"]);
}

#[test]
fn test_default_template_renders_with_default_fields() {
    let mut editor = TemplateEditor::new(FieldStore::in_memory(), EditorConfig::new());
    editor.start().expect("Should start");

    let html = editor.rendered();
    assert!(html.contains("<h1 style=\"color: #14986cff\">Hello George Costanza</h1>"));
    assert!(html.contains("All your base are belong to..."));
    // No field supplies the background color
    assert!(html.contains("background: {BACKGROUND_COLOR};"));

    let remaining: Vec<_> = parse(html).into_iter().map(|r| r.name).collect();
    assert_eq!(remaining, vec!["BACKGROUND_COLOR"]);
}

#[test]
fn test_eleven_saves_keep_ten_prior_states() {
    let store = FieldStore::in_memory();
    let snapshot = |n: usize| vec![Field::new("Step", "STEP").with_value(n.to_string())];
    for n in 0..11 {
        store.save_layout(snapshot(n)).unwrap();
    }

    let layout = store.layout().unwrap().unwrap();
    assert_eq!(layout.history.len(), HISTORY_LIMIT);
    // The empty pre-first-save state was evicted first
    let history: Vec<_> = layout.history.iter().cloned().collect();
    let expected: Vec<_> = (0..10).map(snapshot).collect();
    assert_eq!(history, expected);
}

#[test]
fn test_update_missing_field_is_noop() {
    let store = FieldStore::in_memory();
    assert!(matches!(
        store.update_field(Field::new("A", "A")),
        Err(StoreError::LayoutNotFound)
    ));

    store.save_layout(vec![Field::new("Name", "NAME")]).unwrap();
    let before = store.layout().unwrap();
    assert!(!store.update_field(Field::new("Other", "OTHER")).unwrap());
    assert_eq!(store.layout().unwrap(), before);
}

#[test]
fn test_session_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let config = EditorConfig::new()
        .with_store_path(&path)
        .with_default_template("{NAME[1]}, {OWNER}");

    {
        let store = FieldStore::open(&config.store_path).unwrap();
        let mut editor = TemplateEditor::new(store, config.clone());
        editor.start().unwrap();
        editor.set_input_value("OWNER", "us").unwrap();
        editor.move_field(2, 0).unwrap();
        editor.set_template("{OWNER}: {NAME[0]}").unwrap();
    }

    let store = FieldStore::open(&config.store_path).unwrap();
    assert_eq!(store.get(TEMPLATE_KEY).unwrap(), "{OWNER}: {NAME[0]}");
    let order: Vec<_> = store
        .get_all()
        .unwrap()
        .into_iter()
        .map(|f| f.bind_to_variable)
        .collect();
    assert_eq!(order, vec!["OWNER", "NAME", "MESSAGE"]);

    let mut editor = TemplateEditor::new(store, config);
    editor.start().unwrap();
    assert_eq!(editor.rendered(), "us: George");

    editor.undo().unwrap().expect("Should have history");
    let first: Vec<_> = editor
        .form()
        .fields()
        .iter()
        .map(|f| f.bind_to_variable.as_str())
        .collect();
    assert_eq!(first, vec!["NAME", "MESSAGE", "OWNER"]);
}

#[test]
fn test_store_file_uses_documented_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FieldStore::open(&path).unwrap();
    store
        .save_layout(vec![Field::new("Name", "NAME").with_value("x")])
        .unwrap();
    store.put(TEMPLATE_KEY, "{NAME}").unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["template"], "{NAME}");
    assert_eq!(raw["layout"]["fields"][0]["bind_to_variable"], "NAME");
    assert_eq!(raw["layout"]["history"], serde_json::json!([[]]));
}
