use mf_project::schema::*;
use mf_project::{
    ProjectError, ScenarioValidationError, demo_scenario, from_json_str, from_yaml_str, load_json,
    load_yaml, save_json, save_yaml, validate_scenario,
};

#[test]
fn roundtrip_yaml_empty_scenario() {
    let file = ScenarioFile {
        version: 1,
        name: "Empty".to_string(),
        containers: vec![],
        edges: vec![],
        run: None,
    };

    validate_scenario(&file).unwrap();

    let path = std::env::temp_dir().join("mf_project_roundtrip_empty.yaml");
    save_yaml(&path, &file).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(file, loaded);
}

#[test]
fn roundtrip_yaml_demo() {
    let file = demo_scenario();
    let path = std::env::temp_dir().join("mf_project_roundtrip_demo.yaml");
    save_yaml(&path, &file).unwrap();
    assert_eq!(load_yaml(&path).unwrap(), file);
}

#[test]
fn roundtrip_json_demo() {
    let file = demo_scenario();
    let path = std::env::temp_dir().join("mf_project_roundtrip_demo.json");
    save_json(&path, &file).unwrap();
    assert_eq!(load_json(&path).unwrap(), file);
}

#[test]
fn sections_default_to_empty() {
    let file = from_yaml_str("version: 1\nname: Bare\n").unwrap();
    assert!(file.containers.is_empty());
    assert!(file.edges.is_empty());
    assert!(file.run.is_none());
}

#[test]
fn invalid_file_is_refused_on_save() {
    let mut file = demo_scenario();
    file.edges[0].percent = -0.1;
    let path = std::env::temp_dir().join("mf_project_refused.yaml");
    assert!(matches!(
        save_yaml(&path, &file),
        Err(ProjectError::Validation(
            ScenarioValidationError::InvalidValue { .. }
        ))
    ));
}

#[test]
fn malformed_json_reports_parse_error() {
    assert!(matches!(
        from_json_str("{\"version\": 1"),
        Err(ProjectError::Json(_))
    ));
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("mf_project_does_not_exist.yaml");
    assert!(matches!(load_yaml(&path), Err(ProjectError::Io(_))));
}
