//! mf-project: scenario file format and validation.

pub mod demo;
pub mod schema;
pub mod validate;

pub use demo::demo_scenario;
pub use schema::*;
pub use validate::{LATEST_VERSION, ScenarioValidationError, validate_scenario};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ScenarioValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<ScenarioFile> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn from_yaml_str(content: &str) -> ProjectResult<ScenarioFile> {
    let file: ScenarioFile = serde_yaml::from_str(content)?;
    validate_scenario(&file)?;
    Ok(file)
}

pub fn save_yaml(path: &std::path::Path, file: &ScenarioFile) -> ProjectResult<()> {
    validate_scenario(file)?;
    let content = serde_yaml::to_string(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<ScenarioFile> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

pub fn from_json_str(content: &str) -> ProjectResult<ScenarioFile> {
    let file: ScenarioFile = serde_json::from_str(content)?;
    validate_scenario(&file)?;
    Ok(file)
}

pub fn save_json(path: &std::path::Path, file: &ScenarioFile) -> ProjectResult<()> {
    validate_scenario(file)?;
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}
