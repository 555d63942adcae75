use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys every config file is expected to carry, with the value written when
/// one is missing.
fn expected_fields() -> AppResult<Mapping> {
    let defaults = serde_yaml::to_value(super::Config::default())?;
    Ok(match defaults {
        Value::Mapping(map) => map,
        _ => Mapping::new(),
    })
}

/// Names of the expected keys absent from the YAML text.
pub fn missing_fields(content: &str) -> AppResult<Vec<String>> {
    let yaml: Value = if content.trim().is_empty() {
        Value::Mapping(Mapping::new())
    } else {
        serde_yaml::from_str(content)?
    };
    let present = yaml.as_mapping().cloned().unwrap_or_default();

    Ok(expected_fields()?
        .keys()
        .filter(|k| !present.contains_key(*k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Add every missing key to the config file with its default value.
/// Returns the names that were added; the file is rewritten only if the
/// list is non-empty.
pub fn fill_missing_fields(path: &Path) -> AppResult<Vec<String>> {
    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let missing = missing_fields(&content)?;
    if missing.is_empty() {
        info("Config file is complete.");
        return Ok(missing);
    }

    let mut yaml: Value = if content.trim().is_empty() {
        Value::Mapping(Mapping::new())
    } else {
        serde_yaml::from_str(&content)?
    };
    let expected = expected_fields()?;

    if let Some(map) = yaml.as_mapping_mut() {
        for name in &missing {
            let key = Value::String(name.clone());
            if let Some(default) = expected.get(&key) {
                map.insert(key, default.clone());
            }
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_yaml::to_string(&yaml)?)?;
    success(format!("Added missing config fields: {}", missing.join(", ")));
    Ok(missing)
}
