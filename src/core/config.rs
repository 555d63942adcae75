use crate::config::Config;
use crate::config::migrate::{fill_missing_fields, missing_fields};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &Path) -> AppResult<()> {
        if !path.exists() {
            info(format!(
                "No config file at {}; built-in defaults are in use:",
                path.display()
            ));
            println!("{}", serde_yaml::to_string(&Config::default())?);
            return Ok(());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        println!("{}", content);
        Ok(())
    }

    /// Report missing keys and write their defaults into the file.
    pub fn check(path: &Path) -> AppResult<()> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let missing = missing_fields(&content)?;
            if !missing.is_empty() {
                warning(format!("Missing config fields: {}", missing.join(", ")));
            }
        }
        fill_missing_fields(path)?;
        Ok(())
    }

    pub fn edit(path: &Path, editor: &Option<String>) -> AppResult<()> {
        let ed = editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".into()
                } else {
                    "nano".into()
                }
            });

        let status = Command::new(&ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(format!("cannot start editor '{ed}': {e}")))?;

        if !status.success() {
            return Err(AppError::Config(format!("editor '{ed}' exited with {status}")));
        }
        Ok(())
    }
}
