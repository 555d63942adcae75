use crate::core::feed::DEFAULT_FEED_WINDOW;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// How many of the most recent workouts (all users) the feed scans.
    #[serde(default = "default_feed_window")]
    pub feed_window: usize,
    /// Milliseconds per elapsed second of the workout clock.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
    /// bcrypt cost used for new passwords.
    #[serde(default = "default_password_cost")]
    pub password_cost: u32,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_feed_window() -> usize {
    DEFAULT_FEED_WINDOW
}
fn default_tick_millis() -> u64 {
    1000
}
fn default_password_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            feed_window: default_feed_window(),
            tick_millis: default_tick_millis(),
            password_cost: default_password_cost(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("repmax")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".repmax")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("repmax.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("repmax.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// Missing keys take their defaults.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn tick(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_millis.max(1))
    }

    /// Initialize configuration and database location.
    ///
    /// `custom_db` may be absolute or relative to the config directory. In
    /// test mode the config file is left alone.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}
