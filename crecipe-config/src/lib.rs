use indexmap::IndexMap;
use log::warn;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

pub mod blacklist;
pub mod items;
pub mod logging;
pub mod messages;

pub use blacklist::{BlacklistConfig, BlacklistEntry, BlacklistItem, BlacklistSource};
pub use items::RecipeSettings;
pub use logging::LoggingConfig;
pub use messages::MessagesConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Couldn't read configuration file at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Couldn't parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything the crafting pipeline reads from its configuration file.
///
/// Missing sections fall back to their defaults, so an empty file is a valid configuration.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CraftingConfiguration {
    /// Traces every matching decision at `info` level.
    pub debug: bool,
    /// Prepended to blacklist bypass permissions.
    pub permission_prefix: String,
    pub blacklist: BlacklistConfig,
    pub messages: MessagesConfig,
    pub items: IndexMap<String, RecipeSettings>,
    pub logging: LoggingConfig,
}

impl Default for CraftingConfiguration {
    fn default() -> Self {
        Self {
            debug: false,
            permission_prefix: "crecipe.".to_string(),
            blacklist: BlacklistConfig::default(),
            messages: MessagesConfig::default(),
            items: IndexMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CraftingConfiguration {
    /// The overrides for `recipe`, or the defaults when the recipe has no section.
    pub fn recipe_settings(&self, recipe: &str) -> RecipeSettings {
        self.items.get(recipe).cloned().unwrap_or_default()
    }

    pub fn bypass_node(&self, permission: &str) -> String {
        format!("{}{}", self.permission_prefix, permission)
    }
}

pub trait LoadTomlConfiguration {
    /// Reads the configuration at `path`, writing the defaults there first if it does not exist.
    fn load(path: &Path) -> Result<Self, ConfigError>
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        let config = if path.exists() {
            let file_content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            toml::from_str(&file_content)?
        } else {
            let content = Self::default();

            match toml::to_string(&content) {
                Ok(serialized) => {
                    if let Err(err) = fs::write(path, serialized) {
                        warn!(
                            "Couldn't write default config to {:?}. Reason: {}",
                            path, err
                        );
                    }
                }
                Err(err) => warn!("Couldn't serialize default config. Reason: {}", err),
            }

            content
        };

        config.validate()?;
        Ok(config)
    }

    fn from_toml_str(content: &str) -> Result<Self, ConfigError>
    where
        Self: Sized + DeserializeOwned,
    {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError>;
}

impl LoadTomlConfiguration for CraftingConfiguration {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.permission_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "permission_prefix \"{}\" must not contain whitespace",
                self.permission_prefix
            )));
        }
        if let Some((name, _)) = self
            .items
            .iter()
            .find(|(_, settings)| settings.permission.as_deref().is_some_and(str::is_empty))
        {
            return Err(ConfigError::Invalid(format!(
                "items.{name}.permission is empty, remove it or set it to \"none\""
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
debug = true

[blacklist]
enabled = true

[blacklist.vanilla."diamond_sword"]
permission = "bypass.sword"

[blacklist.vanilla."stone:3"]

[blacklist.custom.excalibur]
permission = "none"
message = "&4Nope"

[messages]
no_permission = "&cNo!"

[items.stick_sword]
permission = "crecipe.stick_sword"
shapeless = true

[items.disabled_thing]
enabled = false

[logging]
level = "Debug"
"#;

    #[test]
    fn parses_full_config() {
        let config = CraftingConfiguration::from_toml_str(SAMPLE).unwrap();
        assert!(config.debug);
        assert_eq!(config.permission_prefix, "crecipe.");
        assert!(config.blacklist.enabled);
        assert_eq!(config.blacklist.len(), 3);

        let entries: Vec<_> = config.blacklist.entries().collect();
        assert_eq!(entries[0].id, "diamond_sword");
        assert_eq!(entries[0].source, BlacklistSource::Vanilla);
        assert_eq!(entries[0].entry.bypass_permission(), Some("bypass.sword"));
        assert_eq!(entries[1].id, "stone:3");
        assert_eq!(entries[1].entry.bypass_permission(), None);
        assert_eq!(entries[2].source, BlacklistSource::Custom);
        assert_eq!(entries[2].entry.bypass_permission(), None);
        assert_eq!(entries[2].entry.message.as_deref(), Some("&4Nope"));

        assert_eq!(config.messages.no_permission(), "§cNo!");
        assert_eq!(
            config.messages.disabled_world,
            MessagesConfig::default().disabled_world
        );
        assert_eq!(config.logging.level, logging::LevelFilter::Debug);
        assert!(config.logging.enabled);
    }

    #[test]
    fn recipe_settings_default_when_missing() {
        let config = CraftingConfiguration::from_toml_str(SAMPLE).unwrap();
        let sword = config.recipe_settings("stick_sword");
        assert!(sword.enabled);
        assert_eq!(sword.permission(), Some("crecipe.stick_sword"));
        assert_eq!(sword.shapeless, Some(true));
        assert!(!sword.ignore_data);

        assert!(!config.recipe_settings("disabled_thing").enabled);
        assert_eq!(
            config.recipe_settings("unknown"),
            RecipeSettings::default()
        );
    }

    #[test]
    fn empty_config_is_default() {
        let config = CraftingConfiguration::from_toml_str("").unwrap();
        assert_eq!(config, CraftingConfiguration::default());
        assert_eq!(config.bypass_node("x"), "crecipe.x");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            CraftingConfiguration::from_toml_str("permission_prefix = \"a b\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CraftingConfiguration::from_toml_str("[items.x]\npermission = \"\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CraftingConfiguration::from_toml_str("debug = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_writes_defaults_for_missing_file() {
        let path = std::env::temp_dir().join(format!(
            "crecipe-config-test-{}.toml",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let config = CraftingConfiguration::load(&path).unwrap();
        assert_eq!(config, CraftingConfiguration::default());
        assert!(path.exists());

        let reloaded = CraftingConfiguration::load(&path).unwrap();
        assert_eq!(reloaded, config);
        let _ = fs::remove_file(&path);
    }
}
