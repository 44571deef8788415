use outreach_model::GlobalStyles;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "outreach.config.json";

/// Outreach configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory for rendered output when `--out` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,

    /// Pretty print rendered HTML
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Global styles for new templates
    #[serde(default)]
    pub global: GlobalStyles,

    /// Add `label -> url` lines for buttons in the text view
    #[serde(default)]
    pub include_button_links: bool,
}

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Absolute output directory, if configured
    pub fn get_out_dir(&self, cwd: &str) -> Option<PathBuf> {
        self.out_dir.as_ref().map(|dir| Path::new(cwd).join(dir))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: None,
            pretty: default_pretty(),
            global: GlobalStyles::default(),
            include_button_links: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r##"{
            "outDir": "dist",
            "pretty": false,
            "global": { "background": "#ffffff", "font": "Georgia", "padding": 8 },
            "includeButtonLinks": true
        }"##;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.out_dir, Some("dist".to_string()));
        assert!(!config.pretty);
        assert_eq!(config.global.font, "Georgia");
        assert_eq!(config.global.padding, 8);
        assert!(config.include_button_links);
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.out_dir.is_none());
        assert!(config.pretty);
        assert_eq!(config.global, GlobalStyles::default());
        assert!(!config.include_button_links);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();

        assert!(config.pretty);
        assert!(config.get_out_dir("/tmp").is_none());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "outDir": "build" }"#).unwrap();

        let cwd = dir.path().display().to_string();
        let config = Config::load(&cwd).unwrap();

        assert_eq!(config.get_out_dir(&cwd), Some(dir.path().join("build")));
    }
}
