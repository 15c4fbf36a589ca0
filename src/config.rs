use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Literal substitution applied to titles before matching.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DiacriticRule {
    pub variant: String,
    pub plain: String,
}

impl Default for DiacriticRule {
    fn default() -> Self {
        Self {
            variant: "Babē".into(),
            plain: "Babe".into(),
        }
    }
}

/// Priority classes and normalization rule used by the brand matcher.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub front_only: Vec<String>,
    pub front_or_second: Vec<String>,
    pub ignored: Vec<String>,
    /// Brands accepted only when spelled in uppercase in the raw title.
    pub case_sensitive: Vec<String>,
    pub diacritic: DiacriticRule,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            front_only: to_strings(&[
                "rich", "rff", "flex", "ultra", "gum", "beauty", "orto", "free", "112", "kin",
                "happy",
            ]),
            front_or_second: to_strings(&["heel", "contour", "nero", "rsv"]),
            ignored: to_strings(&["bio", "neb"]),
            case_sensitive: to_strings(&["happy"]),
            diacritic: DiacriticRule::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    pub source: String,
    pub country: String,
    pub items_path: String,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub connections_path: String,
    pub database_path: String,
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub matching: MatchingConfig,
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = read_file(path.as_ref())?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub(crate) fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
