use crate::config::DiacriticRule;
use crate::model::ConfigError;
use regex::{NoExpand, Regex, RegexBuilder};

/// Rewrites titles into the form brand names are matched against:
/// the configured diacritic variant is replaced, then everything is lowercased.
#[derive(Debug, Clone)]
pub struct TitleNormalizer {
    /// `None` when the rule is blank and titles are only lowercased.
    variant: Option<Regex>,
    plain: String,
}

impl TitleNormalizer {
    pub fn new(rule: &DiacriticRule) -> Result<Self, ConfigError> {
        let variant = if rule.variant.is_empty() {
            None
        } else {
            Some(
                RegexBuilder::new(&regex::escape(&rule.variant))
                    .case_insensitive(true)
                    .build()?,
            )
        };
        Ok(Self {
            variant,
            plain: rule.plain.clone(),
        })
    }

    pub fn normalize(&self, title: &str) -> String {
        match &self.variant {
            Some(variant) => variant
                .replace_all(title, NoExpand(&self.plain))
                .to_lowercase(),
            None => title.to_lowercase(),
        }
    }
}
