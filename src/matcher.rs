//! Brand detection inside product titles.
//!
//! A brand is accepted when it occurs as a whole word and its priority class
//! allows the position it occurs at.

use crate::config::MatchingConfig;
use crate::model::{ConfigError, MatchError};
use crate::normalizer::TitleNormalizer;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::warn;

/// Word separator for positional rules. A title starting with whitespace
/// yields an empty first word.
static WORD_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityClass {
    /// Never accepted.
    Ignored,
    FrontOnly,
    FrontOrSecond,
    Unrestricted,
}

/// A title prepared once and matched against many brands.
#[derive(Debug, Clone)]
pub struct TitleView<'a> {
    raw: &'a str,
    normalized: String,
    words: Vec<String>,
}

impl<'a> TitleView<'a> {
    pub fn raw(&self) -> &str {
        self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn first_word(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }

    fn word_at(&self, i: usize) -> Option<&str> {
        self.words.get(i).map(String::as_str)
    }
}

/// Compiled whole-word pattern for one brand name.
#[derive(Debug, Clone)]
pub struct BrandPattern {
    brand: String,
    lower: String,
    class: PriorityClass,
    case_sensitive: bool,
    regex: Regex,
}

impl BrandPattern {
    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn class(&self) -> PriorityClass {
        self.class
    }

    pub fn is_present(&self, title: &TitleView<'_>) -> bool {
        if self.case_sensitive {
            self.regex.is_match(title.raw)
        } else {
            self.regex.is_match(&title.normalized)
        }
    }

    pub fn is_position_valid(&self, title: &TitleView<'_>) -> bool {
        let at = |i| title.word_at(i) == Some(self.lower.as_str());
        match self.class {
            PriorityClass::Ignored => false,
            PriorityClass::FrontOnly => at(0),
            PriorityClass::FrontOrSecond => at(0) || at(1),
            PriorityClass::Unrestricted => true,
        }
    }

    pub fn matches(&self, title: &TitleView<'_>) -> bool {
        self.is_present(title) && self.is_position_valid(title)
    }
}

#[derive(Debug, Clone)]
pub struct BrandMatcher {
    normalizer: TitleNormalizer,
    front_only: HashSet<String>,
    front_or_second: HashSet<String>,
    ignored: HashSet<String>,
    case_sensitive: HashSet<String>,
}

impl BrandMatcher {
    pub fn new(config: &MatchingConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            normalizer: TitleNormalizer::new(&config.diacritic)?,
            front_only: lowercase_set(&config.front_only),
            front_or_second: lowercase_set(&config.front_or_second),
            ignored: lowercase_set(&config.ignored),
            case_sensitive: lowercase_set(&config.case_sensitive),
        })
    }

    pub fn classify(&self, brand: &str) -> PriorityClass {
        let brand = brand.to_lowercase();
        if self.ignored.contains(&brand) {
            PriorityClass::Ignored
        } else if self.front_only.contains(&brand) {
            PriorityClass::FrontOnly
        } else if self.front_or_second.contains(&brand) {
            PriorityClass::FrontOrSecond
        } else {
            PriorityClass::Unrestricted
        }
    }

    pub fn is_case_sensitive(&self, brand: &str) -> bool {
        self.case_sensitive.contains(&brand.to_lowercase())
    }

    pub fn view<'a>(&self, title: &'a str) -> TitleView<'a> {
        let normalized = self.normalizer.normalize(title);
        let words = WORD_SEPARATOR
            .split(&normalized)
            .map(str::to_string)
            .collect();
        TitleView {
            raw: title,
            normalized,
            words,
        }
    }

    pub fn compile(&self, brand: &str) -> Result<BrandPattern, MatchError> {
        let lower = brand.to_lowercase();
        let case_sensitive = self.case_sensitive.contains(&lower);
        let regex = if case_sensitive {
            Regex::new(&whole_word(&brand.to_uppercase()))?
        } else {
            RegexBuilder::new(&whole_word(&lower))
                .case_insensitive(true)
                .build()?
        };

        Ok(BrandPattern {
            brand: brand.to_string(),
            class: self.classify(&lower),
            lower,
            case_sensitive,
            regex,
        })
    }

    pub fn is_brand_present(&self, title: &str, brand: &str) -> bool {
        self.compiled(brand)
            .is_some_and(|p| p.is_present(&self.view(title)))
    }

    pub fn is_position_valid(&self, title: &str, brand: &str) -> bool {
        self.compiled(brand)
            .is_some_and(|p| p.is_position_valid(&self.view(title)))
    }

    /// Whole-word presence plus positional rules; the one predicate the rest
    /// of the engine matches brands with.
    pub fn is_separate_term_match(&self, title: &str, brand: &str) -> bool {
        self.compiled(brand)
            .is_some_and(|p| p.matches(&self.view(title)))
    }

    /// Moves matches that equal the title's first word to the front, keeping
    /// the relative order otherwise.
    pub fn prioritize(&self, title: &str, mut matches: Vec<String>) -> Vec<String> {
        if matches.len() <= 1 {
            return matches;
        }
        let view = self.view(title);
        prioritize_view(&view, &mut matches);
        matches
    }

    fn compiled(&self, brand: &str) -> Option<BrandPattern> {
        match self.compile(brand) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("Skipping brand {:?}: {}", brand, e);
                None
            }
        }
    }
}

pub(crate) fn prioritize_view(view: &TitleView<'_>, matches: &mut [String]) {
    if let Some(first) = view.first_word() {
        matches.sort_by_key(|m| m.to_lowercase() != first);
    }
}

fn whole_word(text: &str) -> String {
    format!(r"\b{}\b", regex::escape(text))
}

fn lowercase_set(names: &[String]) -> HashSet<String> {
    names.iter().map(|n| n.trim().to_lowercase()).collect()
}
