//! Rules file loading and change detection.
//!
//! ```toml
//! [[rules]]
//! match = "model"
//! value = "TaylorMade M6"
//! resale = { fixed = 150 }
//!
//! [[rules]]
//! match = "default"
//! resale = { multiplier = 1.5 }
//!
//! [vocabulary]
//! brands = ["Callaway", "Ping"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::Mutex;
use serde::Deserialize;

use crate::application::normalize::Vocabulary;
use crate::application::rules::{RiskPolicy, RuleBook, RuleEngine, RuleSource};
use crate::domain::rule::{Rule, RuleSet};
use crate::error::{ConfigError, Result};

#[derive(Debug, Deserialize)]
struct RulesDocument {
    #[serde(default)]
    rules: Vec<Rule>,
    #[serde(default)]
    vocabulary: VocabularyConfig,
}

/// Extra extraction terms beyond those named by rules.
#[derive(Debug, Default, Deserialize)]
struct VocabularyConfig {
    #[serde(default)]
    brands: Vec<String>,
    #[serde(default)]
    models: Vec<String>,
}

/// Parse rules TOML into a rule book.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or the rules violate a
/// [`RuleSet`] invariant.
pub fn parse_rules(content: &str, risk: RiskPolicy) -> Result<RuleBook> {
    let document: RulesDocument = toml::from_str(content).map_err(ConfigError::Parse)?;
    let rules = RuleSet::new(document.rules)?;
    let vocabulary = Vocabulary::new(document.vocabulary.brands, document.vocabulary.models);
    Ok(RuleBook::new(RuleEngine::new(rules, risk), vocabulary))
}

/// Read and parse a rules file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn load_rules<P: AsRef<Path>>(path: P, risk: RiskPolicy) -> Result<RuleBook> {
    let content = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
    parse_rules(&content, risk)
}

/// File identity used to detect edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    modified: SystemTime,
    len: u64,
}

fn stamp(path: &Path) -> Result<Stamp> {
    let meta = fs::metadata(path)?;
    Ok(Stamp {
        modified: meta.modified()?,
        len: meta.len(),
    })
}

/// Rules file on disk, reloaded when its modification time or size changes.
#[derive(Debug)]
pub struct RuleFile {
    path: PathBuf,
    risk: RiskPolicy,
    seen: Mutex<Option<Stamp>>,
}

impl RuleFile {
    /// Load the file once and start watching it.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial load fails.
    pub fn open(path: impl Into<PathBuf>, risk: RiskPolicy) -> Result<(Self, RuleBook)> {
        let path = path.into();
        let seen = stamp(&path)?;
        let book = load_rules(&path, risk)?;
        let file = Self {
            path,
            risk,
            seen: Mutex::new(Some(seen)),
        };
        Ok((file, book))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleSource for RuleFile {
    fn reload_if_changed(&self) -> Result<Option<RuleBook>> {
        let current = stamp(&self.path)?;
        {
            let mut seen = self.seen.lock();
            if *seen == Some(current) {
                return Ok(None);
            }
            // Recorded before parsing so a broken edit is reported once.
            *seen = Some(current);
        }
        load_rules(&self.path, self.risk).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rule::MatchKind;
    use crate::error::Error;

    const RULES: &str = r#"
[[rules]]
match = "default"
resale = { multiplier = 1.5 }

[[rules]]
match = "brand"
value = "TaylorMade"
resale = { multiplier = 1.8 }

[[rules]]
match = "model"
value = "TaylorMade M6"
resale = { fixed = 150 }

[vocabulary]
brands = ["Callaway"]
models = ["Rogue ST"]
"#;

    #[test]
    fn parse_rules_builds_engine_and_vocabulary() {
        let book = parse_rules(RULES, RiskPolicy::default()).unwrap();
        assert_eq!(book.engine.rules().len(), 3);
        assert_eq!(
            book.vocabulary.extract_brand("Callaway Rogue ST Max Driver"),
            Some("Callaway")
        );
        assert_eq!(
            book.vocabulary.extract_model("taylormade m6 driver"),
            Some("TaylorMade M6")
        );
        assert_eq!(
            book.engine.rules().resolve(Some("TaylorMade M6"), None).kind,
            MatchKind::Model
        );
    }

    #[test]
    fn exact_model_alias_is_accepted() {
        let content = r#"
[[rules]]
match = "default"
resale = { multiplier = 1.2 }

[[rules]]
match = "exact-model"
value = "Scotty Cameron Newport 2"
resale = { fixed = 220 }
"#;
        let book = parse_rules(content, RiskPolicy::default()).unwrap();
        assert_eq!(book.engine.rules().len(), 2);
    }

    #[test]
    fn missing_default_rule_is_a_domain_error() {
        let content = r#"
[[rules]]
match = "brand"
value = "Ping"
resale = { multiplier = 1.4 }
"#;
        let err = parse_rules(content, RiskPolicy::default()).unwrap_err();
        assert!(matches!(err, Error::Domain(_)));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = parse_rules("[[rules]\nmatch =", RiskPolicy::default()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn rule_file_reloads_only_after_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(&path, RULES).unwrap();

        let (file, book) = RuleFile::open(&path, RiskPolicy::default()).unwrap();
        assert_eq!(book.engine.rules().len(), 3);
        assert!(file.reload_if_changed().unwrap().is_none());

        fs::write(
            &path,
            "[[rules]]\nmatch = \"default\"\nresale = { multiplier = 2 }\n",
        )
        .unwrap();
        let reloaded = file.reload_if_changed().unwrap().unwrap();
        assert_eq!(reloaded.engine.rules().len(), 1);
        assert!(file.reload_if_changed().unwrap().is_none());
    }

    #[test]
    fn broken_edit_is_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(&path, RULES).unwrap();
        let (file, _) = RuleFile::open(&path, RiskPolicy::default()).unwrap();

        fs::write(&path, "not toml at all").unwrap();
        assert!(file.reload_if_changed().is_err());
        assert!(file.reload_if_changed().unwrap().is_none());
    }
}
