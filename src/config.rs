//! Run configuration: which master categories to aggregate by and how record
//! files are named.
//!
//! The defaults reproduce the branch/commodity layout. A YAML file may replace
//! them, e.g.
//!
//! ```yaml
//! record_extension: rcd
//! categories:
//!   - name: branch
//!     pattern: "[0-9]{3}"
//!     definition_file: branch.lst
//!     output_file: branch.out
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;
use tracing::info;

pub const DEFAULT_RECORD_EXTENSION: &str = "rcd";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MasterCategory {
    /// Label used in user-facing messages, e.g. "branch".
    pub name: String,
    /// Pattern a code must match in full.
    pub pattern: String,
    pub definition_file: String,
    pub output_file: String,
}

impl MasterCategory {
    pub fn new(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_owned(),
            pattern: pattern.to_owned(),
            definition_file: format!("{name}.lst"),
            output_file: format!("{name}.out"),
        }
    }

    pub fn branch() -> Self {
        Self::new("branch", "[0-9]{3}")
    }

    pub fn commodity() -> Self {
        Self::new("commodity", "[A-Za-z0-9]{8}")
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub record_extension: String,
    /// Order matters: record files list one code per category in this order.
    pub categories: Vec<MasterCategory>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            record_extension: DEFAULT_RECORD_EXTENSION.to_owned(),
            categories: vec![MasterCategory::branch(), MasterCategory::commodity()],
        }
    }
}

/// A category whose code pattern has been compiled and anchored.
#[derive(Debug, Clone)]
pub struct CompiledCategory {
    pub category: MasterCategory,
    pub code_pattern: Regex,
}

impl RunConfig {
    /// Reads a YAML layout file. Keys that are left out keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(config_path = ?path, "Loading run configuration");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RunConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Checks the layout and compiles every category's code pattern.
    pub fn compile(&self) -> Result<Vec<CompiledCategory>> {
        if self.categories.is_empty() {
            bail!("configuration names no categories");
        }
        if self.record_extension.is_empty() {
            bail!("record extension must not be empty");
        }
        self.categories
            .iter()
            .map(|category| {
                let code_pattern = Regex::new(&format!("^(?:{})$", category.pattern))
                    .with_context(|| {
                        format!("invalid code pattern for category {}", category.name)
                    })?;
                Ok(CompiledCategory {
                    category: category.clone(),
                    code_pattern,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_layout_is_branch_then_commodity() {
        let config = RunConfig::default();
        assert_eq!(config.record_extension, "rcd");
        let names: Vec<_> = config.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["branch", "commodity"]);
        assert_eq!(config.categories[0].definition_file, "branch.lst");
        assert_eq!(config.categories[1].output_file, "commodity.out");
    }

    #[test]
    fn compiled_patterns_match_whole_code() {
        let compiled = RunConfig::default().compile().unwrap();
        let branch = &compiled[0].code_pattern;
        assert!(branch.is_match("001"));
        assert!(!branch.is_match("0011"));
        assert!(!branch.is_match("01"));

        let commodity = &compiled[1].code_pattern;
        assert!(commodity.is_match("SFC0ODE1"));
        assert!(!commodity.is_match("XSFC0ODE1"));
        assert!(!commodity.is_match("SFC-ODE1"));
    }

    #[test]
    fn yaml_file_overrides_categories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.yaml");
        fs::write(
            &path,
            "categories:\n  - name: branch\n    pattern: \"[0-9]{3}\"\n    definition_file: branch.lst\n    output_file: branch.out\n",
        )
        .unwrap();

        let config = RunConfig::from_file(&path).unwrap();
        assert_eq!(config.record_extension, "rcd");
        assert_eq!(config.categories, vec![MasterCategory::branch()]);
    }

    #[test]
    fn rejects_empty_category_list_and_bad_pattern() {
        let empty = RunConfig {
            categories: vec![],
            ..RunConfig::default()
        };
        assert!(empty.compile().is_err());

        let bad = RunConfig {
            categories: vec![MasterCategory::new("branch", "[0-9")],
            ..RunConfig::default()
        };
        assert!(bad.compile().is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(RunConfig::from_file(dir.path().join("nope.yaml")).is_err());
    }
}
