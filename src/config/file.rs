use std::fs;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Rule file (toml) representation of the check parameters
///
/// ```toml
/// min_uptime = [60.0, 0.0]
///
/// [[rules]]
/// item = "AS65001 10.0.0.1"
/// min_uptime = [300.0, 120.0]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct CheckConfigSpec {
    // (warn, crit) seconds an established session must be up, 0 disables a level
    pub(super) min_uptime: Option<(f64, f64)>,
    // Per-item overrides, first match wins
    #[serde(default = "Vec::new")]
    pub(super) rules: Vec<ItemRuleSpec>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct ItemRuleSpec {
    // Exact service item, E.g. "AS65001 10.0.0.1"
    pub(super) item: String,
    // Missing means no levels for this item
    pub(super) min_uptime: Option<(f64, f64)>,
}

impl CheckConfigSpec {
    pub(super) fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_str(&contents, path)
    }

    pub(super) fn from_str(contents: &str, path: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|source| Error::Config {
            path: path.to_string(),
            source,
        })
    }
}
