mod file;

use std::str::FromStr;

use log::debug;

use crate::error::{Error, Result};

/// Minimum uptime an established session must reach before it counts as healthy
///
/// A level of `None` disables that severity.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct UptimeLevels {
    pub warn: Option<f64>,
    pub crit: Option<f64>,
}

impl UptimeLevels {
    /// Build levels from a (warn, crit) pair in seconds; zero disables a level
    pub fn new(warn: f64, crit: f64) -> Self {
        let level = |seconds: f64| if seconds > 0.0 { Some(seconds) } else { None };
        UptimeLevels {
            warn: level(warn),
            crit: level(crit),
        }
    }
}

impl From<(f64, f64)> for UptimeLevels {
    fn from((warn, crit): (f64, f64)) -> Self {
        UptimeLevels::new(warn, crit)
    }
}

impl FromStr for UptimeLevels {
    type Err = Error;

    /// Parse "WARN,CRIT" (seconds), E.g. "300,60"
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || Error::InvalidLevels(s.to_string());
        let mut parts = s.splitn(2, ',');
        let mut next_level = || -> std::result::Result<f64, Error> {
            let level: f64 = parts
                .next()
                .ok_or_else(invalid)?
                .trim()
                .parse()
                .map_err(|_| invalid())?;
            if level.is_finite() && level >= 0.0 {
                Ok(level)
            } else {
                Err(invalid())
            }
        };
        let warn = next_level()?;
        let crit = next_level()?;
        Ok(UptimeLevels::new(warn, crit))
    }
}

/// Check parameters for one service item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckParams {
    pub min_uptime: Option<UptimeLevels>,
}

impl CheckParams {
    pub fn with_min_uptime(levels: UptimeLevels) -> Self {
        CheckParams {
            min_uptime: Some(levels),
        }
    }
}

#[derive(Debug, Clone)]
struct ItemRule {
    item: String,
    params: CheckParams,
}

/// In-memory rule set: default parameters plus per-item overrides
#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    default: CheckParams,
    rules: Vec<ItemRule>,
}

impl CheckConfig {
    /// Parse a TOML rule file
    pub fn from_file(path: &str) -> Result<Self> {
        let spec = file::CheckConfigSpec::from_file(path)?;
        let config = Self::from_spec(spec);
        debug!("Found {} item rules in {}", config.rules.len(), path);
        Ok(config)
    }

    /// Parse rules from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let spec = file::CheckConfigSpec::from_str(contents, "<string>")?;
        Ok(Self::from_spec(spec))
    }

    fn from_spec(spec: file::CheckConfigSpec) -> Self {
        let rules = spec
            .rules
            .into_iter()
            .map(|rule| ItemRule {
                item: rule.item,
                params: CheckParams {
                    min_uptime: rule.min_uptime.map(UptimeLevels::from),
                },
            })
            .collect();
        Self {
            default: CheckParams {
                min_uptime: spec.min_uptime.map(UptimeLevels::from),
            },
            rules,
        }
    }

    /// Replace the minimum uptime levels for every item
    pub fn override_min_uptime(&mut self, levels: UptimeLevels) {
        self.default.min_uptime = Some(levels);
        for rule in self.rules.iter_mut() {
            rule.params.min_uptime = Some(levels);
        }
    }

    /// Parameters for a service item: the first matching rule, else the defaults
    pub fn params_for(&self, item: &str) -> CheckParams {
        self.rules
            .iter()
            .find(|rule| rule.item == item)
            .map(|rule| rule.params.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}
