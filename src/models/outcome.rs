use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Monitoring state of a check result
///
/// Ordered by severity as the monitoring host ranks them: OK < WARN < UNKNOWN < CRIT
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum State {
    Ok,
    Warn,
    Unknown,
    Crit,
}

impl State {
    /// Plugin exit code (0 OK, 1 WARN, 2 CRIT, 3 UNKNOWN)
    pub fn code(&self) -> i32 {
        match self {
            State::Ok => 0,
            State::Warn => 1,
            State::Crit => 2,
            State::Unknown => 3,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        State::Ok
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let word = match self {
            State::Ok => "OK",
            State::Warn => "WARN",
            State::Crit => "CRIT",
            State::Unknown => "UNKNOWN",
        };
        write!(f, "{}", word)
    }
}

impl FromStr for State {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OK" | "0" => Ok(State::Ok),
            "WARN" | "WARNING" | "1" => Ok(State::Warn),
            "CRIT" | "CRITICAL" | "2" => Ok(State::Crit),
            "UNKNOWN" | "3" => Ok(State::Unknown),
            _ => Err(format!("Unsupported State: '{}'", s)),
        }
    }
}

/// Leveled result of a check. Text is either a summary (service output line)
/// or a notice (long output only).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CheckResult {
    pub state: State,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl CheckResult {
    pub fn summary<S: Into<String>>(state: State, text: S) -> Self {
        CheckResult {
            state,
            summary: Some(text.into()),
            notice: None,
        }
    }

    pub fn notice<S: Into<String>>(state: State, text: S) -> Self {
        CheckResult {
            state,
            summary: None,
            notice: Some(text.into()),
        }
    }

    pub fn text(&self) -> &str {
        self.summary
            .as_deref()
            .or_else(|| self.notice.as_deref())
            .unwrap_or("")
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: f64,
}

impl Metric {
    pub fn new<S: Into<String>>(name: S, value: f64) -> Self {
        Metric {
            name: name.into(),
            value,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outcome {
    Result(CheckResult),
    Metric(Metric),
}

impl Outcome {
    pub fn as_result(&self) -> Option<&CheckResult> {
        match self {
            Outcome::Result(result) => Some(result),
            Outcome::Metric(_) => None,
        }
    }

    pub fn as_metric(&self) -> Option<&Metric> {
        match self {
            Outcome::Metric(metric) => Some(metric),
            Outcome::Result(_) => None,
        }
    }
}

impl From<CheckResult> for Outcome {
    fn from(result: CheckResult) -> Self {
        Outcome::Result(result)
    }
}

impl From<Metric> for Outcome {
    fn from(metric: Metric) -> Self {
        Outcome::Metric(metric)
    }
}

/// Service state for a list of outcomes (OK if there are no results)
pub fn worst_state(outcomes: &[Outcome]) -> State {
    outcomes
        .iter()
        .filter_map(Outcome::as_result)
        .map(|r| r.state)
        .max()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_ordering() {
        assert!(State::Ok < State::Warn);
        assert!(State::Warn < State::Unknown);
        assert!(State::Unknown < State::Crit);
        assert_eq!(State::Unknown.code(), 3);
        assert_eq!(State::Crit.code(), 2);
    }

    #[test]
    fn test_state_from_str() {
        assert_eq!("warning".parse::<State>(), Ok(State::Warn));
        assert_eq!("CRIT".parse::<State>(), Ok(State::Crit));
        assert!("down".parse::<State>().is_err());
    }

    #[test]
    fn test_worst_state() {
        assert_eq!(worst_state(&[]), State::Ok);
        let outcomes = vec![
            CheckResult::summary(State::Ok, "a").into(),
            Metric::new("oposs_bgp_mon_uptime", 10.0).into(),
            CheckResult::summary(State::Unknown, "b").into(),
            CheckResult::notice(State::Warn, "c").into(),
        ];
        assert_eq!(worst_state(&outcomes), State::Unknown);
    }

    #[test]
    fn test_outcome_json() {
        let outcome: Outcome = CheckResult::notice(State::Ok, "details").into();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "result", "state": "OK", "notice": "details"})
        );
        let metric: Outcome = Metric::new("oposs_bgp_mon_uptime", 42.0).into();
        assert_eq!(
            serde_json::to_value(&metric).unwrap(),
            serde_json::json!({"type": "metric", "name": "oposs_bgp_mon_uptime", "value": 42.0})
        );
    }
}
