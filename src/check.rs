//! Evaluate BGP session services
//!
//! States:
//! - established: OK, unless the session hasn't been up for the configured minimum uptime
//! - idle: CRIT (session down)
//! - anything else: WARN (Connect, Active, OpenSent, ... are transitional)

use log::{debug, log_enabled, Level};

use crate::config::{CheckParams, UptimeLevels};
use crate::discovery::PARSE_ERRORS_ITEM;
use crate::models::{
    CheckResult, Metric, Outcome, ParsedSection, SessionFields, SessionState, State,
};

/// Session uptime in seconds (historically named `uptime`)
pub const UPTIME_METRIC: &str = "oposs_bgp_mon_uptime";
/// Parse errors listed in the details of the parse errors service
pub const MAX_ERROR_NOTICES: usize = 5;

const NOT_AVAILABLE: &str = "n/a";

/// Results and metrics for one service item
pub fn evaluate(item: &str, params: &CheckParams, section: &ParsedSection) -> Vec<Outcome> {
    if item == PARSE_ERRORS_ITEM {
        return check_parse_errors(section);
    }

    let fields = match section.get(item) {
        Some(fields) => fields,
        None => {
            return vec![CheckResult::summary(
                State::Unknown,
                format!("Session {} not found in agent output", item),
            )
            .into()];
        }
    };
    if log_enabled!(Level::Debug) {
        debug!("Check {}: {:#?}", item, fields);
    }

    let mut outcomes: Vec<Outcome> = fields
        .info_fields()
        .iter()
        .map(|(key, value)| {
            CheckResult::summary(
                State::Ok,
                format!("{}: {}", key, value.unwrap_or(NOT_AVAILABLE)),
            )
            .into()
        })
        .collect();

    if let Some(uptime) = fields.uptime {
        outcomes.push(Metric::new(UPTIME_METRIC, uptime).into());
    }
    outcomes.push(check_state(fields, params).into());
    outcomes
}

fn check_parse_errors(section: &ParsedSection) -> Vec<Outcome> {
    let errors = section.errors();
    if errors.is_empty() {
        return vec![CheckResult::summary(State::Ok, "No parsing errors").into()];
    }
    let summary = CheckResult::summary(
        State::Warn,
        format!("Failed to parse {} BGP session(s)", errors.len()),
    );
    std::iter::once(summary)
        .chain(
            errors
                .iter()
                .take(MAX_ERROR_NOTICES)
                .map(|error| CheckResult::notice(State::Ok, error.as_str())),
        )
        .map(Outcome::from)
        .collect()
}

fn check_state(fields: &SessionFields, params: &CheckParams) -> CheckResult {
    match fields.session_state() {
        SessionState::Established => {
            let breach = match (params.min_uptime, fields.uptime) {
                (Some(levels), Some(uptime)) => check_min_uptime(&levels, uptime),
                _ => None,
            };
            breach.unwrap_or_else(|| CheckResult::summary(State::Ok, "state: established"))
        }
        SessionState::Idle => CheckResult::summary(State::Crit, state_summary(fields)),
        SessionState::Other => CheckResult::summary(State::Warn, state_summary(fields)),
    }
}

fn state_summary(fields: &SessionFields) -> String {
    format!("state: {}", fields.state.as_deref().unwrap_or(NOT_AVAILABLE))
}

/// Hold a freshly (re-)established session in WARN/CRIT until it has been up long enough.
/// CRIT is checked first, the two levels never stack.
fn check_min_uptime(levels: &UptimeLevels, uptime: f64) -> Option<CheckResult> {
    let breach = |state: State, threshold: f64, label: &str| {
        CheckResult::summary(
            state,
            format!(
                "state: established (uptime {:.0}s < {:.0}s {} threshold)",
                uptime, threshold, label
            ),
        )
    };
    match (levels.warn, levels.crit) {
        (_, Some(crit)) if uptime < crit => Some(breach(State::Crit, crit, "critical")),
        (Some(warn), _) if uptime < warn => Some(breach(State::Warn, warn, "warning")),
        _ => None,
    }
}
