use itertools::Itertools;
use prettytable::{row, Cell, Row};
use serde::Serialize;

use crate::discovery::Service;
use crate::models::{worst_state, Outcome, SessionFields, State};
use crate::utils::{format_uptime, maybe_string};

use super::table::ToRow;

/// Marker the monitoring host appends to non-OK texts
fn state_marker(state: State) -> &'static str {
    match state {
        State::Ok => "",
        State::Warn => "(!)",
        State::Crit => "(!!)",
        State::Unknown => "(?)",
    }
}

fn state_cell(state: State) -> Cell {
    let style = match state {
        State::Ok => "Fg",
        State::Warn => "Fy",
        State::Crit => "Fr",
        State::Unknown => "Fm",
    };
    Cell::new(&state.to_string()).style_spec(style)
}

/// Result texts carry agent values; `|` would start the perfdata and a newline a new
/// long output line
fn plugin_text(text: &str) -> String {
    text.replace('|', "/").replace(&['\r', '\n'][..], " ")
}

/// Plugin output: "<STATE> - <summaries> | <metrics>", followed by one line per notice
pub fn format_plugin_output(outcomes: &[Outcome]) -> String {
    let results = outcomes.iter().filter_map(Outcome::as_result);
    let summary = results
        .clone()
        .filter_map(|r| {
            r.summary
                .as_ref()
                .map(|text| format!("{}{}", plugin_text(text), state_marker(r.state)))
        })
        .join(", ");
    let mut output = format!("{} - {}", worst_state(outcomes), summary);

    let metrics = outcomes
        .iter()
        .filter_map(Outcome::as_metric)
        .map(ToString::to_string)
        .join(" ");
    if !metrics.is_empty() {
        output.push_str(" | ");
        output.push_str(&metrics);
    }

    for result in results {
        if let Some(notice) = &result.notice {
            output.push('\n');
            output.push_str(&plugin_text(notice));
            output.push_str(state_marker(result.state));
        }
    }
    output
}

/// Discovered service with the session it stands for (none for the parse errors service)
pub struct ServiceRow<'a>(pub &'a Service, pub Option<&'a SessionFields>);

impl<'a> ToRow for ServiceRow<'a> {
    fn columns() -> Row {
        row!["Service", "VRF", "Address Family", "State", "Uptime"]
    }

    fn to_row(&self) -> Row {
        let fields = self.1;
        row![
            self.0.description(),
            maybe_string(fields.and_then(|f| f.vrf_name_out.as_ref())),
            maybe_string(fields.and_then(|f| f.af_name.as_ref())),
            maybe_string(fields.and_then(|f| f.state.as_ref())),
            format_uptime(fields.and_then(|f| f.uptime)),
        ]
    }
}

/// Evaluated service for `status`
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub service: String,
    pub item: String,
    pub state: State,
    pub outcomes: Vec<Outcome>,
}

impl ServiceStatus {
    pub fn new(service: &Service, outcomes: Vec<Outcome>) -> Self {
        ServiceStatus {
            service: service.description(),
            item: service.item.clone(),
            state: worst_state(&outcomes),
            outcomes,
        }
    }

    fn uptime(&self) -> Option<f64> {
        self.outcomes
            .iter()
            .filter_map(Outcome::as_metric)
            .map(|m| m.value)
            .next()
    }

    /// Text of the result that decided the service state (the last one on ties)
    fn state_text(&self) -> String {
        self.outcomes
            .iter()
            .filter_map(Outcome::as_result)
            .filter(|r| r.state == self.state)
            .last()
            .map(|r| r.text().to_string())
            .unwrap_or_default()
    }
}

impl ToRow for ServiceStatus {
    fn columns() -> Row {
        row!["Service", "State", "Uptime", "Summary"]
    }

    fn to_row(&self) -> Row {
        Row::new(vec![
            Cell::new(&self.service),
            state_cell(self.state),
            Cell::new(&format_uptime(self.uptime())),
            Cell::new(&self.state_text()),
        ])
    }
}
