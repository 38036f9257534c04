use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Service item of a BGP session, formatted as `AS<neighbouras> <neighbourid>`
/// E.g. "AS65001 10.0.0.1"
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(neighbour_as: &str, neighbour_id: &str) -> Self {
        SessionId(format!("AS{} {}", neighbour_as, neighbour_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One decoded agent record
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SessionFields {
    // VRF or virtual router the session lives in
    #[serde(rename = "vrf-name-out")]
    pub vrf_name_out: Option<String>,
    // Address family, E.g. "IPv4 Unicast"
    #[serde(rename = "af-name")]
    pub af_name: Option<String>,
    #[serde(rename = "neighbourid")]
    pub neighbour_id: String,
    #[serde(rename = "neighbouras")]
    pub neighbour_as: String,
    // As reported by the device, any case
    pub state: Option<String>,
    // Seconds since the session was last established, null while down
    pub uptime: Option<f64>,
}

impl SessionFields {
    pub fn session_id(&self) -> SessionId {
        SessionId::new(&self.neighbour_as, &self.neighbour_id)
    }

    /// Informational fields in display order, keyed by their agent names
    pub fn info_fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("vrf-name-out", self.vrf_name_out.as_deref()),
            ("af-name", self.af_name.as_deref()),
            ("neighbourid", Some(self.neighbour_id.as_str())),
            ("neighbouras", Some(self.neighbour_as.as_str())),
        ]
    }

    pub fn session_state(&self) -> SessionState {
        SessionState::from(self.state.as_deref().unwrap_or(""))
    }

    /// Neighbour ID as an address, if the device reports one
    pub fn neighbour_addr(&self) -> Option<IpAddr> {
        self.neighbour_id.parse().ok()
    }
}

/// Session state as far as the check cares about it
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Established,
    Idle,
    // Connect, Active, OpenSent, OpenConfirm, missing, ...
    Other,
}

impl From<&str> for SessionState {
    fn from(state: &str) -> Self {
        match state.to_lowercase().as_str() {
            "established" => SessionState::Established,
            "idle" => SessionState::Idle,
            _ => SessionState::Other,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let word = match self {
            SessionState::Established => "established",
            SessionState::Idle => "idle",
            SessionState::Other => "other",
        };
        write!(f, "{}", word)
    }
}

/// Parsed agent section for one check cycle
///
/// `inventory` keeps every successfully parsed session in input order (duplicates included)
/// while `result` holds the last record seen for each [`SessionId`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParsedSection {
    inventory: Vec<SessionId>,
    result: HashMap<SessionId, SessionFields>,
    errors: Vec<String>,
}

impl ParsedSection {
    pub(crate) fn new(
        inventory: Vec<SessionId>,
        result: HashMap<SessionId, SessionFields>,
        errors: Vec<String>,
    ) -> Self {
        ParsedSection {
            inventory,
            result,
            errors,
        }
    }

    pub fn inventory(&self) -> &[SessionId] {
        &self.inventory
    }

    pub fn result(&self) -> &HashMap<SessionId, SessionFields> {
        &self.result
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn get(&self, item: &str) -> Option<&SessionFields> {
        self.result.get(item)
    }
}
