//! BGP session health check.
//!
//! Turns the per-session JSON records written by the collecting agent into
//! monitored services and evaluates each session's state and uptime.
//!
//! ```
//! use oposs_bgp_mon::{check, discovery, parse, CheckParams, State};
//!
//! let section = parse::parse(vec![
//!     r#"{"neighbouras": "65001", "neighbourid": "10.0.0.1", "state": "Established", "uptime": 120}"#,
//! ]);
//! let services = discovery::discover(&section);
//! assert_eq!(services[0].item, "AS65001 10.0.0.1");
//!
//! let outcomes = check::evaluate("AS65001 10.0.0.1", &CheckParams::default(), &section);
//! assert_eq!(oposs_bgp_mon::worst_state(&outcomes), State::Ok);
//! ```
pub mod agent;
pub mod check;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod discovery;
mod error;
pub mod models;
pub mod parse;
pub mod utils;

pub use config::{CheckConfig, CheckParams, UptimeLevels};
pub use error::{Error, Result};
pub use models::{
    worst_state, CheckResult, Metric, Outcome, ParsedSection, SessionFields, SessionId,
    SessionState, State,
};
