use std::fmt;

use ipnetwork::IpNetwork;
use log::{debug, log_enabled, Level};
use serde::Serialize;

use crate::models::ParsedSection;

/// Item of the service that reports records the parser couldn't decode
pub const PARSE_ERRORS_ITEM: &str = "_parse_errors";
/// Prefix the monitoring host puts in front of every item
pub const SERVICE_NAME_PREFIX: &str = "BGP";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Service {
    pub item: String,
}

impl Service {
    pub fn new<S: Into<String>>(item: S) -> Self {
        Service { item: item.into() }
    }

    /// Service description as shown by the monitoring host, E.g. "BGP AS65001 10.0.0.1"
    pub fn description(&self) -> String {
        format!("{} {}", SERVICE_NAME_PREFIX, self.item)
    }

    pub fn is_parse_errors(&self) -> bool {
        self.item == PARSE_ERRORS_ITEM
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// One service per parsed session (in inventory order, duplicates kept), preceded by
/// the parse errors service if any record failed to parse
pub fn discover(section: &ParsedSection) -> Vec<Service> {
    if log_enabled!(Level::Debug) {
        debug!("Discover section: {:#?}", section);
    }

    let errors = if section.errors().is_empty() {
        None
    } else {
        Some(Service::new(PARSE_ERRORS_ITEM))
    };
    errors
        .into_iter()
        .chain(
            section
                .inventory()
                .iter()
                .map(|id| Service::new(id.as_str())),
        )
        .collect()
}

/// Keep the parse errors service and sessions whose neighbour address is within `network`
pub fn filter_by_peer(
    services: Vec<Service>,
    section: &ParsedSection,
    network: IpNetwork,
) -> Vec<Service> {
    services
        .into_iter()
        .filter(|service| {
            if service.is_parse_errors() {
                return true;
            }
            section
                .get(&service.item)
                .and_then(|fields| fields.neighbour_addr())
                .map(|addr| network.contains(addr))
                .unwrap_or(false)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    const PEER_A: &str = r#"{"neighbourid": "10.0.0.1", "neighbouras": "65001", "state": "Established"}"#;
    const PEER_B: &str = r#"{"neighbourid": "2001:db8::2", "neighbouras": "65002", "state": "Idle"}"#;
    const PEER_C: &str = r#"{"neighbourid": "core-rtr-1", "neighbouras": "65003", "state": "Idle"}"#;

    fn items(services: &[Service]) -> Vec<&str> {
        services.iter().map(|s| s.item.as_str()).collect()
    }

    #[test]
    fn test_discover_sessions() {
        let section = parse(vec![PEER_A, PEER_B]);
        let services = discover(&section);
        assert_eq!(items(&services), vec!["AS65001 10.0.0.1", "AS65002 2001:db8::2"]);
        assert_eq!(services[0].description(), "BGP AS65001 10.0.0.1");
    }

    #[test]
    fn test_discover_parse_errors_once_and_first() {
        let section = parse(vec!["bad", PEER_A, "worse", "{}"]);
        let services = discover(&section);
        assert_eq!(items(&services), vec![PARSE_ERRORS_ITEM, "AS65001 10.0.0.1"]);
        assert!(services[0].is_parse_errors());
    }

    #[test]
    fn test_discover_empty() {
        assert!(discover(&parse(Vec::<String>::new())).is_empty());
    }

    #[test]
    fn test_discover_keeps_duplicates() {
        let section = parse(vec![PEER_A, PEER_A]);
        assert_eq!(
            items(&discover(&section)),
            vec!["AS65001 10.0.0.1", "AS65001 10.0.0.1"]
        );
    }

    #[test]
    fn test_filter_by_peer() {
        let section = parse(vec![PEER_A, PEER_B, PEER_C, "bad"]);
        let services = discover(&section);
        let v4: IpNetwork = "10.0.0.0/24".parse().unwrap();
        assert_eq!(
            items(&filter_by_peer(services.clone(), &section, v4)),
            vec![PARSE_ERRORS_ITEM, "AS65001 10.0.0.1"]
        );
        let host: IpNetwork = "2001:db8::2".parse().unwrap();
        assert_eq!(
            items(&filter_by_peer(services, &section, host)),
            vec![PARSE_ERRORS_ITEM, "AS65002 2001:db8::2"]
        );
    }
}
