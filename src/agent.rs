//! Reading the collecting agent's output
//!
//! Agent output is line based. A `<<<name>>>` header (options may follow the name,
//! E.g. `<<<oposs_bgp_mon_sessions:sep(0)>>>`) starts a section and every line up to
//! the next header belongs to it. Piggyback blocks (`<<<<host>>>>`) carry data for
//! other hosts and are skipped.

use std::fs;
use std::io::{self, Read};

use log::{debug, trace};

use crate::error::{Error, Result};

/// Section written by the collecting agent
pub const SECTION_NAME: &str = "oposs_bgp_mon_sessions";
/// Section name used by the old bgp_mon agent, read only if the current one is missing
pub const LEGACY_SECTION_NAME: &str = "bgp_mon_sessions";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSection {
    pub name: String,
    pub lines: Vec<String>,
}

enum Header<'a> {
    Section(&'a str),
    // Empty host name closes the piggyback block
    Piggyback(&'a str),
}

fn parse_header(line: &str) -> Option<Header> {
    let line = line.trim();
    if line.len() >= 8 && line.starts_with("<<<<") && line.ends_with(">>>>") {
        return Some(Header::Piggyback(&line[4..line.len() - 4]));
    }
    if line.len() >= 6 && line.starts_with("<<<") && line.ends_with(">>>") {
        let inner = &line[3..line.len() - 3];
        let name = inner.split(':').next().unwrap_or("");
        return Some(Header::Section(name));
    }
    None
}

/// Split agent output into its sections, in input order
///
/// A section header may repeat; each occurrence gets its own entry.
/// Blank lines and lines outside of any section are dropped.
pub fn split_sections(output: &str) -> Vec<AgentSection> {
    let mut sections: Vec<AgentSection> = Vec::new();
    let mut in_section = false;
    let mut piggyback = false;

    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        match parse_header(line) {
            Some(Header::Section(_)) if piggyback => in_section = false,
            Some(Header::Section(name)) => {
                sections.push(AgentSection {
                    name: name.to_string(),
                    lines: Vec::new(),
                });
                in_section = true;
            }
            Some(Header::Piggyback(host)) => {
                piggyback = !host.is_empty();
                in_section = false;
            }
            None => {
                if line.trim().is_empty() || !in_section {
                    continue;
                }
                if let Some(section) = sections.last_mut() {
                    section.lines.push(line.to_string());
                }
            }
        }
    }
    sections
}

/// Records for the session parser
///
/// Without any section header the whole output is taken as JSON lines straight from
/// the collecting agent.
pub fn session_records(output: &str) -> Vec<String> {
    let has_header = output
        .lines()
        .any(|line| matches!(parse_header(line), Some(Header::Section(_))));
    if !has_header {
        trace!("No section headers in agent output, reading raw records");
        return output
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(String::from)
            .collect();
    }

    let sections = split_sections(output);
    let name = if sections.iter().any(|s| s.name == SECTION_NAME) {
        SECTION_NAME
    } else {
        LEGACY_SECTION_NAME
    };
    let records: Vec<String> = sections
        .into_iter()
        .filter(|s| s.name == name)
        .flat_map(|s| s.lines)
        .collect();
    debug!("Found {} records in section {}", records.len(), name);
    records
}

/// Read agent output from a file, or stdin when no path is given
pub fn read_agent_output(path: Option<&str>) -> Result<String> {
    let mut contents = String::new();
    match path {
        Some(path) => {
            contents = fs::read_to_string(path).map_err(|source| Error::Io {
                path: path.to_string(),
                source,
            })?;
        }
        None => {
            io::stdin()
                .read_to_string(&mut contents)
                .map_err(|source| Error::Io {
                    path: "<stdin>".to_string(),
                    source,
                })?;
        }
    }
    Ok(contents)
}
