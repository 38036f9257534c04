//! # bgp-mon CLI
//!
//! Runs the BGP session check the way the monitoring host does: the collecting agent's
//! output is read from a file (`-i`) or stdin, services are discovered from it and
//! evaluated against the check parameters from a rule file (`-c`).
//!
//! ## Discover
//! ```sh
//! $ bgp-mon discover -i agent_output.txt
//!  Service                  VRF         Address Family  State        Uptime
//! ----------------------------------------------------------------------------
//!  BGP _parse_errors        ---         ---             ---          ---
//!  BGP AS65001 10.0.0.1     default     IPv4 Unicast    Established  24:00:00
//!  BGP AS65001 2001:db8::1  default     IPv6 Unicast    Established  00:00:45
//!  BGP AS65002 172.16.20.2  customer-a  IPv4 Unicast    Idle         ---
//! ```
//!
//! Sessions can be filtered with a neighbour IP Addr or prefix:
//! ```sh
//! $ bgp-mon discover -i agent_output.txt 172.16.20.0/24
//! ```
//!
//! ## Check
//! ```sh
//! $ bgp-mon check 'AS65001 2001:db8::1' -i agent_output.txt --min-uptime 60,30
//! WARN - vrf-name-out: default, af-name: IPv6 Unicast, neighbourid: 2001:db8::1, neighbouras: 65001, state: established (uptime 45s < 60s warning threshold)(!) | oposs_bgp_mon_uptime=45
//! ```
//! The exit code is the service state (0 OK, 1 WARN, 2 CRIT, 3 UNKNOWN).
//!
//! ## Status
//! ```sh
//! $ bgp-mon status -i agent_output.txt -c rules.toml
//!  Service                  State  Uptime    Summary
//! ---------------------------------------------------------------------------------------------
//!  BGP _parse_errors        WARN   ---       Failed to parse 1 BGP session(s)
//!  BGP AS65001 10.0.0.1     OK     24:00:00  state: established
//!  BGP AS65001 2001:db8::1  WARN   00:00:45  state: established (uptime 45s < 60s warning threshold)
//!  BGP AS65002 172.16.20.2  CRIT   ---       state: Idle
//! ```

use std::error::Error;

use clap::Parser;
use colored::*;
use ipnetwork::IpNetwork;
use log::debug;

use crate::agent::{read_agent_output, session_records};
use crate::check::evaluate;
use crate::config::{CheckConfig, UptimeLevels};
use crate::discovery::{discover, filter_by_peer, Service};
use crate::models::{worst_state, ParsedSection, State};
use crate::parse::parse;

mod display;
mod table;

pub use display::{format_plugin_output, ServiceRow, ServiceStatus};
use table::OutputTable;

#[derive(Parser, Debug)]
#[clap(name = "bgp-mon", rename_all = "kebab-case")]
/// BGP session health check
pub struct Args {
    #[clap(subcommand)]
    pub cmd: Command,
    /// Show debug logs (additive for trace logs)
    #[clap(short, parse(from_occurrences), global = true)]
    pub verbose: u8,
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// List the services found in the agent output
    #[clap(alias = "d")]
    Discover(DiscoverOptions),
    /// Evaluate a single service item, E.g. "AS65001 10.0.0.1"
    #[clap(alias = "c")]
    Check(CheckOptions),
    /// Evaluate every discovered service
    #[clap(alias = "s")]
    Status(StatusOptions),
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub struct InputOptions {
    /// Agent output to read (defaults to stdin)
    #[clap(short, long)]
    pub input: Option<String>,
    /// Print JSON instead of text
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub struct ParamOptions {
    /// Path to check parameter rules (toml)
    #[clap(short = 'c', long)]
    pub rules: Option<String>,
    /// Minimum uptime of established sessions as WARN,CRIT seconds (0 disables a level),
    /// overrides the rule file
    #[clap(long)]
    pub min_uptime: Option<UptimeLevels>,
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub struct DiscoverOptions {
    /// IP Address or Network Prefix to filter neighbour(s)
    #[clap()]
    pub peer: Option<IpNetwork>,
    #[clap(flatten)]
    pub input: InputOptions,
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub struct CheckOptions {
    /// Service item, without the "BGP " prefix
    #[clap()]
    pub item: String,
    #[clap(flatten)]
    pub input: InputOptions,
    #[clap(flatten)]
    pub params: ParamOptions,
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub struct StatusOptions {
    /// IP Address or Network Prefix to filter neighbour(s)
    #[clap()]
    pub peer: Option<IpNetwork>,
    #[clap(flatten)]
    pub input: InputOptions,
    #[clap(flatten)]
    pub params: ParamOptions,
}

fn load_section(options: &InputOptions) -> Result<ParsedSection, Box<dyn Error>> {
    let output = read_agent_output(options.input.as_deref())?;
    let section = parse(session_records(&output));
    debug!(
        "Parsed {} sessions, {} errors",
        section.inventory().len(),
        section.errors().len()
    );
    Ok(section)
}

fn load_config(options: &ParamOptions) -> Result<CheckConfig, Box<dyn Error>> {
    let mut config = match &options.rules {
        Some(path) => CheckConfig::from_file(path)?,
        None => CheckConfig::default(),
    };
    if let Some(levels) = options.min_uptime {
        config.override_min_uptime(levels);
    }
    Ok(config)
}

fn discover_services(section: &ParsedSection, peer: Option<IpNetwork>) -> Vec<Service> {
    let services = discover(section);
    match peer {
        Some(network) => filter_by_peer(services, section, network),
        None => services,
    }
}

/// Run a command, returning the state the process should exit with
pub fn run(args: &Args) -> Result<State, Box<dyn Error>> {
    match &args.cmd {
        Command::Discover(options) => {
            let section = load_section(&options.input)?;
            let services = discover_services(&section, options.peer);
            if options.input.json {
                println!("{}", serde_json::to_string_pretty(&services)?);
            } else {
                let mut table = OutputTable::new();
                for service in &services {
                    table.add_row(&ServiceRow(service, section.get(&service.item)));
                }
                table.print();
            }
            Ok(State::Ok)
        }
        Command::Check(options) => {
            let section = load_section(&options.input)?;
            let config = load_config(&options.params)?;
            let params = config.params_for(&options.item);
            let outcomes = evaluate(&options.item, &params, &section);
            if options.input.json {
                println!("{}", serde_json::to_string_pretty(&outcomes)?);
            } else {
                println!("{}", format_plugin_output(&outcomes));
            }
            Ok(worst_state(&outcomes))
        }
        Command::Status(options) => {
            let section = load_section(&options.input)?;
            let config = load_config(&options.params)?;
            let statuses: Vec<_> = discover_services(&section, options.peer)
                .iter()
                .map(|service| {
                    let params = config.params_for(&service.item);
                    ServiceStatus::new(service, evaluate(&service.item, &params, &section))
                })
                .collect();
            if options.input.json {
                println!("{}", serde_json::to_string_pretty(&statuses)?);
            } else {
                let mut table = OutputTable::new();
                for status in &statuses {
                    table.add_row(status);
                }
                table.print();
            }
            Ok(statuses
                .iter()
                .map(|s| s.state)
                .max()
                .unwrap_or_default())
        }
    }
}

/// Run a command, reporting failures as UNKNOWN
pub fn run_check(args: &Args) -> State {
    match run(args) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            State::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&[
            "bgp-mon",
            "-vv",
            "check",
            "AS65001 10.0.0.1",
            "-i",
            "./demos/agent_output.txt",
            "--min-uptime",
            "60,30",
        ]);
        assert_eq!(parsed.verbose, 2);
        match parsed.cmd {
            Command::Check(options) => {
                assert_eq!(options.item, "AS65001 10.0.0.1");
                assert_eq!(
                    options.input.input.as_deref(),
                    Some("./demos/agent_output.txt")
                );
                assert_eq!(options.params.min_uptime, Some(UptimeLevels::new(60.0, 30.0)));
                assert!(!options.input.json);
            }
            other => panic!("Unexpected command: {:?}", other),
        }
        assert!(Args::try_parse_from(&["bgp-mon", "check", "x", "--min-uptime", "60"]).is_err());
        assert!(Args::try_parse_from(&["bgp-mon", "discover", "not-a-prefix"]).is_err());
    }

    #[test]
    fn test_run_check() {
        let state = run(&args(&[
            "bgp-mon",
            "check",
            "AS65001 2001:db8::1",
            "-i",
            "./demos/agent_output.txt",
            "-c",
            "./demos/rules.toml",
        ]))
        .unwrap();
        assert_eq!(state, State::Warn);

        let state = run(&args(&[
            "bgp-mon",
            "check",
            "AS65001 2001:db8::1",
            "-i",
            "./demos/agent_output.txt",
            "--min-uptime",
            "0,0",
        ]))
        .unwrap();
        assert_eq!(state, State::Ok);

        let state = run(&args(&[
            "bgp-mon",
            "check",
            "AS64999 10.9.9.9",
            "-i",
            "./demos/agent_output.txt",
        ]))
        .unwrap();
        assert_eq!(state, State::Unknown);
    }

    #[test]
    fn test_run_status() {
        let state = run(&args(&[
            "bgp-mon",
            "status",
            "-i",
            "./demos/agent_output.txt",
            "-c",
            "./demos/rules.toml",
        ]))
        .unwrap();
        assert_eq!(state, State::Crit);

        let state = run(&args(&[
            "bgp-mon",
            "status",
            "10.0.0.1/32",
            "-i",
            "./demos/agent_output.txt",
            "-c",
            "./demos/rules.toml",
        ]))
        .unwrap();
        // _parse_errors always stays in the list
        assert_eq!(state, State::Warn);
    }

    #[test]
    fn test_missing_input_is_unknown() {
        let parsed = args(&["bgp-mon", "discover", "-i", "./demos/missing.txt"]);
        assert!(run(&parsed).is_err());
        assert_eq!(run_check(&parsed), State::Unknown);
    }
}
