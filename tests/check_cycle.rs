use oposs_bgp_mon::agent::{read_agent_output, session_records};
use oposs_bgp_mon::check::{evaluate, UPTIME_METRIC};
use oposs_bgp_mon::discovery::{discover, PARSE_ERRORS_ITEM};
use oposs_bgp_mon::parse::parse;
use oposs_bgp_mon::{worst_state, CheckConfig, State};

fn demo_section() -> oposs_bgp_mon::ParsedSection {
    let output = read_agent_output(Some("./demos/agent_output.txt")).unwrap();
    parse(session_records(&output))
}

#[test]
fn test_demo_cycle() {
    let section = demo_section();
    assert_eq!(section.inventory().len(), 5);
    assert_eq!(section.errors().len(), 1);

    let services = discover(&section);
    assert_eq!(services.len(), 6);
    assert_eq!(services[0].item, PARSE_ERRORS_ITEM);

    let config = CheckConfig::from_file("./demos/rules.toml").unwrap();
    let states: Vec<(String, State)> = services
        .iter()
        .map(|service| {
            let params = config.params_for(&service.item);
            let outcomes = evaluate(&service.item, &params, &section);
            (service.item.clone(), worst_state(&outcomes))
        })
        .collect();
    assert_eq!(
        states,
        vec![
            (PARSE_ERRORS_ITEM.to_string(), State::Warn),
            ("AS65001 10.0.0.1".to_string(), State::Ok),
            ("AS65001 2001:db8::1".to_string(), State::Warn),
            ("AS65002 172.16.20.2".to_string(), State::Crit),
            ("AS65003 172.16.20.6".to_string(), State::Warn),
            ("AS65010 192.0.2.10".to_string(), State::Ok),
        ]
    );
}

#[test]
fn test_uptime_metric_per_session() {
    let section = demo_section();
    let config = CheckConfig::default();
    for id in section.inventory() {
        let outcomes = evaluate(id.as_str(), &config.params_for(id.as_str()), &section);
        let metrics: Vec<_> = outcomes.iter().filter_map(|o| o.as_metric()).collect();
        assert!(metrics.len() <= 1);
        match section.get(id.as_str()).unwrap().uptime {
            Some(uptime) => {
                assert_eq!(metrics[0].name, UPTIME_METRIC);
                assert_eq!(metrics[0].value, uptime);
            }
            None => assert!(metrics.is_empty()),
        }
    }
}

#[test]
fn test_records_and_errors_add_up() {
    let records = vec![
        r#"{"neighbouras": "1", "neighbourid": "a"}"#,
        r#"{"neighbouras": "1"}"#,
        "",
        r#"{"neighbouras": "1", "neighbourid": "a", "state": "idle"}"#,
        "{]",
    ];
    let section = parse(&records);
    assert_eq!(
        section.inventory().len() + section.errors().len(),
        records.len()
    );
    assert_eq!(section.result().len(), 1);
    assert_eq!(
        section.get("AS1 a").unwrap().state.as_deref(),
        Some("idle")
    );
    let services = discover(&section);
    assert_eq!(
        services.iter().filter(|s| s.item == PARSE_ERRORS_ITEM).count(),
        1
    );
}
