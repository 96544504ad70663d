//! Bootstrap sequence tests: conditional activation, ordering and failure.

use std::time::Duration;

use quant_runtime::config::ConfigError;
use quant_runtime::{BootstrapError, Components, LifecycleState, Orchestrator};

mod common;

#[test]
fn test_absent_sections_attempt_no_connections() {
    let journal = common::journal();
    let mut orchestrator = Orchestrator::new(common::components(&journal, false, false));
    let file = common::write_config(r#"{"log": {"level": "info"}}"#);

    orchestrator.initialize(file.path()).unwrap();

    assert!(common::entries(&journal).is_empty());
    assert!(orchestrator.database().is_none());
    assert!(orchestrator.event_bus().is_none());
    assert!(orchestrator.http_server().is_none());
    assert!(orchestrator.heartbeat().is_some());
    assert!(orchestrator.scheduler_created());
    assert_eq!(orchestrator.state(), LifecycleState::Initializing);
}

#[test]
fn test_configured_subsystems_connect_in_order() {
    let journal = common::journal();
    let mut orchestrator = Orchestrator::new(common::components(&journal, false, false));
    let file = common::write_config(
        r#"{
            "database": {"dbname": "trades"},
            "eventBus": {"exchange": "Ticks"},
            "serverId": "node-7"
        }"#,
    );

    orchestrator.initialize(file.path()).unwrap();

    assert_eq!(common::entries(&journal), vec!["database", "event_bus"]);
    assert_eq!(orchestrator.database().unwrap().database(), "trades");
    assert_eq!(orchestrator.event_bus().unwrap().exchange(), "Ticks");

    let binding = orchestrator.config().unwrap().bus_binding().unwrap();
    assert_eq!(binding.server_id, "node-7");
    assert_eq!(binding.exchange, "Ticks");
    assert_eq!(binding.config_topic, "config.node-7");
}

#[test]
fn test_bus_binding_generates_server_id() {
    let journal = common::journal();
    let mut orchestrator = Orchestrator::new(common::components(&journal, false, false));
    let file = common::write_config(r#"{"eventBus": {}}"#);

    orchestrator.initialize(file.path()).unwrap();

    let binding = orchestrator.config().unwrap().bus_binding().unwrap();
    assert!(uuid_like(&binding.server_id));
    assert_eq!(binding.config_topic, format!("config.{}", binding.server_id));
}

#[test]
fn test_bus_failure_skips_binding_and_later_steps() {
    let journal = common::journal();
    let mut orchestrator = Orchestrator::new(common::components(&journal, false, true));
    let file = common::write_config(
        r#"{"eventBus": {}, "httpServer": {"host": "127.0.0.1", "port": 0, "apis": ["pingApi"]}}"#,
    );

    let err = orchestrator.initialize(file.path()).unwrap_err();

    assert!(matches!(err, BootstrapError::Connection(_)));
    assert!(orchestrator.config().unwrap().bus_binding().is_none());
    assert!(orchestrator.event_bus().is_none());
    assert!(orchestrator.http_server().is_none());
    assert!(orchestrator.heartbeat().is_none());
}

#[test]
fn test_database_failure_aborts_before_bus() {
    let journal = common::journal();
    let mut orchestrator = Orchestrator::new(common::components(&journal, true, false));
    let file = common::write_config(r#"{"database": {}, "eventBus": {}}"#);

    let err = orchestrator.initialize(file.path()).unwrap_err();

    assert!(matches!(err, BootstrapError::Connection(_)));
    assert_eq!(common::entries(&journal), vec!["database"]);
    assert!(orchestrator.database().is_none());
    assert!(orchestrator.event_bus().is_none());
}

#[test]
fn test_unreachable_database_fails_fast() {
    let mut orchestrator = Orchestrator::new(Components::default());
    let file = common::write_config(&format!(
        r#"{{"database": {{"host": "127.0.0.1", "port": {}, "connect_timeout_secs": 2}}}}"#,
        common::closed_port()
    ));

    let err = orchestrator.initialize(file.path()).unwrap_err();

    assert!(matches!(err, BootstrapError::Connection(_)));
    assert!(orchestrator.database().is_none());
}

#[test]
fn test_malformed_config_creates_nothing() {
    let journal = common::journal();
    let mut orchestrator = Orchestrator::new(common::components(&journal, false, false));
    let file = common::write_config(r#"{"database": {"#);

    let err = orchestrator.initialize(file.path()).unwrap_err();

    assert!(matches!(err, BootstrapError::Config(ConfigError::Json(_))));
    assert!(common::entries(&journal).is_empty());
    assert!(orchestrator.config().is_none());
    assert!(orchestrator.database().is_none());
    assert!(orchestrator.event_bus().is_none());
    assert!(orchestrator.http_server().is_none());
    assert!(orchestrator.heartbeat().is_none());
    assert!(!orchestrator.scheduler_created());
}

#[test]
fn test_missing_config_file() {
    let mut orchestrator = Orchestrator::new(Components::default());
    let dir = tempfile::tempdir().unwrap();

    let err = orchestrator
        .initialize(dir.path().join("absent.json"))
        .unwrap_err();

    assert!(matches!(err, BootstrapError::Config(ConfigError::Io(_))));
    assert!(!orchestrator.scheduler_created());
}

#[test]
fn test_validation_reports_every_problem() {
    let mut orchestrator = Orchestrator::new(Components::default());
    let file = common::write_config(
        r#"{"log": {"level": "loud"}, "httpServer": {"host": ""}}"#,
    );

    let err = orchestrator.initialize(file.path()).unwrap_err();

    match err {
        BootstrapError::Config(ConfigError::Validation(errors)) => assert!(errors.len() >= 3),
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn test_heartbeat_ticks_after_initial_delay() {
    let journal = common::journal();
    let mut orchestrator = Orchestrator::new(common::components(&journal, false, false));
    let file = common::write_config("{}");
    orchestrator.initialize(file.path()).unwrap();

    let heartbeat = orchestrator.heartbeat().unwrap().clone();
    assert_eq!(heartbeat.count(), 0);

    orchestrator
        .start_with_signal(async { tokio::time::sleep(Duration::from_millis(1200)).await })
        .unwrap();

    assert!(heartbeat.count() >= 1);
}

#[test]
fn test_user_sections_are_kept() {
    #[derive(serde::Deserialize)]
    struct Strategy {
        symbol: String,
    }

    let journal = common::journal();
    let mut orchestrator = Orchestrator::new(common::components(&journal, false, false));
    let file = common::write_config(r#"{"strategy": {"symbol": "BTC-USDT"}}"#);
    orchestrator.initialize(file.path()).unwrap();

    let strategy: Strategy = orchestrator
        .config()
        .unwrap()
        .section("strategy")
        .unwrap()
        .unwrap();
    assert_eq!(strategy.symbol, "BTC-USDT");
}

fn uuid_like(value: &str) -> bool {
    value.len() == 36 && value.chars().filter(|c| *c == '-').count() == 4
}
