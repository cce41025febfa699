use super::*;

#[test]
fn defaults_resolve_without_any_source() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr, "127.0.0.1:3000".parse().expect("addr"));
    assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(30));
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert_eq!(settings.logging.format, LogFormat::Compact);
    assert_eq!(settings.database.url, None);
    assert_eq!(settings.database.max_connections.get(), 8);
    assert_eq!(settings.database.acquire_timeout, Duration::from_secs(5));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.database.url = Some("postgres://file".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        database: DatabaseOverride {
            database_url: Some("postgres://cli".to_string()),
        },
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.database.require_url().ok(), Some("postgres://cli"));
}

fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    )
}

#[test]
fn environment_layer_sits_between_files_and_cli() {
    let cli = CliArgs::parse_from(["quill", "serve", "--log-level", "debug"]);
    let vars = env(&[
        ("QUILL__SERVER__PORT", "4100"),
        ("QUILL__LOGGING__LEVEL", "warn"),
        ("QUILL__DATABASE__URL", "postgres://env"),
    ]);

    let settings = load_with_env(&cli, vars).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4100);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.database.require_url().ok(), Some("postgres://env"));
}

#[test]
fn cli_port_beats_environment_port() {
    let cli = CliArgs::parse_from(["quill", "serve", "--server-port", "4200"]);
    let vars = env(&[("QUILL__SERVER__PORT", "4100")]);

    let settings = load_with_env(&cli, vars).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4200);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.logging.format, LogFormat::Json);
}

#[test]
fn zero_port_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(0);

    let err = Settings::from_raw(raw).expect_err("port 0 must fail");
    assert!(matches!(err, LoadError::Invalid { key: "server.port", .. }));
}

#[test]
fn zero_pool_size_is_rejected() {
    let mut raw = RawSettings::default();
    raw.database.max_connections = Some(0);

    let err = Settings::from_raw(raw).expect_err("pool size 0 must fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "database.max_connections",
            ..
        }
    ));
}

#[test]
fn unparsable_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());

    let err = Settings::from_raw(raw).expect_err("bad level must fail");
    assert!(matches!(err, LoadError::Invalid { key: "logging.level", .. }));
}

#[test]
fn blank_database_url_is_treated_as_missing() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.require_url().is_err());
}

#[test]
fn ipv6_hosts_are_bracketed() {
    let mut raw = RawSettings::default();
    raw.server.host = Some("::1".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.server.addr.is_ipv6());
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "quill",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--database-url",
        "postgres://override",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.database.database_url.as_deref(),
                Some("postgres://override")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_migrate_arguments() {
    let args = CliArgs::parse_from(["quill", "migrate", "--database-url", "postgres://example"]);

    match args.command.expect("migrate command") {
        Command::Migrate(migrate) => {
            assert_eq!(
                migrate.database.database_url.as_deref(),
                Some("postgres://example")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["quill"]);
    let command = args.command.unwrap_or_default();
    assert!(matches!(command, Command::Serve(_)));
}
