// crates/osc-server/tests/config.rs
use std::env;

use osc_protocol::MAX_DATAGRAM_SIZE;
use osc_server::config::{Config, DEFAULT_PORT};

#[test]
fn defaults() {
    let config = Config::default();
    assert_eq!(config.bind_addr, "0.0.0.0");
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.max_datagram_size, MAX_DATAGRAM_SIZE);
    assert!(!config.strict);
    assert_eq!(config.socket_addr_string(), "0.0.0.0:9001");
    assert!(!config.codec_options().strict);
}

#[test]
fn toml_overrides_only_given_keys() {
    let config = Config::from_toml_str(
        r#"
        bind_addr = "127.0.0.1"
        strict = true
        "#,
    )
    .unwrap();

    assert_eq!(config.bind_addr, "127.0.0.1");
    assert_eq!(config.port, DEFAULT_PORT);
    assert!(config.strict);
    assert!(config.codec_options().strict);
}

#[test]
fn toml_rejects_unknown_keys_and_bad_types() {
    assert!(Config::from_toml_str("max_clients = 10").is_err());
    assert!(Config::from_toml_str("port = \"ninety\"").is_err());
}

#[test]
fn toml_file_errors_name_the_file() {
    let err = Config::from_toml_file("/definitely/not/here.toml").unwrap_err();
    assert!(format!("{:#}", err).contains("/definitely/not/here.toml"));
}

#[test]
fn environment_overrides_defaults() {
    env::set_var("OSC_BIND_ADDR", "127.0.0.1");
    env::set_var("OSC_PORT", "9100");
    env::set_var("OSC_STRICT", "true");
    env::remove_var("OSC_MAX_DATAGRAM");

    let config = Config::from_env().unwrap();
    assert_eq!(config.socket_addr_string(), "127.0.0.1:9100");
    assert!(config.strict);
    assert_eq!(config.max_datagram_size, MAX_DATAGRAM_SIZE);

    env::set_var("OSC_PORT", "not-a-port");
    assert!(Config::from_env().is_err());

    for key in ["OSC_BIND_ADDR", "OSC_PORT", "OSC_STRICT"] {
        env::remove_var(key);
    }
}
