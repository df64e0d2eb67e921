// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `config.rs`

use crate::config::{
    Settings, ENV_ACCOUNT_ID, ENV_API_BASE, ENV_API_TOKEN, ENV_LISTEN_ADDR, ENV_ZONES,
};
use crate::constants::{DEFAULT_API_BASE, DEFAULT_LISTEN_ADDR};

/// One test covers all env scenarios; process environment is shared across
/// the test binary's threads, so splitting these would race.
#[test]
fn test_settings_from_env() {
    std::env::set_var(ENV_API_TOKEN, "token-123");
    std::env::set_var(ENV_ACCOUNT_ID, "acct-456");
    std::env::set_var(ENV_ZONES, "z1:example.com");
    std::env::remove_var(ENV_API_BASE);
    std::env::remove_var(ENV_LISTEN_ADDR);

    let settings = Settings::from_env().expect("all required vars set");
    assert_eq!(settings.api_token, "token-123");
    assert_eq!(settings.account_id, "acct-456");
    assert_eq!(settings.zones, "z1:example.com");
    assert_eq!(settings.api_base, DEFAULT_API_BASE);
    assert_eq!(settings.listen_addr, DEFAULT_LISTEN_ADDR);

    // Overrides are honored
    std::env::set_var(ENV_API_BASE, "http://localhost:9000/v4");
    std::env::set_var(ENV_LISTEN_ADDR, "127.0.0.1:3000");
    let settings = Settings::from_env().unwrap();
    assert_eq!(settings.api_base, "http://localhost:9000/v4");
    assert_eq!(settings.listen_addr, "127.0.0.1:3000");

    // Missing zone list degrades to an empty allow-list, not an error
    std::env::remove_var(ENV_ZONES);
    let settings = Settings::from_env().unwrap();
    assert!(settings.zones.is_empty());

    // Missing token is fatal
    std::env::remove_var(ENV_API_TOKEN);
    assert!(Settings::from_env().is_err());

    std::env::set_var(ENV_API_TOKEN, "token-123");
    std::env::remove_var(ENV_ACCOUNT_ID);
    assert!(Settings::from_env().is_err());
}
