// crates/form-gate/tests/config_env.rs
// ============================================================================
// Module: Configuration Environment Override Test
// Description: Config path resolution through FORM_GATE_CONFIG.
// ============================================================================
//! ## Overview
//! Kept in its own test binary so the environment mutation cannot race with
//! other tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    unsafe_code,
    reason = "Test-only assertions and a single-threaded env mutation are permitted."
)]

mod support;

use std::fs;

use form_gate::FormGateConfig;
use form_gate::config::CONFIG_ENV_VAR;
use support::TestResult;
use support::ensure;

#[test]
fn env_var_selects_the_config_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("custom.toml");
    fs::write(&config_path, "[payload]\nmax_bytes = 2048\n")?;

    // SAFETY: this is the only test in this binary, so no other thread reads
    // the environment concurrently.
    unsafe { std::env::set_var(CONFIG_ENV_VAR, &config_path) };
    let config = FormGateConfig::load(None)?;
    // SAFETY: as above.
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

    ensure(config.payload.max_bytes == 2048, "Expected the env-selected file to load")?;
    ensure(config.rules_path() == dir.path().join("rules.toml"), "Expected relative resolution")
}
