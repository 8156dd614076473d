//! Environment variable configuration
//!
//! Reads and validates the variables every test run depends on.

use std::env;
use std::ffi::OsString;
use thiserror::Error;

use crate::models::CredentialSet;

/// Network identifier passed through to the runner
pub const NETWORK_ID: &str = "NETWORK_ID";
/// Proxy endpoint passed through to the runner
pub const PROXY_URL: &str = "PROXY_URL";
/// JSON list of credential sets
pub const NESTED_ACCOUNTS: &str = "NESTED_ACCOUNTS";
/// Variable injected into each runner process
pub const PRIVATE_KEYS: &str = "PRIVATE_KEYS";

/// Required variables, in the order they are reported
pub const REQUIRED_KEYS: [&str; 3] = [NETWORK_ID, PROXY_URL, NESTED_ACCOUNTS];

/// Environment validation errors
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Missing {} in environment variables", .0.join(", "))]
    Missing(Vec<String>),

    #[error("{0} is not valid UTF-8")]
    NotUnicode(String),

    #[error("NESTED_ACCOUNTS is not a JSON list of string lists: {0}")]
    InvalidAccounts(#[from] serde_json::Error),

    #[error("NESTED_ACCOUNTS contains no credential sets")]
    NoAccounts,
}

/// Validated environment for a test run
#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub network_id: String,
    pub proxy_url: String,
    pub credentials: Vec<CredentialSet>,
}

impl EnvConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, EnvError> {
        Self::from_lookup(|key| env::var_os(key))
    }

    /// Load through an arbitrary lookup. A key counts as present whenever the
    /// lookup returns a value. Every missing key is collected before
    /// returning, so the error names all of them.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EnvError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let [network_id, proxy_url, nested] = REQUIRED_KEYS.map(|key| lookup(key));

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .zip([&network_id, &proxy_url, &nested])
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(EnvError::Missing(missing));
        }

        let network_id = into_utf8(NETWORK_ID, network_id)?;
        let proxy_url = into_utf8(PROXY_URL, proxy_url)?;
        let nested = into_utf8(NESTED_ACCOUNTS, nested)?;

        let credentials = parse_nested_accounts(&nested)?;

        Ok(Self {
            network_id,
            proxy_url,
            credentials,
        })
    }
}

fn into_utf8(key: &str, value: Option<OsString>) -> Result<String, EnvError> {
    value
        .ok_or_else(|| EnvError::Missing(vec![key.to_string()]))?
        .into_string()
        .map_err(|_| EnvError::NotUnicode(key.to_string()))
}

/// Decode `NESTED_ACCOUNTS` into numbered credential sets
pub fn parse_nested_accounts(raw: &str) -> Result<Vec<CredentialSet>, EnvError> {
    let nested: Vec<Vec<String>> = serde_json::from_str(raw)?;
    if nested.is_empty() {
        return Err(EnvError::NoAccounts);
    }
    Ok(CredentialSet::from_nested(nested))
}

/// Help text describing the environment contract
pub const ENV_HELP: &str = "\
Environment Variables:
  NETWORK_ID        Network identifier for the Hardhat config (required)
  PROXY_URL         Proxy endpoint URL (required)
  NESTED_ACCOUNTS   JSON list of private key lists (required)
  RUST_LOG          Log filter, overrides --log-level

Each job receives one key list as PRIVATE_KEYS, joined with commas.

Example:
  export NETWORK_ID=111
  export PROXY_URL=http://127.0.0.1:9090/solana
  export NESTED_ACCOUNTS='[[\"0xabc\",\"0xdef\"],[\"0x123\"]]'
  oz-runner --jobs 4";
