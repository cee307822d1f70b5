//! Logging initialization

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

use crate::errors::LedgerError;

/// Output profile for the process-wide subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable output, debug level for bidledger crates
    Development,
    /// JSON lines, info level for bidledger crates
    Production,
    /// No output; tests install [`super::init_test_capture`] instead
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> &'static str {
        match self {
            Profile::Development => "bidledger=debug",
            Profile::Production => "bidledger=info",
            Profile::Test => "off",
        }
    }
}

impl FromStr for Profile {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Profile::Development),
            "production" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(LedgerError::UnknownLabel {
                vocabulary: "log profile".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber for `profile`. Only the first call has an effect.
///
/// Output goes to stderr so stdout stays free for command results.
/// `RUST_LOG` overrides the profile's default filter.
pub fn init(profile: Profile) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(profile.default_directive()));
    init_with_filter(profile, filter);
}

/// Same as [`init`] with an explicit filter.
pub fn init_with_filter(profile: Profile, filter: EnvFilter) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_current_span(false)
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}
