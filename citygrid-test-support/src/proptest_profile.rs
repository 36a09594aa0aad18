//! Environment-driven tuning shared by every property-test suite.

use std::{env, num::NonZeroU32};

use proptest::test_runner::Config;

/// Environment variable overriding the number of cases per property.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable enabling forked execution of proptest cases.
pub const CITYGRID_PBT_FORK_ENV_KEY: &str = "CITYGRID_PBT_FORK";

/// Case count and fork mode for one property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: NonZeroU32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads overrides from the environment, falling back to the given
    /// defaults when a variable is unset or malformed.
    ///
    /// # Examples
    /// ```
    /// use citygrid_test_support::proptest_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(32, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        let fallback = NonZeroU32::new(default_cases).unwrap_or(NonZeroU32::MIN);
        Self {
            cases: override_from_env(PROGTEST_CASES_ENV_KEY, fallback, |raw| {
                raw.parse::<NonZeroU32>().ok()
            }),
            fork: override_from_env(CITYGRID_PBT_FORK_ENV_KEY, default_fork, parse_switch),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases.get()
    }

    /// Whether cases run in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }

    /// Proptest runner configuration for this profile.
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            cases: self.cases(),
            fork: self.fork,
            ..Config::default()
        }
    }
}

/// Builds the runner configuration every suite should use.
///
/// # Examples
/// ```
/// use citygrid_test_support::proptest_profile::suite_proptest_config;
///
/// assert!(suite_proptest_config(16).cases > 0);
/// ```
#[must_use]
pub fn suite_proptest_config(default_cases: u32) -> Config {
    ProptestRunProfile::load(default_cases, false).config()
}

fn override_from_env<T: Copy>(key: &'static str, default: T, parse: impl Fn(&str) -> Option<T>) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parse(raw.trim()).unwrap_or_else(|| {
        tracing::warn!(env = key, raw = %raw, "ignoring malformed property-test override");
        default
    })
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
