//! Remote endpoints and the order in which a group of them is tried.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Maximum number of endpoints a group may hold.
pub const MAX_ENDPOINTS: usize = 4;

/// Default per-request timeout when the config omits one.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

/// One remote HTTP endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            timeout_seconds,
        }
    }

    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.url)
        } else {
            write!(f, "{} ({})", self.name, self.url)
        }
    }
}

/// Ordered endpoints plus the index of the preferred one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointGroup {
    #[serde(default)]
    pub default_index: usize,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

impl EndpointGroup {
    pub const fn new(endpoints: Vec<Endpoint>, default_index: usize) -> Self {
        Self {
            default_index,
            endpoints,
        }
    }

    /// The default index clamped into `[0, len - 1]`.
    pub fn start_index(&self) -> usize {
        self.default_index
            .min(self.endpoints.len().saturating_sub(1))
    }

    /// Endpoints starting at the default, wrapping around, skipping blank URLs.
    ///
    /// Empty when nothing usable is configured.
    pub fn fallback_order(&self) -> impl Iterator<Item = &Endpoint> + '_ {
        let start = self.start_index();
        self.endpoints[start..]
            .iter()
            .chain(self.endpoints[..start].iter())
            .filter(|endpoint| endpoint.has_url())
    }

    pub fn is_empty(&self) -> bool {
        self.fallback_order().next().is_none()
    }
}

/// The request categories that each own an endpoint group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointCategory {
    Translate,
    FixGrammar,
    LearnGrammar,
}

impl EndpointCategory {
    pub const ALL: [Self; 3] = [Self::Translate, Self::FixGrammar, Self::LearnGrammar];

    /// Key used in `config.toml`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::FixGrammar => "fix_grammar",
            Self::LearnGrammar => "learn_grammar",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.key() == key.replace('-', "_"))
    }
}

impl fmt::Display for EndpointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
