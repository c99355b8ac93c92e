//! Cache construction options
//!
//! Two shapes are recognized:
//!
//! ```toml
//! # capacity-bounded
//! strategy = "LRU"   # or "FIFO", case-insensitive
//! capacity = 128
//! ```
//!
//! ```json
//! { "ttlMillis": 30000 }
//! ```
//!
//! A document naming `ttlMillis` together with `strategy` or `capacity` is
//! rejected, the same as the matching [`CacheBuilder`](crate::CacheBuilder)
//! calls. The environment variables follow the same rule.
//!
//! Parsing happens in two stages: serde reads the document shape, then the
//! values are validated. An unknown strategy therefore surfaces as
//! [`CacheError::UnsupportedStrategy`] rather than a parse error, whichever
//! other keys sit next to it.

use std::fmt;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use evictkit_common::{duration_millis, impl_enum_conversions, CommonError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CacheError, CacheResult};

/// Environment variable selecting the strategy (`FIFO` or `LRU`)
pub const ENV_STRATEGY: &str = "EVICTKIT_CACHE_STRATEGY";
/// Environment variable holding the capacity
pub const ENV_CAPACITY: &str = "EVICTKIT_CACHE_CAPACITY";
/// Environment variable holding the TTL in milliseconds
pub const ENV_TTL_MILLIS: &str = "EVICTKIT_CACHE_TTL_MILLIS";

/// Capacity-bounded eviction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// First in, first out
    Fifo,
    /// Least recently used
    Lru,
}

impl_enum_conversions!(Strategy {
    Fifo => "FIFO",
    Lru => "LRU",
});

impl Strategy {
    /// Parse a strategy name, mapping unknown names to
    /// [`CacheError::UnsupportedStrategy`]
    ///
    /// # Errors
    /// Returns [`CacheError::UnsupportedStrategy`] for anything other than
    /// `fifo` or `lru` in any case.
    pub fn parse(name: &str) -> CacheResult<Self> {
        name.trim().parse().map_err(|_| CacheError::UnsupportedStrategy(name.to_string()))
    }
}

/// Validated cache configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOptions", into = "RawOptions")]
pub enum CacheOptions {
    /// A FIFO or LRU cache holding at most `capacity` entries
    Capacity {
        /// Eviction order
        strategy: Strategy,
        /// Maximum number of entries
        capacity: NonZeroUsize,
    },
    /// A time-expiring cache
    Expiring {
        /// How long an entry lives after its last touch
        ttl: Duration,
    },
}

/// Document shape before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    capacity: Option<u64>,
    #[serde(
        default,
        rename = "ttlMillis",
        skip_serializing_if = "Option::is_none",
        with = "duration_millis::option"
    )]
    ttl: Option<Duration>,
}

impl TryFrom<RawOptions> for CacheOptions {
    type Error = CacheError;

    fn try_from(raw: RawOptions) -> CacheResult<Self> {
        let strategy = raw.strategy.as_deref().map(Strategy::parse).transpose()?;
        match (raw.ttl, strategy, raw.capacity) {
            (Some(ttl), None, None) => Self::ttl(ttl),
            (Some(_), _, _) => Err(CacheError::invalid_config(
                "ttlMillis",
                "a time-expiring cache takes no strategy or capacity",
            )),
            (None, Some(strategy), Some(capacity)) => {
                let capacity = usize::try_from(capacity).map_err(|_| {
                    CacheError::invalid_config("capacity", "does not fit in memory")
                })?;
                Self::capacity(strategy, capacity)
            }
            (None, Some(_), None) => {
                Err(CacheError::invalid_config("capacity", "required for FIFO and LRU caches"))
            }
            (None, None, _) => Err(CacheError::invalid_config(
                "strategy",
                "set a strategy and capacity, or ttlMillis",
            )),
        }
    }
}

impl From<CacheOptions> for RawOptions {
    fn from(options: CacheOptions) -> Self {
        match options {
            CacheOptions::Capacity { strategy, capacity } => Self {
                strategy: Some(strategy.to_string()),
                capacity: Some(u64::try_from(capacity.get()).unwrap_or(u64::MAX)),
                ttl: None,
            },
            CacheOptions::Expiring { ttl } => Self { ttl: Some(ttl), ..Self::default() },
        }
    }
}

impl CacheOptions {
    /// Options for a capacity-bounded cache
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] if `capacity` is zero.
    pub fn capacity(strategy: Strategy, capacity: usize) -> CacheResult<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| CacheError::invalid_config("capacity", "must be greater than zero"))?;
        Ok(Self::Capacity { strategy, capacity })
    }

    /// Options for a time-expiring cache
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] if `ttl` is zero.
    pub fn ttl(ttl: Duration) -> CacheResult<Self> {
        if ttl.is_zero() {
            return Err(CacheError::invalid_config("ttlMillis", "must be greater than zero"));
        }
        Ok(Self::Expiring { ttl })
    }

    /// Parse options from a TOML document
    ///
    /// # Errors
    /// Returns [`CacheError::Common`] wrapping
    /// [`CommonError::Serialization`] for malformed documents, and the
    /// validation errors of [`CacheOptions::capacity`] and
    /// [`CacheOptions::ttl`].
    pub fn from_toml_str(source: &str) -> CacheResult<Self> {
        let raw: RawOptions = toml::from_str(source)
            .map_err(|e| CommonError::serialization("toml", e.to_string()))?;
        Self::validated("toml", raw)
    }

    /// Parse options from a JSON document
    ///
    /// # Errors
    /// Same as [`CacheOptions::from_toml_str`].
    pub fn from_json_str(source: &str) -> CacheResult<Self> {
        let raw: RawOptions = serde_json::from_str(source)
            .map_err(|e| CommonError::serialization("json", e.to_string()))?;
        Self::validated("json", raw)
    }

    /// Load options from a `.toml` or `.json` file
    ///
    /// # Errors
    /// Returns [`CacheError::Io`] if the file cannot be read,
    /// [`CacheError::InvalidConfig`] for any other extension, and the errors
    /// of the matching string loader.
    pub fn load_from_file(path: impl AsRef<Path>) -> CacheResult<Self> {
        let path = path.as_ref();
        let extension =
            path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
        let loader: fn(&str) -> CacheResult<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => {
                return Err(CacheError::invalid_config(
                    "path",
                    format!("'{}' is neither a .toml nor a .json file", path.display()),
                ))
            }
        };

        let source = fs::read_to_string(path).map_err(|e| CacheError::io(path, e))?;
        let options = loader(&source)?;
        info!(path = %path.display(), options = %options, "loaded cache options");
        Ok(options)
    }

    /// Read options from `EVICTKIT_CACHE_*` environment variables
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] when a required variable is
    /// missing or not a positive integer, or when the TTL variable is set
    /// together with a strategy or capacity, and
    /// [`CacheError::UnsupportedStrategy`] for an unknown strategy.
    pub fn from_env() -> CacheResult<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Read options through a variable lookup function
    ///
    /// # Errors
    /// Same as [`CacheOptions::from_env`].
    pub fn from_env_with<F>(lookup: F) -> CacheResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ttl = lookup(ENV_TTL_MILLIS)
            .map(|ttl| parse_env_number(ENV_TTL_MILLIS, "ttlMillis", &ttl))
            .transpose()?
            .map(Duration::from_millis);
        let capacity = lookup(ENV_CAPACITY)
            .map(|capacity| parse_env_number(ENV_CAPACITY, "capacity", &capacity))
            .transpose()?;
        let raw = RawOptions { strategy: lookup(ENV_STRATEGY), capacity, ttl };
        let options = Self::try_from(raw).map_err(|e| match e {
            CacheError::InvalidConfig { field: "capacity", .. } if capacity.is_none() => {
                CacheError::invalid_config("capacity", format!("{ENV_CAPACITY} is not set"))
            }
            CacheError::InvalidConfig { field: "strategy", .. } => CacheError::invalid_config(
                "strategy",
                format!("set {ENV_STRATEGY} and {ENV_CAPACITY}, or {ENV_TTL_MILLIS}"),
            ),
            other => other,
        })?;
        info!(options = %options, "loaded cache options from environment");
        Ok(options)
    }

    fn validated(format: &'static str, raw: RawOptions) -> CacheResult<Self> {
        let options = Self::try_from(raw)?;
        info!(format, options = %options, "parsed cache options");
        Ok(options)
    }
}

fn parse_env_number(variable: &str, field: &'static str, value: &str) -> CacheResult<u64> {
    value.trim().parse().map_err(|_| {
        CacheError::invalid_config(field, format!("{variable}='{value}' is not a positive integer"))
    })
}

impl fmt::Display for CacheOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capacity { strategy, capacity } => write!(f, "{strategy}(capacity={capacity})"),
            Self::Expiring { ttl } => write!(f, "EXPIRING(ttl={}ms)", ttl.as_millis()),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for config.
    use std::collections::HashMap;

    use evictkit_common::assert_error_contains;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    /// Validates `Strategy` parsing and display.
    ///
    /// Assertions:
    /// - Confirms names parse case-insensitively.
    /// - Confirms unknown names are `UnsupportedStrategy`.
    #[test]
    fn test_strategy_parse() {
        assert_eq!(Strategy::parse("lru").unwrap(), Strategy::Lru);
        assert_eq!(Strategy::parse(" Fifo ").unwrap(), Strategy::Fifo);
        assert_eq!(Strategy::Fifo.to_string(), "FIFO");
        assert!(matches!(
            Strategy::parse("MRU"),
            Err(CacheError::UnsupportedStrategy(name)) if name == "MRU"
        ));
    }

    /// Validates TOML and JSON loading of both option shapes.
    ///
    /// Assertions:
    /// - Confirms a capacity document produces `Capacity`.
    /// - Confirms a TTL document produces `Expiring`.
    #[test]
    fn test_parse_documents() {
        let lru = CacheOptions::from_toml_str("strategy = \"lru\"\ncapacity = 2\n").unwrap();
        assert_eq!(lru, CacheOptions::capacity(Strategy::Lru, 2).unwrap());

        let ttl = CacheOptions::from_json_str(r#"{"ttlMillis": 250}"#).unwrap();
        assert_eq!(ttl, CacheOptions::Expiring { ttl: Duration::from_millis(250) });

        let ttl = CacheOptions::from_toml_str("ttlMillis = 250\n").unwrap();
        assert_eq!(ttl, CacheOptions::Expiring { ttl: Duration::from_millis(250) });
    }

    /// Validates documents mixing `ttlMillis` with the capacity keys.
    ///
    /// Assertions:
    /// - Confirms a mix with a known strategy is `InvalidConfig` in JSON and TOML.
    /// - Confirms a mix with an unknown strategy is `UnsupportedStrategy` in
    ///   JSON and TOML.
    #[test]
    fn test_reject_mixed_documents() {
        let json = CacheOptions::from_json_str(
            r#"{"strategy": "FIFO", "capacity": 1, "ttlMillis": 5}"#,
        );
        assert!(matches!(json, Err(CacheError::InvalidConfig { field: "ttlMillis", .. })));

        let toml = CacheOptions::from_toml_str("ttlMillis = 5\ncapacity = 3\n");
        assert!(matches!(toml, Err(CacheError::InvalidConfig { field: "ttlMillis", .. })));

        let json = CacheOptions::from_json_str(
            r#"{"ttlMillis": 100, "strategy": "MRU", "capacity": 2}"#,
        );
        assert!(matches!(json, Err(CacheError::UnsupportedStrategy(name)) if name == "MRU"));

        let toml = CacheOptions::from_toml_str("ttlMillis = 100\nstrategy = \"MRU\"\n");
        assert!(matches!(toml, Err(CacheError::UnsupportedStrategy(name)) if name == "MRU"));
    }

    /// Validates rejection of bad documents.
    ///
    /// Assertions:
    /// - Confirms an unknown strategy is `UnsupportedStrategy`.
    /// - Confirms a zero capacity and a zero TTL are `InvalidConfig`.
    /// - Confirms a malformed document is a serialization error.
    /// - Confirms an incomplete document names the missing field.
    #[test]
    fn test_reject_invalid_documents() {
        let unknown = CacheOptions::from_toml_str("strategy = \"MRU\"\ncapacity = 2\n");
        assert!(matches!(unknown, Err(CacheError::UnsupportedStrategy(_))));

        let zero = CacheOptions::from_json_str(r#"{"strategy": "FIFO", "capacity": 0}"#);
        assert_error_contains!(zero, "capacity");

        let zero_ttl = CacheOptions::from_json_str(r#"{"ttlMillis": 0}"#);
        assert!(matches!(zero_ttl, Err(CacheError::InvalidConfig { field: "ttlMillis", .. })));

        let malformed = CacheOptions::from_json_str(r#"{"capacity": "lots"}"#);
        assert!(matches!(
            malformed,
            Err(CacheError::Common(CommonError::Serialization { ref format, .. })) if format == "json"
        ));

        let no_capacity = CacheOptions::from_toml_str("strategy = \"LRU\"\n");
        assert!(matches!(no_capacity, Err(CacheError::InvalidConfig { field: "capacity", .. })));

        let empty = CacheOptions::from_json_str("{}");
        assert!(matches!(empty, Err(CacheError::InvalidConfig { field: "strategy", .. })));
    }

    /// Validates environment loading.
    ///
    /// Assertions:
    /// - Confirms the TTL variable alone configures an expiring cache.
    /// - Confirms the TTL variable next to the strategy variables is rejected.
    /// - Confirms an unknown strategy is fatal even next to the TTL variable.
    /// - Confirms a missing capacity names the variable.
    /// - Confirms a non-numeric capacity is rejected.
    #[test]
    fn test_from_env_with() {
        let ttl = CacheOptions::from_env_with(env(&[(ENV_TTL_MILLIS, "1000")])).unwrap();
        assert_eq!(ttl, CacheOptions::Expiring { ttl: Duration::from_secs(1) });

        let mixed = CacheOptions::from_env_with(env(&[
            (ENV_STRATEGY, "LRU"),
            (ENV_CAPACITY, "4"),
            (ENV_TTL_MILLIS, "1000"),
        ]));
        assert!(matches!(mixed, Err(CacheError::InvalidConfig { field: "ttlMillis", .. })));

        let unknown =
            CacheOptions::from_env_with(env(&[(ENV_STRATEGY, "MRU"), (ENV_TTL_MILLIS, "1000")]));
        assert!(matches!(unknown, Err(CacheError::UnsupportedStrategy(_))));

        let fifo = CacheOptions::from_env_with(env(&[(ENV_STRATEGY, "fifo"), (ENV_CAPACITY, "3")]))
            .unwrap();
        assert_eq!(fifo.to_string(), "FIFO(capacity=3)");

        let missing = CacheOptions::from_env_with(env(&[(ENV_STRATEGY, "LRU")]));
        assert_error_contains!(missing, ENV_CAPACITY);

        let garbage =
            CacheOptions::from_env_with(env(&[(ENV_STRATEGY, "LRU"), (ENV_CAPACITY, "-1")]));
        assert!(matches!(garbage, Err(CacheError::InvalidConfig { field: "capacity", .. })));
    }

    /// Validates serialization back to the document shape.
    ///
    /// Assertions:
    /// - Confirms the TTL is written as `ttlMillis`.
    /// - Confirms the strategy is written in upper case.
    #[test]
    fn test_serialize_shape() {
        let ttl = CacheOptions::ttl(Duration::from_millis(1500)).unwrap();
        assert_eq!(serde_json::to_string(&ttl).unwrap(), r#"{"ttlMillis":1500}"#);

        let fifo = CacheOptions::capacity(Strategy::Fifo, 8).unwrap();
        assert_eq!(
            serde_json::to_value(fifo).unwrap(),
            serde_json::json!({"strategy": "FIFO", "capacity": 8})
        );
    }
}
