//! Serialization helpers for common data types

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a `Duration` as whole milliseconds (u64)
///
/// Cache options express TTLs in milliseconds (`ttlMillis`), so durations
/// cross the serde boundary in that unit.
///
/// # Usage
/// ```rust
/// use std::time::Duration;
///
/// use evictkit_common::duration_millis;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Expiry {
///     #[serde(with = "duration_millis")]
///     ttl: Duration,
/// }
/// ```
pub mod duration_millis {
    use super::{Deserialize, Deserializer, Duration, Serializer};

    /// Serde serialization result type
    type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

    /// Serialize a Duration as milliseconds, saturating at `u64::MAX`
    pub fn serialize<S>(duration: &Duration, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    /// Deserialize milliseconds (u64) into a Duration
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }

    /// The same encoding for an optional field
    ///
    /// Pair with `#[serde(default)]` so a missing field reads as `None`.
    pub mod option {
        use super::{Deserialize, Deserializer, Duration, SerializeResult, Serializer};

        /// Serialize `Some` as milliseconds and `None` as a unit value
        #[allow(clippy::ref_option)] // signature fixed by serde's `with`
        pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> SerializeResult<S>
        where
            S: Serializer,
        {
            match duration {
                Some(duration) => super::serialize(duration, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize optional milliseconds into an optional Duration
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
        }
    }
}
