//! Macros for reducing boilerplate code

/// Implements `Display` and `FromStr` for unit-only enums
///
/// - `Display` writes the mapped string verbatim.
/// - `FromStr` matches case-insensitively and reports unknown input as a
///   [`CommonError::Validation`](crate::error::CommonError::Validation)
///   naming the enum.
///
/// # Example
///
/// ```rust
/// use evictkit_common::impl_enum_conversions;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// pub enum Strategy {
///     Fifo,
///     Lru,
/// }
///
/// impl_enum_conversions!(Strategy {
///     Fifo => "FIFO",
///     Lru => "LRU",
/// });
///
/// assert_eq!(Strategy::Lru.to_string(), "LRU");
/// assert_eq!("fifo".parse::<Strategy>().unwrap(), Strategy::Fifo);
/// assert!("mru".parse::<Strategy>().is_err());
/// ```
#[macro_export]
macro_rules! impl_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::CommonError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err($crate::error::CommonError::validation(
                    stringify!($enum_name),
                    format!("unknown value '{}'", s),
                ))
            }
        }
    };
}
