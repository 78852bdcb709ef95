//! Macro for implementing Display and FromStr for wire-code enums
//!
//! The LMS encodes several enumerations as short lowercase strings (`"m"`,
//! `"hs"`, `"enroll"`). This macro maps each variant to its wire code in both
//! directions so the mapping lives in exactly one place.
//!
//! # Example
//!
//! ```rust
//! use openedx_domain::impl_wire_code_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Pacing {
//!     Instructor,
//!     SelfPaced,
//! }
//!
//! impl_wire_code_conversions!(Pacing {
//!     Instructor => "instructor",
//!     SelfPaced => "self",
//! });
//!
//! assert_eq!(Pacing::SelfPaced.to_string(), "self");
//! assert_eq!("INSTRUCTOR".parse::<Pacing>(), Ok(Pacing::Instructor));
//! ```

/// Implements Display and FromStr traits for wire-code enums
///
/// This macro generates:
/// - Display trait: writes the variant's wire code
/// - FromStr trait: parses case-insensitive wire codes back to variants
///
/// Wire codes must be lowercase.
#[macro_export]
macro_rules! impl_wire_code_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
