//! Validated string identifiers shared by the entity model.
//!
//! Users, teams and pull requests are keyed by caller-supplied strings, so
//! each key gets its own newtype. All of them share one rule set: non-empty,
//! no surrounding whitespace, at most [`IDENTIFIER_MAX_LEN`] characters.

use thiserror::Error;

/// Upper bound on identifier length, matching the `VARCHAR(255)` columns.
pub const IDENTIFIER_MAX_LEN: usize = 255;

/// Validation failures for identifier newtypes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierValidationError {
    /// The identifier was empty.
    #[error("{kind} must not be empty")]
    Empty { kind: &'static str },
    /// The identifier had leading or trailing whitespace.
    #[error("{kind} must not contain surrounding whitespace")]
    SurroundingWhitespace { kind: &'static str },
    /// The identifier exceeded [`IDENTIFIER_MAX_LEN`].
    #[error("{kind} must be at most {max} characters")]
    TooLong { kind: &'static str, max: usize },
}

pub(crate) fn validate_identifier(
    kind: &'static str,
    raw: &str,
) -> Result<(), IdentifierValidationError> {
    if raw.is_empty() {
        return Err(IdentifierValidationError::Empty { kind });
    }
    if raw.trim() != raw {
        return Err(IdentifierValidationError::SurroundingWhitespace { kind });
    }
    if raw.chars().count() > IDENTIFIER_MAX_LEN {
        return Err(IdentifierValidationError::TooLong {
            kind,
            max: IDENTIFIER_MAX_LEN,
        });
    }
    Ok(())
}

/// Declare a validated, serde-transparent string identifier.
macro_rules! string_identifier {
    ($(#[$outer:meta])* $name:ident, $kind:literal) => {
        $(#[$outer])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
            ::utoipa::ToSchema,
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap the given identifier.
            pub fn new(
                raw: impl Into<String>,
            ) -> Result<Self, $crate::domain::IdentifierValidationError> {
                let raw = raw.into();
                $crate::domain::identifier::validate_identifier($kind, &raw)?;
                Ok(Self(raw))
            }

            /// Borrow the identifier text.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::IdentifierValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::IdentifierValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

pub(crate) use string_identifier;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    string_identifier! {
        /// Identifier used only by these tests.
        ProbeId, "probe id"
    }

    #[rstest]
    #[case("u1")]
    #[case("team-core")]
    #[case("pr 1001")]
    fn accepts_plain_identifiers(#[case] raw: &str) {
        let id = ProbeId::new(raw).expect("valid identifier");
        assert_eq!(id.as_str(), raw);
    }

    #[rstest]
    #[case("", IdentifierValidationError::Empty { kind: "probe id" })]
    #[case(" u1", IdentifierValidationError::SurroundingWhitespace { kind: "probe id" })]
    #[case("u1\n", IdentifierValidationError::SurroundingWhitespace { kind: "probe id" })]
    fn rejects_malformed_identifiers(
        #[case] raw: &str,
        #[case] expected: IdentifierValidationError,
    ) {
        assert_eq!(ProbeId::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_identifiers() {
        let raw = "x".repeat(IDENTIFIER_MAX_LEN + 1);
        assert!(matches!(
            ProbeId::new(raw),
            Err(IdentifierValidationError::TooLong { .. })
        ));
    }

    #[rstest]
    fn deserialisation_runs_validation() {
        let parsed: Result<ProbeId, _> = serde_json::from_str("\"  \"");
        assert!(parsed.is_err());
        let ok: ProbeId = serde_json::from_str("\"u7\"").expect("valid json id");
        assert_eq!(ok.to_string(), "u7");
    }
}
