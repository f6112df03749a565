//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (non-empty identifiers, closed
//! status and priority sets) so that once a value reaches the domain layer it
//! can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided status is not one of the known contact statuses.
    #[error("unknown contact status: {0}")]
    UnknownStatus(String),
    /// Provided priority is not one of the known contact priorities.
    #[error("unknown contact priority: {0}")]
    UnknownPriority(String),
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Opaque contact identifier assigned by the remote API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ContactId(String);

impl ContactId {
    /// Trims whitespace and rejects empty identifiers.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the identifier as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ContactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ContactId {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ContactId {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContactId> for String {
    fn from(value: ContactId) -> Self {
        value.0
    }
}

/// Generates a closed, lower-case string enum with parsing and display.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $error:ident, default = $default:ident,
        { $($variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire representation of the value.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            /// Parses a wire value, falling back to the API default for
            /// anything unrecognised.
            pub fn parse_or_default(value: &str) -> Self {
                value.parse().unwrap_or_else(|_| {
                    log::warn!(
                        "Unrecognised {} value {value:?}, using {:?}",
                        stringify!($name),
                        $name::$default
                    );
                    $name::$default
                })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($value => Ok($name::$variant),)+
                    _ => Err(TypeConstraintError::$error(s.to_string())),
                }
            }
        }
    };
}

string_enum!(
    /// Processing state of a contact submission.
    ContactStatus, UnknownStatus, default = Pending,
    {
        Pending => "pending",
        Review => "review",
        Worked => "worked",
        Done => "done",
        Rejected => "rejected",
    }
);

string_enum!(
    /// Urgency assigned to a contact submission by an administrator.
    ContactPriority, UnknownPriority, default = Medium,
    {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_id_rejects_blank_values() {
        assert_eq!(ContactId::new("   "), Err(TypeConstraintError::EmptyString));
        assert_eq!(ContactId::new(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Worked".parse::<ContactStatus>(), Ok(ContactStatus::Worked));
        assert_eq!(" done ".parse::<ContactStatus>(), Ok(ContactStatus::Done));
        assert_eq!(
            "archived".parse::<ContactStatus>(),
            Err(TypeConstraintError::UnknownStatus("archived".to_string()))
        );
    }

    #[test]
    fn unknown_wire_values_fall_back_to_defaults() {
        assert_eq!(ContactStatus::parse_or_default("bogus"), ContactStatus::Pending);
        assert_eq!(ContactPriority::parse_or_default("bogus"), ContactPriority::Medium);
        assert_eq!(ContactPriority::parse_or_default("urgent"), ContactPriority::Urgent);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ContactStatus::Review).unwrap();
        assert_eq!(json, "\"review\"");
        assert_eq!(ContactStatus::ALL.len(), 5);
        assert_eq!(ContactPriority::ALL.len(), 4);
    }
}
