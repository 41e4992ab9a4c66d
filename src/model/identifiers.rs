//! Core identifier newtypes with smart constructors.
//!
//! All identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when an identifier is constructed from an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{what} must not be empty")]
pub struct InvalidId {
    /// Which identifier was being built.
    pub what: &'static str,
}

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident, $what:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Smart constructor: rejects empty (or whitespace-only) strings.
            pub fn new(raw: impl Into<String>) -> Result<Self, InvalidId> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    return Err(InvalidId { what: $what });
                }
                Ok(Self(raw))
            }

            /// Borrow the underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidId;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a catalog node. Unique across one catalog tree.
    NodeId,
    "node id"
);

string_id!(
    /// Identifier of a selectable item inside a selection group.
    ItemId,
    "item id"
);

string_id!(
    /// Name of a selection group (e.g. `tipoVisao`, `material`).
    GroupName,
    "group name"
);

impl From<&NodeId> for ItemId {
    fn from(id: &NodeId) -> Self {
        // Node ids are already validated non-empty.
        Self(id.0.clone())
    }
}

impl GroupName {
    /// Group name from a compile-time constant. Callers pass non-empty literals.
    pub(crate) fn from_static(name: &'static str) -> Self {
        debug_assert!(!name.trim().is_empty());
        Self(name.to_string())
    }
}
