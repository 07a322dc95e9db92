//! Identifier newtypes
//!
//! Tasks, boards and activity events get ULIDs. Columns use human-readable
//! slugs (`todo`, `in-review`) so their files are easy to find on disk.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier string
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

macro_rules! ulid_id {
    ($name:ident) => {
        impl $name {
            /// Generate a fresh ULID
            pub fn new() -> Self {
                Self(Ulid::new().to_string())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

string_id!(
    /// Identity of a board
    BoardId
);
string_id!(
    /// Column slug, unique within a board
    ColumnId
);
string_id!(
    /// Identity of a task
    TaskId
);
string_id!(
    /// Identity of an audit event
    ActivityId
);

ulid_id!(BoardId);
ulid_id!(TaskId);
ulid_id!(ActivityId);

impl ColumnId {
    /// Whether this is a usable slug: lowercase ASCII letters, digits, `-` and `_`.
    ///
    /// Column ids double as file names, so anything else is rejected.
    pub fn is_valid_slug(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    }
}
