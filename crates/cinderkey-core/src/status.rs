//! Key lifecycle status.
//!
//! ```text
//! New ──decrypt──► Used ──decrypt──► Used
//!  │                 │
//!  └────disable──────┴──► Disabled (terminal)
//! ```
//!
//! On the wire the status is an unsigned integer. `0` is the "unknown"
//! sentinel of an uninitialized record and is never accepted.

use std::fmt;

use crate::error::KeyringError;

/// Wire value of an uninitialized status. Rejected on decode.
pub const STATUS_UNKNOWN: u64 = 0;

/// Lifecycle status of a [`crate::Key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyStatus {
    /// Created and never decrypted
    New,
    /// Decrypted at least once
    Used,
    /// Soft-deleted; hidden from lookups and never re-enabled
    Disabled,
}

impl KeyStatus {
    /// Integer used by both serialization formats.
    pub fn to_wire(self) -> u64 {
        match self {
            Self::New => 1,
            Self::Used => 2,
            Self::Disabled => 3,
        }
    }

    /// Parse a wire value.
    ///
    /// # Errors
    ///
    /// - `SerializationFailure`: the value is [`STATUS_UNKNOWN`] or above 3
    pub fn from_wire(value: u64) -> Result<Self, KeyringError> {
        match value {
            1 => Ok(Self::New),
            2 => Ok(Self::Used),
            3 => Ok(Self::Disabled),
            STATUS_UNKNOWN => Err(KeyringError::serialization("key status is unknown (0)")),
            other => Err(KeyringError::serialization(format!("unknown key status: {other}"))),
        }
    }

    /// True once the key has been disabled.
    pub fn is_disabled(self) -> bool {
        self == Self::Disabled
    }

    /// Status after a successful decrypt. `Disabled` never regresses.
    pub(crate) fn after_decrypt(self) -> Self {
        match self {
            Self::Disabled => Self::Disabled,
            Self::New | Self::Used => Self::Used,
        }
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::New => "new",
            Self::Used => "used",
            Self::Disabled => "disabled",
        };
        f.write_str(name)
    }
}
