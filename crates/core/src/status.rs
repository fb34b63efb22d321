//! Status enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data in the corresponding
//! `*_statuses` database table. Conversion from a raw id is fallible so an
//! unknown value read from storage is rejected instead of passed through.

use serde::{Deserialize, Serialize};

use crate::types::StatusId;

/// A raw status id that does not correspond to any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} id: {value}")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub value: StatusId,
}

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant = $val ),+
        }

        impl $name {
            /// Every variant, in seed order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Wire label used in JSON payloads.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            /// Parse a wire label. Matching is exact.
            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $( $label => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl TryFrom<StatusId> for $name {
            type Error = UnknownStatus;

            fn try_from(value: StatusId) -> Result<Self, Self::Error> {
                match value {
                    $( v if v == $val => Ok($name::$variant), )+
                    other => Err(UnknownStatus {
                        kind: stringify!($name),
                        value: other,
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_status_enum! {
    /// Event availability. `Full` is derived from capacity, never trusted on its own.
    EventStatus {
        Open = 1 => "open",
        Closed = 2 => "closed",
        Full = 3 => "full",
    }
}

define_status_enum! {
    /// Registration lifecycle status.
    RegistrationStatus {
        AwaitingPayment = 1 => "awaiting_payment",
        Approved = 2 => "approved",
        Rejected = 3 => "rejected",
        Cancelled = 4 => "cancelled",
        Finalized = 5 => "finalized",
    }
}

define_status_enum! {
    /// Friend request status. There is no declined state.
    FriendshipStatus {
        Pending = 1 => "pending",
        Accepted = 2 => "accepted",
    }
}
