//! Opaque scoping ids.
//!
//! Tenants and credentials are issued by the external registry; entity ids
//! are the upstream accounting API's natural keys. All three are plain i64
//! values wrapped so they cannot be swapped by accident.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype! {
    /// Identifies one customer of the platform; every warehouse row carries one.
    TenantId
}

id_newtype! {
    /// One upstream API credential held by a tenant; a tenant may hold several.
    CredentialId
}

id_newtype! {
    /// Natural key issued by the upstream accounting API for one entity.
    EntityId
}
