//! Numeric identifiers handed out by the store's sequence counters.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

numeric_id!(
    /// Account identifier. `0` is the guest (unauthenticated) identity.
    UserId
);
numeric_id!(PostId);
numeric_id!(TopicId);
numeric_id!(
    /// Category identifier. `0` is the virtual root every top-level category hangs from.
    CategoryId
);

impl UserId {
    pub const GUEST: UserId = UserId(0);

    pub fn is_guest(self) -> bool {
        self.0 == 0
    }
}

impl CategoryId {
    pub const ROOT: CategoryId = CategoryId(0);
}
