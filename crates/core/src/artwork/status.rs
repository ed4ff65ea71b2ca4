//! Status enums for artwork items and batches.
//!
//! Each enum is stored as its snake_case string in the database and on the
//! wire. `parse` is the inverse of `as_str`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The stored string form.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $val),+
                }
            }

            /// Parse the stored string form.
            pub fn parse(value: &str) -> Result<Self, CoreError> {
                match value {
                    $($val => Ok($name::$variant),)+
                    other => Err(CoreError::Validation(format!(
                        concat!("Invalid ", stringify!($name), " '{}'. Must be one of: {}"),
                        other,
                        [$($val),+].join(", ")
                    ))),
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

define_string_enum! {
    /// Review state of a single artwork item.
    ItemStatus {
        Pending = "pending",
        Approved = "approved",
        Rejected = "rejected",
    }
}

define_string_enum! {
    /// Derived state of a whole batch.
    BatchStatus {
        Pending = "pending",
        Partial = "partial",
        Approved = "approved",
        Rejected = "rejected",
    }
}

define_string_enum! {
    /// The kind of decision a customer recorded on an item.
    ApprovalType {
        ApproveAsIs = "approve_as_is",
        ApproveWithChanges = "approve_with_changes",
        NotApproved = "not_approved",
    }
}

impl ItemStatus {
    /// Whether the customer has recorded a decision on the item.
    pub fn is_decided(self) -> bool {
        self != ItemStatus::Pending
    }
}

impl ApprovalType {
    /// The item status a decision of this type produces.
    pub fn resulting_status(self) -> ItemStatus {
        match self {
            ApprovalType::ApproveAsIs | ApprovalType::ApproveWithChanges => ItemStatus::Approved,
            ApprovalType::NotApproved => ItemStatus::Rejected,
        }
    }

    /// Whether this decision requires a fully checked checklist.
    pub fn requires_checklist(self) -> bool {
        self.resulting_status() == ItemStatus::Approved
    }
}
