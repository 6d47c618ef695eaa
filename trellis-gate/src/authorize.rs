//! The pure access decision function.

use serde::{Deserialize, Serialize};
use std::fmt;
use trellis_schema::{AccessLevel, EntityDef};
use trellis_types::Caller;

/// A data-access operation, as seen by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    ReadList,
    ReadOne,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Whether the operation is gated by `read_level` (vs `write_level`).
    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::ReadList | Self::ReadOne)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ReadList => "read-list",
            Self::ReadOne => "read-one",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        write!(f, "{label}")
    }
}

/// The outcome of an access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The operation may proceed unrestricted.
    Granted,
    /// Listing may proceed, narrowed to the caller's own records.
    OwnerScoped,
    /// The operation is refused.
    Denied,
}

/// Decides whether `caller` may perform `op` on a record of `def`.
///
/// `record_owner` is the stored owner for per-record operations; pass
/// `None` for `Create` and `ReadList`, which have no record yet.
///
/// Owner-level listing returns [`Access::OwnerScoped`] rather than a
/// denial: the caller sees a filtered view of their own records. Owner-level
/// `Create` only requires an authenticated caller — ownership is assigned
/// to them, there is no existing owner to compare against.
#[must_use]
pub fn authorize(
    def: &EntityDef,
    op: Operation,
    caller: &Caller,
    record_owner: Option<&str>,
) -> Access {
    let level = if op.is_read() {
        def.read_level()
    } else {
        def.write_level()
    };

    match level {
        AccessLevel::Unauthenticated => Access::Granted,
        AccessLevel::Authenticated => {
            if caller.is_authenticated() {
                Access::Granted
            } else {
                Access::Denied
            }
        }
        AccessLevel::Owner => owner_access(op, caller, record_owner),
    }
}

fn owner_access(op: Operation, caller: &Caller, record_owner: Option<&str>) -> Access {
    let Some(username) = caller.username() else {
        return Access::Denied;
    };

    match op {
        Operation::ReadList => Access::OwnerScoped,
        Operation::Create => Access::Granted,
        Operation::ReadOne | Operation::Update | Operation::Delete => {
            if record_owner == Some(username) {
                Access::Granted
            } else {
                Access::Denied
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_model::{fields, string};
    use trellis_schema::{Lifecycle, entity};

    fn def(read: AccessLevel, write: AccessLevel) -> EntityDef {
        entity("T", fields![string("a")])
            .read_level(read)
            .write_level(write)
            .build()
            .unwrap()
    }

    #[test]
    fn unauthenticated_levels_admit_everyone() {
        let d = def(AccessLevel::Unauthenticated, AccessLevel::Unauthenticated);
        for op in [
            Operation::ReadList,
            Operation::ReadOne,
            Operation::Create,
            Operation::Update,
            Operation::Delete,
        ] {
            assert_eq!(authorize(&d, op, &Caller::Anonymous, None), Access::Granted);
            assert_eq!(
                authorize(&d, op, &Caller::user("alice"), None),
                Access::Granted
            );
        }
    }

    #[test]
    fn authenticated_level_requires_identity() {
        let d = def(AccessLevel::Authenticated, AccessLevel::Authenticated);
        assert_eq!(
            authorize(&d, Operation::ReadOne, &Caller::Anonymous, None),
            Access::Denied
        );
        assert_eq!(
            authorize(&d, Operation::ReadOne, &Caller::user("alice"), None),
            Access::Granted
        );
    }

    #[test]
    fn owner_read_one_compares_usernames() {
        let d = def(AccessLevel::Owner, AccessLevel::Owner);
        let alice = Caller::user("alice");

        assert_eq!(
            authorize(&d, Operation::ReadOne, &alice, Some("alice")),
            Access::Granted
        );
        assert_eq!(
            authorize(&d, Operation::ReadOne, &alice, Some("bob")),
            Access::Denied
        );
        assert_eq!(
            authorize(&d, Operation::ReadOne, &alice, None),
            Access::Denied
        );
    }

    #[test]
    fn owner_list_is_scoped_not_denied() {
        let d = def(AccessLevel::Owner, AccessLevel::Owner);
        assert_eq!(
            authorize(&d, Operation::ReadList, &Caller::user("alice"), None),
            Access::OwnerScoped
        );
        assert_eq!(
            authorize(&d, Operation::ReadList, &Caller::Anonymous, None),
            Access::Denied
        );
    }

    #[test]
    fn owner_create_needs_only_authentication() {
        let d = def(AccessLevel::Owner, AccessLevel::Owner);
        assert_eq!(
            authorize(&d, Operation::Create, &Caller::user("alice"), None),
            Access::Granted
        );
        assert_eq!(
            authorize(&d, Operation::Create, &Caller::Anonymous, None),
            Access::Denied
        );
    }

    #[test]
    fn owner_update_and_delete_compare_usernames() {
        let d = def(AccessLevel::Owner, AccessLevel::Owner);
        let alice = Caller::user("alice");

        for op in [Operation::Update, Operation::Delete] {
            assert_eq!(authorize(&d, op, &alice, Some("alice")), Access::Granted);
            assert_eq!(authorize(&d, op, &alice, Some("bob")), Access::Denied);
            assert_eq!(
                authorize(&d, op, &Caller::Anonymous, Some("alice")),
                Access::Denied
            );
        }
    }

    #[test]
    fn read_and_write_levels_gate_independently() {
        // public read, authenticated write
        let d = entity("T", fields![string("a")])
            .write_level(AccessLevel::Authenticated)
            .lifecycle(Lifecycle::Default)
            .build()
            .unwrap();

        assert_eq!(
            authorize(&d, Operation::ReadList, &Caller::Anonymous, None),
            Access::Granted
        );
        assert_eq!(
            authorize(&d, Operation::Create, &Caller::Anonymous, None),
            Access::Denied
        );
        assert_eq!(
            authorize(&d, Operation::Create, &Caller::user("alice"), None),
            Access::Granted
        );
    }
}
