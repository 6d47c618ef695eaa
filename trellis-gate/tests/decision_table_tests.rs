//! The authorization decision table, checked two ways: exhaustively over
//! every valid compiled combination, and as a proptest property with an
//! independently stated oracle.

use proptest::prelude::*;
use trellis_gate::{Access, Operation, authorize};
use trellis_model::{fields, string};
use trellis_schema::{AccessLevel, EntityDef, Lifecycle, entity};
use trellis_types::Caller;

const LEVELS: [AccessLevel; 3] = [
    AccessLevel::Unauthenticated,
    AccessLevel::Authenticated,
    AccessLevel::Owner,
];
const LIFECYCLES: [Lifecycle; 3] = [
    Lifecycle::Default,
    Lifecycle::InstancePerUser,
    Lifecycle::Singleton,
];
const OPERATIONS: [Operation; 5] = [
    Operation::ReadList,
    Operation::ReadOne,
    Operation::Create,
    Operation::Update,
    Operation::Delete,
];

const OWNER: &str = "alice";

fn compile(read: AccessLevel, write: AccessLevel, lifecycle: Lifecycle) -> Option<EntityDef> {
    entity("T", fields![string("a")])
        .read_level(read)
        .write_level(write)
        .lifecycle(lifecycle)
        .build()
        .ok()
}

// the §4.5 rule table, restated independently of the implementation
fn oracle(def: &EntityDef, op: Operation, caller: &Caller, record_owner: Option<&str>) -> Access {
    let level = if op.is_read() {
        def.read_level()
    } else {
        def.write_level()
    };

    match level {
        AccessLevel::Unauthenticated => Access::Granted,
        AccessLevel::Authenticated => match caller.username() {
            Some(_) => Access::Granted,
            None => Access::Denied,
        },
        AccessLevel::Owner => match (op, caller.username()) {
            (_, None) => Access::Denied,
            (Operation::ReadList, Some(_)) => Access::OwnerScoped,
            (Operation::Create, Some(_)) => Access::Granted,
            (_, Some(name)) => {
                if record_owner == Some(name) {
                    Access::Granted
                } else {
                    Access::Denied
                }
            }
        },
    }
}

fn caller_states() -> [Caller; 3] {
    [
        Caller::Anonymous,
        Caller::user("mallory"), // authenticated, not the owner
        Caller::user(OWNER),     // authenticated owner
    ]
}

#[test]
fn authorize_agrees_with_the_rule_table_everywhere() {
    for read in LEVELS {
        for write in LEVELS {
            for lifecycle in LIFECYCLES {
                let Some(def) = compile(read, write, lifecycle) else {
                    continue; // invalid combinations never reach the gate
                };
                for op in OPERATIONS {
                    let record_owner = match op {
                        Operation::ReadList | Operation::Create => None,
                        _ => Some(OWNER),
                    };
                    for caller in caller_states() {
                        assert_eq!(
                            authorize(&def, op, &caller, record_owner),
                            oracle(&def, op, &caller, record_owner),
                            "disagreement at ({read}, {write}, {lifecycle}) {op} as {caller:?}"
                        );
                    }
                }
            }
        }
    }
}

// ── Property form, with arbitrary usernames and owners ───────────

fn level_strategy() -> impl Strategy<Value = AccessLevel> {
    prop::sample::select(LEVELS.to_vec())
}

fn lifecycle_strategy() -> impl Strategy<Value = Lifecycle> {
    prop::sample::select(LIFECYCLES.to_vec())
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop::sample::select(OPERATIONS.to_vec())
}

fn caller_strategy() -> impl Strategy<Value = Caller> {
    prop_oneof![
        Just(Caller::Anonymous),
        "[a-z]{1,8}".prop_map(Caller::user),
    ]
}

proptest! {
    #[test]
    fn authorize_matches_oracle_for_arbitrary_identities(
        read in level_strategy(),
        write in level_strategy(),
        lifecycle in lifecycle_strategy(),
        op in operation_strategy(),
        caller in caller_strategy(),
        record_owner in prop::option::of("[a-z]{1,8}"),
    ) {
        let Some(def) = compile(read, write, lifecycle) else {
            return Ok(());
        };
        let record_owner = record_owner.as_deref();
        prop_assert_eq!(
            authorize(&def, op, &caller, record_owner),
            oracle(&def, op, &caller, record_owner)
        );
    }
}
