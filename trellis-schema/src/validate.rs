//! The access/lifecycle validation engine.
//!
//! A pure, deterministic check over the compiled definition's
//! `(read_level, write_level, lifecycle)` combination. The rule set is an
//! ordered table — the first failing rule wins and nothing accumulates —
//! so the whole 3×3×3 space has one enumerable answer, exercised
//! exhaustively in the tests below.

use crate::entity::EntityDef;
use crate::error::{CompileError, CompileResult};
use crate::level::{AccessLevel, Lifecycle};

type Rule = fn(&EntityDef) -> CompileResult<()>;

/// Invariant rules, in fail-fast order.
const RULES: &[Rule] = &[
    write_not_broader_than_read,
    per_user_requires_identity,
    singleton_not_owner_scoped,
];

/// Validates a compiled definition against the invariant table.
pub fn validate(def: &EntityDef) -> CompileResult<()> {
    for rule in RULES {
        rule(def)?;
    }

    Ok(())
}

// Writes must never be open to callers who cannot read.
fn write_not_broader_than_read(def: &EntityDef) -> CompileResult<()> {
    if def.write_level.permissiveness() > def.read_level.permissiveness() {
        return Err(CompileError::WriteBroaderThanRead {
            entity: def.name.clone(),
            read: def.read_level,
            write: def.write_level,
        });
    }

    Ok(())
}

// A per-user singleton is meaningless without identifying the user.
fn per_user_requires_identity(def: &EntityDef) -> CompileResult<()> {
    if def.lifecycle == Lifecycle::InstancePerUser
        && def.read_level == AccessLevel::Unauthenticated
    {
        return Err(CompileError::PerUserRequiresIdentity {
            entity: def.name.clone(),
            lifecycle: def.lifecycle,
        });
    }

    Ok(())
}

// A single shared instance cannot be scoped to one owner.
fn singleton_not_owner_scoped(def: &EntityDef) -> CompileResult<()> {
    if def.lifecycle == Lifecycle::Singleton
        && (def.read_level == AccessLevel::Owner || def.write_level == AccessLevel::Owner)
    {
        return Err(CompileError::SingletonOwnerScoped {
            entity: def.name.clone(),
            read: def.read_level,
            write: def.write_level,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::entity;
    use trellis_model::{fields, string};

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

    fn build(read: AccessLevel, write: AccessLevel, lifecycle: Lifecycle) -> CompileResult<EntityDef> {
        entity("Sample", fields![string("name")])
            .read_level(read)
            .write_level(write)
            .lifecycle(lifecycle)
            .build()
    }

    // independent statement of validity, to check the rule table against
    fn expected_valid(read: AccessLevel, write: AccessLevel, lifecycle: Lifecycle) -> bool {
        let write_ok = write.permissiveness() <= read.permissiveness();
        let per_user_ok = !(lifecycle == Lifecycle::InstancePerUser
            && read == AccessLevel::Unauthenticated);
        let singleton_ok = !(lifecycle == Lifecycle::Singleton
            && (read == AccessLevel::Owner || write == AccessLevel::Owner));
        write_ok && per_user_ok && singleton_ok
    }

    #[test]
    fn exhaustive_over_all_27_combinations() {
        for read in LEVELS {
            for write in LEVELS {
                for lifecycle in LIFECYCLES {
                    let result = build(read, write, lifecycle);
                    assert_eq!(
                        result.is_ok(),
                        expected_valid(read, write, lifecycle),
                        "({read}, {write}, {lifecycle}) validated unexpectedly as {result:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn exactly_twelve_combinations_are_valid() {
        // 3×3×3 = 27 tuples; the rule table admits a fixed subset:
        // 6 write-within-read pairs with Default, 3 with InstancePerUser,
        // 3 with Singleton
        let valid = LEVELS
            .iter()
            .flat_map(|r| LEVELS.iter().map(move |w| (*r, *w)))
            .flat_map(|(r, w)| LIFECYCLES.iter().map(move |l| (r, w, *l)))
            .filter(|(r, w, l)| expected_valid(*r, *w, *l))
            .count();
        assert_eq!(valid, 12);
    }

    #[test]
    fn first_failing_rule_wins() {
        // violates both the permissiveness rule and the singleton rule;
        // the permissiveness rule is first in the table
        let err = build(
            AccessLevel::Owner,
            AccessLevel::Unauthenticated,
            Lifecycle::Singleton,
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::WriteBroaderThanRead { .. }));
    }

    #[test]
    fn permissiveness_failure_names_both_levels() {
        let err = build(
            AccessLevel::Owner,
            AccessLevel::Authenticated,
            Lifecycle::Default,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("writeLevel"));
        assert!(message.contains("readLevel"));
        assert!(message.contains("authenticated"));
        assert!(message.contains("owner"));
    }

    #[test]
    fn per_user_with_unauthenticated_read_fails() {
        let err = build(
            AccessLevel::Unauthenticated,
            AccessLevel::Unauthenticated,
            Lifecycle::InstancePerUser,
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::PerUserRequiresIdentity { .. }));
    }

    #[test]
    fn per_user_with_authenticated_read_succeeds() {
        assert!(
            build(
                AccessLevel::Authenticated,
                AccessLevel::Authenticated,
                Lifecycle::InstancePerUser,
            )
            .is_ok()
        );
    }

    #[test]
    fn singleton_with_owner_read_fails() {
        let err = build(AccessLevel::Owner, AccessLevel::Owner, Lifecycle::Singleton).unwrap_err();
        assert!(matches!(err, CompileError::SingletonOwnerScoped { .. }));
    }

    #[test]
    fn singleton_with_authenticated_levels_succeeds() {
        assert!(
            build(
                AccessLevel::Authenticated,
                AccessLevel::Authenticated,
                Lifecycle::Singleton,
            )
            .is_ok()
        );
    }
}
