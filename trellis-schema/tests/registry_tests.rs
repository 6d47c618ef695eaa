use trellis_model::{fields, string};
use trellis_schema::{CompileError, SchemaRegistry, entity};

fn task(field: &str) -> trellis_schema::EntityDef {
    entity("Task", fields![string(field)]).build().unwrap()
}

// ── Strict mode (default) ────────────────────────────────────────

#[test]
fn register_and_get() {
    let registry = SchemaRegistry::new();
    registry.register(task("title")).unwrap();

    let def = registry.get("Task").unwrap();
    assert_eq!(def.name(), "Task");
    assert_eq!(def.table(), "task");
    assert!(registry.get("Missing").is_none());
}

#[test]
fn duplicate_name_is_rejected_by_default() {
    let registry = SchemaRegistry::new();
    registry.register(task("title")).unwrap();

    let err = registry.register(task("body")).unwrap_err();
    assert_eq!(
        err,
        CompileError::DuplicateEntity {
            name: "Task".into()
        }
    );
    // the original definition is untouched
    assert!(registry.get("Task").unwrap().field("title").is_some());
}

#[test]
fn distinct_names_colliding_on_table_are_rejected() {
    let registry = SchemaRegistry::new();
    registry
        .register(entity("BlogPost", fields![string("a")]).build().unwrap())
        .unwrap();

    let err = registry
        .register(entity("blog_post", fields![string("a")]).build().unwrap())
        .unwrap_err();
    assert!(matches!(err, CompileError::TableCollision { .. }));
}

#[test]
fn names_and_len() {
    let registry = SchemaRegistry::new();
    assert!(registry.is_empty());

    registry
        .register(entity("B", fields![string("x")]).build().unwrap())
        .unwrap();
    registry
        .register(entity("A", fields![string("x")]).build().unwrap())
        .unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.names(), ["A", "B"]);
}

#[test]
fn clear_resets_the_registry() {
    let registry = SchemaRegistry::new();
    registry.register(task("title")).unwrap();
    registry.clear();
    assert!(registry.is_empty());
    // after a reset the same name registers again
    registry.register(task("title")).unwrap();
}

// ── Permissive mode ──────────────────────────────────────────────

#[test]
fn permissive_mode_is_last_write_wins() {
    let registry = SchemaRegistry::permissive();
    registry.register(task("title")).unwrap();
    registry.register(task("body")).unwrap();

    let def = registry.get("Task").unwrap();
    assert!(def.field("body").is_some());
    assert!(def.field("title").is_none());
    assert_eq!(registry.len(), 1);
}

#[test]
fn registered_arc_matches_lookup() {
    let registry = SchemaRegistry::permissive();
    let returned = registry.register(task("title")).unwrap();
    let looked_up = registry.get("Task").unwrap();
    assert!(std::sync::Arc::ptr_eq(&returned, &looked_up));
}
