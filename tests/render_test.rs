use std::collections::HashMap;

use pretty_assertions::assert_eq;
use sqlweave::prelude::*;

fn users_handle() -> Handle {
    Handle::table("demo", "users")
        .with_column("id")
        .with_column("email")
}

fn context_with_resources() -> Context {
    let mut resources = HashMap::new();
    resources.insert("demo.users".to_string(), Value::Handle(users_handle()));
    Context::new().with("resources", Value::Mapping(resources))
}

#[test]
fn column_quoting_per_dialect() {
    for dialect in ["postgres", "snowflake"] {
        let sql = sqlweave::render("{{ column('email') }}", &Dialect::new(dialect)).unwrap();
        assert_eq!(sql, "\"email\"");
    }
    let sql = sqlweave::render("{{ column('email') }}", &Dialect::new("mysql")).unwrap();
    assert_eq!(sql, "`email`");
    let sql = sqlweave::render("{{ column('email') }}", &Dialect::new("mssql")).unwrap();
    assert_eq!(sql, "[email]");
}

#[test]
fn relation_over_handle_per_dialect() {
    let weaver = Weaver::new();
    let cases = [
        ("mysql", "`demo`.`users`"),
        ("mssql", "[demo].[users]"),
        ("postgres", "\"demo\".\"users\""),
    ];
    for (dialect, expected) in cases {
        let ctx = Context::new().with("t", users_handle());
        let sql = weaver
            .render_with_context("{{ relation(t) }}", &Dialect::new(dialect), ctx)
            .unwrap();
        assert_eq!(sql, expected);
    }
}

#[test]
fn recent_usage_expr_contains_column() {
    for dialect in ["postgres", "snowflake", "mysql"] {
        let sql =
            sqlweave::render("{{ recent_usage_expr('k') }}", &Dialect::new(dialect)).unwrap();
        assert!(
            sql.contains("last_used_at"),
            "{}: missing last_used_at in {}",
            dialect,
            sql
        );
    }
}

#[test]
fn registered_macro_for_new_dialect_returns_exact_value() {
    let weaver = Weaver::new();
    weaver.register_macro("duckdb", "sample_clause", |_, _| {
        Ok("USING SAMPLE 10%".to_string())
    });
    let sql = weaver
        .render("{{ sample_clause() }}", &Dialect::new("duckdb"))
        .unwrap();
    assert_eq!(sql, "USING SAMPLE 10%");
}

#[test]
fn registered_macro_shadows_default_only_under_its_dialect() {
    let weaver = Weaver::new();
    weaver.register_macro("postgres", "current_timestamp", |_, _| {
        Ok("clock_timestamp()".to_string())
    });

    let sql = weaver
        .render("{{ current_timestamp() }}", &Dialect::new("postgres"))
        .unwrap();
    assert_eq!(sql, "clock_timestamp()");

    // Other dialects still see their shipped default.
    let sql = weaver
        .render("{{ current_timestamp() }}", &Dialect::new("snowflake"))
        .unwrap();
    assert_eq!(sql, "CURRENT_TIMESTAMP()");
}

#[test]
fn object_then_relation_matches_direct_handle() {
    let weaver = Weaver::new();
    let dialect = Dialect::new("postgres");

    let via_reference = weaver
        .render_with_context(
            "{{ relation(object('demo.users')) }}",
            &dialect,
            context_with_resources(),
        )
        .unwrap();
    let direct = weaver
        .render_with_context(
            "{{ relation(t) }}",
            &dialect,
            Context::new().with("t", users_handle()),
        )
        .unwrap();
    assert_eq!(via_reference, direct);
}

#[test]
fn unknown_resource_is_resolution_error() {
    let err = sqlweave::render_with_context(
        "{{ object('demo.orders') }}",
        &Dialect::new("postgres"),
        context_with_resources(),
    )
    .unwrap_err();
    assert!(matches!(err, WeaveError::Resolution(_)));
}

#[test]
fn render_is_idempotent() {
    let weaver = Weaver::new();
    let dialect = Dialect::new("snowflake");
    let template =
        "{% set t = object('demo.users') %}SELECT {{ t.email }} FROM {{ relation(t) }}";

    let first = weaver
        .render_with_context(template, &dialect, context_with_resources())
        .unwrap();
    for _ in 0..3 {
        let again = weaver
            .render_with_context(template, &dialect, context_with_resources())
            .unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn scenario_a_select_with_quoting() {
    let sql = sqlweave::render(
        r#"SELECT {{ column("email") }} FROM {{ relation("public","users") }}"#,
        &Dialect::new("postgres"),
    )
    .unwrap();
    assert_eq!(sql, r#"SELECT "email" FROM "public"."users""#);
}

#[test]
fn scenario_b_default_pack_coverage() {
    for dialect in ["postgres", "mysql", "mssql", "snowflake"] {
        let sql = sqlweave::render(
            r#"{{ bool_literal("true") }} {{ limit_clause(5) }}"#,
            &Dialect::new(dialect),
        )
        .unwrap();
        assert!(!sql.trim().is_empty(), "{}: empty render", dialect);
    }
}

#[test]
fn scenario_c_dispatch_composition() {
    let sql = sqlweave::render(
        r#"{% set cutoff = adapter.dispatch("date_add")("day", -7, adapter.dispatch("current_timestamp")()) %}SELECT {{ cutoff }}"#,
        &Dialect::new("postgres"),
    )
    .unwrap();
    assert!(sql.contains("CURRENT_TIMESTAMP"), "got: {}", sql);
    assert!(sql.contains("INTERVAL"), "got: {}", sql);
    assert_eq!(sql, "SELECT (CURRENT_TIMESTAMP + INTERVAL '-7 day')");
}

#[test]
fn handle_column_attr_renders_qualified_identifier() {
    let sql = sqlweave::render_with_context(
        "SELECT {{ t.id }}, {{ t.email }}",
        &Dialect::new("postgres"),
        Context::new().with("t", users_handle()),
    )
    .unwrap();
    assert_eq!(sql, "SELECT demo.users.id, demo.users.email");
}

#[test]
fn macro_errors_abort_without_partial_output() {
    let err = sqlweave::render(
        "SELECT a, b, c {{ limit_clause('ten') }}",
        &Dialect::new("postgres"),
    )
    .unwrap_err();
    assert!(matches!(err, WeaveError::Eval(_)));
}

#[test]
fn unknown_dialect_quotes_but_has_no_pack() {
    let dialect = Dialect::new("duckdb");
    let sql = sqlweave::render("{{ column('email') }}", &dialect).unwrap();
    assert_eq!(sql, "\"email\"");

    let err = sqlweave::render("{{ limit_clause(5) }}", &dialect).unwrap_err();
    assert!(matches!(err, WeaveError::NoSuchMacro { .. }));
}

#[test]
fn mapping_resource_passes_through_relation() {
    let mut shape = HashMap::new();
    shape.insert("handle_type".to_string(), Value::Str("table".into()));
    shape.insert("schema".to_string(), Value::Str("demo".into()));
    shape.insert("table".to_string(), Value::Str("users".into()));
    let mut resources = HashMap::new();
    resources.insert("demo.users".to_string(), Value::Mapping(shape));
    let ctx = Context::new().with("resources", Value::Mapping(resources));

    let sql = sqlweave::render_with_context(
        "{{ relation(object('demo.users')) }}",
        &Dialect::new("mysql"),
        ctx,
    )
    .unwrap();
    assert_eq!(sql, "`demo`.`users`");
}

#[test]
fn concurrent_registration_and_render() {
    use std::sync::Arc;

    let weaver = Arc::new(Weaver::new());
    let dialect = Dialect::new("postgres");

    let writer = {
        let weaver = Arc::clone(&weaver);
        std::thread::spawn(move || {
            for i in 0..100 {
                weaver.register_macro("postgres", "tick", move |_, _| Ok(format!("t{}", i)));
            }
        })
    };
    let reader = {
        let weaver = Arc::clone(&weaver);
        let dialect = dialect.clone();
        std::thread::spawn(move || {
            for _ in 0..100 {
                // Always a complete render: either a pack default or
                // some registered version, never a torn mix.
                let sql = weaver
                    .render("{{ current_timestamp() }}", &dialect)
                    .unwrap();
                assert_eq!(sql, "CURRENT_TIMESTAMP");
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
}
