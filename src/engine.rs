//! Render engine.
//!
//! [`Weaver`] owns the macro registry and a parse cache, and drives a
//! parsed template through the evaluator. Each render call owns its
//! context; the registry is the only shared state, and a render reads
//! one consistent snapshot of it for its whole pass.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::ast::Node;
use crate::dialect::Dialect;
use crate::error::WeaveResult;
use crate::eval::Evaluator;
use crate::parser;
use crate::registry::{MacroRegistry, RegistrySnapshot};
use crate::value::{Callable, Context, Value};

/// The templating engine: registry + parse cache + render loop.
#[derive(Default)]
pub struct Weaver {
    registry: MacroRegistry,
    cache: RwLock<HashMap<String, Arc<Vec<Node>>>>,
}

impl Weaver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The engine's macro registry, for direct access.
    pub fn registry(&self) -> &MacroRegistry {
        &self.registry
    }

    /// Install a macro at `(dialect, name)`, overwriting any prior
    /// entry for that exact pair. Safe to call while renders are in
    /// flight; running renders keep their snapshot.
    pub fn register_macro<F>(&self, dialect: impl Into<String>, name: impl Into<String>, f: F)
    where
        F: Fn(&Dialect, &[Value]) -> WeaveResult<String> + Send + Sync + 'static,
    {
        self.registry.register_macro(dialect, name, f);
    }

    /// Render a template with an empty context.
    pub fn render(&self, template: &str, dialect: &Dialect) -> WeaveResult<String> {
        self.render_with_context(template, dialect, Context::new())
    }

    /// Render a template against caller-seeded bindings.
    ///
    /// Evaluates nodes in order: literals emit their text, `set` nodes
    /// bind and emit nothing, output nodes emit the canonical
    /// stringification of their value. Any error aborts the render;
    /// no partial SQL is ever returned.
    pub fn render_with_context(
        &self,
        template: &str,
        dialect: &Dialect,
        mut ctx: Context,
    ) -> WeaveResult<String> {
        let nodes = self.parsed(template)?;
        let snapshot: RegistrySnapshot = self.registry.snapshot();
        seed_adapter(&mut ctx);

        let evaluator = Evaluator::new(dialect, &snapshot);
        let mut out = String::new();
        for node in nodes.iter() {
            match node {
                Node::Literal(text) => out.push_str(text),
                Node::Set { name, expr } => {
                    let value = evaluator.eval(expr, &ctx)?;
                    ctx.set(name.clone(), value);
                }
                Node::Output(expr) => {
                    out.push_str(&evaluator.eval(expr, &ctx)?.to_text()?);
                }
            }
        }
        Ok(out)
    }

    /// Parse a template, reusing the cached node list for repeated
    /// renders of identical text.
    fn parsed(&self, template: &str) -> WeaveResult<Arc<Vec<Node>>> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(nodes) = cache.get(template) {
                return Ok(Arc::clone(nodes));
            }
        }
        let nodes = Arc::new(parser::parse(template)?);
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(template.to_string())
            .or_insert_with(|| Arc::clone(&nodes));
        Ok(nodes)
    }
}

/// Seed the `adapter.dispatch` bridge unless the caller bound its own
/// `adapter`.
fn seed_adapter(ctx: &mut Context) {
    if !ctx.contains("adapter") {
        let mut adapter = HashMap::new();
        adapter.insert(
            "dispatch".to_string(),
            Value::Callable(Callable::Dispatch),
        );
        ctx.set("adapter", Value::Mapping(adapter));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Handle;

    #[test]
    fn test_render_literal_only() {
        let weaver = Weaver::new();
        let sql = weaver
            .render("SELECT 1", &Dialect::new("postgres"))
            .unwrap();
        assert_eq!(sql, "SELECT 1");
    }

    #[test]
    fn test_set_binds_for_subsequent_nodes() {
        let weaver = Weaver::new();
        let sql = weaver
            .render(
                "{% set c = column('email') %}SELECT {{ c }}",
                &Dialect::new("postgres"),
            )
            .unwrap();
        assert_eq!(sql, "SELECT \"email\"");
    }

    #[test]
    fn test_set_before_use_only() {
        let weaver = Weaver::new();
        let err = weaver
            .render(
                "SELECT {{ c }}{% set c = column('email') %}",
                &Dialect::new("postgres"),
            )
            .unwrap_err();
        assert!(err.to_string().contains("undefined variable 'c'"));
    }

    #[test]
    fn test_context_bindings_visible() {
        let weaver = Weaver::new();
        let ctx = Context::new().with("t", Handle::table("demo", "users"));
        let sql = weaver
            .render_with_context(
                "SELECT * FROM {{ relation(t) }}",
                &Dialect::new("mysql"),
                ctx,
            )
            .unwrap();
        assert_eq!(sql, "SELECT * FROM `demo`.`users`");
    }

    #[test]
    fn test_adapter_seeded_automatically() {
        let weaver = Weaver::new();
        let sql = weaver
            .render(
                "{{ adapter.dispatch('current_timestamp')() }}",
                &Dialect::new("mysql"),
            )
            .unwrap();
        assert_eq!(sql, "NOW()");
    }

    #[test]
    fn test_error_yields_no_partial_output() {
        let weaver = Weaver::new();
        let result = weaver.render("SELECT {{ missing }}", &Dialect::new("postgres"));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_cache_reuse() {
        let weaver = Weaver::new();
        let dialect = Dialect::new("postgres");
        let first = weaver.render("SELECT {{ column('a') }}", &dialect).unwrap();
        let second = weaver.render("SELECT {{ column('a') }}", &dialect).unwrap();
        assert_eq!(first, second);
        let cache = weaver.cache.read().unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_register_macro_then_render() {
        let weaver = Weaver::new();
        weaver.register_macro("duckdb", "bool_literal", |_, args| {
            Ok(format!("CAST({} AS BOOLEAN)", args[0].to_text()?))
        });
        let sql = weaver
            .render("{{ bool_literal(true) }}", &Dialect::new("duckdb"))
            .unwrap();
        assert_eq!(sql, "CAST(true AS BOOLEAN)");
    }
}
