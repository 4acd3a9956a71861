//! Runtime value model for template evaluation.
//!
//! Every expression evaluates to a [`Value`]. The engine never coerces
//! between variants implicitly; the only conversion is stringification
//! of an output node, via [`Value::to_text`].

use std::collections::HashMap;

use crate::error::{WeaveError, WeaveResult};
use crate::handle::Handle;

/// Dynamic value type for template evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
    Handle(Handle),
    Mapping(HashMap<String, Value>),
    Callable(Callable),
    Nil,
}

/// The closed set of callable shapes a template can invoke.
///
/// User-registered macro functions never live inside a `Value`; calls
/// route through the evaluator by name, which keeps `Value` cheap to
/// clone and comparable in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum Callable {
    /// One of the identifier-quoting builtins.
    Builtin(Builtin),
    /// A named macro, resolved under the active dialect at call time.
    Macro(String),
    /// `adapter.dispatch` itself.
    Dispatch,
    /// The result of `adapter.dispatch(name)`.
    Bound(String),
}

/// Builtin functions available in every template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Column,
    Relation,
    Object,
}

impl Builtin {
    /// Resolve a builtin by its template-visible name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "column" => Some(Self::Column),
            "relation" => Some(Self::Relation),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Column => "column",
            Self::Relation => "relation",
            Self::Object => "object",
        }
    }
}

impl Value {
    /// Variant name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Num(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Handle(_) => "handle",
            Value::Mapping(_) => "mapping",
            Value::Callable(_) => "callable",
            Value::Nil => "nil",
        }
    }

    /// Canonical output stringification.
    ///
    /// `Str` emits as-is, `Num`/`Bool` use canonical forms, a `Handle`
    /// emits its qualified name, `Nil` emits nothing. Mappings and
    /// callables have no text form and fail evaluation.
    pub fn to_text(&self) -> WeaveResult<String> {
        match self {
            Value::Str(s) => Ok(s.clone()),
            Value::Num(n) => Ok(format_number(*n)),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Handle(h) => Ok(h.qualified_name.clone()),
            Value::Nil => Ok(String::new()),
            Value::Mapping(_) | Value::Callable(_) => Err(WeaveError::eval(format!(
                "cannot render a {} as output text",
                self.type_name()
            ))),
        }
    }

    /// Convert a JSON document into a `Value`.
    ///
    /// Objects become mappings, except that an object carrying a
    /// `handle_type` tag with the handle's required fields becomes a
    /// [`Handle`]. The engine has no sequence type, so arrays are
    /// rejected.
    pub fn from_json(json: serde_json::Value) -> WeaveResult<Value> {
        match json {
            serde_json::Value::Null => Ok(Value::Nil),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Value::Num)
                .ok_or_else(|| WeaveError::Invalid(format!("unrepresentable number: {}", n))),
            serde_json::Value::String(s) => Ok(Value::Str(s)),
            serde_json::Value::Array(_) => Err(WeaveError::Invalid(
                "arrays are not supported in a render context".to_string(),
            )),
            serde_json::Value::Object(fields) => {
                let mut mapping = HashMap::with_capacity(fields.len());
                for (key, val) in fields {
                    mapping.insert(key, Value::from_json(val)?);
                }
                if mapping.contains_key("handle_type") {
                    if let Some(handle) = Handle::from_mapping(&mapping) {
                        return Ok(Value::Handle(handle));
                    }
                }
                Ok(Value::Mapping(mapping))
            }
        }
    }
}

/// Canonical number formatting: integral values render without a
/// decimal point, so `limit_clause(5)` emits `LIMIT 5`.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Variable bindings for a single render call.
///
/// Seeded by the caller, mutated only by `{% set %}` nodes. Bindings are
/// visible to subsequent nodes only: one forward pass, no block scoping.
#[derive(Debug, Clone, Default)]
pub struct Context {
    vars: HashMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, overwriting any existing binding.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Builder-style binding, for seeding before a render.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Seed a context from a JSON object document.
    ///
    /// This is the ingestion path for the CLI `--context` flag; library
    /// callers can use it for the same purpose.
    pub fn from_json_str(json: &str) -> WeaveResult<Self> {
        let doc: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| WeaveError::Invalid(format!("context is not valid JSON: {}", e)))?;
        match Value::from_json(doc)? {
            Value::Mapping(vars) => Ok(Self { vars }),
            other => Err(WeaveError::Invalid(format!(
                "context document must be a JSON object, got {}",
                other.type_name()
            ))),
        }
    }
}

impl From<HashMap<String, Value>> for Context {
    fn from(vars: HashMap<String, Value>) -> Self {
        Self { vars }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Num(v as f64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Num(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Num(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Handle> for Value {
    fn from(v: Handle) -> Self {
        Value::Handle(v)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(v: HashMap<String, Value>) -> Self {
        Value::Mapping(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from() {
        let _b: Value = true.into();
        let _i: Value = 42i64.into();
        let _f: Value = 3.14f64.into();
        let _s: Value = "hello".into();
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-7.0), "-7");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn test_to_text_canonical_forms() {
        assert_eq!(Value::Str("x".into()).to_text().unwrap(), "x");
        assert_eq!(Value::Num(10.0).to_text().unwrap(), "10");
        assert_eq!(Value::Bool(true).to_text().unwrap(), "true");
        assert_eq!(Value::Nil.to_text().unwrap(), "");
        assert!(Value::Mapping(HashMap::new()).to_text().is_err());
    }

    #[test]
    fn test_from_json_object() {
        let v = Value::from_json(serde_json::json!({"a": 1, "b": "x"})).unwrap();
        match v {
            Value::Mapping(m) => {
                assert_eq!(m["a"], Value::Num(1.0));
                assert_eq!(m["b"], Value::Str("x".into()));
            }
            other => panic!("expected mapping, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_from_json_rejects_arrays() {
        assert!(Value::from_json(serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn test_from_json_handle_detection() {
        let v = Value::from_json(serde_json::json!({
            "handle_type": "table",
            "schema": "demo",
            "table": "users",
        }))
        .unwrap();
        match v {
            Value::Handle(h) => {
                assert_eq!(h.schema, "demo");
                assert_eq!(h.qualified_name, "demo.users");
            }
            other => panic!("expected handle, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_context_from_json_str() {
        let ctx = Context::from_json_str(r#"{"table": "events"}"#).unwrap();
        assert_eq!(ctx.get("table"), Some(&Value::Str("events".into())));
        assert!(Context::from_json_str("[1,2]").is_err());
    }
}
