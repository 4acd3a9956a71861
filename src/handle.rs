//! Resource handles: structured references to schema objects.
//!
//! A [`Handle`] carries the resolved identifier strings for one schema
//! object: its schema, object name, qualified name, and a map of
//! precomputed fully-qualified column identifiers. Handles arrive either
//! directly in the caller's context or by resolving a reference string
//! against the context's `resources` mapping via `object(ref)`.

use std::collections::HashMap;

use crate::error::{WeaveError, WeaveResult};
use crate::value::{Context, Value};

/// A resolved reference to a schema object. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    /// Reserved tag identifying the handle kind (e.g. `table`).
    pub handle_type: String,
    pub schema: String,
    pub table: String,
    /// Precomputed `schema.table` form, unquoted.
    pub qualified_name: String,
    /// Column name -> fully-qualified identifier string.
    pub columns: HashMap<String, String>,
}

impl Handle {
    /// Build a table handle with the default qualified name.
    pub fn table(schema: impl Into<String>, table: impl Into<String>) -> Self {
        let schema = schema.into();
        let table = table.into();
        let qualified_name = format!("{}.{}", schema, table);
        Self {
            handle_type: "table".to_string(),
            schema,
            table,
            qualified_name,
            columns: HashMap::new(),
        }
    }

    /// Add a column whose fully-qualified identifier is precomputed
    /// from the handle's qualified name.
    pub fn with_column(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let qualified = format!("{}.{}", self.qualified_name, name);
        self.columns.insert(name, qualified);
        self
    }

    /// Add a column with an explicit fully-qualified identifier.
    pub fn with_column_identifier(
        mut self,
        name: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        self.columns.insert(name.into(), identifier.into());
        self
    }

    /// Attribute lookup: reserved fields first, then column identifiers.
    pub fn attr(&self, name: &str) -> Option<Value> {
        match name {
            "handle_type" => Some(Value::Str(self.handle_type.clone())),
            "schema" => Some(Value::Str(self.schema.clone())),
            "table" => Some(Value::Str(self.table.clone())),
            "qualified_name" => Some(Value::Str(self.qualified_name.clone())),
            _ => self.columns.get(name).map(|c| Value::Str(c.clone())),
        }
    }

    /// Rebuild a handle from a mapping shape.
    ///
    /// Requires a `handle_type` tag plus `schema` and `table` strings;
    /// `qualified_name` defaults to `schema.table` and a nested
    /// `columns` mapping of strings is carried over when present.
    pub fn from_mapping(mapping: &HashMap<String, Value>) -> Option<Self> {
        let str_field = |key: &str| match mapping.get(key) {
            Some(Value::Str(s)) => Some(s.clone()),
            _ => None,
        };
        let handle_type = str_field("handle_type")?;
        let schema = str_field("schema")?;
        let table = str_field("table")?;
        let qualified_name =
            str_field("qualified_name").unwrap_or_else(|| format!("{}.{}", schema, table));
        let mut columns = HashMap::new();
        if let Some(Value::Mapping(cols)) = mapping.get("columns") {
            for (name, val) in cols {
                match val {
                    Value::Str(identifier) => {
                        columns.insert(name.clone(), identifier.clone());
                    }
                    _ => return None,
                }
            }
        }
        Some(Self {
            handle_type,
            schema,
            table,
            qualified_name,
            columns,
        })
    }
}

/// Implements the `object(ref)` builtin.
///
/// A string argument is looked up in `context["resources"]`; a handle or
/// mapping argument passes through as a shallow copy, `handle_type` tag
/// and all.
pub fn resolve_object(ctx: &Context, arg: &Value) -> WeaveResult<Value> {
    match arg {
        Value::Str(reference) => {
            let resources = match ctx.get("resources") {
                Some(Value::Mapping(resources)) => resources,
                _ => return Err(WeaveError::resolution(reference.clone())),
            };
            match resources.get(reference) {
                Some(value @ (Value::Handle(_) | Value::Mapping(_))) => Ok(value.clone()),
                Some(other) => Err(WeaveError::eval(format!(
                    "resource '{}' is a {}, expected a handle or mapping",
                    reference,
                    other.type_name()
                ))),
                None => Err(WeaveError::resolution(reference.clone())),
            }
        }
        Value::Handle(handle) => Ok(Value::Handle(handle.clone())),
        Value::Mapping(mapping) => Ok(Value::Mapping(mapping.clone())),
        other => Err(WeaveError::eval(format!(
            "object() expects a reference string or handle, got {}",
            other.type_name()
        ))),
    }
}
