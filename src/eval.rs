//! Expression evaluator.
//!
//! Evaluates parsed expressions against a [`Context`], the active
//! [`Dialect`], and one registry snapshot. All macro and builtin calls
//! route through here; arguments evaluate strictly, left to right,
//! before invocation.

use crate::ast::Expr;
use crate::dialect::Dialect;
use crate::error::{WeaveError, WeaveResult};
use crate::handle::resolve_object;
use crate::packs::{call_pack, pack_for};
use crate::registry::RegistrySnapshot;
use crate::value::{Builtin, Callable, Context, Value};

pub struct Evaluator<'a> {
    dialect: &'a Dialect,
    registry: &'a RegistrySnapshot,
}

impl<'a> Evaluator<'a> {
    pub fn new(dialect: &'a Dialect, registry: &'a RegistrySnapshot) -> Self {
        Self { dialect, registry }
    }

    pub fn eval(&self, expr: &Expr, ctx: &Context) -> WeaveResult<Value> {
        match expr {
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Num(n) => Ok(Value::Num(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Ident(name) => ctx
                .get(name)
                .cloned()
                .ok_or_else(|| WeaveError::eval(format!("undefined variable '{}'", name))),
            Expr::Attr { base, attr } => self.eval_attr(base, attr, ctx),
            Expr::Call { callee, args } => {
                let callable = self.resolve_callee(callee, ctx)?;
                let mut evaluated = Vec::with_capacity(args.len());
                for arg in args {
                    evaluated.push(self.eval(arg, ctx)?);
                }
                self.invoke(&callable, &evaluated, ctx)
            }
        }
    }

    fn eval_attr(&self, base: &Expr, attr: &str, ctx: &Context) -> WeaveResult<Value> {
        match self.eval(base, ctx)? {
            Value::Handle(handle) => handle.attr(attr).ok_or_else(|| {
                WeaveError::eval(format!(
                    "handle '{}' has no attribute '{}'",
                    handle.qualified_name, attr
                ))
            }),
            Value::Mapping(mapping) => mapping
                .get(attr)
                .cloned()
                .ok_or_else(|| WeaveError::eval(format!("no attribute '{}' in mapping", attr))),
            other => Err(WeaveError::eval(format!(
                "cannot access attribute '{}' on a {}",
                attr,
                other.type_name()
            ))),
        }
    }

    /// Resolve a call target to a [`Callable`].
    ///
    /// A bare name checks the context first (a `{% set %}` binding can
    /// shadow anything), then the builtins, and otherwise names a
    /// dialect macro whose existence is checked at invocation.
    fn resolve_callee(&self, callee: &Expr, ctx: &Context) -> WeaveResult<Callable> {
        if let Expr::Ident(name) = callee {
            if let Some(value) = ctx.get(name) {
                return match value {
                    Value::Callable(callable) => Ok(callable.clone()),
                    other => Err(WeaveError::eval(format!(
                        "'{}' is not callable (a {})",
                        name,
                        other.type_name()
                    ))),
                };
            }
            if let Some(builtin) = Builtin::from_name(name) {
                return Ok(Callable::Builtin(builtin));
            }
            return Ok(Callable::Macro(name.clone()));
        }
        match self.eval(callee, ctx)? {
            Value::Callable(callable) => Ok(callable),
            other => Err(WeaveError::eval(format!(
                "value of type {} is not callable",
                other.type_name()
            ))),
        }
    }

    fn invoke(&self, callable: &Callable, args: &[Value], ctx: &Context) -> WeaveResult<Value> {
        match callable {
            Callable::Builtin(builtin) => self.call_builtin(*builtin, args, ctx),
            Callable::Macro(name) | Callable::Bound(name) => self.call_macro(name, args),
            Callable::Dispatch => {
                if args.len() != 1 {
                    return Err(WeaveError::eval(format!(
                        "dispatch() takes 1 argument, got {}",
                        args.len()
                    )));
                }
                match &args[0] {
                    Value::Str(name) => Ok(Value::Callable(Callable::Bound(name.clone()))),
                    other => Err(WeaveError::eval(format!(
                        "dispatch() argument must be a macro name string, got {}",
                        other.type_name()
                    ))),
                }
            }
        }
    }

    fn call_builtin(&self, builtin: Builtin, args: &[Value], ctx: &Context) -> WeaveResult<Value> {
        match builtin {
            Builtin::Column => match args {
                [Value::Str(name)] => Ok(Value::Str(self.dialect.quote(name))),
                [other] => Err(WeaveError::eval(format!(
                    "column() argument must be a string, got {}",
                    other.type_name()
                ))),
                _ => Err(WeaveError::eval(format!(
                    "column() takes 1 argument, got {}",
                    args.len()
                ))),
            },
            Builtin::Relation => match args {
                [Value::Str(schema), Value::Str(name)] => {
                    Ok(Value::Str(self.dialect.quote_relation(schema, name)))
                }
                [Value::Handle(handle)] => Ok(Value::Str(
                    self.dialect.quote_relation(&handle.schema, &handle.table),
                )),
                [Value::Mapping(mapping)] => {
                    let field = |key: &str| match mapping.get(key) {
                        Some(Value::Str(s)) => Ok(s.as_str()),
                        _ => Err(WeaveError::eval(format!(
                            "relation() mapping argument is missing a '{}' string",
                            key
                        ))),
                    };
                    Ok(Value::Str(
                        self.dialect.quote_relation(field("schema")?, field("table")?),
                    ))
                }
                _ => Err(WeaveError::eval(
                    "relation() takes (schema, name) strings or a single handle".to_string(),
                )),
            },
            Builtin::Object => match args {
                [reference] => resolve_object(ctx, reference),
                _ => Err(WeaveError::eval(format!(
                    "object() takes 1 argument, got {}",
                    args.len()
                ))),
            },
        }
    }

    /// Macro lookup order: exact registry entry for the active dialect,
    /// then the shipped default pack, then failure.
    fn call_macro(&self, name: &str, args: &[Value]) -> WeaveResult<Value> {
        let dialect_name = &self.dialect.name;
        if let Some(f) = self.registry.get(dialect_name, name) {
            return f(self.dialect, args).map(Value::Str);
        }
        if let Some(pack) = pack_for(dialect_name) {
            if let Some(result) = call_pack(pack, name, args) {
                return result.map(Value::Str);
            }
        }
        Err(WeaveError::no_such_macro(dialect_name.clone(), name))
    }
}
