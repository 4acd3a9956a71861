//! # sqlweave — Dialect-aware SQL templating
//!
//! > **Render one template, target any database.**
//!
//! sqlweave renders parameterized template strings into SQL text
//! correct for a chosen target dialect (postgres, mysql, mssql,
//! snowflake, or a caller-registered dialect).
//!
//! ## Quick Example
//!
//! ```rust
//! use sqlweave::prelude::*;
//!
//! let dialect = Dialect::new("postgres");
//! let sql = sqlweave::render(
//!     r#"SELECT {{ column("email") }} FROM {{ relation("public", "users") }}"#,
//!     &dialect,
//! ).unwrap();
//! assert_eq!(sql, r#"SELECT "email" FROM "public"."users""#);
//! ```
//!
//! ## Template Blocks
//!
//! | Form              | Name      | Function                          |
//! |-------------------|-----------|-----------------------------------|
//! | `{{ expr }}`      | Output    | Evaluates and emits the value     |
//! | `{% set n = e %}` | Statement | Binds a variable, emits nothing   |
//! | anything else     | Literal   | Emitted verbatim                  |
//!
//! Inside a block: string/number/bool literals, variable names,
//! attribute access (`handle.id`), and calls (`column("email")`,
//! `adapter.dispatch("date_add")(...)`).

pub mod ast;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod eval;
pub mod handle;
pub mod packs;
pub mod parser;
pub mod registry;
pub mod value;

pub mod prelude {
    pub use crate::dialect::{Dialect, QuoteStyle};
    pub use crate::engine::Weaver;
    pub use crate::error::{WeaveError, WeaveResult};
    pub use crate::handle::Handle;
    pub use crate::parser::parse;
    pub use crate::registry::MacroRegistry;
    pub use crate::value::{Callable, Context, Value};
}

use dialect::Dialect;
use engine::Weaver;
use error::WeaveResult;
use value::Context;

/// Render a template with an empty context on a one-shot engine.
///
/// # Example
///
/// ```
/// use sqlweave::dialect::Dialect;
///
/// let sql = sqlweave::render("SELECT {{ column('id') }}", &Dialect::new("mysql")).unwrap();
/// assert_eq!(sql, "SELECT `id`");
/// ```
pub fn render(template: &str, dialect: &Dialect) -> WeaveResult<String> {
    Weaver::new().render(template, dialect)
}

/// Render a template against caller-seeded bindings on a one-shot
/// engine. Callers that register macros or render repeatedly should
/// hold a [`Weaver`] instead.
pub fn render_with_context(
    template: &str,
    dialect: &Dialect,
    ctx: Context,
) -> WeaveResult<String> {
    Weaver::new().render_with_context(template, dialect, ctx)
}
