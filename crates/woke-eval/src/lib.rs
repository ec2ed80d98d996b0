//! WokeLang tree-walking evaluator.
//!
//! Executes a parsed [`Program`](woke_types::ast::Program) directly from the
//! AST: registers its functions, gratitude and workers, binds its
//! constants, then calls `main`. Printed lines are collected (and
//! optionally echoed to stdout) so hosts can inspect them.

mod builtins;
mod config;
mod consent;
mod env;
mod error;
mod evaluator;
pub mod ops;
mod output;
mod value;

pub use config::EvalConfig;
pub use consent::{is_yes, AutoGrant, ConsentPolicy, DenyAll, Prompt};
pub use env::Environment;
pub use error::{EvalError, EvalResult};
pub use evaluator::{Evaluator, Flow};
pub use value::Value;
