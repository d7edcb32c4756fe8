#![allow(
    clippy::cast_possible_truncation, // intentional: tuple and parameter indices are far below u32::MAX
    clippy::missing_errors_doc // builder errors are documented once on `Error`
)]

pub mod block;
pub mod builder;
pub mod error;
pub mod expr;
pub mod function;
pub mod program;
pub mod runtime;
pub mod trace;
pub mod types;

/// Test harness module for writing unit and integration tests.
///
/// This module is only available when running tests or when the
/// `test-harness` feature is enabled.
#[cfg(any(test, feature = "test-harness"))]
pub mod test_harness;

pub use block::Block;
pub use builder::{Builder, InsertPoint, Phi};
pub use error::{Error, Result};
pub use expr::Expr;
pub use function::Function;
pub use program::{EmitConfig, Program};
pub use runtime::RuntimeFn;
pub use trace::{Event, LogTracer, NoopTracer, Tracer};
pub use types::{Kind, Signature, Type};
