// Emission cursor: the builder bound to one function.
//
// This module is organized into submodules:
// - `position`: insertion-point resolution and current-block tracking
// - `control_flow`: jump, conditional branch, return, unreachable, panic,
//   in-block conditionals that split a block into fragments
// - `calls`: direct calls and task launch
// - `coerce`: assignment conversion at call and return boundaries
// - `multi_value`: tuple extraction and phi nodes

mod calls;
mod coerce;
mod control_flow;
mod multi_value;
mod position;

pub use multi_value::Phi;
pub use position::InsertPoint;

use crate::block::Block;
use crate::function::Function;
use crate::program::Program;
use crate::trace::{Event, NoopTracer, Tracer};

/// Emits instructions into one function.
///
/// A builder holds the function exclusively for its lifetime, so no two
/// builders can emit into the same function at once. Every operation that
/// takes a [`Block`] checks that the block belongs to the bound function and
/// panics otherwise: a foreign block means the code driving the builder is
/// broken, not that the input program is.
pub struct Builder<'a, 'ctx> {
    prog: &'a Program<'ctx>,
    func: &'a mut Function<'ctx>,
    inner: inkwell::builder::Builder<'ctx>,
    blk: Option<Block<'ctx>>,
    tracer: &'a dyn Tracer,
}

impl<'a, 'ctx> Builder<'a, 'ctx> {
    pub(crate) fn new(prog: &'a Program<'ctx>, func: &'a mut Function<'ctx>) -> Self {
        Self {
            prog,
            func,
            inner: prog.context().create_builder(),
            blk: None,
            tracer: &NoopTracer,
        }
    }

    /// Report emission events to `tracer`.
    #[must_use]
    pub fn with_tracer(mut self, tracer: &'a dyn Tracer) -> Self {
        self.tracer = tracer;
        self
    }

    #[must_use]
    pub fn program(&self) -> &'a Program<'ctx> {
        self.prog
    }

    /// The function this builder is bound to.
    #[must_use]
    pub fn function(&self) -> &Function<'ctx> {
        self.func
    }

    /// The current logical block, if one has been set.
    #[must_use]
    pub fn block(&self) -> Option<Block<'ctx>> {
        self.blk
    }

    /// Release the builder. Consuming `self` ends the borrow of the function.
    pub fn dispose(self) {
        self.trace(&Event::Dispose);
    }

    fn trace(&self, event: &Event<'_, 'ctx>) {
        self.tracer.trace(event);
    }

    /// # Panics
    ///
    /// Panics if `blk` belongs to another function.
    fn check_owner(&self, blk: Block<'ctx>, op: &str) {
        assert!(
            blk.parent() == self.func.value(),
            "mismatched function: {op} on {blk} of {}, builder is bound to {}",
            blk.parent().get_name().to_string_lossy(),
            self.func.name(),
        );
    }

    fn current_block(&self, op: &str) -> Block<'ctx> {
        self.blk
            .unwrap_or_else(|| panic!("{op} without a current block in {}", self.func.name()))
    }
}
