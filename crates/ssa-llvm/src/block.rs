// Logical blocks: stable CFG node identity over a chain of LLVM blocks.

use std::fmt;

use inkwell::basic_block::BasicBlock;
use inkwell::values::FunctionValue;

/// A node of the source control-flow graph.
///
/// A block is a handle into its function's block arena. However many LLVM
/// blocks end up realizing it, the handle (function + index) stays the same,
/// so it can be used as a branch target or phi predecessor at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'ctx> {
    func: FunctionValue<'ctx>,
    idx: usize,
}

impl<'ctx> Block<'ctx> {
    pub(crate) fn new(func: FunctionValue<'ctx>, idx: usize) -> Self {
        Self { func, idx }
    }

    /// The function this block belongs to.
    #[must_use]
    pub fn parent(&self) -> FunctionValue<'ctx> {
        self.func
    }

    /// Index of the block within its function.
    #[must_use]
    pub fn index(&self) -> usize {
        self.idx
    }
}

impl fmt::Display for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {}", self.idx)
    }
}

/// Physical extent of a logical block.
///
/// Branches into the block enter at `first`; control leaves the block from
/// `last`. Both belong to the owning function and are equal until the block
/// is split.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Extent<'ctx> {
    pub(crate) first: BasicBlock<'ctx>,
    pub(crate) last: BasicBlock<'ctx>,
}

impl<'ctx> Extent<'ctx> {
    pub(crate) fn new(bb: BasicBlock<'ctx>) -> Self {
        Self { first: bb, last: bb }
    }

    pub(crate) fn is_split(&self) -> bool {
        self.first != self.last
    }
}
