use inkwell::basic_block::BasicBlock;
use inkwell::values::FunctionValue;

use crate::block::{Block, Extent};
use crate::expr::Expr;
use crate::program::Program;
use crate::types::Signature;

/// A function being emitted: its LLVM value, source signature and the arena
/// of logical blocks.
#[derive(Debug)]
pub struct Function<'ctx> {
    value: FunctionValue<'ctx>,
    sig: Signature<'ctx>,
    blocks: Vec<Extent<'ctx>>,
}

impl<'ctx> Function<'ctx> {
    pub(crate) fn new(value: FunctionValue<'ctx>, sig: Signature<'ctx>) -> Self {
        Self {
            value,
            sig,
            blocks: Vec::new(),
        }
    }

    #[must_use]
    pub fn value(&self) -> FunctionValue<'ctx> {
        self.value
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.value.get_name().to_string_lossy().into_owned()
    }

    #[must_use]
    pub fn signature(&self) -> &Signature<'ctx> {
        &self.sig
    }

    /// Append `n` logical blocks, each backed by one fresh LLVM block.
    ///
    /// Indices continue from the blocks already made, so the first call on a
    /// function creates the entry block at index 0.
    pub fn make_blocks(&mut self, program: &Program<'ctx>, n: usize) -> Vec<Block<'ctx>> {
        let prefix = &program.config().block_prefix;
        let start = self.blocks.len();
        for idx in start..start + n {
            let bb = program
                .context()
                .append_basic_block(self.value, &format!("{prefix}{idx}"));
            self.blocks.push(Extent::new(bb));
        }
        (start..start + n)
            .map(|idx| Block::new(self.value, idx))
            .collect()
    }

    /// The logical block at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if no block with that index has been made.
    #[must_use]
    pub fn block(&self, idx: usize) -> Block<'ctx> {
        assert!(
            idx < self.blocks.len(),
            "block index {idx} out of range: {} has {} blocks",
            self.name(),
            self.blocks.len()
        );
        Block::new(self.value, idx)
    }

    #[must_use]
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// The `i`-th parameter as a typed value.
    ///
    /// # Panics
    ///
    /// Panics if the signature has fewer than `i + 1` parameters.
    #[must_use]
    pub fn param(&self, i: usize) -> Expr<'ctx> {
        let ty = self.sig.params().get(i).cloned().unwrap_or_else(|| {
            panic!(
                "parameter {i} out of range: {} takes {}",
                self.name(),
                self.sig.params().len()
            )
        });
        let value = self
            .value
            .get_nth_param(i as u32)
            .unwrap_or_else(|| panic!("LLVM function {} lacks parameter {i}", self.name()));
        Expr::new(value, ty)
    }

    /// LLVM blocks currently realizing `blk`, first to last.
    #[must_use]
    pub fn fragments(&self, blk: Block<'ctx>) -> Vec<BasicBlock<'ctx>> {
        let extent = self.extent(blk);
        if !extent.is_split() {
            return vec![extent.first];
        }
        let mut out = vec![extent.first];
        let mut bb = extent.first;
        while bb != extent.last {
            match bb.get_next_basic_block() {
                Some(next) => {
                    out.push(next);
                    bb = next;
                }
                None => break,
            }
        }
        out
    }

    pub(crate) fn extent(&self, blk: Block<'ctx>) -> Extent<'ctx> {
        self.blocks[blk.index()]
    }

    pub(crate) fn extent_mut(&mut self, blk: Block<'ctx>) -> &mut Extent<'ctx> {
        &mut self.blocks[blk.index()]
    }
}
