// Insertion-point resolution.

use std::iter;

use inkwell::basic_block::BasicBlock;
use inkwell::values::{BasicValueEnum, InstructionOpcode, InstructionValue, Operand};

use super::Builder;
use crate::block::Block;
use crate::trace::Event;

/// Where in a block the next instruction goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPoint {
    /// After the last instruction of the block's last fragment.
    AtEnd,
    /// Before the first instruction of the block's first fragment.
    AtStart,
    /// Before the last instruction (normally the terminator) of the block's
    /// last fragment.
    BeforeLast,
    /// After the leading package initializer calls of the block's first
    /// fragment, before anything else.
    AfterInit,
}

impl<'ctx> Builder<'_, 'ctx> {
    /// Equivalent to `position(blk, InsertPoint::AtEnd, true)`.
    ///
    /// # Panics
    ///
    /// Panics if `blk` belongs to another function.
    pub fn set_block(&mut self, blk: Block<'ctx>) -> &mut Self {
        self.trace(&Event::Block { index: blk.index() });
        self.position(blk, InsertPoint::AtEnd, true)
    }

    /// Move the insertion point into `blk` at `pos`. With `set_current`, `blk`
    /// also becomes the current block.
    ///
    /// Positions that would go before an instruction of an empty fragment
    /// resolve to the end of that fragment.
    ///
    /// # Panics
    ///
    /// Panics if `blk` belongs to another function.
    pub fn position(&mut self, blk: Block<'ctx>, pos: InsertPoint, set_current: bool) -> &mut Self {
        self.check_owner(blk, "position");
        let extent = self.func.extent(blk);
        match pos {
            InsertPoint::AtEnd => self.inner.position_at_end(extent.last),
            InsertPoint::AtStart => {
                self.position_before(extent.first.get_first_instruction(), extent.first);
            }
            InsertPoint::BeforeLast => {
                self.position_before(extent.last.get_last_instruction(), extent.last);
            }
            InsertPoint::AfterInit => {
                let suffix = &self.prog.config().init_suffix;
                self.position_before(instr_after_init(extent.first, suffix), extent.first);
            }
        }
        if set_current {
            self.blk = Some(blk);
        }
        self
    }

    fn position_before(&self, instr: Option<InstructionValue<'ctx>>, bb: BasicBlock<'ctx>) {
        match instr {
            Some(instr) => self.inner.position_before(&instr),
            None => self.inner.position_at_end(bb),
        }
    }
}

/// First instruction of `bb` that is not part of the initializer prologue,
/// or `None` when the prologue runs to the end of the block.
pub(crate) fn instr_after_init<'ctx>(
    bb: BasicBlock<'ctx>,
    suffix: &str,
) -> Option<InstructionValue<'ctx>> {
    iter::successors(bb.get_first_instruction(), |instr| instr.get_next_instruction())
        .find(|&instr| !is_init_call(instr, suffix))
}

/// A call taking no arguments (its only operand is the callee) whose callee
/// name ends with `suffix`.
fn is_init_call(instr: InstructionValue<'_>, suffix: &str) -> bool {
    if instr.get_opcode() != InstructionOpcode::Call || instr.get_num_operands() != 1 {
        return false;
    }
    match instr.get_operand(0).and_then(Operand::value) {
        Some(BasicValueEnum::PointerValue(callee)) => callee
            .get_name()
            .to_str()
            .is_ok_and(|name| name.ends_with(suffix)),
        _ => false,
    }
}
