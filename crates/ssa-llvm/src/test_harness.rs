//! Test harness for ssa-llvm unit tests
//!
//! Helpers to inspect what a [`Builder`](crate::Builder) emitted: instruction
//! walks, callee names, phi incoming edges, and a tracer that records events.
//!
//! # Example
//!
//! ```rust,no_run
//! use inkwell::context::Context;
//! use inkwell::values::InstructionOpcode;
//! use ssa_llvm::test_harness::*;
//! use ssa_llvm::{Program, Signature};
//!
//! let context = Context::create();
//! let program = Program::new(&context, "demo");
//! let mut func = program.new_function("main", Signature::default());
//! let entry = func.make_blocks(&program, 1)[0];
//!
//! let mut b = program.new_builder(&mut func);
//! b.set_block(entry);
//! b.ret(&[]).unwrap();
//! b.dispose();
//!
//! assert_eq!(block_opcodes(&func, entry), vec![InstructionOpcode::Return]);
//! ```

#![allow(
    clippy::must_use_candidate,
    clippy::missing_panics_doc,
    clippy::uninlined_format_args
)]

use std::cell::RefCell;
use std::iter;

use inkwell::basic_block::BasicBlock;
use inkwell::values::{BasicValueEnum, InstructionOpcode, InstructionValue, Operand, PhiValue};

use crate::block::Block;
use crate::function::Function;
use crate::program::Program;
use crate::trace::{Event, Tracer};
use crate::types::Signature;

/// Instructions of one LLVM block, in order.
pub fn instructions(bb: BasicBlock<'_>) -> Vec<InstructionValue<'_>> {
    iter::successors(bb.get_first_instruction(), |i| i.get_next_instruction()).collect()
}

/// Opcodes of every fragment of `blk`, first fragment to last.
pub fn block_opcodes<'ctx>(func: &Function<'ctx>, blk: Block<'ctx>) -> Vec<InstructionOpcode> {
    func.fragments(blk)
        .into_iter()
        .flat_map(instructions)
        .map(|i| i.get_opcode())
        .collect()
}

/// Opcodes of a single LLVM block.
pub fn opcodes(bb: BasicBlock<'_>) -> Vec<InstructionOpcode> {
    instructions(bb).iter().map(|i| i.get_opcode()).collect()
}

/// Name of the function a call instruction calls, if it is a direct call.
pub fn callee_name(instr: InstructionValue<'_>) -> Option<String> {
    if instr.get_opcode() != InstructionOpcode::Call {
        return None;
    }
    let last = instr.get_num_operands().checked_sub(1)?;
    match instr.get_operand(last).and_then(Operand::value)? {
        BasicValueEnum::PointerValue(pv) => Some(pv.get_name().to_string_lossy().into_owned()),
        _ => None,
    }
}

/// The `i`-th operand of an instruction as a value.
pub fn operand(instr: InstructionValue<'_>, i: u32) -> Option<BasicValueEnum<'_>> {
    instr.get_operand(i).and_then(Operand::value)
}

/// Incoming `(value, block)` edges of a phi, in registration order.
pub fn phi_incoming(phi: PhiValue<'_>) -> Vec<(BasicValueEnum<'_>, BasicBlock<'_>)> {
    (0..phi.count_incoming())
        .filter_map(|i| phi.get_incoming(i))
        .collect()
}

/// Declare a package initializer `func()` named `name` (e.g. `"fmt.init"`).
pub fn declare_init<'ctx>(program: &Program<'ctx>, name: &str) -> Function<'ctx> {
    program.new_function(name, Signature::default())
}

/// Records the display form of every event it receives.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    events: RefCell<Vec<String>>,
}

impl RecordingTracer {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl Tracer for RecordingTracer {
    fn trace(&self, event: &Event<'_, '_>) {
        self.events.borrow_mut().push(event.to_string());
    }
}
