//! Logical block identity: indices and parents survive splitting, and a block
//! handle is interchangeable with any other handle to the same block.

use inkwell::context::Context;
use inkwell::values::InstructionOpcode;
use ssa_llvm::test_harness::*;
use ssa_llvm::{InsertPoint, Program, Signature};

#[test]
fn test_make_blocks_numbers_from_zero_and_continues() {
    let context = Context::create();
    let program = Program::new(&context, "blocks");
    let mut f = program.new_function("f", Signature::default());

    let first = f.make_blocks(&program, 3);
    let more = f.make_blocks(&program, 2);

    let indices: Vec<usize> = first.iter().chain(&more).map(|b| b.index()).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert_eq!(f.num_blocks(), 5);
    for blk in first.iter().chain(&more) {
        assert_eq!(blk.parent(), f.value());
    }
}

#[test]
fn test_block_handles_compare_by_function_and_index() {
    let context = Context::create();
    let program = Program::new(&context, "blocks");
    let mut f = program.new_function("f", Signature::default());
    let mut g = program.new_function("g", Signature::default());

    let f_blocks = f.make_blocks(&program, 2);
    let g_blocks = g.make_blocks(&program, 2);

    assert_eq!(f.block(1), f_blocks[1]);
    assert_ne!(f_blocks[0], f_blocks[1]);
    // Same index, different function.
    assert_ne!(f_blocks[0], g_blocks[0]);
    assert_eq!(f_blocks[0].index(), g_blocks[0].index());
}

#[test]
fn test_block_names_carry_prefix_and_index() {
    let context = Context::create();
    let program = Program::new(&context, "blocks");
    let mut f = program.new_function("f", Signature::default());
    let blocks = f.make_blocks(&program, 2);

    let name = f.fragments(blocks[1])[0]
        .get_name()
        .to_string_lossy()
        .into_owned();
    assert_eq!(name, "_bb1");
}

#[test]
#[should_panic(expected = "block index 2 out of range")]
fn test_block_lookup_out_of_range_panics() {
    let context = Context::create();
    let program = Program::new(&context, "blocks");
    let mut f = program.new_function("f", Signature::default());
    let _ = f.make_blocks(&program, 2);
    let _ = f.block(2);
}

/// Splitting a block adds fragments; index, parent and entry fragment stay.
#[test]
fn test_identity_stable_across_splits() {
    let context = Context::create();
    let program = Program::new(&context, "blocks");
    let bool_ty = program.bool_type();
    let mut f = program.new_function("f", Signature::new(vec![bool_ty], vec![]));
    let blocks = f.make_blocks(&program, 2);
    let (entry, exit) = (blocks[0], blocks[1]);
    let entry_bb = f.fragments(entry)[0];
    let cond = f.param(0);

    let mut b = program.new_builder(&mut f);
    b.set_block(entry);
    b.if_then(&cond, |b| b.if_then(&cond, |_| Ok(())))
        .expect("outer split");
    b.if_then(&cond, |_| Ok(())).expect("second split");
    assert_eq!(b.block(), Some(entry));
    b.jump(exit).expect("jump");
    b.set_block(exit);
    b.ret(&[]).expect("ret");
    b.dispose();

    assert_eq!(entry.index(), 0);
    assert_eq!(entry.parent(), f.value());
    assert_eq!(f.block(0), entry);

    let fragments = f.fragments(entry);
    assert_eq!(fragments[0], entry_bb, "entry fragment must not move");
    // entry, outer.then, inner.then, inner.done, outer.done, then, done
    assert_eq!(fragments.len(), 7);
    assert_eq!(
        opcodes(*fragments.last().unwrap()),
        vec![InstructionOpcode::Br]
    );
    program.verify().expect("split function verifies");
}

/// The split belongs to the current block even when the insertion point was
/// last moved into another block without updating it.
#[test]
fn test_split_after_non_updating_position_stays_in_current_block() {
    let context = Context::create();
    let program = Program::new(&context, "blocks");
    let bool_ty = program.bool_type();
    let mut f = program.new_function("f", Signature::new(vec![bool_ty], vec![]));
    let blocks = f.make_blocks(&program, 2);
    let (entry, exit) = (blocks[0], blocks[1]);
    let cond = f.param(0);

    let mut b = program.new_builder(&mut f);
    b.set_block(entry);
    b.position(exit, InsertPoint::AtEnd, false);
    b.if_then(&cond, |_| Ok(())).expect("split");
    b.jump(exit).expect("jump");
    b.set_block(exit);
    b.ret(&[]).expect("ret");
    b.dispose();

    let fragments = f.fragments(entry);
    assert_eq!(fragments.len(), 3);
    assert_eq!(opcodes(fragments[0]), vec![InstructionOpcode::Br]);
    assert_eq!(opcodes(fragments[1]), vec![InstructionOpcode::Br]);
    assert_eq!(opcodes(fragments[2]), vec![InstructionOpcode::Br]);
    assert_eq!(block_opcodes(&f, exit), vec![InstructionOpcode::Return]);
    program.verify().expect("verify");
}

#[test]
#[should_panic(expected = "if_then on terminated block 0")]
fn test_split_of_terminated_block_panics() {
    let context = Context::create();
    let program = Program::new(&context, "blocks");
    let mut f = program.new_function("f", Signature::default());
    let entry = f.make_blocks(&program, 1)[0];
    let cond = program.const_bool(true);

    let mut b = program.new_builder(&mut f);
    b.set_block(entry);
    b.ret(&[]).expect("ret");
    let _ = b.if_then(&cond, |_| Ok(()));
}
