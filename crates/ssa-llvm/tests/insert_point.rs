//! Insertion-point resolution: at end, at start, before the terminator, and
//! after the package initializer prologue.

use inkwell::context::Context;
use ssa_llvm::test_harness::*;
use ssa_llvm::{Block, EmitConfig, Function, InsertPoint, Program, Signature};

fn callees<'ctx>(f: &Function<'ctx>, blk: Block<'ctx>) -> Vec<String> {
    f.fragments(blk)
        .into_iter()
        .flat_map(instructions)
        .map(|i| callee_name(i).unwrap_or_else(|| format!("{:?}", i.get_opcode())))
        .collect()
}

/// Emits `prologue` calls then `work()` and `ret void` into a fresh `main`,
/// repositions with `pos` and inserts a call to `marker()`.
fn insert_marker(prologue: &[&str], pos: InsertPoint) -> Vec<String> {
    let context = Context::create();
    let program = Program::new(&context, "insert");
    let inits: Vec<_> = prologue
        .iter()
        .map(|name| program.func_expr(&declare_init(&program, name)))
        .collect();
    let work = program.func_expr(&program.new_function("work", Signature::default()));
    let marker = program.func_expr(&program.new_function("marker", Signature::default()));

    let mut main = program.new_function("main", Signature::default());
    let entry = main.make_blocks(&program, 1)[0];

    let mut b = program.new_builder(&mut main);
    b.set_block(entry);
    for init in &inits {
        b.call(init, &[]).expect("init call");
    }
    b.call(&work, &[]).expect("work call");
    b.ret(&[]).expect("ret");
    b.position(entry, pos, false);
    b.call(&marker, &[]).expect("marker call");
    b.dispose();

    callees(&main, entry)
}

#[test]
fn test_at_end_appends_after_terminator() {
    assert_eq!(
        insert_marker(&[], InsertPoint::AtEnd),
        vec!["work", "Return", "marker"]
    );
}

#[test]
fn test_at_start_inserts_before_first_instruction() {
    assert_eq!(
        insert_marker(&["fmt.init"], InsertPoint::AtStart),
        vec!["marker", "fmt.init", "work", "Return"]
    );
}

#[test]
fn test_before_last_inserts_before_terminator() {
    assert_eq!(
        insert_marker(&[], InsertPoint::BeforeLast),
        vec!["work", "marker", "Return"]
    );
}

#[test]
fn test_after_init_skips_initializer_prologue() {
    assert_eq!(
        insert_marker(&["fmt.init", "os.init"], InsertPoint::AfterInit),
        vec!["fmt.init", "os.init", "marker", "work", "Return"]
    );
}

#[test]
fn test_after_init_without_prologue_equals_at_start() {
    assert_eq!(
        insert_marker(&[], InsertPoint::AfterInit),
        insert_marker(&[], InsertPoint::AtStart)
    );
    assert_eq!(
        insert_marker(&[], InsertPoint::AfterInit),
        vec!["marker", "work", "Return"]
    );
}

/// Only argument-less calls to a `.init` symbol belong to the prologue.
#[test]
fn test_after_init_stops_at_non_matching_call() {
    let context = Context::create();
    let program = Program::new(&context, "insert");
    let i64_ty = program.int_type(64);
    let fmt_init = program.func_expr(&declare_init(&program, "fmt.init"));
    let with_arg = program.func_expr(
        &program.new_function("cfg.init", Signature::new(vec![i64_ty.clone()], vec![])),
    );
    let plain = program.func_expr(&declare_init(&program, "reinit"));
    let marker = program.func_expr(&program.new_function("marker", Signature::default()));

    let mut main = program.new_function("main", Signature::default());
    let entry = main.make_blocks(&program, 1)[0];

    let mut b = program.new_builder(&mut main);
    b.set_block(entry);
    b.call(&fmt_init, &[]).expect("call");
    b.call(&with_arg, &[program.const_int(&i64_ty, 1)])
        .expect("call");
    b.call(&plain, &[]).expect("call");
    b.ret(&[]).expect("ret");
    b.position(entry, InsertPoint::AfterInit, false);
    b.call(&marker, &[]).expect("call");
    b.position(entry, InsertPoint::BeforeLast, false);
    b.call(&fmt_init, &[]).expect("call");
    b.dispose();

    // The trailing fmt.init is past the prologue and does not extend it.
    assert_eq!(
        callees(&main, entry),
        vec!["fmt.init", "marker", "cfg.init", "reinit", "fmt.init", "Return"]
    );
    program.verify().expect("verify");
}

#[test]
fn test_after_init_on_prologue_only_block_lands_at_end() {
    let context = Context::create();
    let program = Program::new(&context, "insert");
    let fmt_init = program.func_expr(&declare_init(&program, "fmt.init"));
    let marker = program.func_expr(&program.new_function("marker", Signature::default()));

    let mut main = program.new_function("main", Signature::default());
    let entry = main.make_blocks(&program, 1)[0];

    let mut b = program.new_builder(&mut main);
    b.set_block(entry);
    b.call(&fmt_init, &[]).expect("call");
    b.position(entry, InsertPoint::AfterInit, true);
    b.call(&marker, &[]).expect("call");
    b.dispose();

    assert_eq!(callees(&main, entry), vec!["fmt.init", "marker"]);
}

#[test]
fn test_policies_on_empty_block_resolve_to_end() {
    for pos in [
        InsertPoint::AtEnd,
        InsertPoint::AtStart,
        InsertPoint::BeforeLast,
        InsertPoint::AfterInit,
    ] {
        let context = Context::create();
        let program = Program::new(&context, "insert");
        let mut main = program.new_function("main", Signature::default());
        let entry = main.make_blocks(&program, 1)[0];

        let mut b = program.new_builder(&mut main);
        b.position(entry, pos, true);
        b.ret(&[]).expect("ret");
        b.dispose();

        assert_eq!(callees(&main, entry), vec!["Return"], "{pos:?}");
    }
}

#[test]
fn test_custom_init_suffix() {
    let context = Context::create();
    let config = EmitConfig {
        init_suffix: "$init".to_string(),
        ..EmitConfig::default()
    };
    let program = Program::with_config(&context, "insert", config);
    let pkg_init = program.func_expr(&declare_init(&program, "pkg$init"));
    let dotted = program.func_expr(&declare_init(&program, "fmt.init"));
    let marker = program.func_expr(&program.new_function("marker", Signature::default()));

    let mut main = program.new_function("main", Signature::default());
    let entry = main.make_blocks(&program, 1)[0];

    let mut b = program.new_builder(&mut main);
    b.set_block(entry);
    b.call(&pkg_init, &[]).expect("call");
    b.call(&dotted, &[]).expect("call");
    b.ret(&[]).expect("ret");
    b.position(entry, InsertPoint::AfterInit, false);
    b.call(&marker, &[]).expect("call");
    b.dispose();

    assert_eq!(
        callees(&main, entry),
        vec!["pkg$init", "marker", "fmt.init", "Return"]
    );
}

/// `AtStart` and `AfterInit` use the first fragment, `AtEnd` and `BeforeLast`
/// the last one.
#[test]
fn test_policies_on_split_block_pick_first_or_last_fragment() {
    let context = Context::create();
    let program = Program::new(&context, "insert");
    let bool_ty = program.bool_type();
    let marker = program.func_expr(&program.new_function("marker", Signature::default()));
    let mut main = program.new_function("main", Signature::new(vec![bool_ty], vec![]));
    let entry = main.make_blocks(&program, 1)[0];
    let cond = main.param(0);

    let mut b = program.new_builder(&mut main);
    b.set_block(entry);
    b.if_then(&cond, |_| Ok(())).expect("split");
    b.ret(&[]).expect("ret");
    b.position(entry, InsertPoint::AtStart, false);
    b.call(&marker, &[]).expect("call");
    b.position(entry, InsertPoint::BeforeLast, false);
    b.call(&marker, &[]).expect("call");
    b.dispose();

    let fragments = main.fragments(entry);
    assert_eq!(fragments.len(), 3);
    let first: Vec<_> = instructions(fragments[0])
        .into_iter()
        .map(|i| callee_name(i).unwrap_or_else(|| format!("{:?}", i.get_opcode())))
        .collect();
    let last: Vec<_> = instructions(fragments[2])
        .into_iter()
        .map(|i| callee_name(i).unwrap_or_else(|| format!("{:?}", i.get_opcode())))
        .collect();
    assert_eq!(first, vec!["marker", "Br"]);
    assert_eq!(last, vec!["marker", "Return"]);
    program.verify().expect("verify");
}

#[test]
fn test_position_without_update_keeps_current_block() {
    let context = Context::create();
    let program = Program::new(&context, "insert");
    let mut main = program.new_function("main", Signature::default());
    let blocks = main.make_blocks(&program, 2);

    let mut b = program.new_builder(&mut main);
    b.set_block(blocks[0]);
    b.position(blocks[1], InsertPoint::AtEnd, false);
    assert_eq!(b.block(), Some(blocks[0]));
    b.position(blocks[1], InsertPoint::AtEnd, true);
    assert_eq!(b.block(), Some(blocks[1]));
    b.dispose();
}

#[test]
#[should_panic(expected = "mismatched function")]
fn test_position_in_foreign_block_panics() {
    let context = Context::create();
    let program = Program::new(&context, "insert");
    let mut main = program.new_function("main", Signature::default());
    let mut other = program.new_function("other", Signature::default());
    let _ = main.make_blocks(&program, 1);
    let foreign = other.make_blocks(&program, 1)[0];

    let mut b = program.new_builder(&mut main);
    b.position(foreign, InsertPoint::AtStart, false);
}

#[test]
#[should_panic(expected = "mismatched function")]
fn test_set_block_to_foreign_block_panics() {
    let context = Context::create();
    let program = Program::new(&context, "insert");
    let mut main = program.new_function("main", Signature::default());
    let mut other = program.new_function("other", Signature::default());
    let foreign = other.make_blocks(&program, 1)[0];

    let mut b = program.new_builder(&mut main);
    b.set_block(foreign);
}
