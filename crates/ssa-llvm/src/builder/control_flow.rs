// Control transfer: branches, return, unreachable, panic, in-block
// conditionals.

use std::slice;

use inkwell::values::BasicValueEnum;

use super::Builder;
use crate::block::Block;
use crate::error::llvm_err;
use crate::expr::Expr;
use crate::runtime::RuntimeFn;
use crate::trace::Event;
use crate::Result;

impl<'ctx> Builder<'_, 'ctx> {
    /// Branch unconditionally to `target`.
    ///
    /// # Panics
    ///
    /// Panics if `target` belongs to another function.
    pub fn jump(&mut self, target: Block<'ctx>) -> Result<()> {
        self.check_owner(target, "jump");
        self.trace(&Event::Jump {
            target: target.index(),
        });
        let dest = self.func.extent(target).first;
        llvm_err(self.inner.build_unconditional_branch(dest))?;
        Ok(())
    }

    /// Branch to `then_block` if `cond` holds, else to `else_block`.
    ///
    /// # Panics
    ///
    /// Panics if either target belongs to another function or `cond` is not
    /// a `bool`.
    pub fn if_(
        &mut self,
        cond: &Expr<'ctx>,
        then_block: Block<'ctx>,
        else_block: Block<'ctx>,
    ) -> Result<()> {
        self.check_owner(then_block, "if");
        self.check_owner(else_block, "if");
        assert_bool(cond, "if");
        self.trace(&Event::If {
            cond,
            then_block: then_block.index(),
            else_block: else_block.index(),
        });
        let then_bb = self.func.extent(then_block).first;
        let else_bb = self.func.extent(else_block).first;
        llvm_err(self.inner.build_conditional_branch(
            cond.value().into_int_value(),
            then_bb,
            else_bb,
        ))?;
        Ok(())
    }

    /// Return `results` from the function.
    ///
    /// No results emit `ret void`. A single result is coerced to the declared
    /// result type. Several results are each coerced to their declared type
    /// and returned as one aggregate, in declared order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coercion`](crate::Error::Coercion) if a result is not
    /// assignable to its declared type.
    ///
    /// # Panics
    ///
    /// Panics if a non-empty result list does not match the declared result
    /// count.
    pub fn ret(&mut self, results: &[Expr<'ctx>]) -> Result<()> {
        self.trace(&Event::Return { results });
        if results.is_empty() {
            llvm_err(self.inner.build_return(None))?;
            return Ok(());
        }

        let declared = self.func.signature().results();
        assert_eq!(
            results.len(),
            declared.len(),
            "{} returns {} values, got {}",
            self.func.name(),
            declared.len(),
            results.len(),
        );
        if let [single] = results {
            let ret = self.coerce(single, &declared[0])?;
            llvm_err(self.inner.build_return(Some(&ret.value())))?;
        } else {
            let values = results
                .iter()
                .zip(declared)
                .map(|(v, ty)| self.coerce(v, ty).map(|e| e.value()))
                .collect::<Result<Vec<BasicValueEnum<'ctx>>>>()?;
            llvm_err(self.inner.build_aggregate_return(&values))?;
        }
        Ok(())
    }

    /// Terminate the current block with `unreachable`.
    pub fn unreachable(&mut self) -> Result<()> {
        self.trace(&Event::Unreachable);
        llvm_err(self.inner.build_unreachable())?;
        Ok(())
    }

    /// Panic with `value`: call the runtime panic dispatcher, which never
    /// returns, and terminate the block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coercion`](crate::Error::Coercion) if `value` cannot
    /// be passed as an interface value.
    pub fn panic(&mut self, value: &Expr<'ctx>) -> Result<()> {
        self.trace(&Event::Panic { value });
        let dispatch = self.prog.runtime(RuntimeFn::TracePanic);
        self.emit_call(&dispatch, slice::from_ref(value))?;
        llvm_err(self.inner.build_unreachable())?;
        Ok(())
    }

    /// Run `then` only when `cond` holds, without leaving the current block.
    ///
    /// The current block is split: its last fragment branches on `cond` to a
    /// new fragment for `then` and to a new continuation fragment, which
    /// becomes the block's last fragment. The block keeps its index and
    /// entry, so branches into it and phis naming it as predecessor stay
    /// valid. If `then` leaves its fragment unterminated, control falls
    /// through to the continuation.
    ///
    /// The branch is emitted at the end of the current block's last fragment,
    /// wherever the insertion point was before.
    ///
    /// # Panics
    ///
    /// Panics if there is no current block, the current block is already
    /// terminated, or `cond` is not a `bool`.
    pub fn if_then<F>(&mut self, cond: &Expr<'ctx>, then: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let blk = self.current_block("if_then");
        assert_bool(cond, "if_then");
        self.trace(&Event::Split { block: blk.index() });

        let context = self.prog.context();
        let prefix = &self.prog.config().block_prefix;
        let idx = blk.index();
        let last = self.func.extent(blk).last;
        assert!(
            last.get_terminator().is_none(),
            "if_then on terminated {blk} of {}",
            self.func.name()
        );
        let then_bb = context.insert_basic_block_after(last, &format!("{prefix}{idx}.then"));
        let done_bb = context.insert_basic_block_after(then_bb, &format!("{prefix}{idx}.done"));
        tracing::trace!(function = %self.func.name(), block = idx, "split block");
        self.inner.position_at_end(last);
        llvm_err(self.inner.build_conditional_branch(
            cond.value().into_int_value(),
            then_bb,
            done_bb,
        ))?;

        self.func.extent_mut(blk).last = then_bb;
        self.inner.position_at_end(then_bb);
        then(self)?;
        self.blk = Some(blk);

        let tail = self.func.extent(blk).last;
        if tail.get_terminator().is_none() {
            self.inner.position_at_end(tail);
            llvm_err(self.inner.build_unconditional_branch(done_bb))?;
        }
        self.func.extent_mut(blk).last = done_bb;
        self.inner.position_at_end(done_bb);
        Ok(())
    }
}

fn assert_bool(cond: &Expr<'_>, op: &str) {
    assert!(
        cond.ty().is_bool(),
        "{op} condition must be bool, got {}",
        cond.ty()
    );
}
