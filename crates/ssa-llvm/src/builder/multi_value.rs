// Multi-result values and SSA merge points.

use inkwell::basic_block::BasicBlock;
use inkwell::values::{BasicValue, BasicValueEnum, PhiValue};

use super::Builder;
use crate::block::Block;
use crate::error::llvm_err;
use crate::expr::Expr;
use crate::trace::Event;
use crate::types::Type;
use crate::Result;

/// A phi node under construction.
#[derive(Debug, Clone)]
pub struct Phi<'ctx> {
    expr: Expr<'ctx>,
    phi: PhiValue<'ctx>,
}

impl<'ctx> Phi<'ctx> {
    /// The phi's result as a typed value.
    #[must_use]
    pub fn expr(&self) -> &Expr<'ctx> {
        &self.expr
    }

    #[must_use]
    pub fn value(&self) -> PhiValue<'ctx> {
        self.phi
    }

    /// Add one incoming edge per predecessor, with the value `value_of(i,
    /// pred)` for the `i`-th predecessor.
    ///
    /// Each edge is registered against the LLVM block control actually leaves
    /// the predecessor from, i.e. its last fragment. `preds` must be exactly
    /// the blocks that branch to the phi's block; anything else is left for
    /// module verification to report.
    ///
    /// # Panics
    ///
    /// Panics if a predecessor belongs to another function than `b`.
    pub fn add_incoming<F>(&self, b: &Builder<'_, 'ctx>, preds: &[Block<'ctx>], mut value_of: F)
    where
        F: FnMut(usize, Block<'ctx>) -> Expr<'ctx>,
    {
        let incoming: Vec<(BasicValueEnum<'ctx>, BasicBlock<'ctx>)> = preds
            .iter()
            .enumerate()
            .map(|(i, &pred)| {
                b.check_owner(pred, "add_incoming");
                (value_of(i, pred).value(), b.func.extent(pred).last)
            })
            .collect();
        let refs: Vec<(&dyn BasicValue<'ctx>, BasicBlock<'ctx>)> = incoming
            .iter()
            .map(|(v, bb)| (v as &dyn BasicValue<'ctx>, *bb))
            .collect();
        self.phi.add_incoming(&refs);
    }
}

impl<'ctx> Builder<'_, 'ctx> {
    /// Component `i` of the multi-result value `x`.
    ///
    /// # Panics
    ///
    /// Panics if `x` is not a tuple or `i` is not below its arity.
    pub fn extract(&mut self, x: &Expr<'ctx>, i: usize) -> Result<Expr<'ctx>> {
        self.trace(&Event::Extract { tuple: x, index: i });
        let elems = x
            .ty()
            .tuple_elems()
            .unwrap_or_else(|| panic!("extract from non-tuple value of type {}", x.ty()));
        assert!(
            i < elems.len(),
            "extract index {i} out of range for {}",
            x.ty()
        );
        let BasicValueEnum::StructValue(agg) = x.value() else {
            panic!("tuple value {x} is not an aggregate");
        };
        let value = llvm_err(self.inner.build_extract_value(agg, i as u32, ""))?;
        Ok(Expr::new(value, elems[i].clone()))
    }

    /// An empty phi of type `ty` at the insertion point. Wire it with
    /// [`Phi::add_incoming`].
    pub fn phi(&mut self, ty: &Type<'ctx>) -> Result<Phi<'ctx>> {
        self.trace(&Event::Phi { ty });
        let phi = llvm_err(self.inner.build_phi(ty.ll(), ""))?;
        Ok(Phi {
            expr: Expr::new(phi.as_basic_value(), ty.clone()),
            phi,
        })
    }
}
