// Calls and task launch.

use inkwell::values::{BasicMetadataValueEnum, BasicValueEnum};

use super::Builder;
use crate::error::llvm_err;
use crate::expr::Expr;
use crate::trace::Event;
use crate::{Error, Result};

impl<'ctx> Builder<'_, 'ctx> {
    /// Call `func` with `args`, each coerced to its parameter type.
    ///
    /// Yields nothing for a function without results, the result for one,
    /// and a tuple for several; use [`Builder::extract`] on the latter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coercion`] if an argument is not assignable to its
    /// parameter type.
    ///
    /// # Panics
    ///
    /// Panics if `func` is not a function value or the argument count does
    /// not match its signature.
    pub fn call(&mut self, func: &Expr<'ctx>, args: &[Expr<'ctx>]) -> Result<Option<Expr<'ctx>>> {
        self.trace(&Event::Call { func, args });
        self.emit_call(func, args)
    }

    /// Launch `func(args...)` as an independently scheduled task.
    ///
    /// `func` is expected to be the launcher symbol for the task; the launch
    /// itself is emitted as a plain call to it and any result is dropped.
    ///
    /// # Errors
    ///
    /// Same as [`Builder::call`].
    ///
    /// # Panics
    ///
    /// Same as [`Builder::call`].
    pub fn go(&mut self, func: &Expr<'ctx>, args: &[Expr<'ctx>]) -> Result<()> {
        self.trace(&Event::Go { func, args });
        self.emit_call(func, args)?;
        Ok(())
    }

    pub(super) fn emit_call(
        &self,
        func: &Expr<'ctx>,
        args: &[Expr<'ctx>],
    ) -> Result<Option<Expr<'ctx>>> {
        let sig = func
            .ty()
            .signature()
            .unwrap_or_else(|| panic!("call of non-function value of type {}", func.ty()));
        assert_eq!(
            args.len(),
            sig.params().len(),
            "call of {} with {} arguments",
            func.ty(),
            args.len(),
        );
        let BasicValueEnum::PointerValue(callee) = func.value() else {
            panic!("function value {func} is not a pointer");
        };

        let mut values: Vec<BasicMetadataValueEnum<'ctx>> = Vec::with_capacity(args.len());
        for (arg, ty) in args.iter().zip(sig.params()) {
            values.push(self.coerce(arg, ty)?.value().into());
        }

        let fn_type = self.prog.llvm_fn_type(sig);
        let site = llvm_err(self.inner.build_indirect_call(fn_type, callee, &values, ""))?;
        let Some(ty) = self.prog.results_type(sig) else {
            return Ok(None);
        };
        let value = site
            .try_as_basic_value()
            .basic()
            .ok_or_else(|| Error::Internal(format!("call of {} yielded no value", func.ty())))?;
        Ok(Some(Expr::new(value, ty)))
    }
}
