// Assignment coercion of typed values at call and return boundaries.

use inkwell::values::BasicValueEnum;

use super::Builder;
use crate::error::llvm_err;
use crate::expr::Expr;
use crate::types::{Kind, Type};
use crate::{Error, Result};

impl<'ctx> Builder<'_, 'ctx> {
    /// Convert `v` to type `to`.
    ///
    /// Values already of type `to` pass through untouched. Integers widen by
    /// the signedness of their source type, `float32` widens to `float64`,
    /// typed pointers convert to and from `unsafe.Pointer`, and pointers are
    /// boxed into `interface{}` with their type descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coercion`] for any other pair of types.
    pub fn coerce(&self, v: &Expr<'ctx>, to: &Type<'ctx>) -> Result<Expr<'ctx>> {
        if v.ty() == to {
            return Ok(v.clone());
        }
        let value: BasicValueEnum<'ctx> = match (v.ty().kind(), to.kind()) {
            (
                Kind::Int {
                    bits: from_bits,
                    signed,
                },
                Kind::Int { bits: to_bits, .. },
            ) if to_bits > from_bits => {
                let int = v.value().into_int_value();
                let target = to.ll().into_int_type();
                let widened = if *signed {
                    llvm_err(self.inner.build_int_s_extend(int, target, ""))?
                } else {
                    llvm_err(self.inner.build_int_z_extend(int, target, ""))?
                };
                widened.into()
            }
            (Kind::Float { bits: 32 }, Kind::Float { bits: 64 }) => {
                let float = v.value().into_float_value();
                let target = to.ll().into_float_type();
                llvm_err(self.inner.build_float_ext(float, target, ""))?.into()
            }
            (Kind::Pointer(_), Kind::UnsafePointer) | (Kind::UnsafePointer, Kind::Pointer(_)) => {
                v.value()
            }
            (Kind::Pointer(_), Kind::Interface) => self.box_pointer(v, to)?,
            _ => {
                return Err(Error::Coercion {
                    from: v.ty().to_string(),
                    to: to.to_string(),
                });
            }
        };
        Ok(Expr::new(value, to.clone()))
    }

    /// `{ type descriptor of v's type, v }`.
    fn box_pointer(&self, v: &Expr<'ctx>, iface: &Type<'ctx>) -> Result<BasicValueEnum<'ctx>> {
        let desc = self.prog.type_descriptor(v.ty());
        let empty = iface.ll().into_struct_type().get_undef();
        let typed = llvm_err(self.inner.build_insert_value(empty, desc, 0, ""))?;
        let boxed = llvm_err(self.inner.build_insert_value(
            typed.into_struct_value(),
            v.value(),
            1,
            "",
        ))?;
        Ok(boxed.into_struct_value().into())
    }
}
