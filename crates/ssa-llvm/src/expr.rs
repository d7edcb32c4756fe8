use std::fmt;

use inkwell::values::{AnyValue, BasicValueEnum};

use crate::types::Type;

/// A backend value together with its source type.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr<'ctx> {
    value: BasicValueEnum<'ctx>,
    ty: Type<'ctx>,
}

impl<'ctx> Expr<'ctx> {
    #[must_use]
    pub fn new(value: BasicValueEnum<'ctx>, ty: Type<'ctx>) -> Self {
        Self { value, ty }
    }

    #[must_use]
    pub fn value(&self) -> BasicValueEnum<'ctx> {
        self.value
    }

    #[must_use]
    pub fn ty(&self) -> &Type<'ctx> {
        &self.ty
    }
}

impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.value.print_to_string().to_string();
        f.write_str(text.trim())
    }
}
