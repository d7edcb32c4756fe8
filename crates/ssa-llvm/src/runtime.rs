// Runtime support functions the emitted code calls into.

use std::collections::HashMap;

use crate::expr::Expr;
use crate::program::Program;
use crate::types::Signature;

/// Runtime functions known to the emission layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeFn {
    /// `TracePanic(v interface{})`: records and dispatches a panic value.
    /// Never returns.
    TracePanic,
}

impl RuntimeFn {
    pub const ALL: [RuntimeFn; 1] = [RuntimeFn::TracePanic];

    /// Logical name; the symbol is this name behind the runtime prefix.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::TracePanic => "TracePanic",
        }
    }

    fn signature<'ctx>(self, prog: &Program<'ctx>) -> Signature<'ctx> {
        match self {
            Self::TracePanic => Signature::new(vec![prog.interface_type()], vec![]),
        }
    }
}

/// Declared runtime functions. Filled once when the program is created and
/// only read afterwards.
#[derive(Debug, Default)]
pub(crate) struct Runtime<'ctx> {
    funcs: HashMap<RuntimeFn, Expr<'ctx>>,
}

impl<'ctx> Runtime<'ctx> {
    pub(crate) fn declare(prog: &Program<'ctx>) -> Self {
        let prefix = &prog.config().runtime_prefix;
        let funcs = RuntimeFn::ALL
            .into_iter()
            .map(|f| {
                let name = format!("{prefix}{}", f.name());
                let func = prog.new_function(&name, f.signature(prog));
                (f, prog.func_expr(&func))
            })
            .collect();
        Self { funcs }
    }

    pub(crate) fn get(&self, f: RuntimeFn) -> Option<&Expr<'ctx>> {
        self.funcs.get(&f)
    }
}
