// Program: LLVM module, type construction, function declaration and the
// runtime registry shared by every function's builder.

use inkwell::AddressSpace;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType};
use inkwell::values::{BasicValueEnum, PointerValue};

use crate::builder::Builder;
use crate::expr::Expr;
use crate::function::Function;
use crate::runtime::{Runtime, RuntimeFn};
use crate::types::{Kind, Signature, Type};
use crate::{Error, Result};

/// Naming conventions of the emitted module.
#[derive(Debug, Clone)]
pub struct EmitConfig {
    /// Suffix marking package initializer symbols (`pkg.init`). Calls to such
    /// symbols at function entry form a prologue that insertions skip.
    pub init_suffix: String,
    /// Prefix of LLVM block names; the logical index follows it.
    pub block_prefix: String,
    /// Prefix of runtime support symbols.
    pub runtime_prefix: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            init_suffix: ".init".to_string(),
            block_prefix: "_bb".to_string(),
            runtime_prefix: "runtime.".to_string(),
        }
    }
}

pub struct Program<'ctx> {
    context: &'ctx Context,
    module: Module<'ctx>,
    config: EmitConfig,
    runtime: Runtime<'ctx>,
}

impl<'ctx> Program<'ctx> {
    #[must_use]
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        Self::with_config(context, module_name, EmitConfig::default())
    }

    #[must_use]
    pub fn with_config(context: &'ctx Context, module_name: &str, config: EmitConfig) -> Self {
        let mut program = Self {
            context,
            module: context.create_module(module_name),
            config,
            runtime: Runtime::default(),
        };
        program.runtime = Runtime::declare(&program);
        program
    }

    #[must_use]
    pub fn context(&self) -> &'ctx Context {
        self.context
    }

    #[must_use]
    pub fn module(&self) -> &Module<'ctx> {
        &self.module
    }

    #[must_use]
    pub fn config(&self) -> &EmitConfig {
        &self.config
    }

    // ── Types ──

    #[must_use]
    pub fn bool_type(&self) -> Type<'ctx> {
        Type::new(Kind::Bool, self.context.bool_type().into())
    }

    /// Signed integer type of `bits` width.
    ///
    /// # Panics
    ///
    /// Panics unless `bits` is 8, 16, 32 or 64.
    #[must_use]
    pub fn int_type(&self, bits: u32) -> Type<'ctx> {
        Type::new(Kind::Int { bits, signed: true }, self.int_ll(bits))
    }

    /// Unsigned integer type of `bits` width.
    ///
    /// # Panics
    ///
    /// Panics unless `bits` is 8, 16, 32 or 64.
    #[must_use]
    pub fn uint_type(&self, bits: u32) -> Type<'ctx> {
        let ll = self.int_ll(bits);
        Type::new(
            Kind::Int {
                bits,
                signed: false,
            },
            ll,
        )
    }

    /// # Panics
    ///
    /// Panics unless `bits` is 32 or 64.
    #[must_use]
    pub fn float_type(&self, bits: u32) -> Type<'ctx> {
        let ll = match bits {
            32 => self.context.f32_type(),
            64 => self.context.f64_type(),
            _ => panic!("unsupported float width {bits}"),
        };
        Type::new(Kind::Float { bits }, ll.into())
    }

    #[must_use]
    pub fn pointer_to(&self, elem: &Type<'ctx>) -> Type<'ctx> {
        Type::new(Kind::Pointer(elem.clone()), self.ptr_ll())
    }

    #[must_use]
    pub fn unsafe_pointer(&self) -> Type<'ctx> {
        Type::new(Kind::UnsafePointer, self.ptr_ll())
    }

    /// `interface{}`: `{ ptr type_descriptor, ptr data }`.
    #[must_use]
    pub fn interface_type(&self) -> Type<'ctx> {
        let ptr = self.ptr_ll();
        let ll = self.context.struct_type(&[ptr, ptr], false).into();
        Type::new(Kind::Interface, ll)
    }

    #[must_use]
    pub fn tuple_type(&self, elems: Vec<Type<'ctx>>) -> Type<'ctx> {
        let lls: Vec<BasicTypeEnum<'ctx>> = elems.iter().map(Type::ll).collect();
        let ll = self.context.struct_type(&lls, false).into();
        Type::new(Kind::Tuple(elems), ll)
    }

    /// Function value type; values of it are code pointers.
    #[must_use]
    pub fn func_type(&self, sig: Signature<'ctx>) -> Type<'ctx> {
        Type::new(Kind::Func(sig), self.ptr_ll())
    }

    /// Type of what a call with this signature yields: nothing, the single
    /// result, or a tuple of all results.
    #[must_use]
    pub fn results_type(&self, sig: &Signature<'ctx>) -> Option<Type<'ctx>> {
        match sig.results() {
            [] => None,
            [single] => Some(single.clone()),
            many => Some(self.tuple_type(many.to_vec())),
        }
    }

    /// LLVM function type. Two or more results are returned as one struct.
    #[must_use]
    pub fn llvm_fn_type(&self, sig: &Signature<'ctx>) -> FunctionType<'ctx> {
        let params: Vec<BasicMetadataTypeEnum<'ctx>> =
            sig.params().iter().map(|t| t.ll().into()).collect();
        match self.results_type(sig) {
            None => self.context.void_type().fn_type(&params, false),
            Some(ret) => ret.ll().fn_type(&params, false),
        }
    }

    fn int_ll(&self, bits: u32) -> BasicTypeEnum<'ctx> {
        let ty = match bits {
            8 => self.context.i8_type(),
            16 => self.context.i16_type(),
            32 => self.context.i32_type(),
            64 => self.context.i64_type(),
            _ => panic!("unsupported integer width {bits}"),
        };
        ty.into()
    }

    fn ptr_ll(&self) -> BasicTypeEnum<'ctx> {
        self.context.ptr_type(AddressSpace::default()).into()
    }

    // ── Constants ──

    /// # Panics
    ///
    /// Panics if `ty` is not an integer type.
    #[must_use]
    pub fn const_int(&self, ty: &Type<'ctx>, value: u64) -> Expr<'ctx> {
        let Kind::Int { signed, .. } = ty.kind() else {
            panic!("const_int of non-integer type {ty}");
        };
        let v = ty.ll().into_int_type().const_int(value, *signed);
        Expr::new(v.into(), ty.clone())
    }

    #[must_use]
    pub fn const_bool(&self, value: bool) -> Expr<'ctx> {
        let v = self.context.bool_type().const_int(u64::from(value), false);
        Expr::new(v.into(), self.bool_type())
    }

    /// Constant tuple of constant elements.
    #[must_use]
    pub fn const_tuple(&self, elems: &[Expr<'ctx>]) -> Expr<'ctx> {
        let values: Vec<BasicValueEnum<'ctx>> = elems.iter().map(Expr::value).collect();
        let ty = self.tuple_type(elems.iter().map(|e| e.ty().clone()).collect());
        Expr::new(self.context.const_struct(&values, false).into(), ty)
    }

    /// Zero value of `ty` (nil for pointers and interfaces).
    #[must_use]
    pub fn zero(&self, ty: &Type<'ctx>) -> Expr<'ctx> {
        Expr::new(ty.ll().const_zero(), ty.clone())
    }

    // ── Functions ──

    /// Declare a function. It has no body until blocks are made and emitted.
    #[must_use]
    pub fn new_function(&self, name: &str, sig: Signature<'ctx>) -> Function<'ctx> {
        let value = self
            .module
            .add_function(name, self.llvm_fn_type(&sig), None);
        Function::new(value, sig)
    }

    /// `f` as a callable value.
    #[must_use]
    pub fn func_expr(&self, f: &Function<'ctx>) -> Expr<'ctx> {
        let ptr = f.value().as_global_value().as_pointer_value();
        Expr::new(ptr.into(), self.func_type(f.signature().clone()))
    }

    /// Look up a runtime support function.
    ///
    /// # Panics
    ///
    /// Panics if the runtime function was not declared, which cannot happen
    /// for a program built by [`Program::new`].
    #[must_use]
    pub fn runtime(&self, f: RuntimeFn) -> Expr<'ctx> {
        self.runtime
            .get(f)
            .cloned()
            .unwrap_or_else(|| panic!("runtime function {} not declared", f.name()))
    }

    /// Type descriptor global for `ty`, declared on first use.
    pub(crate) fn type_descriptor(&self, ty: &Type<'ctx>) -> PointerValue<'ctx> {
        let name = format!("__type.{ty}");
        let global = self.module.get_global(&name).unwrap_or_else(|| {
            let global = self.module.add_global(self.context.i8_type(), None, &name);
            global.set_constant(true);
            global
        });
        global.as_pointer_value()
    }

    /// Start emitting into `func`.
    pub fn new_builder<'a>(&'a self, func: &'a mut Function<'ctx>) -> Builder<'a, 'ctx> {
        Builder::new(self, func)
    }

    // ── Output ──

    pub fn verify(&self) -> Result<()> {
        self.module.verify().map_err(|e| {
            let message = e.to_string();
            tracing::debug!(module = %self.module.get_name().to_string_lossy(), %message, "module verification failed");
            Error::Verify(message)
        })
    }

    #[must_use]
    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }
}
