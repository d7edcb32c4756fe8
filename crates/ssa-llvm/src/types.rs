// Source-level types paired with their LLVM representation.

use std::fmt;
use std::rc::Rc;

use inkwell::types::BasicTypeEnum;

/// Shape of a source type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind<'ctx> {
    Bool,
    Int { bits: u32, signed: bool },
    Float { bits: u32 },
    /// Typed pointer `*T`.
    Pointer(Type<'ctx>),
    UnsafePointer,
    /// Empty interface, represented as `{ type descriptor, data }`.
    Interface,
    /// Result list of a multi-result instruction.
    Tuple(Vec<Type<'ctx>>),
    Func(Signature<'ctx>),
}

/// A source type and the LLVM type that represents it.
///
/// Cloning is cheap: the shape is reference counted.
#[derive(Debug, Clone)]
pub struct Type<'ctx> {
    kind: Rc<Kind<'ctx>>,
    ll: BasicTypeEnum<'ctx>,
}

impl<'ctx> Type<'ctx> {
    pub(crate) fn new(kind: Kind<'ctx>, ll: BasicTypeEnum<'ctx>) -> Self {
        Self {
            kind: Rc::new(kind),
            ll,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &Kind<'ctx> {
        &self.kind
    }

    /// The LLVM type values of this type are represented with.
    #[must_use]
    pub fn ll(&self) -> BasicTypeEnum<'ctx> {
        self.ll
    }

    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(*self.kind, Kind::Bool)
    }

    /// Element types when this is a tuple.
    #[must_use]
    pub fn tuple_elems(&self) -> Option<&[Type<'ctx>]> {
        match &*self.kind {
            Kind::Tuple(elems) => Some(elems),
            _ => None,
        }
    }

    /// Signature when this is a function type.
    #[must_use]
    pub fn signature(&self) -> Option<&Signature<'ctx>> {
        match &*self.kind {
            Kind::Func(sig) => Some(sig),
            _ => None,
        }
    }
}

// The LLVM type is derived from the shape within one context, so the shape
// alone decides identity.
impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.kind, &other.kind) || self.kind == other.kind
    }
}

impl Eq for Type<'_> {}

impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.kind {
            Kind::Bool => f.write_str("bool"),
            Kind::Int { bits, signed: true } => write!(f, "int{bits}"),
            Kind::Int {
                bits,
                signed: false,
            } => write!(f, "uint{bits}"),
            Kind::Float { bits } => write!(f, "float{bits}"),
            Kind::Pointer(elem) => write!(f, "*{elem}"),
            Kind::UnsafePointer => f.write_str("unsafe.Pointer"),
            Kind::Interface => f.write_str("interface{}"),
            Kind::Tuple(elems) => write_list(f, elems),
            Kind::Func(sig) => write!(f, "func{sig}"),
        }
    }
}

/// Ordered parameter and result types of a function.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature<'ctx> {
    params: Vec<Type<'ctx>>,
    results: Vec<Type<'ctx>>,
}

impl<'ctx> Signature<'ctx> {
    #[must_use]
    pub fn new(params: Vec<Type<'ctx>>, results: Vec<Type<'ctx>>) -> Self {
        Self { params, results }
    }

    #[must_use]
    pub fn params(&self) -> &[Type<'ctx>] {
        &self.params
    }

    #[must_use]
    pub fn results(&self) -> &[Type<'ctx>] {
        &self.results
    }
}

impl fmt::Display for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, &self.params)?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " {single}"),
            many => {
                f.write_str(" ")?;
                write_list(f, many)
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type<'_>]) -> fmt::Result {
    f.write_str("(")?;
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{ty}")?;
    }
    f.write_str(")")
}
