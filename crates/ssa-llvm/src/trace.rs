// Emission tracing: observers a builder reports each emitted construct to.

use std::fmt;

use crate::expr::Expr;
use crate::types::Type;

/// One emission step, borrowed from the builder call that produced it.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a, 'ctx> {
    Block { index: usize },
    Jump { target: usize },
    If {
        cond: &'a Expr<'ctx>,
        then_block: usize,
        else_block: usize,
    },
    Return { results: &'a [Expr<'ctx>] },
    Unreachable,
    Panic { value: &'a Expr<'ctx> },
    Call {
        func: &'a Expr<'ctx>,
        args: &'a [Expr<'ctx>],
    },
    Go {
        func: &'a Expr<'ctx>,
        args: &'a [Expr<'ctx>],
    },
    Extract { tuple: &'a Expr<'ctx>, index: usize },
    Phi { ty: &'a Type<'ctx> },
    Split { block: usize },
    Dispose,
}

impl fmt::Display for Event<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block { index } => write!(f, "Block {index}:"),
            Self::Jump { target } => write!(f, "Jump {target}"),
            Self::If {
                cond,
                then_block,
                else_block,
            } => write!(f, "If {cond}, {then_block}, {else_block}"),
            Self::Return { results } => {
                f.write_str("Return")?;
                write_args(f, results)
            }
            Self::Unreachable => f.write_str("Unreachable"),
            Self::Panic { value } => write!(f, "Panic {value}"),
            Self::Call { func, args } => {
                write!(f, "Call {func}")?;
                write_args(f, args)
            }
            Self::Go { func, args } => {
                write!(f, "Go {func}")?;
                write_args(f, args)
            }
            Self::Extract { tuple, index } => write!(f, "Extract {tuple}, {index}"),
            Self::Phi { ty } => write!(f, "Phi {ty}"),
            Self::Split { block } => write!(f, "Split {block}"),
            Self::Dispose => f.write_str("Dispose"),
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expr<'_>]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        f.write_str(if i == 0 { " " } else { ", " })?;
        write!(f, "{arg}")?;
    }
    Ok(())
}

/// Receives every event a builder emits.
pub trait Tracer {
    fn trace(&self, event: &Event<'_, '_>);
}

/// Discards all events. The default for new builders.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn trace(&self, _event: &Event<'_, '_>) {}
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn trace(&self, event: &Event<'_, '_>) {
        tracing::debug!(target: "ssa_llvm::emit", "{event}");
    }
}
