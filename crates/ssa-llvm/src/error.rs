use inkwell::builder::BuilderError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot use value of type {from} as {to}")]
    Coercion { from: String, to: String },

    #[error("LLVM verify failed: {0}")]
    Verify(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn llvm_err<T>(result: std::result::Result<T, BuilderError>) -> Result<T> {
    result.map_err(|e| Error::Internal(format!("LLVM builder error: {e:?}")))
}
