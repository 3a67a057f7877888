use thiserror::Error;
use zerosim_audit::AuditError;
use zerosim_math::{ErrorKind, FixedPointError};

#[derive(Error, Debug)]
pub enum KernelError {
    #[error("An audit session is required")]
    MissingSession,
    #[error("Audit session is finalized")]
    SessionFinalized,
    #[error("{param}: requested {requested} iterations, maximum is {max}")]
    IterationLimit {
        param: &'static str,
        requested: u32,
        max: u32,
    },
    #[error("{param}: term count must be at least 1")]
    ZeroTerms { param: &'static str },
    #[error("Invalid kernel configuration: {0}")]
    InvalidConfig(String),
    #[error("Math error: {0}")]
    Math(#[from] FixedPointError),
    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),
}

impl KernelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KernelError::Math(e) => e.kind(),
            KernelError::Audit(e) => e.kind(),
            _ => ErrorKind::Value,
        }
    }
}
