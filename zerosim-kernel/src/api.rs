//! Audited entry points.
//!
//! Every call takes the caller's session as `Option<&mut AuditSession>` and
//! runs in three strict phases: validate (session present and open, term
//! count within its cap), compute, then append exactly one entry. A call that
//! fails in any phase leaves the session untouched.

use tracing::debug;
use zerosim_audit::AuditSession;
use zerosim_math::transcendental::{self, Transcendental};
use zerosim_math::{Comparison, FixedPointError, FixedPointValue};

use crate::config::KernelConfig;
use crate::error::KernelError;

/// Public API layer over `zerosim-math`, bound to one [`KernelConfig`].
///
/// The kernel holds no mutable state; sharing one across threads is fine as
/// long as each thread brings its own session.
#[derive(Debug, Clone, Copy, Default)]
pub struct Kernel {
    config: KernelConfig,
}

fn require_session<'a>(
    log: Option<&'a mut AuditSession>,
    op: &'static str,
) -> Result<&'a mut AuditSession, KernelError> {
    let Some(session) = log else {
        debug!(op, "rejected: no audit session");
        return Err(KernelError::MissingSession);
    };
    if !session.is_open() {
        debug!(op, "rejected: audit session finalized");
        return Err(KernelError::SessionFinalized);
    }
    Ok(session)
}

impl Kernel {
    pub fn new(config: KernelConfig) -> Result<Self, KernelError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Effective term count: the caller's value, else the configured default.
    pub fn resolve_terms(
        &self,
        function: Transcendental,
        requested: Option<u32>,
    ) -> Result<u32, KernelError> {
        let param = function.op_name();
        let terms = requested.unwrap_or_else(|| self.config.default_terms(function));
        let max = self.config.max_terms(function);
        if terms > max {
            debug!(op = param, requested = terms, max, "rejected: term count over cap");
            return Err(KernelError::IterationLimit {
                param,
                requested: terms,
                max,
            });
        }
        if terms == 0 && !function.accepts_zero_terms() {
            debug!(op = param, "rejected: zero terms");
            return Err(KernelError::ZeroTerms { param });
        }
        Ok(terms)
    }

    fn binary(
        &self,
        op: &'static str,
        log: Option<&mut AuditSession>,
        a: FixedPointValue,
        b: FixedPointValue,
        f: impl FnOnce(FixedPointValue, FixedPointValue) -> Result<FixedPointValue, FixedPointError>,
    ) -> Result<FixedPointValue, KernelError> {
        let session = require_session(log, op)?;
        let result = f(a, b)?;
        session.record(op, &[a.raw(), b.raw()], result.raw())?;
        Ok(result)
    }

    pub fn add(
        &self,
        log: Option<&mut AuditSession>,
        a: FixedPointValue,
        b: FixedPointValue,
    ) -> Result<FixedPointValue, KernelError> {
        self.binary("add", log, a, b, FixedPointValue::checked_add)
    }

    pub fn sub(
        &self,
        log: Option<&mut AuditSession>,
        a: FixedPointValue,
        b: FixedPointValue,
    ) -> Result<FixedPointValue, KernelError> {
        self.binary("sub", log, a, b, FixedPointValue::checked_sub)
    }

    pub fn mul(
        &self,
        log: Option<&mut AuditSession>,
        a: FixedPointValue,
        b: FixedPointValue,
    ) -> Result<FixedPointValue, KernelError> {
        self.binary("mul", log, a, b, FixedPointValue::checked_mul)
    }

    pub fn div(
        &self,
        log: Option<&mut AuditSession>,
        a: FixedPointValue,
        b: FixedPointValue,
    ) -> Result<FixedPointValue, KernelError> {
        self.binary("div", log, a, b, FixedPointValue::checked_div)
    }

    /// Exact comparison, logged with result `1` or `0`.
    pub fn compare(
        &self,
        comparison: Comparison,
        log: Option<&mut AuditSession>,
        a: FixedPointValue,
        b: FixedPointValue,
    ) -> Result<bool, KernelError> {
        let op = comparison.op_name();
        let session = require_session(log, op)?;
        let result = comparison.evaluate(a, b);
        session.record(op, &[a.raw(), b.raw()], u128::from(result))?;
        Ok(result)
    }

    pub fn gt(
        &self,
        log: Option<&mut AuditSession>,
        a: FixedPointValue,
        b: FixedPointValue,
    ) -> Result<bool, KernelError> {
        self.compare(Comparison::Gt, log, a, b)
    }

    pub fn lt(
        &self,
        log: Option<&mut AuditSession>,
        a: FixedPointValue,
        b: FixedPointValue,
    ) -> Result<bool, KernelError> {
        self.compare(Comparison::Lt, log, a, b)
    }

    pub fn gte(
        &self,
        log: Option<&mut AuditSession>,
        a: FixedPointValue,
        b: FixedPointValue,
    ) -> Result<bool, KernelError> {
        self.compare(Comparison::Gte, log, a, b)
    }

    pub fn lte(
        &self,
        log: Option<&mut AuditSession>,
        a: FixedPointValue,
        b: FixedPointValue,
    ) -> Result<bool, KernelError> {
        self.compare(Comparison::Lte, log, a, b)
    }

    pub fn eq(
        &self,
        log: Option<&mut AuditSession>,
        a: FixedPointValue,
        b: FixedPointValue,
    ) -> Result<bool, KernelError> {
        self.compare(Comparison::Eq, log, a, b)
    }

    pub fn neq(
        &self,
        log: Option<&mut AuditSession>,
        a: FixedPointValue,
        b: FixedPointValue,
    ) -> Result<bool, KernelError> {
        self.compare(Comparison::Neq, log, a, b)
    }

    /// Run a single-argument function and log `[x, terms]`.
    ///
    /// `terms` is the effective count, so a substituted default is recorded.
    pub fn evaluate(
        &self,
        function: Transcendental,
        log: Option<&mut AuditSession>,
        x: FixedPointValue,
        terms: Option<u32>,
    ) -> Result<FixedPointValue, KernelError> {
        let op = function.op_name();
        let session = require_session(log, op)?;
        let terms = self.resolve_terms(function, terms)?;
        let result = transcendental::evaluate(function, x, terms)?;
        session.record(op, &[x.raw(), u128::from(terms)], result.raw())?;
        Ok(result)
    }

    pub fn sqrt(
        &self,
        log: Option<&mut AuditSession>,
        x: FixedPointValue,
        iterations: Option<u32>,
    ) -> Result<FixedPointValue, KernelError> {
        self.evaluate(Transcendental::Sqrt, log, x, iterations)
    }

    pub fn phi_series(
        &self,
        log: Option<&mut AuditSession>,
        x: FixedPointValue,
        n: Option<u32>,
    ) -> Result<FixedPointValue, KernelError> {
        self.evaluate(Transcendental::PhiSeries, log, x, n)
    }

    pub fn exp(
        &self,
        log: Option<&mut AuditSession>,
        x: FixedPointValue,
        terms: Option<u32>,
    ) -> Result<FixedPointValue, KernelError> {
        self.evaluate(Transcendental::Exp, log, x, terms)
    }

    pub fn ln(
        &self,
        log: Option<&mut AuditSession>,
        x: FixedPointValue,
        terms: Option<u32>,
    ) -> Result<FixedPointValue, KernelError> {
        self.evaluate(Transcendental::Ln, log, x, terms)
    }

    pub fn sin(
        &self,
        log: Option<&mut AuditSession>,
        x: FixedPointValue,
        terms: Option<u32>,
    ) -> Result<FixedPointValue, KernelError> {
        self.evaluate(Transcendental::Sin, log, x, terms)
    }

    pub fn cos(
        &self,
        log: Option<&mut AuditSession>,
        x: FixedPointValue,
        terms: Option<u32>,
    ) -> Result<FixedPointValue, KernelError> {
        self.evaluate(Transcendental::Cos, log, x, terms)
    }

    pub fn tanh(
        &self,
        log: Option<&mut AuditSession>,
        x: FixedPointValue,
        terms: Option<u32>,
    ) -> Result<FixedPointValue, KernelError> {
        self.evaluate(Transcendental::Tanh, log, x, terms)
    }

    pub fn sigmoid(
        &self,
        log: Option<&mut AuditSession>,
        x: FixedPointValue,
        terms: Option<u32>,
    ) -> Result<FixedPointValue, KernelError> {
        self.evaluate(Transcendental::Sigmoid, log, x, terms)
    }

    pub fn erf(
        &self,
        log: Option<&mut AuditSession>,
        x: FixedPointValue,
        terms: Option<u32>,
    ) -> Result<FixedPointValue, KernelError> {
        self.evaluate(Transcendental::Erf, log, x, terms)
    }

    /// `x^y`, logged as `[x, y, terms]`.
    pub fn pow(
        &self,
        log: Option<&mut AuditSession>,
        x: FixedPointValue,
        y: FixedPointValue,
        terms: Option<u32>,
    ) -> Result<FixedPointValue, KernelError> {
        let op = Transcendental::Pow.op_name();
        let session = require_session(log, op)?;
        let terms = self.resolve_terms(Transcendental::Pow, terms)?;
        let result = transcendental::pow(x, y, terms)?;
        session.record(op, &[x.raw(), y.raw(), u128::from(terms)], result.raw())?;
        Ok(result)
    }
}

// Free functions over the default kernel.

pub fn add(
    log: Option<&mut AuditSession>,
    a: FixedPointValue,
    b: FixedPointValue,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().add(log, a, b)
}

pub fn sub(
    log: Option<&mut AuditSession>,
    a: FixedPointValue,
    b: FixedPointValue,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().sub(log, a, b)
}

pub fn mul(
    log: Option<&mut AuditSession>,
    a: FixedPointValue,
    b: FixedPointValue,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().mul(log, a, b)
}

pub fn div(
    log: Option<&mut AuditSession>,
    a: FixedPointValue,
    b: FixedPointValue,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().div(log, a, b)
}

pub fn gt(
    log: Option<&mut AuditSession>,
    a: FixedPointValue,
    b: FixedPointValue,
) -> Result<bool, KernelError> {
    Kernel::default().gt(log, a, b)
}

pub fn lt(
    log: Option<&mut AuditSession>,
    a: FixedPointValue,
    b: FixedPointValue,
) -> Result<bool, KernelError> {
    Kernel::default().lt(log, a, b)
}

pub fn gte(
    log: Option<&mut AuditSession>,
    a: FixedPointValue,
    b: FixedPointValue,
) -> Result<bool, KernelError> {
    Kernel::default().gte(log, a, b)
}

pub fn lte(
    log: Option<&mut AuditSession>,
    a: FixedPointValue,
    b: FixedPointValue,
) -> Result<bool, KernelError> {
    Kernel::default().lte(log, a, b)
}

pub fn eq(
    log: Option<&mut AuditSession>,
    a: FixedPointValue,
    b: FixedPointValue,
) -> Result<bool, KernelError> {
    Kernel::default().eq(log, a, b)
}

pub fn neq(
    log: Option<&mut AuditSession>,
    a: FixedPointValue,
    b: FixedPointValue,
) -> Result<bool, KernelError> {
    Kernel::default().neq(log, a, b)
}

pub fn sqrt(
    log: Option<&mut AuditSession>,
    x: FixedPointValue,
    iterations: Option<u32>,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().sqrt(log, x, iterations)
}

pub fn phi_series(
    log: Option<&mut AuditSession>,
    x: FixedPointValue,
    n: Option<u32>,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().phi_series(log, x, n)
}

pub fn exp(
    log: Option<&mut AuditSession>,
    x: FixedPointValue,
    terms: Option<u32>,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().exp(log, x, terms)
}

pub fn ln(
    log: Option<&mut AuditSession>,
    x: FixedPointValue,
    terms: Option<u32>,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().ln(log, x, terms)
}

pub fn sin(
    log: Option<&mut AuditSession>,
    x: FixedPointValue,
    terms: Option<u32>,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().sin(log, x, terms)
}

pub fn cos(
    log: Option<&mut AuditSession>,
    x: FixedPointValue,
    terms: Option<u32>,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().cos(log, x, terms)
}

pub fn tanh(
    log: Option<&mut AuditSession>,
    x: FixedPointValue,
    terms: Option<u32>,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().tanh(log, x, terms)
}

pub fn sigmoid(
    log: Option<&mut AuditSession>,
    x: FixedPointValue,
    terms: Option<u32>,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().sigmoid(log, x, terms)
}

pub fn erf(
    log: Option<&mut AuditSession>,
    x: FixedPointValue,
    terms: Option<u32>,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().erf(log, x, terms)
}

pub fn pow(
    log: Option<&mut AuditSession>,
    x: FixedPointValue,
    y: FixedPointValue,
    terms: Option<u32>,
) -> Result<FixedPointValue, KernelError> {
    Kernel::default().pow(log, x, y, terms)
}
