use zerosim_audit::AuditSession;
use zerosim_math::transcendental::Transcendental;
use zerosim_math::{FixedPointValue, SCALE};

use crate::api::Kernel;
use crate::error::KernelError;

/// 1e-9 at the 18-digit scale.
pub const SERIES_TOLERANCE: u128 = 1_000_000_000;
/// 1e-6 at the 18-digit scale.
pub const ERF_TOLERANCE: u128 = 1_000_000_000_000;

/// A fixed (input, expected, tolerance) triple for one function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofVector {
    pub function: Transcendental,
    pub input: FixedPointValue,
    pub expected: FixedPointValue,
    /// Maximum absolute error, in raw scaled units.
    pub tolerance: u128,
}

impl ProofVector {
    pub const fn new(
        function: Transcendental,
        input: u128,
        expected: u128,
        tolerance: u128,
    ) -> Self {
        Self {
            function,
            input: FixedPointValue::from_raw(input),
            expected: FixedPointValue::from_raw(expected),
            tolerance,
        }
    }

    /// The reference vectors every build must reproduce.
    pub fn reference_set() -> Vec<ProofVector> {
        use Transcendental::*;
        vec![
            ProofVector::new(Exp, 0, SCALE, SERIES_TOLERANCE),
            ProofVector::new(Exp, SCALE, 2_718_281_828_459_045_235, SERIES_TOLERANCE),
            ProofVector::new(Ln, SCALE, 0, SERIES_TOLERANCE),
            ProofVector::new(Ln, 2_718_281_828_000_000_000, SCALE, SERIES_TOLERANCE),
            ProofVector::new(Sin, 0, 0, SERIES_TOLERANCE),
            ProofVector::new(Cos, 0, SCALE, SERIES_TOLERANCE),
            ProofVector::new(Tanh, 0, 0, SERIES_TOLERANCE),
            ProofVector::new(Sigmoid, 0, SCALE / 2, SERIES_TOLERANCE),
            ProofVector::new(Erf, 0, 0, ERF_TOLERANCE),
            ProofVector::new(Erf, SCALE, 842_700_792_949_714_869, ERF_TOLERANCE),
            ProofVector::new(Sqrt, 4 * SCALE, 2 * SCALE, 100_000),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofOutcome {
    pub vector: ProofVector,
    pub observed: FixedPointValue,
    pub error: u128,
    pub passed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofReport {
    pub outcomes: Vec<ProofOutcome>,
}

impl ProofReport {
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProofOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

impl Kernel {
    /// Evaluate `vectors` with default term counts, logging every call.
    ///
    /// A vector that misses its tolerance is reported, not raised; an
    /// evaluation error aborts the run.
    pub fn run_proof_vectors(
        &self,
        session: &mut AuditSession,
        vectors: &[ProofVector],
    ) -> Result<ProofReport, KernelError> {
        let mut report = ProofReport::default();
        for vector in vectors {
            let observed = self.evaluate(vector.function, Some(&mut *session), vector.input, None)?;
            let error = observed.raw().abs_diff(vector.expected.raw());
            report.outcomes.push(ProofOutcome {
                vector: *vector,
                observed,
                error,
                passed: error <= vector.tolerance,
            });
        }
        Ok(report)
    }
}
