use serde::{Deserialize, Serialize};
use zerosim_math::transcendental::{
    Transcendental, DEFAULT_ERF_TERMS, DEFAULT_EXP_TERMS, DEFAULT_LN_TERMS,
    DEFAULT_PHI_SERIES_TERMS, DEFAULT_POW_TERMS, DEFAULT_SQRT_ITERATIONS, DEFAULT_TRIG_TERMS,
    MAX_PHI_SERIES_TERMS, MAX_SERIES_TERMS, MAX_SQRT_ITERATIONS,
};

use crate::error::KernelError;

/// Default term counts and caps used by [`crate::Kernel`].
///
/// Caps may be lowered below the hard limits in `zerosim_math` but never
/// raised above them. Missing JSON fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelConfig {
    pub sqrt_iterations: u32,
    pub phi_series_terms: u32,
    pub exp_terms: u32,
    pub ln_terms: u32,
    pub trig_terms: u32,
    pub tanh_terms: u32,
    pub sigmoid_terms: u32,
    pub erf_terms: u32,
    pub pow_terms: u32,
    pub max_sqrt_iterations: u32,
    pub max_phi_series_terms: u32,
    pub max_series_terms: u32,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            sqrt_iterations: DEFAULT_SQRT_ITERATIONS,
            phi_series_terms: DEFAULT_PHI_SERIES_TERMS,
            exp_terms: DEFAULT_EXP_TERMS,
            ln_terms: DEFAULT_LN_TERMS,
            trig_terms: DEFAULT_TRIG_TERMS,
            tanh_terms: DEFAULT_EXP_TERMS,
            sigmoid_terms: DEFAULT_EXP_TERMS,
            erf_terms: DEFAULT_ERF_TERMS,
            pow_terms: DEFAULT_POW_TERMS,
            max_sqrt_iterations: MAX_SQRT_ITERATIONS,
            max_phi_series_terms: MAX_PHI_SERIES_TERMS,
            max_series_terms: MAX_SERIES_TERMS,
        }
    }
}

impl KernelConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(text: &str) -> Result<Self, KernelError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| KernelError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), KernelError> {
        let caps = [
            ("max_sqrt_iterations", self.max_sqrt_iterations, MAX_SQRT_ITERATIONS),
            ("max_phi_series_terms", self.max_phi_series_terms, MAX_PHI_SERIES_TERMS),
            ("max_series_terms", self.max_series_terms, MAX_SERIES_TERMS),
        ];
        for (name, cap, hard) in caps {
            if cap > hard {
                return Err(KernelError::InvalidConfig(format!(
                    "{} = {} exceeds hard limit {}",
                    name, cap, hard
                )));
            }
        }

        for function in ALL_FUNCTIONS {
            let terms = self.default_terms(function);
            let max = self.max_terms(function);
            if terms > max {
                return Err(KernelError::InvalidConfig(format!(
                    "default for {} ({}) exceeds its cap {}",
                    function.op_name(),
                    terms,
                    max
                )));
            }
            if terms == 0 && !function.accepts_zero_terms() {
                return Err(KernelError::InvalidConfig(format!(
                    "default for {} must be at least 1",
                    function.op_name()
                )));
            }
        }
        Ok(())
    }

    /// Term count substituted when the caller passes `None`.
    pub fn default_terms(&self, function: Transcendental) -> u32 {
        match function {
            Transcendental::Sqrt => self.sqrt_iterations,
            Transcendental::PhiSeries => self.phi_series_terms,
            Transcendental::Exp => self.exp_terms,
            Transcendental::Ln => self.ln_terms,
            Transcendental::Sin | Transcendental::Cos => self.trig_terms,
            Transcendental::Tanh => self.tanh_terms,
            Transcendental::Sigmoid => self.sigmoid_terms,
            Transcendental::Erf => self.erf_terms,
            Transcendental::Pow => self.pow_terms,
        }
    }

    pub fn max_terms(&self, function: Transcendental) -> u32 {
        match function {
            Transcendental::Sqrt => self.max_sqrt_iterations,
            Transcendental::PhiSeries => self.max_phi_series_terms,
            _ => self.max_series_terms,
        }
    }
}

const ALL_FUNCTIONS: [Transcendental; 10] = [
    Transcendental::Sqrt,
    Transcendental::PhiSeries,
    Transcendental::Exp,
    Transcendental::Ln,
    Transcendental::Sin,
    Transcendental::Cos,
    Transcendental::Tanh,
    Transcendental::Sigmoid,
    Transcendental::Erf,
    Transcendental::Pow,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = KernelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_terms(Transcendental::Sqrt), 20);
        assert_eq!(config.default_terms(Transcendental::PhiSeries), 50);
        assert_eq!(config.max_terms(Transcendental::Erf), MAX_SERIES_TERMS);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = KernelConfig::from_json_str(r#"{"sqrt_iterations": 40}"#).unwrap();
        assert_eq!(config.sqrt_iterations, 40);
        assert_eq!(config.ln_terms, DEFAULT_LN_TERMS);
    }

    #[test]
    fn test_rejects_invalid_configs() {
        for text in [
            r#"{"max_sqrt_iterations": 101}"#,
            r#"{"sqrt_iterations": 60, "max_sqrt_iterations": 50}"#,
            r#"{"exp_terms": 0}"#,
            r#"{"exp_terms": "many"}"#,
            r#"{"unknown_knob": 1}"#,
        ] {
            let err = KernelConfig::from_json_str(text).unwrap_err();
            assert!(matches!(err, KernelError::InvalidConfig(_)), "{}", text);
        }
    }

    #[test]
    fn test_zero_sqrt_default_allowed() {
        let config = KernelConfig {
            sqrt_iterations: 0,
            ..KernelConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
