use std::io;

use thiserror::Error;

// Errors raised by the belief-propagation engine and the chain file reader
#[derive(Debug, Error)]
pub enum BpError {
    #[error("length of couplings ({couplings}) and fields ({fields}) not consistent: expected couplings = fields - 1")]
    ShapeMismatch { couplings: usize, fields: usize },

    #[error("wrong direction `{0}`: must be `left` or `right`")]
    InvalidDirection(String),

    #[error("message {0} is not a probability in [0, 1]")]
    InvalidMessage(f64),

    #[error("degenerate normalization at site {site}: up mass {log_up}, down mass {log_dw} (log domain)")]
    NumericalDomain { site: usize, log_up: f64, log_dw: f64 },

    #[error("chain file, line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl BpError {
    // Input shape or token problems, raised before any numerical work
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BpError::ShapeMismatch { .. } | BpError::InvalidDirection(_) | BpError::InvalidMessage(_)
        )
    }

    pub fn is_numerical_domain(&self) -> bool {
        matches!(self, BpError::NumericalDomain { .. })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("sample is empty")]
    EmptySample,

    #[error("sample of length {len} too short, at least {required} elements required")]
    InsufficientSample { len: usize, required: usize },
}
