use log::{debug, warn};

use crate::{
    bp::{
        options::DegeneratePolicy,
        potential::{log_field, log_pairwise, Spin},
    },
    error::BpError,
};

// Unnormalized masses (log domain) that could not be normalized:
// an energy was NaN, or both masses vanish / one diverges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Degenerate {
    pub log_up: f64,
    pub log_dw: f64,
}

impl Degenerate {
    // Applies the degenerate-normalization policy, `site` is the index the value belongs to
    pub fn resolve(self, site: usize, policy: DegeneratePolicy) -> Result<f64, BpError> {
        match policy {
            DegeneratePolicy::Error => {
                debug!(
                    "Degenerate normalization at site {}: {:?}, raising",
                    site, self
                );
                Err(BpError::NumericalDomain {
                    site,
                    log_up: self.log_up,
                    log_dw: self.log_dw,
                })
            }
            DegeneratePolicy::Uniform => {
                warn!(
                    "Degenerate normalization at site {}: {:?}, falling back to 0.5",
                    site, self
                );
                Ok(0.5)
            }
        }
    }
}

// Message kept as log masses of the two spin values, so that messages
// arbitrarily close to 0 or 1 keep their full precision between steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogMessage {
    pub log_up: f64,
    pub log_dw: f64,
}

impl LogMessage {
    pub fn from_probability(mu_up: f64) -> Self {
        LogMessage {
            log_up: mu_up.ln(),
            log_dw: (1. - mu_up).ln(),
        }
    }

    // Rescales so that the larger log mass is 0
    pub fn normalized(self) -> Result<Self, Degenerate> {
        let degenerate = Degenerate {
            log_up: self.log_up,
            log_dw: self.log_dw,
        };
        if self.log_up.is_nan() || self.log_dw.is_nan() {
            return Err(degenerate);
        }
        let max = self.log_up.max(self.log_dw);
        if !max.is_finite() {
            return Err(degenerate);
        }
        Ok(LogMessage {
            log_up: self.log_up - max,
            log_dw: self.log_dw - max,
        })
    }

    pub fn probability(self) -> Result<f64, Degenerate> {
        normalize_log_pair(self.log_up, self.log_dw)
    }

    fn log_mass(self, spin: Spin) -> f64 {
        match spin {
            Spin::Up => self.log_up,
            Spin::Down => self.log_dw,
        }
    }
}

// log(exp(a) + exp(b)), exact when either side is -inf
pub fn log_sum_exp(a: f64, b: f64) -> f64 {
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    let max = a.max(b);
    max + ((a - max).exp() + (b - max).exp()).ln()
}

// up / (up + dw) given log(up) and log(dw)
pub fn normalize_log_pair(log_up: f64, log_dw: f64) -> Result<f64, Degenerate> {
    let normalized = LogMessage { log_up, log_dw }.normalized()?;
    let up = normalized.log_up.exp();
    let dw = normalized.log_dw.exp();
    Ok(up / (up + dw))
}

// Next message across the edge with coupling `coupling`, `field` is the field
// at the source end of the edge:
// mu'(s') ~ sum_{s = +1, -1} phi(s, s') phi(s) mu(s).
// By the left-right symmetry of the chain the same rule serves both directions.
pub fn propagate_log_message(
    beta: f64,
    coupling: f64,
    field: f64,
    incoming: LogMessage,
) -> Result<LogMessage, Degenerate> {
    let log_mass = |target: Spin| {
        Spin::BOTH
            .iter()
            .map(|&source| {
                log_pairwise(source, target, coupling, beta)
                    + log_field(source, field, beta)
                    + incoming.log_mass(source)
            })
            .fold(f64::NEG_INFINITY, log_sum_exp)
    };

    LogMessage {
        log_up: log_mass(Spin::Up),
        log_dw: log_mass(Spin::Down),
    }
    .normalized()
}

// Same rule on probabilities: takes the incoming positive message, returns mu'(+1)
pub fn propagate_message(
    beta: f64,
    coupling: f64,
    field: f64,
    mu_up: f64,
) -> Result<f64, Degenerate> {
    propagate_log_message(beta, coupling, field, LogMessage::from_probability(mu_up))?
        .probability()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bp::potential::{field, pairwise};

    // Direct evaluation with the exponential potentials
    fn propagate_message_direct(beta: f64, jj: f64, hh: f64, mu_up: f64) -> f64 {
        let (su, sd) = (Spin::Up, Spin::Down);
        let tmp_up = pairwise(su, su, jj, beta) * field(su, hh, beta) * mu_up
            + pairwise(sd, su, jj, beta) * field(sd, hh, beta) * (1. - mu_up);
        let tmp_dw = pairwise(su, sd, jj, beta) * field(su, hh, beta) * mu_up
            + pairwise(sd, sd, jj, beta) * field(sd, hh, beta) * (1. - mu_up);
        tmp_up / (tmp_up + tmp_dw)
    }

    #[test]
    fn log_sum_exp_handles_neg_infinity() {
        assert_eq!(log_sum_exp(f64::NEG_INFINITY, 2.), 2.);
        assert_eq!(log_sum_exp(-3., f64::NEG_INFINITY), -3.);
        assert!((log_sum_exp(0., 0.) - 2_f64.ln()).abs() < 1e-15);
        assert!(log_sum_exp(-1000., -1001.).is_finite());
    }

    #[test]
    fn matches_direct_evaluation() {
        for &(beta, jj, hh, mu) in &[
            (1., 0.5, 0.3, 0.5),
            (0.3, -1.2, 2., 0.1),
            (2., 0.8, -0.4, 0.9),
            (1., 1., 1., 0.),
            (1., -1., 0.5, 1.),
        ] {
            let message = propagate_message(beta, jj, hh, mu).unwrap();
            let expected = propagate_message_direct(beta, jj, hh, mu);
            assert!(
                (message - expected).abs() < 1e-12,
                "beta {beta} J {jj} h {hh} mu {mu}: {message} vs {expected}"
            );
        }
    }

    #[test]
    fn zero_coupling_gives_uninformative_message() {
        for &mu in &[0., 0.2, 0.5, 1.] {
            let message = propagate_message(3., 0., 1.7, mu).unwrap();
            assert!((message - 0.5).abs() < 1e-15);
        }
    }

    #[test]
    fn strong_ferromagnetic_coupling_transmits_field() {
        let message = propagate_message(1000., 1., 0.5, 0.5).unwrap();
        assert!((message - 1.).abs() < 1e-12);
        let message = propagate_message(1000., -1., 0.5, 0.5).unwrap();
        assert!(message.abs() < 1e-12);
    }

    #[test]
    fn saturated_message_keeps_its_log_odds() {
        // probability rounds to 1.0, the log masses still differ by beta (J + h) + ln(1/2)
        let beta = 20.;
        let message =
            propagate_log_message(beta, 1., 1., LogMessage::from_probability(0.5)).unwrap();
        assert_eq!(message.probability().unwrap(), 1.);
        assert_eq!(message.log_up, 0.);
        assert!((message.log_dw - (2_f64.ln() - 2. * beta)).abs() < 1e-12);

        // up mass ~ e^{beta}, down mass ~ e^{-beta} + e^{beta} 2 e^{-2 beta} = 3 e^{-beta}
        let next = propagate_log_message(beta, 1., 0., message).unwrap();
        assert_eq!(next.log_up, 0.);
        assert!((next.log_dw - (3_f64.ln() - 2. * beta)).abs() < 1e-12);
    }

    #[test]
    fn normalized_message_has_zero_max() {
        let message = LogMessage {
            log_up: -700.,
            log_dw: -702.,
        }
        .normalized()
        .unwrap();
        assert_eq!(message.log_up, 0.);
        assert_eq!(message.log_dw, -2.);
    }

    #[test]
    fn degenerate_cases_detected() {
        // inf * 0 energy
        assert!(propagate_message(f64::INFINITY, 0., 1., 0.5).is_err());
        assert!(propagate_message(1., 1., 1., f64::NAN).is_err());
        assert!(normalize_log_pair(f64::NEG_INFINITY, f64::NEG_INFINITY).is_err());
        assert!(normalize_log_pair(f64::INFINITY, 0.).is_err());
    }

    #[test]
    fn degenerate_policy() {
        let degenerate = Degenerate {
            log_up: f64::NEG_INFINITY,
            log_dw: f64::NEG_INFINITY,
        };
        let err = degenerate.resolve(3, DegeneratePolicy::Error).unwrap_err();
        assert!(err.is_numerical_domain());
        assert!(matches!(err, BpError::NumericalDomain { site: 3, .. }));
        assert_eq!(
            degenerate.resolve(3, DegeneratePolicy::Uniform).unwrap(),
            0.5
        );
    }
}
