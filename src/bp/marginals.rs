use log::debug;

use crate::{
    bp::{
        chain::{check_shape, propagate_log_messages, Direction},
        message::normalize_log_pair,
        options::BpOptions,
        potential::{log_field, Spin},
    },
    error::BpError,
};

// Marginals of an Ising spin chain:
// mu(s_i) ~ mu_left,i(s_i) exp(beta h_i s_i) mu_right,i(s_i), returns mu(s_i = +1) per site
pub fn marginals(beta: f64, couplings: &[f64], fields: &[f64]) -> Result<Vec<f64>, BpError> {
    marginals_with_options(beta, couplings, fields, &BpOptions::default())
}

pub fn marginals_with_options(
    beta: f64,
    couplings: &[f64],
    fields: &[f64],
    options: &BpOptions,
) -> Result<Vec<f64>, BpError> {
    check_shape(couplings, fields)?;

    let policy = options.degenerate_policy();
    let message_start = options.message_start();

    let mu_left = propagate_log_messages(
        beta,
        couplings,
        fields,
        message_start,
        Direction::Left,
        policy,
    )?;
    let mu_right = propagate_log_messages(
        beta,
        couplings,
        fields,
        message_start,
        Direction::Right,
        policy,
    )?;

    let marginals = mu_left
        .iter()
        .zip(mu_right.iter())
        .zip(fields.iter())
        .enumerate()
        .map(|(site, ((ml, mr), &hh))| {
            let log_up = ml.log_up + log_field(Spin::Up, hh, beta) + mr.log_up;
            let log_dw = ml.log_dw + log_field(Spin::Down, hh, beta) + mr.log_dw;
            normalize_log_pair(log_up, log_dw).or_else(|degenerate| degenerate.resolve(site, policy))
        })
        .collect::<Result<Vec<f64>, BpError>>()?;

    debug!("Computed marginals for a chain of {} sites", marginals.len());
    Ok(marginals)
}

// Immutable chain parameters, validated on construction
#[derive(Debug, Clone, PartialEq)]
pub struct IsingChain {
    beta: f64,
    couplings: Vec<f64>, // couplings[i] connects sites i and i+1
    fields: Vec<f64>,
}

impl IsingChain {
    pub fn new(beta: f64, couplings: Vec<f64>, fields: Vec<f64>) -> Result<Self, BpError> {
        check_shape(&couplings, &fields)?;
        Ok(IsingChain {
            beta,
            couplings,
            fields,
        })
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn couplings(&self) -> &[f64] {
        &self.couplings
    }

    pub fn fields(&self) -> &[f64] {
        &self.fields
    }

    pub fn num_sites(&self) -> usize {
        self.fields.len()
    }

    pub fn marginals(&self) -> Result<Vec<f64>, BpError> {
        marginals(self.beta, &self.couplings, &self.fields)
    }

    pub fn marginals_with_options(&self, options: &BpOptions) -> Result<Vec<f64>, BpError> {
        marginals_with_options(self.beta, &self.couplings, &self.fields, options)
    }
}
