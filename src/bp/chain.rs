use std::{fmt::Display, str::FromStr};

use log::debug;

use crate::{
    bp::{
        message::{propagate_log_message, LogMessage},
        options::DegeneratePolicy,
    },
    error::BpError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,  // messages coming from the left sub-chain, walking left to right
    Right, // messages coming from the right sub-chain, walking right to left
}

impl FromStr for Direction {
    type Err = BpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(BpError::InvalidDirection(s.to_string())),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

// Checks that coupling i connects sites i and i+1 for every site
pub fn check_shape(couplings: &[f64], fields: &[f64]) -> Result<(), BpError> {
    if fields.is_empty() || couplings.len() + 1 != fields.len() {
        return Err(BpError::ShapeMismatch {
            couplings: couplings.len(),
            fields: fields.len(),
        });
    }
    Ok(())
}

// (site the new message arrives at, coupling, field at the source end of the edge)
fn edge_sequence<'a>(
    couplings: &'a [f64],
    fields: &'a [f64],
    direction: Direction,
) -> Box<dyn Iterator<Item = (usize, f64, f64)> + 'a> {
    let n = fields.len();
    match direction {
        Direction::Left => Box::new(
            couplings
                .iter()
                .zip(fields.iter())
                .enumerate()
                .map(|(i, (&jj, &hh))| (i + 1, jj, hh)),
        ),
        Direction::Right => Box::new(
            couplings
                .iter()
                .rev()
                .zip(fields.iter().rev())
                .enumerate()
                .map(move |(i, (&jj, &hh))| (n - 2 - i, jj, hh)),
        ),
    }
}

// Propagates messages along the whole chain from one side, in the log domain.
// Output is index-aligned with `fields`: for `Left`, entry i is the message reaching
// site i from the left (entry 0 = `message_start`); for `Right`, entry i is the message
// reaching site i from the right (entry N-1 = `message_start`).
pub fn propagate_log_messages(
    beta: f64,
    couplings: &[f64],
    fields: &[f64],
    message_start: f64,
    direction: Direction,
    policy: DegeneratePolicy,
) -> Result<Vec<LogMessage>, BpError> {
    check_shape(couplings, fields)?;
    if !(0. ..=1.).contains(&message_start) {
        return Err(BpError::InvalidMessage(message_start));
    }

    debug!(
        "Propagating {} messages from the {}",
        fields.len(),
        direction
    );

    let mut messages = edge_sequence(couplings, fields, direction).try_fold(
        vec![LogMessage::from_probability(message_start)],
        |mut messages, (site, jj, hh)| {
            let message_previous = messages[messages.len() - 1];
            let message_next = propagate_log_message(beta, jj, hh, message_previous)
                .or_else(|degenerate| {
                    degenerate
                        .resolve(site, policy)
                        .map(LogMessage::from_probability)
                })?;
            messages.push(message_next);
            Ok::<_, BpError>(messages)
        },
    )?;

    if direction == Direction::Right {
        messages.reverse();
    }
    Ok(messages)
}

// Same as `propagate_log_messages`, with messages as probabilities of spin up
pub fn propagate_messages(
    beta: f64,
    couplings: &[f64],
    fields: &[f64],
    message_start: f64,
    direction: Direction,
    policy: DegeneratePolicy,
) -> Result<Vec<f64>, BpError> {
    propagate_log_messages(beta, couplings, fields, message_start, direction, policy)?
        .into_iter()
        .enumerate()
        .map(|(site, message)| {
            message
                .probability()
                .or_else(|degenerate| degenerate.resolve(site, policy))
        })
        .collect()
}
