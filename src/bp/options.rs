use crate::error::BpError;

// What to do when both unnormalized masses vanish (or are not finite)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegeneratePolicy {
    Error,
    Uniform,
}

#[derive(Debug, Clone)]
pub struct BpOptions {
    message_start: f64, // message on the leaves, 0.5 = no information
    degenerate_policy: DegeneratePolicy,
}

impl Default for BpOptions {
    fn default() -> Self {
        BpOptions {
            message_start: 0.5,
            degenerate_policy: DegeneratePolicy::Error,
        }
    }
}

impl BpOptions {
    pub fn set_message_start(&mut self, value: f64) -> Result<&mut Self, BpError> {
        if !(0. ..=1.).contains(&value) {
            return Err(BpError::InvalidMessage(value));
        }
        self.message_start = value;
        Ok(self)
    }

    pub fn set_degenerate_policy(&mut self, value: DegeneratePolicy) -> &mut Self {
        self.degenerate_policy = value;
        self
    }

    pub fn message_start(&self) -> f64 {
        self.message_start
    }

    pub fn degenerate_policy(&self) -> DegeneratePolicy {
        self.degenerate_policy
    }
}
