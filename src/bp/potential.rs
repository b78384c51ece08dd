// Boltzmann weights of the Ising chain.
// The exponential forms are the physical potentials; the recursion works with
// the log forms (energies) and exponentiates only after normalization.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Up,
    Down,
}

impl Spin {
    pub const BOTH: [Spin; 2] = [Spin::Up, Spin::Down];

    pub fn value(self) -> f64 {
        match self {
            Spin::Up => 1.,
            Spin::Down => -1.,
        }
    }
}

// exp(beta * J * x_1 * x_2)
pub fn pairwise(x_1: Spin, x_2: Spin, coupling: f64, beta: f64) -> f64 {
    log_pairwise(x_1, x_2, coupling, beta).exp()
}

// exp(beta * h * x)
pub fn field(x: Spin, field: f64, beta: f64) -> f64 {
    log_field(x, field, beta).exp()
}

pub fn log_pairwise(x_1: Spin, x_2: Spin, coupling: f64, beta: f64) -> f64 {
    beta * coupling * x_1.value() * x_2.value()
}

pub fn log_field(x: Spin, field: f64, beta: f64) -> f64 {
    beta * field * x.value()
}
