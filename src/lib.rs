pub mod bp {
    pub mod chain;
    pub mod marginals;
    pub mod message;
    pub mod options;
    pub mod potential;
}

pub mod stats {
    pub mod common;
}

pub mod io {
    pub mod chain_file;
}

pub mod error;

pub use bp::{
    chain::Direction,
    marginals::{marginals, marginals_with_options, IsingChain},
    message::LogMessage,
    options::{BpOptions, DegeneratePolicy},
};
pub use error::{BpError, StatsError};
pub use io::chain_file::ChainFile;
