use std::{path::PathBuf, time::Instant};

use ising_chain_bp::{BpError, ChainFile, IsingChain};
use log::info;

const DEFAULT_INSTANCE_DIR: &str = "chain_instances/";

fn instance_files() -> Result<Vec<PathBuf>, BpError> {
    let args: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if !args.is_empty() {
        return Ok(args);
    }
    let mut paths = std::fs::read_dir(DEFAULT_INSTANCE_DIR)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    Ok(paths)
}

fn main() -> Result<(), BpError> {
    // RUST_LOG=debug for debug-level logging, etc.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    for input_file in instance_files()? {
        info!("Processing instance {}.", input_file.display());

        let time_start = Instant::now();
        let chain = IsingChain::read_chain_file(&input_file)?;
        info!(
            "Chain import complete ({} sites). Elapsed time {:?}.",
            chain.num_sites(),
            time_start.elapsed()
        );

        let time_start = Instant::now();
        let marginals = chain.marginals()?;
        info!(
            "Marginals computed. Elapsed time {:?}.",
            time_start.elapsed()
        );

        for (site, marginal) in marginals.iter().enumerate() {
            println!("{}\t{}", site, marginal);
        }

        info!("Finished processing instance {}.", input_file.display());
    }
    Ok(())
}
