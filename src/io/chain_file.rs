// Plain-text chain instance format:
//
// ISING_CHAIN
// <beta>
// <number of sites N>
// <N fields>
// <N-1 couplings>     (absent when N = 1)
//
// Empty lines and lines starting with `#` or `c ` are skipped.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::Path,
    str::FromStr,
};

use log::debug;

use crate::{bp::marginals::IsingChain, error::BpError};

const HEADER: &str = "ISING_CHAIN";

enum ChainFileState {
    Header,
    Beta,
    NumberOfSites,
    Fields(usize),
    Couplings(usize),
    EndOfFile,
}

fn parse_error(line: usize, reason: impl Into<String>) -> BpError {
    BpError::Parse {
        line,
        reason: reason.into(),
    }
}

fn parse_value<T: FromStr>(token: &str, line: usize, what: &str) -> Result<T, BpError> {
    token
        .parse::<T>()
        .map_err(|_| parse_error(line, format!("cannot parse {} from `{}`", what, token)))
}

fn parse_values(string: &str, line: usize, expected: usize, what: &str) -> Result<Vec<f64>, BpError> {
    let values = string
        .split_whitespace()
        .map(|token| parse_value::<f64>(token, line, what))
        .collect::<Result<Vec<f64>, BpError>>()?;
    if values.len() != expected {
        return Err(parse_error(
            line,
            format!("expected {} {}, found {}", expected, what, values.len()),
        ));
    }
    Ok(values)
}

fn vec_to_string(v: &[f64]) -> String {
    v.iter()
        .map(|elem| elem.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}

pub trait ChainFile
where
    Self: Sized,
{
    fn read_chain<R: BufRead>(reader: R) -> Result<Self, BpError>;
    fn write_chain<W: Write>(&self, writer: W) -> io::Result<()>;

    fn read_chain_file<P: AsRef<Path>>(path: P) -> Result<Self, BpError> {
        Self::read_chain(BufReader::new(File::open(path)?))
    }

    fn write_chain_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        self.write_chain(File::create(path)?)
    }
}

impl ChainFile for IsingChain {
    fn read_chain<R: BufRead>(reader: R) -> Result<Self, BpError> {
        let mut state = ChainFileState::Header;

        let mut beta = 0.;
        let mut fields = Vec::new();
        let mut couplings = Vec::new();
        let mut line_number = 0;

        for line in reader.lines() {
            let line = line?;
            line_number += 1;
            let trimmed_line = line.trim();

            // skip empty lines and comments
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') || trimmed_line.starts_with("c ") {
                continue;
            }

            match state {
                ChainFileState::Header => {
                    if trimmed_line != HEADER {
                        return Err(parse_error(
                            line_number,
                            format!("expected header `{}`", HEADER),
                        ));
                    }
                    state = ChainFileState::Beta;
                }
                ChainFileState::Beta => {
                    beta = parse_value(trimmed_line, line_number, "inverse temperature")?;
                    state = ChainFileState::NumberOfSites;
                }
                ChainFileState::NumberOfSites => {
                    let num_sites: usize = parse_value(trimmed_line, line_number, "number of sites")?;
                    if num_sites == 0 {
                        return Err(parse_error(line_number, "chain must have at least one site"));
                    }
                    state = ChainFileState::Fields(num_sites);
                }
                ChainFileState::Fields(num_sites) => {
                    fields = parse_values(trimmed_line, line_number, num_sites, "fields")?;
                    state = match num_sites {
                        1 => ChainFileState::EndOfFile,
                        _ => ChainFileState::Couplings(num_sites - 1),
                    };
                }
                ChainFileState::Couplings(num_couplings) => {
                    couplings = parse_values(trimmed_line, line_number, num_couplings, "couplings")?;
                    state = ChainFileState::EndOfFile;
                }
                ChainFileState::EndOfFile => {
                    return Err(parse_error(line_number, "unexpected content after the chain"));
                }
            }
        }

        match state {
            ChainFileState::EndOfFile => {
                debug!("Read chain with {} sites", fields.len());
                IsingChain::new(beta, couplings, fields)
            }
            _ => Err(parse_error(line_number, "unexpected end of file")),
        }
    }

    fn write_chain<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)?;
        writeln!(writer, "{}", self.beta())?;
        writeln!(writer, "{}", self.num_sites())?;
        writeln!(writer, "{}", vec_to_string(self.fields()))?;
        if !self.couplings().is_empty() {
            writeln!(writer, "{}", vec_to_string(self.couplings()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> Result<IsingChain, BpError> {
        IsingChain::read_chain(text.as_bytes())
    }

    #[test]
    fn reads_chain() {
        let chain = read("ISING_CHAIN\n# beta\n1.5\n3\n\n0.1 -0.2 0.3\n1 0.5\n").unwrap();
        assert_eq!(chain.beta(), 1.5);
        assert_eq!(chain.fields(), &[0.1, -0.2, 0.3]);
        assert_eq!(chain.couplings(), &[1., 0.5]);
    }

    #[test]
    fn reads_single_site_chain() {
        let chain = read("ISING_CHAIN\n1\n1\n1.0\n").unwrap();
        assert_eq!(chain.num_sites(), 1);
        assert!(chain.couplings().is_empty());
    }

    #[test]
    fn rejects_malformed_files() {
        assert!(matches!(
            read("MARKOV\n1\n1\n1\n"),
            Err(BpError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            read("ISING_CHAIN\nhot\n1\n1\n"),
            Err(BpError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            read("ISING_CHAIN\n1\n3\n0 0\n0 0\n"),
            Err(BpError::Parse { line: 4, .. })
        ));
        assert!(matches!(
            read("ISING_CHAIN\n1\n2\n0 0\n"),
            Err(BpError::Parse { .. })
        ));
        assert!(matches!(
            read("ISING_CHAIN\n1\n0\n"),
            Err(BpError::Parse { line: 3, .. })
        ));
        assert!(matches!(
            read("ISING_CHAIN\n1\n1\n0\n0\n"),
            Err(BpError::Parse { line: 5, .. })
        ));
    }

    #[test]
    fn written_chain_reads_back() {
        let chain = IsingChain::new(0.75, vec![0.25, -1.5], vec![0.5, 0., -2.]).unwrap();
        let mut buffer = Vec::new();
        chain.write_chain(&mut buffer).unwrap();
        assert_eq!(read(std::str::from_utf8(&buffer).unwrap()).unwrap(), chain);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.txt");
        let chain = IsingChain::new(2., vec![], vec![1.]).unwrap();
        chain.write_chain_file(&path).unwrap();
        assert_eq!(IsingChain::read_chain_file(&path).unwrap(), chain);
        assert!(matches!(
            IsingChain::read_chain_file(dir.path().join("missing.txt")),
            Err(BpError::Io(_))
        ));
    }
}
