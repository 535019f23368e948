// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command-line program for Schulze-method elections.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

use clap::Parser;
use schulze_rs::parse::parse_election;
use schulze_rs::report::save_report;
use schulze_rs::schulze::fill_positions;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;

/// Rust implementation of Schulze-method (Condorcet) election counting.
#[derive(Parser, Debug, PartialEq, Eq)]
struct Cli {
    /// Path to the ballot file to tabulate.
    ballots: PathBuf,

    /// Number of positions to fill. Each position after the first is filled
    /// by re-running the election with the previous winners removed from the
    /// candidate pool.
    #[arg(long, default_value_t = 1)]
    positions: usize,

    /// Directory where the report file is written. Defaults to the directory
    /// containing the ballot file.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl Cli {
    /// Runs the election described by the command-line parameters.
    fn run(self) -> Result<(), Box<dyn Error>> {
        let file = File::open(&self.ballots)?;
        let election = parse_election(BufReader::new(file))?;
        let result = fill_positions(&election, self.positions)?;

        let dir = self.output_dir.unwrap_or_else(|| {
            match self.ballots.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            }
        });
        let path = save_report(&dir, &election, &result)?;

        println!("Election results saved to: {}", path.display());
        for filled in &result.positions {
            for &winner in &filled.winners {
                println!("Winner: {}", election.candidates[winner]);
            }
        }
        if result.positions.len() < result.requested {
            println!(
                "Filled {} of {} requested positions before the candidate pool was exhausted.",
                result.positions.len(),
                result.requested
            );
        }
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(error) = cli.run() {
        eprintln!("There was a problem running the election.");
        eprintln!("{error}");
        process::exit(1);
    }
}
