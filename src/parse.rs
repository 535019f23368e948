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

//! Module to parse ranked ballot files.

use crate::types::{Ballot, Election, Rank};
use log::{info, warn};
use regex::Regex;
use std::io::BufRead;
use thiserror::Error;

/// Errors raised while reading a ballot file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file has no `Position:` line.
    #[error(
        "No position was specified in the file.\n\
         Please make sure there is a line starting with \"Position:\"."
    )]
    MissingPosition,
    /// The file has no `Candidates:` line naming at least one candidate.
    #[error(
        "No candidates were specified in the file.\n\
         Please make sure there is a line starting with \"Candidates:\"."
    )]
    MissingCandidates,
    /// A ballot line has the wrong number of entries or a malformed entry.
    #[error(
        "The ballot on line number {line} is invalid.  It looks like this:\n\
         \n\
         {content}\n\
         \n\
         There are {expected} candidates, so each ballot should contain {expected} entries\n\
         separated by spaces.  Each entry must be a number or a hyphen."
    )]
    InvalidBallot {
        /// 1-based number of the offending line.
        line: usize,
        /// The offending line, with comments stripped.
        content: String,
        /// Number of entries the ballot should have had.
        expected: usize,
    },
    /// The underlying reader failed.
    #[error("The ballot file could not be read.")]
    Io(#[from] std::io::Error),
}

/// Parses a ballot file into an election input.
///
/// The file names the position (`Position: ...`) and lists the candidates
/// (`Candidates: a b c`); every later non-blank line is one ballot, with one
/// entry per candidate: a numeric rank (smaller is preferred) or `-` for no
/// preference. `#` starts a comment that runs to the end of the line.
pub fn parse_election(input: impl BufRead) -> Result<Election, ParseError> {
    let re_label = Regex::new(r"^([A-Za-z]+)\s*:\s*(.*)$").unwrap();

    let mut lines = input.lines().enumerate();

    // Find the lines that specify the position and the candidates.
    let mut position: Option<String> = None;
    let mut candidates: Option<Vec<String>> = None;
    while position.is_none() || candidates.is_none() {
        let Some((index, line)) = lines.next() else {
            break;
        };
        let line = line?;
        let content = strip_comment(&line);
        let Some(captures) = re_label.captures(content) else {
            continue;
        };
        let label = captures.get(1).unwrap().as_str().to_ascii_lowercase();
        let value = captures.get(2).unwrap().as_str().trim();
        match label.as_str() {
            "position" if !value.is_empty() => {
                info!("Position: {value}");
                position = Some(value.to_owned());
            }
            "position" => warn!("Ignored empty position on line {}", index + 1),
            "candidates" => {
                let names: Vec<String> = value.split_whitespace().map(str::to_owned).collect();
                if names.is_empty() {
                    warn!("Ignored empty candidate list on line {}", index + 1);
                } else {
                    info!("Candidates: {names:?}");
                    candidates = Some(names);
                }
            }
            _ => warn!("Unknown label on line {}: {label}", index + 1),
        }
    }
    let position = position.ok_or(ParseError::MissingPosition)?;
    let candidates = candidates.ok_or(ParseError::MissingCandidates)?;
    let num_candidates = candidates.len();

    // Read in the ballots.
    let mut ballots = Vec::new();
    for (index, line) in lines {
        let line = line?;
        let content = strip_comment(&line);
        if content.is_empty() {
            continue;
        }
        let ballot =
            parse_ballot(content, num_candidates).ok_or_else(|| ParseError::InvalidBallot {
                line: index + 1,
                content: content.to_owned(),
                expected: num_candidates,
            })?;
        ballots.push(ballot);
    }
    info!("Number of ballots: {}", ballots.len());

    Ok(Election::builder()
        .position(&position)
        .candidates(candidates)
        .ballots(ballots)
        .build())
}

/// Strips a trailing `#` comment and surrounding whitespace.
fn strip_comment(line: &str) -> &str {
    match line.split_once('#') {
        Some((content, _)) => content.trim(),
        None => line.trim(),
    }
}

/// Parses one ballot line: whitespace-separated entries, each a non-negative
/// rank or `-` for unranked. Returns `None` when the line is malformed.
fn parse_ballot(line: &str, num_candidates: usize) -> Option<Ballot> {
    let ranks: Vec<Rank> = line
        .split_whitespace()
        .map(|entry| {
            if entry == "-" {
                Some(Rank::Unranked)
            } else {
                entry.parse::<u32>().ok().map(Rank::Ranked)
            }
        })
        .collect::<Option<Vec<Rank>>>()?;
    if ranks.len() == num_candidates {
        Some(Ballot::new(ranks))
    } else {
        None
    }
}
