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

//! Rendering and saving of election reports.

use crate::schulze::ElectionResult;
use crate::tally::Pairwise;
use crate::types::{Election, Rank};
use chrono::{Local, NaiveDate};
use log::info;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while persisting an election report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report file could not be created or written.
    #[error(
        "The results could not be saved.  Please make sure\n\
         your ballot file is in a folder where you can write new files."
    )]
    Save(#[source] io::Error),
}

/// Derives the report file name from the position name and a date:
/// `YYYY-MM-DD-<position>.txt`, with every character of the position that is
/// not ASCII-alphanumeric replaced by a hyphen.
pub fn report_filename(position: &str, date: NaiveDate) -> String {
    let mut filename = format!("{}-", date.format("%Y-%m-%d"));
    for c in position.chars() {
        filename.push(if c.is_ascii_alphanumeric() { c } else { '-' });
    }
    filename.push_str(".txt");
    filename
}

/// Writes the full election report: a title, one summary section per filled
/// position, and an echo of the input for auditability.
pub fn write_report(
    out: &mut impl Write,
    election: &Election,
    result: &ElectionResult,
    date: NaiveDate,
) -> io::Result<()> {
    let title = format!(
        "Election Results for {} ({})",
        election.position,
        date.format("%Y-%m-%d")
    );
    writeln!(out)?;
    writeln!(out, "# {title}")?;
    writeln!(out, "# {}", "=".repeat(title.len()))?;
    writeln!(out, "# ")?;

    for index in 0..result.positions.len() {
        write_position_summary(out, election, result, index)?;
    }
    if result.positions.len() < result.requested {
        writeln!(out)?;
        writeln!(
            out,
            "# Only {} of {} requested positions could be filled.",
            result.positions.len(),
            result.requested
        )?;
    }

    write_appendix(out, election)?;
    Ok(())
}

/// Writes the summary of one filled position: the winner(s), how each winner
/// defeated other candidates of that round, and the remaining pairings.
fn write_position_summary(
    out: &mut impl Write,
    election: &Election,
    result: &ElectionResult,
    index: usize,
) -> io::Result<()> {
    let filled = &result.positions[index];
    let pool = &filled.pool;
    let tally = &filled.tally;

    if result.requested > 1 {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "# Position {} of {}:", index + 1, result.requested)?;
    }
    if filled.winners.len() > 1 {
        writeln!(out, "# There is a TIE between {} winners:", filled.winners.len())?;
    }
    for &winner in &filled.winners {
        writeln!(out, "#     Winner: {}", election.candidates[winner])?;
    }

    // Describe how the winner(s) defeated the other candidates of the round.
    for &winner in &filled.winners {
        let w = pool.iter().position(|&original| original == winner).unwrap();
        writeln!(out)?;
        writeln!(out, "# {} defeats:", election.candidates[winner])?;
        for i in 0..pool.len() {
            if i == w {
                continue;
            }
            if tally.prefer(w, i) > tally.prefer(i, w) {
                writeln!(
                    out,
                    "#     {} {}",
                    election.candidates[pool[i]],
                    by_line(tally, w, i)
                )?;
            }
        }
    }

    // Describe the other pairings between the round's candidates.
    writeln!(out)?;
    for i in 0..pool.len() {
        let i_winner = filled.winners.contains(&pool[i]);
        for j in 0..pool.len() {
            if i == j {
                continue;
            }
            let j_winner = filled.winners.contains(&pool[j]);
            if i_winner && !j_winner {
                continue;
            }
            let pro = tally.prefer(i, j);
            let con = tally.prefer(j, i);
            if pro == con && i > j {
                writeln!(
                    out,
                    "# {} is tied with {} ({pro} to {con})",
                    election.candidates[pool[i]],
                    election.candidates[pool[j]]
                )?;
            } else if pro > con {
                writeln!(
                    out,
                    "# {} defeats {} {}",
                    election.candidates[pool[i]],
                    election.candidates[pool[j]],
                    by_line(tally, i, j)
                )?;
            }
        }
    }
    Ok(())
}

/// Formats the score of a pairwise contest, with the truncated percentage in
/// favour when at least one ballot expressed a preference.
fn by_line(tally: &Pairwise, i: usize, j: usize) -> String {
    let pro = tally.prefer(i, j);
    let con = tally.prefer(j, i);
    match tally.percent_in_favour(i, j) {
        Some(percent) => format!("by {pro} to {con} ({percent}% in favour)"),
        None => format!("by {pro} to {con}"),
    }
}

/// Echoes the input the election was run from: the position, the candidate
/// list, and every ballot, with `-` standing for an unranked candidate.
fn write_appendix(out: &mut impl Write, election: &Election) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "# The rest of this file is a copy of the input used.")?;
    writeln!(out)?;
    writeln!(out, "Position: {}", election.position)?;
    writeln!(out, "Candidates: {}", election.candidates.join(" "))?;
    writeln!(out)?;
    writeln!(
        out,
        "# The following {} ballots were cast:",
        election.num_ballots
    )?;
    for ballot in &election.ballots {
        let entries: Vec<String> = ballot
            .ranks()
            .iter()
            .map(|rank| match rank {
                Rank::Ranked(r) => r.to_string(),
                Rank::Unranked => "-".to_owned(),
            })
            .collect();
        writeln!(out, "{}", entries.join(" "))?;
    }
    Ok(())
}

/// Writes the report into `dir`, with the file name derived from the
/// position name and today's date. Returns the path of the saved file.
pub fn save_report(
    dir: &Path,
    election: &Election,
    result: &ElectionResult,
) -> Result<PathBuf, ReportError> {
    let date = Local::now().date_naive();
    let path = dir.join(report_filename(&election.position, date));
    let mut file = File::create(&path).map_err(ReportError::Save)?;
    write_report(&mut file, election, result, date).map_err(ReportError::Save)?;
    info!("Election report saved to {}", path.display());
    Ok(path)
}
