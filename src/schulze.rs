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

//! Schulze-method winner determination (also called CSSD).
//!
//! A candidate defeats another if a majority of ballots rank it strictly
//! better. Cycles among such defeats are resolved by comparing the strongest
//! "beatpaths": chains of pairwise victories whose strength is the smallest
//! margin along the chain. Unbeaten candidates win.

use crate::tally::{Pairwise, TallyError};
use crate::types::{Election, SquareMatrix};
use log::info;

/// Outcome of filling one position: the winner set of one election round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledPosition {
    /// Winning candidate(s), as indices into the original candidate list,
    /// in ascending order. More than one entry means an exact tie.
    pub winners: Vec<usize>,
    /// The candidate pool this round was run over, as indices into the
    /// original candidate list.
    pub pool: Vec<usize>,
    /// Pairwise preference counts over `pool` (indexed by pool position).
    pub tally: Pairwise,
}

/// Outcome of a multi-position election run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectionResult {
    /// Number of positions that were asked to be filled. May exceed the
    /// number of entries in `positions` if the candidate pool ran out.
    pub requested: usize,
    /// One entry per position actually filled, in filling order.
    pub positions: Vec<FilledPosition>,
}

/// Widens every margin to the strength of the strongest beatpath between the
/// two candidates, i.e. the largest over all chains of pairwise victories of
/// the smallest margin along the chain.
///
/// The intermediate candidate `i` must drive the outermost loop (the
/// Floyd-Warshall ordering); any other nesting does not compute the full
/// transitive closure in a single pass.
pub fn widen_beatpaths(margin: &mut SquareMatrix<i64>) {
    let n = margin.dim();
    for i in 0..n {
        for j in 0..n {
            if j == i {
                continue;
            }
            for k in 0..n {
                if k == i || k == j {
                    continue;
                }
                let through = margin[(j, i)].min(margin[(i, k)]);
                if margin[(j, k)] < through {
                    margin[(j, k)] = through;
                }
            }
        }
    }
}

/// Scans a resolved margin matrix for the winners: every candidate that no
/// other candidate beats with a strictly stronger beatpath than its
/// counter-path. Returned in ascending index order; never empty unless the
/// matrix is empty.
pub fn winners(margin: &SquareMatrix<i64>) -> Vec<usize> {
    let n = margin.dim();
    (0..n)
        .filter(|&i| (0..n).all(|j| margin[(j, i)] <= margin[(i, j)]))
        .collect()
}

/// Runs one complete single-election pass over the election's candidate
/// pool: tally, margins, beatpath widening, winner selection.
pub fn elect(election: &Election) -> Result<Vec<usize>, TallyError> {
    let tally = Pairwise::tally(election)?;
    let mut margin = tally.margins();
    widen_beatpaths(&mut margin);
    Ok(winners(&margin))
}

/// Fills up to `requested` positions by running one election per position
/// and removing each round's winner(s) from the candidate pool before the
/// next round. A round that ends in a tie fills its position with all tied
/// winners at once. Stops early, with however many positions were filled,
/// when the pool is exhausted.
pub fn fill_positions(
    election: &Election,
    requested: usize,
) -> Result<ElectionResult, TallyError> {
    let mut pool = election.clone();
    // Maps each index of the current pool back to the original candidate
    // list.
    let mut original: Vec<usize> = (0..election.num_candidates).collect();
    let mut filled: Vec<FilledPosition> = Vec::new();

    for position in 1..=requested {
        if pool.num_candidates == 0 {
            info!(
                "Candidate pool exhausted after filling {} of {requested} positions",
                filled.len()
            );
            break;
        }
        info!("Position {position}: pool of {} candidates", pool.num_candidates);

        let tally = Pairwise::tally(&pool)?;
        let mut margin = tally.margins();
        widen_beatpaths(&mut margin);
        let round_winners = winners(&margin);
        assert!(
            !round_winners.is_empty(),
            "no winner among {} candidates",
            pool.num_candidates
        );

        // Resolve the winner set against the original indices before the
        // pool shrinks; removal invalidates the round's indices.
        let resolved: Vec<usize> = round_winners.iter().map(|&i| original[i]).collect();
        info!("Position {position} filled by {resolved:?}");
        filled.push(FilledPosition {
            winners: resolved,
            pool: original.clone(),
            tally,
        });

        original = original
            .iter()
            .enumerate()
            .filter(|(i, _)| !round_winners.contains(i))
            .map(|(_, &index)| index)
            .collect();
        pool = pool.without_candidates(&round_winners);
    }

    Ok(ElectionResult {
        requested,
        positions: filled,
    })
}
