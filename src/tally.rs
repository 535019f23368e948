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

//! Pairwise preference tallying of ballots.

use crate::types::{Election, SquareMatrix};
use log::debug;
use thiserror::Error;

/// Errors raised when the ballot pool violates the tally's input contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TallyError {
    /// A ballot's rank count does not match the candidate count.
    #[error("ballot {ballot} has {found} entries but the election has {expected} candidates")]
    BallotLength {
        /// Index of the offending ballot in the election's ballot list.
        ballot: usize,
        /// Number of entries the ballot should have had.
        expected: usize,
        /// Number of entries the ballot actually has.
        found: usize,
    },
}

/// Pairwise preference counts for an election.
///
/// `prefer(i, j)` is the number of ballots ranking candidate `i` strictly
/// better than candidate `j`. For every pair, `prefer(i, j) + prefer(j, i)`
/// never exceeds the ballot total; the shortfall counts the ballots on which
/// the two candidates are tied (both unranked included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairwise {
    prefer: SquareMatrix<u64>,
    num_ballots: usize,
}

impl Pairwise {
    /// Tallies the ballots of an election into the pairwise preference
    /// matrix. The election is not modified.
    ///
    /// Fails if any ballot's length differs from the candidate count; a
    /// malformed ballot is never silently truncated or padded.
    pub fn tally(election: &Election) -> Result<Pairwise, TallyError> {
        let n = election.num_candidates;
        let mut prefer = SquareMatrix::new(n);
        for (index, ballot) in election.ballots.iter().enumerate() {
            if ballot.len() != n {
                return Err(TallyError::BallotLength {
                    ballot: index,
                    expected: n,
                    found: ballot.len(),
                });
            }
            for i in 0..n {
                for j in 0..n {
                    if ballot.prefers(i, j) {
                        prefer[(i, j)] += 1;
                    }
                }
            }
        }
        debug!(
            "Tallied {} ballots over {n} candidates: {prefer:?}",
            election.num_ballots
        );
        Ok(Pairwise {
            prefer,
            num_ballots: election.num_ballots,
        })
    }

    /// Returns the number of candidates covered by this tally.
    pub fn dim(&self) -> usize {
        self.prefer.dim()
    }

    /// Returns the number of ballots that were tallied.
    pub fn num_ballots(&self) -> usize {
        self.num_ballots
    }

    /// Returns the number of ballots ranking candidate `i` strictly better
    /// than candidate `j`.
    pub fn prefer(&self, i: usize, j: usize) -> u64 {
        self.prefer[(i, j)]
    }

    /// Computes the margin-of-victory matrix:
    /// `margin[(i, j)] = prefer(i, j) - prefer(j, i)`.
    ///
    /// The result is antisymmetric with a zero diagonal.
    pub fn margins(&self) -> SquareMatrix<i64> {
        let n = self.prefer.dim();
        let mut margin = SquareMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                margin[(i, j)] = self.prefer[(i, j)] as i64 - self.prefer[(j, i)] as i64;
            }
        }
        margin
    }

    /// Returns the truncated percentage of expressed preferences favouring
    /// candidate `i` over candidate `j`, or `None` when no ballot expressed a
    /// preference either way.
    pub fn percent_in_favour(&self, i: usize, j: usize) -> Option<u64> {
        let pro = self.prefer[(i, j)];
        let con = self.prefer[(j, i)];
        if pro + con == 0 {
            None
        } else {
            Some(100 * pro / (pro + con))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::Ballot;

    fn election(candidates: &[&str], ballots: Vec<Ballot>) -> Election {
        Election::builder()
            .position("Treasurer")
            .candidates(candidates.iter().copied())
            .ballots(ballots)
            .build()
    }

    #[test]
    fn test_tally_cycle() {
        // A perfect three-way cycle: every pair is won 10 to 5.
        let mut ballots = Vec::new();
        for _ in 0..5 {
            ballots.push(Ballot::from_choices([Some(1), Some(2), Some(3)]));
            ballots.push(Ballot::from_choices([Some(3), Some(1), Some(2)]));
            ballots.push(Ballot::from_choices([Some(2), Some(3), Some(1)]));
        }
        let tally = Pairwise::tally(&election(&["a", "b", "c"], ballots)).unwrap();

        assert_eq!(tally.num_ballots(), 15);
        assert_eq!(tally.prefer(0, 1), 10);
        assert_eq!(tally.prefer(1, 2), 10);
        assert_eq!(tally.prefer(2, 0), 10);
        assert_eq!(tally.prefer(1, 0), 5);
        assert_eq!(tally.prefer(2, 1), 5);
        assert_eq!(tally.prefer(0, 2), 5);
        assert_eq!(tally.prefer(0, 0), 0);
    }

    #[test]
    fn test_tally_unranked_entries() {
        // An unranked candidate loses to every ranked one on that ballot.
        let ballots = vec![Ballot::from_choices([Some(1), None, Some(2)])];
        let tally = Pairwise::tally(&election(&["a", "b", "c"], ballots)).unwrap();

        assert_eq!(tally.prefer(0, 1), 1);
        assert_eq!(tally.prefer(0, 2), 1);
        assert_eq!(tally.prefer(2, 1), 1);
        assert_eq!(tally.prefer(1, 0), 0);
        assert_eq!(tally.prefer(1, 2), 0);
        assert_eq!(tally.prefer(2, 0), 0);
    }

    #[test]
    fn test_tally_pair_totals_bounded_by_ballots() {
        let ballots = vec![
            Ballot::from_choices([Some(1), Some(1), Some(2)]),
            Ballot::from_choices([None, None, Some(1)]),
            Ballot::from_choices([Some(1), Some(2), Some(3)]),
        ];
        let tally = Pairwise::tally(&election(&["a", "b", "c"], ballots)).unwrap();

        for i in 0..3 {
            for j in 0..3 {
                assert!(tally.prefer(i, j) + tally.prefer(j, i) <= 3);
            }
        }
        // Candidates a and b are tied on two of the three ballots.
        assert_eq!(tally.prefer(0, 1) + tally.prefer(1, 0), 1);
    }

    #[test]
    fn test_tally_no_ballots() {
        let tally = Pairwise::tally(&election(&["a", "b"], Vec::new())).unwrap();
        assert_eq!(tally.num_ballots(), 0);
        for i in 0..2 {
            for j in 0..2 {
                assert_eq!(tally.prefer(i, j), 0);
            }
        }
    }

    #[test]
    fn test_tally_ballot_length_mismatch() {
        let ballots = vec![
            Ballot::from_choices([Some(1), Some(2), Some(3)]),
            Ballot::from_choices([Some(1), Some(2)]),
        ];
        assert_eq!(
            Pairwise::tally(&election(&["a", "b", "c"], ballots)),
            Err(TallyError::BallotLength {
                ballot: 1,
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn test_margins_antisymmetric() {
        let ballots = vec![
            Ballot::from_choices([Some(1), Some(2), None]),
            Ballot::from_choices([Some(2), Some(1), Some(3)]),
            Ballot::from_choices([Some(1), Some(1), Some(2)]),
        ];
        let tally = Pairwise::tally(&election(&["a", "b", "c"], ballots)).unwrap();
        let margin = tally.margins();

        for i in 0..3 {
            assert_eq!(margin[(i, i)], 0);
            for j in 0..3 {
                assert_eq!(margin[(i, j)], -margin[(j, i)]);
            }
        }
    }

    #[test]
    fn test_margins_values() {
        let ballots = vec![
            Ballot::from_choices([Some(1), Some(2)]),
            Ballot::from_choices([Some(1), Some(2)]),
            Ballot::from_choices([Some(2), Some(1)]),
        ];
        let tally = Pairwise::tally(&election(&["a", "b"], ballots)).unwrap();
        let margin = tally.margins();
        assert_eq!(margin[(0, 1)], 1);
        assert_eq!(margin[(1, 0)], -1);
    }

    #[test]
    fn test_percent_in_favour() {
        let ballots = vec![
            Ballot::from_choices([Some(1), Some(2)]),
            Ballot::from_choices([Some(1), Some(2)]),
            Ballot::from_choices([Some(2), Some(1)]),
        ];
        let tally = Pairwise::tally(&election(&["a", "b"], ballots)).unwrap();
        // 2 out of 3 is 66.67%, truncated to 66.
        assert_eq!(tally.percent_in_favour(0, 1), Some(66));
        assert_eq!(tally.percent_in_favour(1, 0), Some(33));
    }

    #[test]
    fn test_percent_in_favour_no_data() {
        // Both candidates unranked everywhere: no preference was expressed in
        // either direction, so there is no percentage to compute.
        let ballots = vec![Ballot::from_choices([None, None])];
        let tally = Pairwise::tally(&election(&["a", "b"], ballots)).unwrap();
        assert_eq!(tally.percent_in_favour(0, 1), None);
        assert_eq!(tally.percent_in_favour(1, 0), None);
    }
}
