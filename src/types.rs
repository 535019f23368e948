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

//! Types to represent an election.

use std::ops::{Index, IndexMut};

/// Ranking given to one candidate on a ballot. Smaller ranks are preferred.
///
/// The derived ordering places [`Rank::Unranked`] after every explicit rank:
/// an unranked candidate always compares as worse than a ranked one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    /// Explicit numeric ranking.
    Ranked(u32),
    /// No preference expressed for this candidate.
    Unranked,
}

impl From<Option<u32>> for Rank {
    fn from(rank: Option<u32>) -> Self {
        match rank {
            Some(rank) => Rank::Ranked(rank),
            None => Rank::Unranked,
        }
    }
}

/// Ballot cast in the election: one rank per candidate, aligned positionally
/// with the candidate list of the election.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    ranks: Vec<Rank>,
}

impl Ballot {
    /// Constructs a new ballot from the given ranks.
    pub fn new(ranks: impl Into<Vec<Rank>>) -> Self {
        Ballot {
            ranks: ranks.into(),
        }
    }

    /// Constructs a ballot from optional ranks, mapping `None` to
    /// [`Rank::Unranked`].
    pub fn from_choices(choices: impl IntoIterator<Item = Option<u32>>) -> Self {
        Ballot {
            ranks: choices.into_iter().map(Rank::from).collect(),
        }
    }

    /// Returns the number of rank entries in this ballot.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Returns whether this ballot has no rank entries.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Returns the rank given to the candidate at the given index.
    pub fn rank(&self, i: usize) -> Rank {
        self.ranks[i]
    }

    /// Returns all the ranks of this ballot, in candidate order.
    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    /// Returns whether this ballot ranks candidate `i` strictly better than
    /// candidate `j`. Ties (including both candidates unranked) express no
    /// preference either way.
    pub fn prefers(&self, i: usize, j: usize) -> bool {
        self.ranks[i] < self.ranks[j]
    }

    /// Builds a new ballot keeping only the rank entries at the given
    /// positions, in the given order.
    pub fn keep_candidates(&self, keep: &[usize]) -> Ballot {
        Ballot {
            ranks: keep.iter().map(|&i| self.ranks[i]).collect(),
        }
    }
}

/// Election input, representing a parsed ballot file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Election {
    /// Name of the position being filled.
    pub position: String,
    /// Number of candidates.
    pub num_candidates: usize,
    /// Number of ballots that were cast in the election.
    pub num_ballots: usize,
    /// Display names of the candidates. A candidate's algorithmic identity is
    /// its index in this list.
    pub candidates: Vec<String>,
    /// Ballots that were cast in this election.
    pub ballots: Vec<Ballot>,
}

impl Election {
    /// Returns a new builder.
    pub fn builder() -> ElectionBuilder {
        ElectionBuilder::default()
    }

    /// Builds a new election with the given candidates removed from the
    /// candidate list and from every ballot, preserving the relative order of
    /// the remaining candidates and rank entries. The input is not mutated.
    ///
    /// All the removals are applied against the indices of `self`, even when
    /// several candidates are removed at once.
    pub fn without_candidates(&self, remove: &[usize]) -> Election {
        let mut removed = vec![false; self.num_candidates];
        for &i in remove {
            assert!(i < self.num_candidates, "candidate index out of range: {i}");
            removed[i] = true;
        }
        let keep: Vec<usize> = (0..self.num_candidates).filter(|&i| !removed[i]).collect();

        let candidates: Vec<String> = keep.iter().map(|&i| self.candidates[i].clone()).collect();
        let ballots: Vec<Ballot> = self
            .ballots
            .iter()
            .map(|ballot| ballot.keep_candidates(&keep))
            .collect();
        Election {
            position: self.position.clone(),
            num_candidates: candidates.len(),
            num_ballots: ballots.len(),
            candidates,
            ballots,
        }
    }
}

/// Builder for the [`Election`] type.
#[derive(Default)]
pub struct ElectionBuilder {
    position: Option<String>,
    candidates: Vec<String>,
    ballots: Vec<Ballot>,
}

impl ElectionBuilder {
    /// Build the [`Election`] object.
    pub fn build(self) -> Election {
        Election {
            position: self.position.unwrap(),
            num_candidates: self.candidates.len(),
            num_ballots: self.ballots.len(),
            candidates: self.candidates,
            ballots: self.ballots,
        }
    }

    /// Sets the name of the position being filled.
    pub fn position(mut self, position: &str) -> Self {
        self.position = Some(position.to_owned());
        self
    }

    /// Sets the list of candidate names in the election.
    pub fn candidates(mut self, candidates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the list of ballots in the election.
    pub fn ballots(mut self, ballots: impl Into<Vec<Ballot>>) -> Self {
        self.ballots = ballots.into();
        self
    }

    /// Checks that the given number of ballots is consistent with the ballots
    /// previously set with [`Self::ballots()`].
    pub fn check_num_ballots(self, num_ballots: usize) -> Self {
        assert_eq!(num_ballots, self.ballots.len());
        self
    }
}

/// Dense square table indexed by a pair of candidate indices. Candidate
/// identities are small contiguous integers, so no hashing is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareMatrix<T> {
    dim: usize,
    cells: Vec<T>,
}

impl<T: Clone + Default> SquareMatrix<T> {
    /// Constructs a matrix of the given dimension, filled with the default
    /// value.
    pub fn new(dim: usize) -> Self {
        SquareMatrix {
            dim,
            cells: vec![T::default(); dim * dim],
        }
    }
}

impl<T> SquareMatrix<T> {
    /// Returns the dimension of the matrix.
    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl<T> Index<(usize, usize)> for SquareMatrix<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.cells[i * self.dim + j]
    }
}

impl<T> IndexMut<(usize, usize)> for SquareMatrix<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.cells[i * self.dim + j]
    }
}
