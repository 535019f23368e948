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

//! Library for counting ranked-choice elections with the Schulze method
//! (also called CSSD): pairwise tallying of ballots, beatpath widening,
//! winner selection, and iterative filling of multiple positions, together
//! with the ballot-file parser and the report writer used by the
//! command-line program.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod parse;
pub mod report;
pub mod schulze;
pub mod tally;
pub mod types;
mod util;
