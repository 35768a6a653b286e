//! Munglinker's core engine: the code which aligns, rebuilds and scores the edges of
//! [`NotationGraph`](mungframe::NotationGraph)s produced by an optical music recognition pipeline.
//!
//! The crate is split into three parts:
//! - [`matching`] decides which predicted objects denote the same symbols as reference objects.
//! - [`update`] replays a classifier's pairwise [`Decision`]s onto a copy of a graph, producing a
//!   new graph with the classifier's edges.
//! - [`eval`] scores predicted edges against reference edges, either overall or split by the
//!   classes of the edges' endpoints, and scores the raw decisions of an edge classifier.
//!
//! Reading and writing documents is left to the `munglinker_cli` crate, which wraps this library
//! in a command-line interface.

#![deny(clippy::all)]
#![deny(rustdoc::broken_intra_doc_links, rustdoc::private_intra_doc_links)]

mod error;
pub mod eval;
pub mod matching;
pub mod update;

pub use error::{Error, Result};
pub use matching::{Matching, MatchedPair, DEFAULT_MATCH_THRESHOLD};
pub use update::{Decision, GraphUpdater};

/// Tunable parameters shared by matching, edge reconstruction and evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Two objects of the same class match if the IoU of their boxes is strictly greater than
    /// this.  Defaults to `0.7`.
    pub match_threshold: f64,
    /// Class pairs with less support than this are left out of per-class-pair results.  Defaults
    /// to `10`.
    pub min_support: usize,
    /// Class pairs with less support than this are left out of printed reports.  Defaults to
    /// `20`.
    pub print_min_support: usize,
    /// If `true`, reconstructing a graph's edges first throws away every existing edge.  Defaults
    /// to `true`.
    pub replace_all_edges: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            min_support: 10,
            print_min_support: 20,
            replace_all_edges: true,
        }
    }
}
