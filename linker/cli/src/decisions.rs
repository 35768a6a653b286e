//! Decision files: the pairwise output of an edge classifier, stored as TOML.
//!
//! ```toml
//! [[decision]]
//! from = 12
//! to = 40
//! label = 1
//! truth = 1 # Optional, only needed for `munglinker score`
//! ```
//!
//! Decisions are replayed in the order they appear in the file.

use std::path::Path;

use mungframe::ObjId;
use munglinker::Decision;
use serde::Deserialize;

use crate::utils::{parse_toml, read_file_to_string};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DecisionFile {
    #[serde(default, rename = "decision")]
    decisions: Vec<TomlDecision>,
}

/// One `[[decision]]` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlDecision {
    pub from: ObjId,
    pub to: ObjId,
    /// The classifier's output: `1` if `from -> to` should be an edge, `0` if not
    pub label: u8,
    /// The true label, if known
    pub truth: Option<u8>,
}

impl TomlDecision {
    /// The classifier's [`Decision`]
    pub fn decision(&self) -> munglinker::Result<Decision> {
        Decision::from_label(self.from, self.to, self.label)
    }

    /// The [`Decision`] that the classifier should have made, if known
    pub fn true_decision(&self) -> Option<munglinker::Result<Decision>> {
        self.truth
            .map(|truth| Decision::from_label(self.from, self.to, truth))
    }
}

pub fn read_decisions(path: &Path) -> anyhow::Result<Vec<TomlDecision>> {
    let s = read_file_to_string(path)?;
    parse_toml::<DecisionFile>(&s, &format!("decision file {:?}", path)).map(|f| f.decisions)
}

pub fn parse_decisions(s: &str) -> anyhow::Result<Vec<TomlDecision>> {
    parse_toml::<DecisionFile>(s, "decision file").map(|f| f.decisions)
}
