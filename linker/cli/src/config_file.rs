//! Optional TOML file which overrides the defaults of [`munglinker::Config`].

use std::path::Path;

use munglinker::Config;
use serde::Deserialize;

use crate::utils::{parse_toml, read_file_to_string};

/// The contents of a `--config` file.  Every key is optional; missing keys keep the value they
/// already had.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub match_threshold: Option<f64>,
    pub min_support: Option<usize>,
    pub print_min_support: Option<usize>,
    pub replace_all_edges: Option<bool>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let s = read_file_to_string(path)?;
        parse_toml(&s, &format!("config file {:?}", path))
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        parse_toml(s, "config file")
    }

    /// Overwrite every value in `config` which is set in this file
    pub fn apply(&self, config: &mut Config) {
        if let Some(t) = self.match_threshold {
            config.match_threshold = t;
        }
        if let Some(s) = self.min_support {
            config.min_support = s;
        }
        if let Some(s) = self.print_min_support {
            config.print_min_support = s;
        }
        if let Some(r) = self.replace_all_edges {
            config.replace_all_edges = r;
        }
    }
}
