#![deny(clippy::all)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::PathBuf;

use log::LevelFilter;
use munglinker::Config;
use munglinker_cli::config_file::ConfigFile;
use structopt::StructOpt;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::from_args();
    munglinker_cli::init_logging(args.log_level())?;
    let mut config = args.config()?;

    match &args.command {
        Command::Evaluate {
            reference,
            predicted,
            by_class_pair,
        } => munglinker_cli::run_evaluate(reference, predicted, &config, *by_class_pair),
        Command::Link {
            graph,
            decisions,
            output,
            keep_edges,
        } => {
            if *keep_edges {
                config.replace_all_edges = false;
            }
            munglinker_cli::run_link(graph, decisions, output, &config)
        }
        Command::Score { graph, decisions } => {
            munglinker_cli::run_score(graph, decisions, &config)
        }
    }
}

/// A struct storing the CLI args taken by munglinker.  `StructOpt` will generate the argument
/// parsing/help code for us.
#[derive(Debug, Clone, StructOpt)]
#[structopt(
    name = "munglinker",
    about = "Rebuild and score the edges of music notation graphs"
)]
pub struct CliArgs {
    #[structopt(subcommand)]
    pub command: Command,

    /// A TOML file overriding the default parameters.  Flags given on the command line take
    /// precedence over this file.
    #[structopt(short, long, parse(from_os_str))]
    pub config: Option<PathBuf>,
    /// Objects must have an IoU strictly greater than this to match.  Defaults to 0.7.
    #[structopt(long)]
    pub match_threshold: Option<f64>,
    /// Class pairs with less support are left out of per-class-pair results.  Defaults to 10.
    #[structopt(long)]
    pub min_support: Option<usize>,
    /// Class pairs with less support are left out of printed reports.  Defaults to 20.
    #[structopt(long)]
    pub print_min_support: Option<usize>,

    /// Makes munglinker print more output (`-vv` will produce all output).
    #[structopt(short, long = "verbose", parse(from_occurrences))]
    pub verbosity: usize,
    /// Makes munglinker print less output (`-qq` will only produce errors).
    #[structopt(short, long = "quiet", parse(from_occurrences))]
    pub quietness: usize,
}

#[derive(Debug, Clone, StructOpt)]
pub enum Command {
    /// Score the edges of predicted MuNG documents against reference documents.  Objects are
    /// matched by class name and bounding box overlap.
    Evaluate {
        /// The reference MuNG file, or a directory of them
        #[structopt(short, long, parse(from_os_str))]
        reference: PathBuf,
        /// The predicted MuNG file, or a directory with files of the same names
        #[structopt(short, long, parse(from_os_str))]
        predicted: PathBuf,
        /// Also print results for each pair of object classes
        #[structopt(long)]
        by_class_pair: bool,
    },
    /// Rebuild the edges of MuNG documents from an edge classifier's decisions
    Link {
        /// The MuNG file whose objects are linked, or a directory of them
        #[structopt(short, long, parse(from_os_str))]
        graph: PathBuf,
        /// The decision file (`*.toml`), or a directory with one `<name>.toml` per `<name>.xml`
        #[structopt(short, long, parse(from_os_str))]
        decisions: PathBuf,
        /// Where to write the linked MuNG file(s)
        #[structopt(short, long, parse(from_os_str))]
        output: PathBuf,
        /// Keep the input's edges, so that decisions only add or remove edges
        #[structopt(long)]
        keep_edges: bool,
    },
    /// Score an edge classifier's decisions against the true labels in the decision file
    Score {
        /// The MuNG file containing the objects named in the decisions
        #[structopt(short, long, parse(from_os_str))]
        graph: PathBuf,
        /// The decision file (`*.toml`), where every decision has a `truth`
        #[structopt(short, long, parse(from_os_str))]
        decisions: PathBuf,
    },
}

impl CliArgs {
    /// Parse the `-q`/`-v` args into the [`LevelFilter`] to give to the `log` library
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity as isize - self.quietness as isize {
            x if x < -2 => LevelFilter::Off, // -qqq (or more `q`s)
            -2 => LevelFilter::Error,        // -qq
            -1 => LevelFilter::Warn,         // -q
            0 => LevelFilter::Info,          // <none of -q or -v>
            1 => LevelFilter::Debug,         // -v
            _ => LevelFilter::Trace,         // -vv (or more `v`s)
        }
    }

    /// Builds the [`Config`] from the defaults, then the config file, then the CLI flags
    pub fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::default();
        if let Some(path) = &self.config {
            ConfigFile::read(path)?.apply(&mut config);
        }
        let flags = ConfigFile {
            match_threshold: self.match_threshold,
            min_support: self.min_support,
            print_min_support: self.print_min_support,
            replace_all_edges: None,
        };
        flags.apply(&mut config);
        log::debug!("{:?}", config);
        Ok(config)
    }
}
