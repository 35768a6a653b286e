//! Crate for loading, linking and scoring MuNG documents.  The `munglinker` binary is a very thin
//! wrapper around this crate: it parses CLI args and immediately calls into one of the `run_*`
//! functions.  Every `run_*` function accepts either a pair of files or a pair of directories; in
//! the latter case, documents are paired up by file name and processed in parallel.

pub mod config_file;
pub mod decisions;
pub mod mung_file;
mod utils;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use colored::Colorize;
use log::LevelFilter;
use mungframe::{NotationGraph, ObjectIndex};
use munglinker::{
    eval::{self, ClassPair, Counts, EdgeEvaluation, EvaluationResult},
    Config, GraphUpdater, Matching,
};
use rayon::prelude::*;
use simple_logger::SimpleLogger;

pub fn init_logging(log_level: LevelFilter) -> anyhow::Result<()> {
    SimpleLogger::new()
        .without_timestamps()
        .with_colors(true)
        .with_level(log_level)
        .init()?;
    Ok(())
}

/// Loads a MuNG document and checks that every edge in it is consistent
pub fn load_graph(path: &Path) -> anyhow::Result<NotationGraph> {
    let objects = mung_file::read_objects(path)?;
    let graph = NotationGraph::new(objects).with_context(|| format!("In {:?}", path))?;
    graph
        .check_consistency()
        .with_context(|| format!("In {:?}", path))?;
    log::debug!(
        "Loaded {:?}: {} objects, {} edges",
        path,
        graph.len(),
        graph.num_edges()
    );
    Ok(graph)
}

//////////////
// EVALUATE //
//////////////

/// Scores the edges of `predicted` against those of `reference`, and prints the result
pub fn run_evaluate(
    reference: &Path,
    predicted: &Path,
    config: &Config,
    by_class_pair: bool,
) -> anyhow::Result<()> {
    if !reference.is_dir() {
        let eval = evaluate_documents(reference, predicted, config, config.min_support)?;
        print!("{}", evaluation_string(&eval.overall));
        if by_class_pair {
            print_class_pair_report(&eval.by_class_pair, config);
        }
        return Ok(());
    }

    // Directory mode.  Class pairs are filtered after summing over every document, so keep all of
    // them for now
    let jobs = document_pairs(reference, predicted, None)?;
    let results = jobs
        .par_iter()
        .map(|(name, r, p)| (name, evaluate_documents(r, p, config, 0)))
        .collect::<Vec<_>>();

    let mut overall = Counts::default();
    let mut class_pair_counts = BTreeMap::<ClassPair, Counts>::new();
    let mut num_failed = 0;
    for (name, result) in results {
        match result {
            Ok(eval) => {
                println!("{}:", name.bold());
                print!("{}", evaluation_string(&eval.overall));
                overall += eval.overall.counts;
                for (class_pair, result) in eval.by_class_pair {
                    *class_pair_counts.entry(class_pair).or_default() += result.counts;
                }
            }
            Err(e) => {
                report_failure(name, &e);
                num_failed += 1;
            }
        }
    }

    println!("{}", "Overall:".bold());
    print!("{}", evaluation_string(&EvaluationResult::from(overall)));
    if by_class_pair {
        let by_class_pair = class_pair_counts
            .into_iter()
            .map(|(class_pair, counts)| (class_pair, EvaluationResult::from(counts)))
            .filter(|(_, result)| result.support >= config.min_support)
            .collect::<BTreeMap<_, _>>();
        print_class_pair_report(&by_class_pair, config);
    }
    check_failures(num_failed, jobs.len())
}

/// Matches the objects of two documents and scores the predicted edges
pub fn evaluate_documents(
    reference: &Path,
    predicted: &Path,
    config: &Config,
    min_support: usize,
) -> anyhow::Result<EdgeEvaluation> {
    let reference_graph = load_graph(reference)?;
    let predicted_graph = load_graph(predicted)?;
    let matching = Matching::new(
        predicted_graph.objects(),
        reference_graph.objects(),
        config.match_threshold,
    );
    log::info!(
        "{} predicted and {} reference objects, {} matched pairs",
        predicted_graph.len(),
        reference_graph.len(),
        matching.len()
    );
    let eval = eval::evaluate_edges(&reference_graph, &predicted_graph, &matching, min_support)
        .with_context(|| format!("Evaluating {:?} against {:?}", predicted, reference))?;
    Ok(eval)
}

/// Formats the overall result of an edge evaluation:
/// ```text
/// F1-Score: 0.667
/// True positives: 2, False positives: 1, False Negatives: 1
/// ```
pub fn evaluation_string(result: &EvaluationResult) -> String {
    format!(
        "F1-Score: {:.3}\nTrue positives: {}, False positives: {}, False Negatives: {}\n",
        result.f_score,
        result.counts.true_positives,
        result.counts.false_positives,
        result.counts.false_negatives
    )
}

//////////
// LINK //
//////////

/// Rebuilds the edges of the MuNG document(s) at `graph` from the classifier decisions at
/// `decisions`, writing the result(s) to `output`.
pub fn run_link(
    graph: &Path,
    decisions: &Path,
    output: &Path,
    config: &Config,
) -> anyhow::Result<()> {
    let updater = GraphUpdater::from_config(config);
    if !graph.is_dir() {
        return link_document(graph, decisions, output, updater);
    }

    std::fs::create_dir_all(output).with_context(|| format!("Can't create {:?}", output))?;
    let jobs = document_pairs(graph, decisions, Some("toml"))?;
    let results = jobs
        .par_iter()
        .map(|(name, g, d)| (name, link_document(g, d, &output.join(name), updater)))
        .collect::<Vec<_>>();

    let mut num_failed = 0;
    for (name, result) in results {
        if let Err(e) = result {
            report_failure(name, &e);
            num_failed += 1;
        }
    }
    check_failures(num_failed, jobs.len())
}

pub fn link_document(
    graph: &Path,
    decision_file: &Path,
    output: &Path,
    updater: GraphUpdater,
) -> anyhow::Result<()> {
    let objects = mung_file::read_objects(graph)?;
    let input = NotationGraph::new(objects).with_context(|| format!("In {:?}", graph))?;
    if !updater.replace_all_edges {
        input
            .check_consistency()
            .with_context(|| format!("In {:?}", graph))?;
    }
    let decisions = decisions::read_decisions(decision_file)?
        .iter()
        .map(|d| d.decision())
        .collect::<munglinker::Result<Vec<_>>>()
        .with_context(|| format!("In {:?}", decision_file))?;

    let linked = updater
        .update(&input, decisions)
        .with_context(|| format!("Linking {:?}", graph))?;
    linked
        .check_consistency()
        .with_context(|| format!("Linked graph for {:?}", graph))?;
    mung_file::write_objects(output, linked.objects())
}

///////////
// SCORE //
///////////

/// Scores a classifier's decisions against their true labels, both overall and by the classes of
/// the objects involved.
pub fn run_score(graph: &Path, decision_file: &Path, config: &Config) -> anyhow::Result<()> {
    let objects = mung_file::read_objects(graph)?;
    let index = ObjectIndex::new(&objects).with_context(|| format!("In {:?}", graph))?;

    let mut pairs = Vec::new();
    let mut predicted = Vec::new();
    let mut truth = Vec::new();
    for d in decisions::read_decisions(decision_file)? {
        let true_decision = d.true_decision().ok_or_else(|| {
            anyhow!(
                "Decision for {} --> {} in {:?} has no `truth`",
                d.from,
                d.to,
                decision_file
            )
        })??;
        predicted.push(d.decision()?.has_edge);
        truth.push(true_decision.has_edge);
        pairs.push((index.lookup(d.from)?, index.lookup(d.to)?));
    }

    let overall = eval::evaluate_classification(&predicted, &truth)?;
    let by_class_pair = eval::evaluate_classification_by_class_pairs(
        &pairs,
        &predicted,
        &truth,
        config.min_support,
    )?;

    println!("Accuracy: {:.3}", overall.accuracy);
    println!("Precision: {:.3}", overall.precision);
    println!("Recall: {:.3}", overall.recall);
    println!("F1-Score: {:.3}", overall.f_score);
    println!(
        "Support: {} ({} positive)",
        overall.support, overall.positive_support
    );
    log::debug!(
        "Scores by class pair: {:?}",
        eval::flatten_class_pair_results(&by_class_pair)
    );
    print_class_pair_report(&by_class_pair, config);
    Ok(())
}

///////////
// UTILS //
///////////

fn print_class_pair_report<R: eval::ClassPairScores>(
    results: &BTreeMap<ClassPair, R>,
    config: &Config,
) {
    let report = eval::format_class_pair_report(results, config.print_min_support);
    if report.is_empty() {
        log::warn!(
            "No class pair has a support of at least {}",
            config.print_min_support
        );
    }
    print!("{}", report);
}

/// Pairs every `.xml` file in `dir` with the file of the same name in `other_dir` (or, if
/// `other_extension` is given, the file with the same stem and that extension).  Returned in
/// order of file name.
fn document_pairs(
    dir: &Path,
    other_dir: &Path,
    other_extension: Option<&str>,
) -> anyhow::Result<Vec<(String, PathBuf, PathBuf)>> {
    if !other_dir.is_dir() {
        return Err(anyhow!("{:?} is a directory, but {:?} isn't", dir, other_dir));
    }
    let mut pairs = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Can't read {:?}", dir))? {
        let path = entry?.path();
        if path.extension().map_or(true, |ext| ext != "xml") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            log::warn!("Skipping {:?}: file name isn't valid UTF-8", path);
            continue;
        };
        let name = name.to_owned();
        let other = match other_extension {
            Some(ext) => other_dir.join(&name).with_extension(ext),
            None => other_dir.join(&name),
        };
        pairs.push((name, path, other));
    }
    pairs.sort();
    log::info!("Found {} documents in {:?}", pairs.len(), dir);
    Ok(pairs)
}

fn report_failure(name: &str, error: &anyhow::Error) {
    eprintln!("{} {}: {:#}", "Failed".bright_red().bold(), name, error);
}

fn check_failures(num_failed: usize, num_documents: usize) -> anyhow::Result<()> {
    if num_failed > 0 {
        return Err(anyhow!(
            "{} of {} documents failed",
            num_failed,
            num_documents
        ));
    }
    Ok(())
}
