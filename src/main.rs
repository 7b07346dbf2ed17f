// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line driver: explore the Nash blowups of one cone or semigroup.
//!
//! ```text
//! nash <cone|semigroup> <matrix.json> [--char P] [--max-nodes N] [--max-depth D]
//!      [--workers N] [--dual] [--memo FILE] [--export FILE]
//! ```
//!
//! The input file holds one matrix (`{"rows": ...}` or `{"columns": ...}`) or a
//! JSON array of them. Budgets default to the `NASH_*` environment variables.
//! With `--dual`, cone inputs list generators of `σ^∨` instead of rays of `σ`.

use clap::builder::RangedU64ValueParser;
use clap::Parser;
use nash_blowup::blowup::{cone_from_dual, step_for, BlowupStep, Characteristic};
use nash_blowup::config::{
    ExplorationBudget, Settings, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, ENV_CHARACTERISTIC,
    ENV_MAX_DEPTH, ENV_MAX_NODES, ENV_WORKERS,
};
use nash_blowup::engine::{ParallelExplorer, ResolutionTreeBuilder};
use nash_blowup::tree::shortest_cycle_through;
use nash_blowup::{
    canonical_form, ExactEngine, GeneratorMatrix, MemoStore, NashError, ResolutionTree, Variant,
};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "nash",
    about = "Explore iterated Nash blowups of a cone or an affine semigroup"
)]
struct Cli {
    /// Which blowup to iterate: `cone` (normalized) or `semigroup` (non-normalized)
    variant: Variant,

    /// JSON file with one generator matrix or an array of them
    input: PathBuf,

    /// Characteristic of the base field: 0 or a prime
    #[arg(long = "char", env = ENV_CHARACTERISTIC, default_value_t = Characteristic::Zero)]
    characteristic: Characteristic,

    /// Node expansions allowed per exploration
    #[arg(long, env = ENV_MAX_NODES, default_value_t = DEFAULT_MAX_NODES)]
    max_nodes: usize,

    /// Deepest level that is expanded
    #[arg(long, env = ENV_MAX_DEPTH, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Worker threads; 1 runs the sequential builder
    #[arg(
        long,
        env = ENV_WORKERS,
        default_value_t = 1,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    workers: usize,

    /// Read cone inputs as generators of the dual cone
    #[arg(long)]
    dual: bool,

    /// Memo store to resume from and save to
    #[arg(long)]
    memo: Option<PathBuf>,

    /// Write the explored graph here
    #[arg(long)]
    export: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            budget: ExplorationBudget::new(self.max_nodes, self.max_depth),
            characteristic: self.characteristic,
            workers: self.workers,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Input {
    One(GeneratorMatrix),
    Many(Vec<GeneratorMatrix>),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "nash failed");
            ExitCode::FAILURE
        }
    }
}

fn run(options: &Cli) -> Result<(), NashError> {
    let mut roots = match serde_json::from_str(&fs::read_to_string(&options.input)?)? {
        Input::One(matrix) => vec![matrix],
        Input::Many(matrices) => matrices,
    };
    if options.dual {
        if options.variant != Variant::Cone {
            return Err(NashError::invalid("--dual only applies to cones"));
        }
        let engine = ExactEngine::default();
        roots = roots
            .iter()
            .map(|dual| cone_from_dual(&engine, dual))
            .collect::<Result<_, _>>()?;
    }
    let settings = &options.settings();
    let mut memo = match &options.memo {
        Some(path) => MemoStore::load_or_new(path, options.variant, settings.characteristic)?,
        None => MemoStore::new(options.variant, settings.characteristic),
    };
    let mut tree = ResolutionTree::new(options.variant);
    info!(
        variant = %options.variant,
        characteristic = %settings.characteristic,
        roots = roots.len(),
        memo_entries = memo.len(),
        "starting"
    );

    let outcome = if settings.workers == 1 {
        let builder = ResolutionTreeBuilder::new(step_for(options.variant, settings.characteristic))
            .with_budget(settings.budget);
        roots
            .iter()
            .try_for_each(|root| builder.explore(root, &mut tree, &mut memo).map(|_| ()))
    } else {
        let step: Arc<dyn BlowupStep> = Arc::from(step_for(options.variant, settings.characteristic));
        ParallelExplorer::new(step, settings.workers)
            .with_budget(settings.budget)
            .explore(&roots, &mut tree, &mut memo)
            .map(|_| ())
    };
    match outcome {
        Ok(()) => {}
        Err(err) if err.is_resource_exceeded() => warn!(error = %err, "partial result"),
        Err(err) => return Err(err),
    }

    println!("nodes:    {}", tree.len());
    println!("edges:    {}", tree.edge_count());
    println!("complete: {}", tree.is_complete());
    let engine = ExactEngine::default();
    for (i, root) in roots.iter().enumerate() {
        let found = canonical_form(&engine, options.variant, root)
            .ok()
            .and_then(|form| tree.id(&form));
        let Some(id) = found else {
            println!("root {}: not explored", i);
            continue;
        };
        println!("root {}: {}", i, tree.form(id));
        println!("  resolved:         {}", tree.is_resolved(id));
        match tree.resolution_depth(id) {
            Some(depth) => println!("  resolution depth: {}", depth),
            None => println!("  resolution depth: -"),
        }
        match shortest_cycle_through(&tree, id) {
            Some(cycle) => println!("  cycle through root of length {}", cycle.len()),
            None => println!("  no cycle through root"),
        }
    }

    if let Some(path) = &options.memo {
        memo.save(path)?;
    }
    if let Some(path) = &options.export {
        tree.export().write(path)?;
        info!(path = %path.display(), "tree exported");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("nash").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["cone", "a1.json"]).unwrap();
        assert_eq!(cli.variant, Variant::Cone);
        assert_eq!(cli.input, PathBuf::from("a1.json"));
        assert!(!cli.dual);
        assert!(cli.memo.is_none());
        assert_eq!(cli.settings(), Settings::default());
    }

    #[test]
    fn test_options() {
        let cli = parse(&[
            "semigroup",
            "s.json",
            "--char",
            "3",
            "--max-nodes",
            "50",
            "--max-depth",
            "4",
            "--workers",
            "2",
            "--memo",
            "memo.json",
        ])
        .unwrap();
        let settings = cli.settings();
        assert_eq!(cli.variant, Variant::Semigroup);
        assert_eq!(settings.characteristic, Characteristic::Prime(3));
        assert_eq!(settings.budget, ExplorationBudget::new(50, 4));
        assert_eq!(settings.workers, 2);
        assert_eq!(cli.memo, Some(PathBuf::from("memo.json")));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse(&["cone", "x.json", "--workers", "0"]).is_err());
        assert!(parse(&["cone", "x.json", "--char", "4"]).is_err());
        assert!(parse(&["polytope", "x.json"]).is_err());
        assert!(parse(&["cone"]).is_err());
    }
}
