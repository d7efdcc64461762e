//! folio CLI — driving adapter for the folio rule matcher.
//!
//! Subcommands:
//! - `check <rules>` — validate a rulebook, list rejected records
//! - `eval <rules> <corpus>` — per-rule match counts and coverage
//! - `explain <rules> <token>` — why each rule did or did not fire
//! - `score <rules> <corpus>` — predicted labels against gold labels
//! - `weights <rules>` — weight retention and interpolated metrics

mod load;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use folio::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Rule matching and coverage scoring over manuscript token corpora", long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a rulebook
    Check {
        /// Rulebook file (.json, .yaml)
        rules: PathBuf,
    },
    /// Count matches and coverage for every rule
    Eval {
        /// Rulebook file (.json, .yaml)
        rules: PathBuf,
        /// Corpus file (.json, .yaml, .tsv, or plain text)
        corpus: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Scan the corpus on all cores
        #[arg(long)]
        parallel: bool,
    },
    /// Explain why each rule fires or not on one token
    Explain {
        /// Rulebook file (.json, .yaml)
        rules: PathBuf,
        /// Token text
        token: String,
        /// Section the token belongs to
        #[arg(short, long)]
        section: Option<String>,
        /// Print the traces as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score predicted labels against the corpus gold labels
    Score {
        /// Rulebook file (.json, .yaml)
        rules: PathBuf,
        /// Corpus file with gold labels (.json, .yaml, .tsv)
        corpus: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize rule weight retention
    Weights {
        /// Rulebook file (.json, .yaml)
        rules: PathBuf,
        /// Baseline endpoints for interpolated metrics
        #[arg(short, long)]
        baseline: Option<PathBuf>,
        /// Corpus to measure the baseline endpoints on (requires --baseline)
        #[arg(short, long, requires = "baseline")]
        corpus: Option<PathBuf>,
        /// Comma-separated rule ids to deactivate first
        #[arg(short, long, value_delimiter = ',')]
        drop: Vec<String>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { rules } => cmd_check(&rules),
        Commands::Eval {
            rules,
            corpus,
            json,
            parallel,
        } => cmd_eval(&rules, &corpus, json, parallel),
        Commands::Explain {
            rules,
            token,
            section,
            json,
        } => cmd_explain(&rules, &token, section.as_deref(), json),
        Commands::Score {
            rules,
            corpus,
            json,
        } => cmd_score(&rules, &corpus, json),
        Commands::Weights {
            rules,
            baseline,
            corpus,
            drop,
            json,
        } => cmd_weights(&rules, baseline, corpus, &drop, json),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_check(rules_path: &Path) -> Result<()> {
    let book = load::load_rulebook(rules_path)?;
    let rules = RuleSet::load(&book);

    println!(
        "{} rules loaded, {} rejected",
        rules.len(),
        rules.rejected().len()
    );
    for rejected in rules.rejected() {
        let id = rejected.id.as_deref().unwrap_or("<no id>");
        println!("  #{} {id}: {}", rejected.index, rejected.error);
    }

    if rules.is_empty() {
        bail!("no valid rules in \"{}\"", rules_path.display());
    }
    Ok(())
}

fn cmd_eval(rules_path: &Path, corpus_path: &Path, json: bool, parallel: bool) -> Result<()> {
    let rules = load_rules(rules_path)?;
    let tokens = load::load_corpus(corpus_path)?;

    let report = if parallel {
        folio::evaluate_corpus_par(&tokens, &rules)
    } else {
        evaluate_corpus(&tokens, &rules)
    };

    if json {
        return print_json(&report);
    }

    println!(
        "{} tokens ({} malformed), {} covered by any rule ({:.4})",
        report.corpus_size, report.malformed_tokens, report.union_matches, report.union_coverage
    );
    println!("{:<24} {:>8} {:>10} {:>10}", "rule", "matches", "coverage", "in-section");
    for row in &report.results {
        let marker = if row.valid { "" } else { " (rejected)" };
        println!(
            "{:<24} {:>8} {:>10.4} {:>10.4}{marker}",
            row.rule_id,
            row.matches,
            row.coverage,
            row.section_coverage()
        );
    }
    Ok(())
}

fn cmd_explain(rules_path: &Path, token: &str, section: Option<&str>, json: bool) -> Result<()> {
    let rules = load_rules(rules_path)?;
    let traces: Vec<MatchTrace> = rules
        .iter()
        .map(|rule| rule.explain(token, section))
        .collect();

    if json {
        return print_json(&traces);
    }

    let fired = traces.iter().filter(|t| t.fired()).count();
    println!("{token} ({}): {fired} rule(s) fired", section.unwrap_or("no section"));
    for trace in &traces {
        println!("  {trace}");
    }
    Ok(())
}

fn cmd_score(rules_path: &Path, corpus_path: &Path, json: bool) -> Result<()> {
    let rules = load_rules(rules_path)?;
    let tokens = load::load_corpus(corpus_path)?;
    let summary = score_corpus(&tokens, &rules);

    if summary.scored == 0 {
        warn!(corpus = %corpus_path.display(), "corpus has no gold labels; nothing scored");
    }

    if json {
        return print_json(&summary);
    }

    println!("scored:              {}", summary.scored);
    println!("covered:             {} ({:.4})", summary.covered, summary.coverage);
    println!(
        "correct:             {} ({:.4} on covered)",
        summary.correct, summary.accuracy_on_covered
    );
    println!("overall accuracy:    {:.4}", summary.overall_accuracy);
    Ok(())
}

fn cmd_weights(
    rules_path: &Path,
    baseline_path: Option<PathBuf>,
    corpus_path: Option<PathBuf>,
    drop: &[String],
    json: bool,
) -> Result<()> {
    let book = load::load_rulebook(rules_path)?;
    let mut records = book.rules.clone();
    deactivate_records(&mut records, drop);

    // Weights are summarized over every record, whether or not its pattern validates.
    let summary = summarize_weights(&records);

    let Some(baseline_path) = baseline_path else {
        if json {
            return print_json(&summary);
        }
        print_weight_summary(&summary);
        return Ok(());
    };

    let mut baseline = load::load_baseline(&baseline_path)?;
    if let Some(corpus_path) = corpus_path {
        // The measured baseline is the intact rulebook, before any drops.
        let intact = RuleSet::load(&book);
        let tokens = load::load_corpus(&corpus_path)?;
        let measured = score_corpus(&tokens, &intact);
        info!(
            coverage = measured.coverage,
            accuracy_on_covered = measured.accuracy_on_covered,
            overall_accuracy = measured.overall_accuracy,
            "baseline measured on corpus"
        );
        baseline = baseline.with_measured(&measured);
    }

    let report = AblationReport::new(summary, &baseline);
    if json {
        return print_json(&report);
    }

    print_weight_summary(&summary);
    println!("coverage:             {:.4}", report.coverage);
    println!("accuracy on covered:  {:.4}", report.accuracy_on_covered);
    println!("overall accuracy:     {:.4}", report.overall_accuracy);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn load_rules(path: &Path) -> Result<RuleSet> {
    let rules = RuleSet::load(&load::load_rulebook(path)?);
    if !rules.rejected().is_empty() {
        warn!(
            rejected = rules.rejected().len(),
            "some rule records were rejected; run `folio check` for details"
        );
    }
    Ok(rules)
}

/// Zero the weight of every record whose id is in `drop`, keeping its
/// original weight. Unknown ids are logged.
fn deactivate_records(records: &mut [RuleConfig], drop: &[String]) {
    for id in drop {
        let mut found = false;
        for record in records
            .iter_mut()
            .filter(|r| r.id.as_deref().map(str::trim) == Some(id.trim()))
        {
            if record.original_weight.is_none() {
                record.original_weight = record.weight;
            }
            record.weight = Some(0.0);
            found = true;
        }
        if !found {
            warn!(id = %id, "cannot drop unknown rule");
        }
    }
}

fn print_weight_summary(summary: &WeightSummary) {
    println!("active weight:        {:.4}", summary.active_weight);
    println!("total weight:         {:.4}", summary.total_weight);
    println!("retained fraction:    {:.4}", summary.retained_weight_frac);
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
