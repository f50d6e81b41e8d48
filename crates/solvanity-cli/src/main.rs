//! Solvanity CLI
//!
//! Solana vanity address generator.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use solvanity_core::{
    estimate, format_count, format_duration, Keypair, PatternSpec, SearchControl, SearchEngine,
    SearchOutcome, SearchStatus, SolanaGenerator,
};

mod wallet;

#[derive(Parser)]
#[command(name = "solvanity")]
#[command(version = "0.1.0")]
#[command(about = "Solana vanity address generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a vanity address
    Generate {
        /// Required address prefix
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// Required address suffix
        #[arg(short, long, default_value = "")]
        suffix: String,

        /// Case insensitive matching
        #[arg(short = 'i', long)]
        case_insensitive: bool,

        /// Number of worker threads (0 = all cores minus one)
        #[arg(short, long, default_value = "0")]
        workers: usize,

        /// Proceed without confirmation on long-running patterns
        #[arg(short = 'y', long)]
        yes: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Wallet output file (default: vanity-wallet-<timestamp>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Analyse a pattern's cost without searching
    Estimate {
        /// Required address prefix
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// Required address suffix
        #[arg(short, long, default_value = "")]
        suffix: String,

        /// Case insensitive matching
        #[arg(short = 'i', long)]
        case_insensitive: bool,

        /// Number of worker threads (0 = all cores minus one)
        #[arg(short, long, default_value = "0")]
        workers: usize,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List saved wallet files
    Wallets {
        /// Also print secret keys
        #[arg(long)]
        show_secret: bool,

        /// Directory to scan
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

/// Result shape for `generate --json`.
#[derive(Serialize)]
struct GenerateResult {
    address: String,
    secret_key: String,
    total_attempts: u64,
    elapsed_secs: f64,
    wallet_file: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            prefix,
            suffix,
            case_insensitive,
            workers,
            yes,
            json,
            output,
        } => cmd_generate(
            &prefix,
            &suffix,
            case_insensitive,
            workers,
            yes,
            json,
            output,
        ),
        Commands::Estimate {
            prefix,
            suffix,
            case_insensitive,
            workers,
            json,
        } => cmd_estimate(&prefix, &suffix, case_insensitive, workers, json),
        Commands::Wallets { show_secret, dir } => cmd_wallets(show_secret, &dir),
    }
}

/// Build and validate a pattern before any engine is constructed.
fn validated_spec(prefix: &str, suffix: &str, case_insensitive: bool) -> Result<PatternSpec> {
    let spec = PatternSpec::new(prefix, suffix, !case_insensitive);
    spec.validate().context("invalid pattern")?;
    Ok(spec)
}

/// Resolve the requested worker count against the machine's cores.
/// 0 means "all cores minus one", never fewer than one.
fn resolve_workers(requested: usize, available: usize) -> Result<usize> {
    if requested == 0 {
        return Ok(available.saturating_sub(1).max(1));
    }
    if requested > available {
        bail!("requested {requested} workers but only {available} cores are available");
    }
    Ok(requested)
}

fn cmd_generate(
    prefix: &str,
    suffix: &str,
    case_insensitive: bool,
    workers: usize,
    yes: bool,
    json: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let spec = validated_spec(prefix, suffix, case_insensitive)?;
    let workers = resolve_workers(workers, num_cpus::get())?;

    let report = estimate(&spec, workers);
    if !json {
        eprintln!("Pattern Analysis:");
        eprintln!(
            "  Possible combinations: {}",
            report
                .possible_combinations
                .map(format_count)
                .unwrap_or_else(|| "invalid".to_string())
        );
        eprintln!(
            "  Expected attempts:     {}",
            format_count(report.expected_attempts as u64)
        );
        eprintln!(
            "  Estimated time:        {} ({} workers)",
            format_duration(report.estimated_seconds),
            workers
        );
        eprintln!();
    }

    if report.estimated_seconds > 3600.0 && !yes {
        eprintln!("Warning: this pattern might take a very long time.");
        eprintln!("Consider a shorter pattern or more workers.");
        eprint!("Proceed anyway? (y/n): ");
        io::stderr().flush()?;
        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            eprintln!("Generation cancelled.");
            return Ok(());
        }
    }

    let control = SearchControl::new();
    spawn_key_listener(Arc::clone(&control));

    if !json {
        eprintln!("Type 'p' + Enter to pause/resume, 'q' + Enter to quit.");
        eprintln!();
    }

    let engine = SearchEngine::new(Arc::new(SolanaGenerator), spec.clone(), workers);
    let outcome = engine.run_with_progress(&control, |update| {
        let status = match update.status {
            SearchStatus::Running => "[RUNNING]",
            SearchStatus::Paused => "[PAUSED] ",
        };
        eprint!(
            "\r{} Speed: {}/s | Total: {} | Elapsed: {} | Est. Remaining: {}   ",
            status,
            format_count(update.recent_speed as u64),
            format_count(update.total_attempts),
            format_duration(update.elapsed.as_secs_f64()),
            format_duration(update.eta_seconds),
        );
        let _ = io::stderr().flush();
    })?;
    eprintln!();

    match outcome {
        SearchOutcome::Found {
            candidate,
            total_attempts,
            elapsed,
        } => {
            let path = output.unwrap_or_else(wallet::default_wallet_path);

            // Show the result before touching the disk: a failed write must
            // not cost the user the address they just paid for.
            if json {
                let result = GenerateResult {
                    address: candidate.address.clone(),
                    secret_key: candidate.keypair.secret_base58(),
                    total_attempts,
                    elapsed_secs: elapsed.as_secs_f64(),
                    wallet_file: Some(path.display().to_string()),
                };
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                eprintln!();
                eprintln!("Found matching address!");
                eprintln!("  Public Key:     {}", candidate.address);
                eprintln!("  Total Attempts: {}", format_count(total_attempts));
                eprintln!(
                    "  Time taken:     {}",
                    format_duration(elapsed.as_secs_f64())
                );
            }

            persist_found(&path, &candidate.keypair, &spec)?;
            if !json {
                eprintln!();
                eprintln!("Keypair saved to {}", path.display());
            }
        }
        SearchOutcome::Cancelled {
            total_attempts,
            elapsed,
        } => {
            if json {
                println!("{{\"cancelled\": true}}");
            } else {
                eprintln!(
                    "Search cancelled after {} attempts ({}).",
                    format_count(total_attempts),
                    format_duration(elapsed.as_secs_f64())
                );
            }
        }
    }

    Ok(())
}

/// Persist a found keypair. The failure message names the address so a write
/// error stays attributable to the result already shown.
fn persist_found(path: &Path, keypair: &Keypair, spec: &PatternSpec) -> Result<()> {
    wallet::save_wallet(path, keypair, spec)
        .with_context(|| format!("failed to save wallet for {}", keypair.address()))
}

/// Read pause/quit commands from stdin while a search runs. The thread blocks
/// on stdin and dies with the process once the search concludes.
fn spawn_key_listener(control: Arc<SearchControl>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            if control.is_stopped() {
                break;
            }
            match line.trim() {
                "p" | "P" => {
                    if control.is_paused() {
                        control.request_resume();
                    } else {
                        control.request_pause();
                    }
                }
                "q" | "Q" => {
                    control.request_cancel();
                    break;
                }
                _ => {}
            }
        }
    });
}

fn cmd_estimate(
    prefix: &str,
    suffix: &str,
    case_insensitive: bool,
    workers: usize,
    json: bool,
) -> Result<()> {
    let spec = validated_spec(prefix, suffix, case_insensitive)?;
    let workers = resolve_workers(workers, num_cpus::get())?;
    let report = estimate(&spec, workers);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Pattern Analysis:");
    println!("  Prefix:                {:?}", spec.prefix);
    println!("  Suffix:                {:?}", spec.suffix);
    println!("  Case sensitive:        {}", spec.case_sensitive);
    println!(
        "  Possible combinations: {}",
        report
            .possible_combinations
            .map(format_count)
            .unwrap_or_else(|| "invalid".to_string())
    );
    println!(
        "  Expected attempts:     {}",
        format_count(report.expected_attempts as u64)
    );
    println!(
        "  Estimated time:        {} ({} workers)",
        format_duration(report.estimated_seconds),
        workers
    );
    if report.estimated_seconds > 86400.0 {
        println!();
        println!("Warning: this pattern might take a very long time!");
    }
    Ok(())
}

fn cmd_wallets(show_secret: bool, dir: &PathBuf) -> Result<()> {
    let wallets = wallet::list_wallets(dir)?;
    if wallets.is_empty() {
        println!("No saved wallets found in {}", dir.display());
        return Ok(());
    }

    if show_secret {
        println!("Warning: never share your secret keys with anyone.");
        println!();
    }

    for (i, (path, w)) in wallets.iter().enumerate() {
        println!("{}. {}", i + 1, path.display());
        println!("   Public Key: {}", w.public_key);
        if show_secret {
            println!("   Secret Key: {}", w.secret_key);
        }
        let mut patterns = Vec::new();
        if !w.search_patterns.prefix.is_empty() {
            patterns.push(format!("prefix='{}'", w.search_patterns.prefix));
        }
        if !w.search_patterns.suffix.is_empty() {
            patterns.push(format!("suffix='{}'", w.search_patterns.suffix));
        }
        if !patterns.is_empty() {
            println!("   Search Pattern: {}", patterns.join(", "));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pattern_rejected_before_engine_exists() {
        // At least one of prefix/suffix is required; the engine is never
        // constructed for an empty spec.
        assert!(validated_spec("", "", false).is_err());
    }

    #[test]
    fn test_invalid_characters_rejected() {
        assert!(validated_spec("0x", "", false).is_err());
        assert!(validated_spec("", "I", false).is_err());
    }

    #[test]
    fn test_valid_spec_flags() {
        let spec = validated_spec("Sol", "", true).unwrap();
        assert!(!spec.case_sensitive);
        assert_eq!(spec.prefix, "Sol");
    }

    #[test]
    fn test_resolve_workers_default_leaves_a_core() {
        assert_eq!(resolve_workers(0, 8).unwrap(), 7);
        assert_eq!(resolve_workers(0, 1).unwrap(), 1);
    }

    #[test]
    fn test_save_failure_names_the_address() {
        let keypair = Keypair::generate();
        let spec = PatternSpec::prefix("A");
        let missing = PathBuf::from("/nonexistent-solvanity-dir/wallet.json");

        let err = persist_found(&missing, &keypair, &spec).unwrap_err();
        assert!(format!("{err:#}").contains(&keypair.address()));
    }

    #[test]
    fn test_resolve_workers_bounds() {
        assert_eq!(resolve_workers(4, 8).unwrap(), 4);
        assert_eq!(resolve_workers(8, 8).unwrap(), 8);
        assert!(resolve_workers(9, 8).is_err());
    }
}
