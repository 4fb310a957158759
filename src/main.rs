//! Calltrace Studio CLI
//!
//! Turns function trace event logs into per-call timing and memory
//! tables, and summarizes accumulated tables per function.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

use calltrace_studio::commands::utils::{
    display_schema, display_version, render_records, render_summaries,
};
use calltrace_studio::commands::{
    execute_report, execute_summarize, validate_args, ReportArgs, ReportOutcome, SummarizeArgs,
    SummaryScope,
};
use calltrace_studio::utils::config::{request_path, ENABLE_TRACE_ENV};

/// Calltrace Studio - call tables from function trace logs
#[derive(Parser, Debug)]
#[command(name = "calltrace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// How results are printed to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconstruct calls from a trace log and append them to the CSV table
    Report {
        /// Directory holding the trace log and CSV tables
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Trace log to read instead of <dir>/function-trace.xt[.gz]
        #[arg(long)]
        file: Option<PathBuf>,

        /// Project root stripped from function and location labels
        #[arg(short, long, default_value = "")]
        root: String,

        /// Only keep calls whose target contains this term
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Page to return (1-based)
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,

        /// Records per page
        #[arg(short, long, default_value_t = 10, allow_negative_numbers = true)]
        limit: i64,

        /// Keep every invocation instead of one row per function
        #[arg(long)]
        all_calls: bool,

        /// Most called functions first
        #[arg(long)]
        sort_by_count: bool,

        /// Also write the per-function summary table
        #[arg(long)]
        summarize: bool,

        /// Summarize every run in the table, not just this one
        #[arg(long)]
        all_runs: bool,

        /// Request URI whose path is stamped onto every record
        #[arg(long, env = "REQUEST_URI", default_value = "")]
        route: String,

        /// Only run when ENABLE_FUNCTION_TRACE is set
        #[arg(long)]
        check_env: bool,

        /// Output path for a JSON report of the returned page
        #[arg(long)]
        json: Option<PathBuf>,

        /// Output format for stdout
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Fold a call record table into one row per function
    Summarize {
        /// Call record table to read
        #[arg(short, long, default_value = "function-trace.csv")]
        table: PathBuf,

        /// Summary table to write
        #[arg(short, long, default_value = "function-trace-summarize.csv")]
        output: PathBuf,

        /// Page to return (1-based)
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,

        /// Rows per page
        #[arg(short, long, default_value_t = 10, allow_negative_numbers = true)]
        limit: i64,

        /// Most called functions first
        #[arg(long)]
        sort_by_count: bool,

        /// Summarize every run in the table, not just the latest
        #[arg(long)]
        all_runs: bool,

        /// Output format for stdout
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Display table schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn scope(all_runs: bool) -> SummaryScope {
    if all_runs {
        SummaryScope::AllRuns
    } else {
        SummaryScope::LatestRun
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Report {
            dir,
            file,
            root,
            filter,
            page,
            limit,
            all_calls,
            sort_by_count,
            summarize,
            all_runs,
            route,
            check_env,
            json,
            format,
        } => {
            let args = ReportArgs {
                trace_dir: dir,
                trace_file: file,
                root_path: root,
                filter_term: filter,
                page,
                page_size: limit,
                unique: !all_calls,
                sort_by_count,
                summarize,
                summary_scope: scope(all_runs),
                current_route: request_path(&route),
                check_env,
                output_json: json,
            };

            // Validate args first
            validate_args(&args)?;

            match execute_report(&args)? {
                ReportOutcome::Disabled => {
                    println!("Function trace report disabled ({} is not set)", ENABLE_TRACE_ENV);
                }
                ReportOutcome::Diagnostic(message) => {
                    println!("{}", message);
                }
                ReportOutcome::Records(result) => match format {
                    Format::Json => {
                        println!("{}", serde_json::to_string_pretty(&result.records)?);
                    }
                    Format::Text => {
                        println!(
                            "Page {} ({} of {} records)",
                            page.unsigned_abs(),
                            result.records.len(),
                            result.total_records
                        );
                        print!("{}", render_records(&result.records));
                        if let Some(summary) = &result.summary {
                            println!();
                            println!("Summary (top {})", summary.len());
                            print!("{}", render_summaries(summary));
                        }
                    }
                },
            }
        }

        Commands::Summarize {
            table,
            output,
            page,
            limit,
            sort_by_count,
            all_runs,
            format,
        } => {
            let args = SummarizeArgs {
                table,
                output,
                page,
                page_size: limit,
                sort_by_count,
                scope: scope(all_runs),
            };

            let summaries = execute_summarize(&args)?;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
                Format::Text => print!("{}", render_summaries(&summaries)),
            }
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
