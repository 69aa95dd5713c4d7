//! answerkey CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "answerkey", version, about = "Homework answer-key grader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade student files against an answer key
    Grade {
        /// Answer-key file (e.g. Solutions_HW1.txt)
        #[arg(long)]
        solution: PathBuf,

        /// Student response files
        #[arg(required = true)]
        students: Vec<PathBuf>,

        /// Max student files graded concurrently (overrides config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Output directory (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Extra report formats: json, html, all
        #[arg(long)]
        format: Option<String>,

        /// Do not write <student>_Grade.txt files
        #[arg(long)]
        no_results_file: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compile answer-key shorthand to canonical form
    Compile {
        /// Answer-key file
        #[arg(long)]
        solution: PathBuf,

        /// Overwrite the file instead of printing
        #[arg(long)]
        write: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a blank student response file from an answer key
    Template {
        /// Answer-key file
        #[arg(long)]
        solution: PathBuf,

        /// Where to write the template (prints when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Expand a problem list such as "1-10 odds,12a-c" into a template
    Problems {
        /// Comma-separated problems, ranges, and odds/evens ranges
        list: String,

        /// Where to write the template (prints when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Reorder a numbered file by problem number
    Sort {
        /// File to sort in place
        file: PathBuf,
    },

    /// Create starter config and sample homework files
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("answerkey=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            solution,
            students,
            parallelism,
            output,
            format,
            no_results_file,
            config,
        } => {
            commands::grade::execute(
                solution,
                students,
                parallelism,
                output,
                format,
                no_results_file,
                config,
            )
            .await
        }
        Commands::Compile {
            solution,
            write,
            config,
        } => commands::compile::execute(solution, write, config),
        Commands::Template { solution, output } => commands::template::execute(solution, output),
        Commands::Problems { list, output } => commands::problems::execute(list, output),
        Commands::Sort { file } => commands::sort::execute(file),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
