//! CLI frontend for the Tianji divination engine.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::Session;
use commands::prompt::PromptRequest;

#[derive(Parser)]
#[command(
    name = "tj",
    about = "Tianji: sexagenary calendar and divination casts",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log calendar and cast details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML file overriding calendar settings and the city table
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Moment to cast for, as RFC 3339 (default: now)
    #[arg(long, global = true)]
    at: Option<String>,

    /// Longitude for true solar time, degrees east positive
    #[arg(long, global = true, allow_negative_numbers = true, conflicts_with = "city")]
    longitude: Option<f64>,

    /// City whose longitude sets true solar time
    #[arg(long, global = true)]
    city: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the four pillars, lunar date and solar term
    Calendar,

    /// Cast a hexagram with three coins (六爻)
    Coin {
        /// RNG seed for a reproducible cast
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Cast plum-blossom trigrams from two numbers (梅花易数)
    Meihua {
        /// Number for the upper trigram (0 or omitted: random)
        n1: Option<u64>,

        /// Number for the lower trigram (0 or omitted: random)
        n2: Option<u64>,

        /// RNG seed for the replacement numbers
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Walk the quick-oracle palaces (小六壬)
    Oracle {
        /// Three positive numbers; omitted: use the lunar date and hour
        numbers: Vec<u64>,
    },

    /// Render the language-model prompts for a method and question
    Prompt {
        /// Method: liuyao, meihua, qimen, liuren, taiyi, xiaoliuren (or 六爻 ...)
        method: String,

        /// The question to ask
        question: String,

        /// Querent gender (male/female)
        #[arg(long)]
        gender: Option<String>,

        /// Querent birth year
        #[arg(long)]
        birth_year: Option<i32>,

        /// Querent birth chart as four pillars, e.g. 庚午,戊寅,甲子,丙寅
        #[arg(long)]
        pillars: Option<String>,

        /// Meihua numbers (0 draws a random replacement)
        #[arg(long, num_args = 2, value_names = ["N1", "N2"])]
        numbers: Option<Vec<u64>>,

        /// RNG seed for casts that need one
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// List the known cities and their longitudes
    Cities,
}

fn run(cli: Cli) -> Result<(), String> {
    let session = Session::open(
        cli.config.as_deref(),
        cli.at.as_deref(),
        cli.longitude,
        cli.city,
        cli.json,
    )?;

    match cli.command {
        Commands::Calendar => commands::calendar::run(&session),
        Commands::Coin { seed } => commands::coin::run(&session, seed),
        Commands::Meihua { n1, n2, seed } => commands::meihua::run(&session, n1, n2, seed),
        Commands::Oracle { numbers } => commands::oracle::run(&session, &numbers),
        Commands::Prompt {
            method,
            question,
            gender,
            birth_year,
            pillars,
            numbers,
            seed,
        } => commands::prompt::run(
            &session,
            &PromptRequest {
                method: &method,
                question: &question,
                gender: gender.as_deref(),
                birth_year,
                pillars: pillars.as_deref(),
                numbers: numbers.as_deref(),
                seed,
            },
        ),
        Commands::Cities => commands::cities::run(&session),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
