use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use vlab::cli::{self, FormulaOpts};
use vlab::core::playback::Speed;
use vlab::core::resolver::FormulaKind;
use vlab::data::SimulationMode;
use vlab::error::VlabResult;

#[derive(Parser)]
#[command(name = "vlab")]
#[command(about = "Learn spreadsheet formulas by watching them run, step by step.")]
#[command(long_about = "V-Lab - Spreadsheet formula simulator

Animates how VLOOKUP, HLOOKUP, MATCH, INDEX, CHOOSE, the COUNTIF/SUMIF
family and the text functions execute against small teaching tables,
highlighting the cells each step consults and showing the intermediate
value - including the real error codes (#N/A, #REF!, #VALUE!).

COMMANDS:
  list      - All functions with your completion marks
  info      - Syntax, description and a challenge for one function
  resolve   - Instant result, no animation
  run       - Animated step-by-step simulation
  progress  - Show or clear the saved progress

EXAMPLES:
  vlab run vlookup                          # Animate the default lookup
  vlab run vlookup --lookup K03 --column 2  # Look up Es Teh's name column
  vlab run vlookup --mode complex           # Two-table arrangement
  vlab run sumifs --criteria Makanan --criteria2 '>20' --speed 2
  vlab run upper --formula '=UPPER(B4)'
  vlab resolve countif --criteria Minuman   # Just the answer
")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Progress store path (defaults to the platform data directory)
    #[arg(long, global = true, env = "VLAB_PROGRESS_FILE")]
    progress_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every function with completion marks
    List,

    /// Show syntax, description and a challenge for a function
    Info {
        /// Function name, e.g. VLOOKUP or left
        function: FormulaKind,

        /// Table arrangement: simple (one table) or complex (two tables)
        #[arg(short, long, default_value = "simple")]
        mode: ModeArg,
    },

    /// Compute a formula instantly, without animation
    Resolve {
        /// Function name, e.g. VLOOKUP or left
        function: FormulaKind,

        #[command(flatten)]
        opts: FormulaOpts,

        /// Table arrangement: simple (one table) or complex (two tables)
        #[arg(short, long, default_value = "simple")]
        mode: ModeArg,
    },

    /// Animate a formula step by step
    Run {
        /// Function name, e.g. VLOOKUP or left
        function: FormulaKind,

        #[command(flatten)]
        opts: FormulaOpts,

        /// Table arrangement: simple (one table) or complex (two tables)
        #[arg(short, long, default_value = "simple")]
        mode: ModeArg,

        /// Playback speed: 0.5, 1 or 2
        #[arg(short, long, default_value = "1")]
        speed: Speed,

        /// Milliseconds per step at 1x speed
        #[arg(long, default_value_t = 1500, env = "VLAB_BASE_INTERVAL_MS")]
        interval_ms: u64,
    },

    /// Show saved progress, or clear it
    Progress {
        /// Clear all saved progress
        #[arg(long)]
        reset: bool,
    },
}

/// Clap-friendly wrapper for the simulation mode.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ModeArg {
    Simple,
    Complex,
}

impl From<ModeArg> for SimulationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Simple => SimulationMode::Simple,
            ModeArg::Complex => SimulationMode::Complex,
        }
    }
}

fn main() -> VlabResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => cli::list(cli.progress_file),

        Commands::Info { function, mode } => cli::info(function, mode.into()),

        Commands::Resolve {
            function,
            opts,
            mode,
        } => cli::resolve(function, opts, mode.into()),

        Commands::Run {
            function,
            opts,
            mode,
            speed,
            interval_ms,
        } => cli::run(
            function,
            opts,
            mode.into(),
            speed,
            Duration::from_millis(interval_ms),
            cli.progress_file,
        ),

        Commands::Progress { reset } => cli::progress(cli.progress_file, reset),
    }
}
