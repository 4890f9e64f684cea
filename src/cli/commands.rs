//! Terminal front-end for the simulator: the reference consumer of the
//! engine's resolve / trace / playback contract.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use colored::Colorize;

use crate::core::playback::{PlaybackController, PlaybackEvent, Speed};
use crate::core::resolver::{self, ColumnRef, FormulaArgs, FormulaKind, FunctionGroup};
use crate::core::text::{default_formula, parse_text_formula};
use crate::core::trace::generate_trace;
use crate::data::{SimulationMode, Workbook};
use crate::error::{VlabError, VlabResult};
use crate::progress::ProgressStore;
use crate::types::{CellCoord, Outcome, TableId};

/// Formula arguments, shared by `resolve` and `run`. Every flag is optional;
/// omitted ones fall back to each function's teaching defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct FormulaOpts {
    /// Lookup value (VLOOKUP/HLOOKUP/MATCH), e.g. "K02" or "Mar"
    #[arg(long)]
    pub lookup: Option<String>,

    /// Column number (VLOOKUP col_index_num, INDEX column_num)
    #[arg(long)]
    pub column: Option<i64>,

    /// Row number (HLOOKUP row_index_num, INDEX row_num)
    #[arg(long)]
    pub row: Option<i64>,

    /// Column letter A-D (MATCH lookup_array, COUNTIF/SUMIF criteria range)
    #[arg(long)]
    pub array: Option<String>,

    /// Option index (CHOOSE index_num)
    #[arg(long)]
    pub index: Option<i64>,

    /// First criterion (COUNTIF/SUMIF/COUNTIFS/SUMIFS), e.g. "Makanan" or ">20"
    #[arg(long)]
    pub criteria: Option<String>,

    /// Second criterion (COUNTIFS/SUMIFS)
    #[arg(long)]
    pub criteria2: Option<String>,

    /// Full formula text for the text functions, e.g. "=UPPER(B2)"
    #[arg(long)]
    pub formula: Option<String>,
}

/// Progress-store module id a function reports under.
fn module_id(kind: FormulaKind) -> &'static str {
    if kind.is_text() {
        "excel-text"
    } else {
        "excel"
    }
}

fn parse_column(raw: &Option<String>, default: ColumnRef) -> VlabResult<ColumnRef> {
    match raw {
        Some(s) => s.parse(),
        None => Ok(default),
    }
}

/// Assemble the argument bag for a function from the CLI flags, falling back
/// to the same defaults the labs open with.
fn build_args(kind: FormulaKind, opts: &FormulaOpts, book: &Workbook) -> VlabResult<FormulaArgs> {
    let complex = book.context.is_some();
    match kind {
        FormulaKind::VLookup => Ok(FormulaArgs::VLookup {
            lookup_value: opts
                .lookup
                .clone()
                .unwrap_or_else(|| (if complex { "C2" } else { "K02" }).to_string()),
            col_index: opts.column.unwrap_or(3),
            exact: false,
        }),
        FormulaKind::HLookup => Ok(FormulaArgs::HLookup {
            lookup_value: opts
                .lookup
                .clone()
                .unwrap_or_else(|| (if complex { "C2" } else { "Mar" }).to_string()),
            row_index: opts.row.unwrap_or(2),
            exact: false,
        }),
        FormulaKind::Match => Ok(FormulaArgs::Match {
            lookup_value: opts
                .lookup
                .clone()
                .unwrap_or_else(|| "Mie Ayam".to_string()),
            column: parse_column(&opts.array, ColumnRef::B)?,
            match_type: 0,
        }),
        FormulaKind::Index => Ok(FormulaArgs::Index {
            row: opts.row.unwrap_or(3),
            col: opts.column.unwrap_or(2),
        }),
        FormulaKind::Choose => Ok(FormulaArgs::Choose {
            index: opts.index.unwrap_or(1),
        }),
        FormulaKind::CountIf => Ok(FormulaArgs::CountIf {
            column: parse_column(&opts.array, ColumnRef::A)?,
            criterion: opts.criteria.clone().unwrap_or_else(|| "Makanan".to_string()),
        }),
        FormulaKind::SumIf => Ok(FormulaArgs::SumIf {
            criteria_column: parse_column(&opts.array, ColumnRef::A)?,
            criterion: opts.criteria.clone().unwrap_or_else(|| "Makanan".to_string()),
            sum_column: ColumnRef::D,
        }),
        FormulaKind::CountIfs => Ok(FormulaArgs::CountIfs {
            criteria: vec![
                (
                    ColumnRef::A,
                    opts.criteria.clone().unwrap_or_else(|| "Minuman".to_string()),
                ),
                (
                    ColumnRef::C,
                    opts.criteria2.clone().unwrap_or_else(|| ">20".to_string()),
                ),
            ],
        }),
        FormulaKind::SumIfs => Ok(FormulaArgs::SumIfs {
            sum_column: ColumnRef::D,
            criteria: vec![
                (
                    ColumnRef::A,
                    opts.criteria.clone().unwrap_or_else(|| "Makanan".to_string()),
                ),
                (
                    ColumnRef::C,
                    opts.criteria2.clone().unwrap_or_else(|| ">20".to_string()),
                ),
            ],
        }),
        text_kind => {
            let input = opts
                .formula
                .clone()
                .unwrap_or_else(|| default_formula(text_kind).to_string());
            parse_text_formula(&input, text_kind, &book.vertical)
                .map_err(|diag| VlabError::Parse(diag.to_string()))
        }
    }
}

/// Spreadsheet-style coordinate label, prefixed with the grid it belongs to
/// (`v!`, `h!`, `c!`).
fn coord_label(coord: &CellCoord) -> String {
    let prefix = match coord.table {
        TableId::Vertical => "v",
        TableId::Horizontal => "h",
        TableId::Choice => "c",
    };
    format!(
        "{}!{}{}",
        prefix,
        (b'A' + coord.col as u8) as char,
        coord.row + 1
    )
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Value(v) => println!("   Result: {}", v.as_text().bold().green()),
        Outcome::Error(k) => println!("   Result: {}", k.code().bold().red()),
    }
}

fn error_hint(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Error(kind) => Some(format!(
            "Result {}: the value was not found or an argument is out of range. Try another value.",
            kind.code()
        )),
        _ => None,
    }
}

/// Execute the list command: every function, grouped, with completion marks.
pub fn list(progress_file: Option<PathBuf>) -> VlabResult<()> {
    let store = ProgressStore::load(progress_file.unwrap_or_else(ProgressStore::default_path));

    println!("{}", "🧪 V-Lab - Available functions".bold().green());
    println!();

    for (group, title) in [
        (FunctionGroup::LookupReference, "Lookup & Reference"),
        (FunctionGroup::Statistical, "Statistical"),
        (FunctionGroup::Text, "Text"),
    ] {
        println!("{}", title.bold());
        for kind in FormulaKind::ALL.iter().filter(|k| k.group() == group) {
            let mark = if store.is_completed(module_id(*kind), kind.name()) {
                "✓".green().to_string()
            } else {
                " ".to_string()
            };
            println!("  {} {}", mark, kind.name());
        }
        println!();
    }

    let done: usize = FormulaKind::ALL
        .iter()
        .filter(|k| store.is_completed(module_id(**k), k.name()))
        .count();
    println!("Completed: {}/{}", done, FormulaKind::ALL.len());
    Ok(())
}

/// Execute the info command: teaching copy plus a ready-to-run example.
pub fn info(kind: FormulaKind, mode: SimulationMode) -> VlabResult<()> {
    let details = resolver::info(kind);
    let book = Workbook::for_kind(kind, mode);
    let args = build_args(kind, &FormulaOpts::default(), &book)?;

    println!("{}", details.title.bold().green());
    println!();
    println!("{}", details.description);
    println!();
    println!("   Syntax:  {}", details.syntax.cyan());
    println!("   Example: {}", resolver::formula_text(&args, &book).cyan());
    println!();
    println!("{} {}", "Challenge:".bold().yellow(), details.challenge);
    Ok(())
}

/// Execute the resolve command: instant, non-animated evaluation.
pub fn resolve(
    kind: FormulaKind,
    opts: FormulaOpts,
    mode: SimulationMode,
) -> VlabResult<()> {
    let book = Workbook::for_kind(kind, mode);
    let args = build_args(kind, &opts, &book)?;
    let eval = resolver::resolve(&args, &book);

    println!("{}", format!("🧪 V-Lab - {}", kind.name()).bold().green());
    println!("   Formula: {}", resolver::formula_text(&args, &book).cyan());
    print_outcome(&eval.outcome);

    if !eval.consulted.is_empty() {
        let cells: Vec<String> = eval.consulted.iter().map(coord_label).collect();
        println!("   Cells: {}", cells.join(", "));
    }
    if let Some(hint) = error_hint(&eval.outcome) {
        println!("   {}", hint.yellow());
    }
    Ok(())
}

/// Execute the run command: animated step-trace playback, then progress
/// bookkeeping.
pub fn run(
    kind: FormulaKind,
    opts: FormulaOpts,
    mode: SimulationMode,
    speed: Speed,
    base_interval: Duration,
    progress_file: Option<PathBuf>,
) -> VlabResult<()> {
    let book = Workbook::for_kind(kind, mode);
    let args = build_args(kind, &opts, &book)?;

    if let Some(hint) = resolver::preflight(&args, &book) {
        println!("{} {}", "✗".red(), hint.red());
        return Ok(());
    }

    let (trace, eval) = generate_trace(&args, &book);
    let total = trace.len();

    println!(
        "{}",
        format!("🧪 V-Lab - Simulating {} at {}", kind.name(), speed.label())
            .bold()
            .green()
    );
    println!("   Formula: {}", resolver::formula_text(&args, &book).cyan());
    println!();

    let mut controller = PlaybackController::new(base_interval);
    controller.set_speed(speed);
    controller.start(trace, Instant::now());

    while let Some(deadline) = controller.next_deadline() {
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        match controller.poll(Instant::now()) {
            Some(PlaybackEvent::Step { index, step }) => {
                let position = format!("[{}/{}]", index + 1, total);
                print!("{} {}", position.dimmed(), step.description);
                if !step.highlights.is_empty() {
                    let cells: Vec<String> = step.highlights.iter().map(coord_label).collect();
                    print!(" {}", format!("[{}]", cells.join(" ")).dimmed());
                }
                println!("  {}", format!("→ {}", step.display.render()).cyan());
            }
            Some(PlaybackEvent::Completed) => {
                println!();
                print_outcome(&eval.outcome);
            }
            None => {}
        }
    }

    if let Some(hint) = error_hint(&eval.outcome) {
        println!("   {}", hint.yellow());
    }

    let module = module_id(kind);
    let mut store = ProgressStore::load(progress_file.unwrap_or_else(ProgressStore::default_path));
    store.mark_completed(module, kind.name());
    store.increment_simulation_count(module);
    store.set_preference(module, "animationSpeed", serde_json::json!(speed.factor()));
    store.set_preference(
        module,
        "simulationMode",
        serde_json::json!(match mode {
            SimulationMode::Simple => "simple",
            SimulationMode::Complex => "complex",
        }),
    );

    println!(
        "   {}",
        format!("{} marked as completed.", kind.name()).green()
    );
    Ok(())
}

/// Execute the progress command.
pub fn progress(progress_file: Option<PathBuf>, reset: bool) -> VlabResult<()> {
    let mut store =
        ProgressStore::load(progress_file.unwrap_or_else(ProgressStore::default_path));

    if reset {
        store.reset();
        println!("{}", "Progress cleared.".yellow());
        return Ok(());
    }

    println!("{}", "🧪 V-Lab - Progress".bold().green());
    println!("   Store: {}", store.path().display());
    println!();

    let mut empty = true;
    for (module, record) in store.modules() {
        empty = false;
        println!("{}", module.bold());
        println!(
            "   Completed: {} | Simulations run: {}",
            record.completed.len(),
            record.simulations_run
        );
        if !record.completed.is_empty() {
            println!("   {}", record.completed.join(", "));
        }
        if let Some(at) = record.last_updated {
            println!("   Last updated: {}", at.to_rfc3339());
        }
        println!();
    }
    if empty {
        println!("No simulations run yet. Try: vlab run vlookup");
    }
    Ok(())
}
