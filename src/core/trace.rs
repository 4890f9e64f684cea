//! Step-trace generation: the ordered, human-readable narration of how a
//! formula arrives at its result.
//!
//! A trace is produced in full before playback begins and never mutated
//! afterwards. The generator reuses the resolver's scan primitives, so the
//! animated path and the instant path cannot disagree: the final step's
//! display value always equals the resolver's outcome for the same inputs.

use crate::core::resolver::{
    self, context_address, find_header_column, find_match_row, find_vertical_row,
    rows_matching_all, ColumnRef, FormulaArgs,
};
use crate::core::text;
use crate::data::Workbook;
use crate::types::{CellCoord, ErrorKind, Evaluation, Outcome, Value};

//==============================================================================
// Step records
//==============================================================================

/// Which formula argument a step exercises, so a UI can spotlight the
/// corresponding input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgRole {
    LookupValue,
    TableArray,
    ColIndexNum,
    RowIndexNum,
    RangeLookup,
    LookupArray,
    MatchType,
    Array,
    IndexNum,
    Range,
    Criteria,
    Criteria1,
    CriteriaRange1,
    Criteria2,
    SumRange,
    All,
}

impl ArgRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgRole::LookupValue => "lookup_value",
            ArgRole::TableArray => "table_array",
            ArgRole::ColIndexNum => "col_index_num",
            ArgRole::RowIndexNum => "row_index_num",
            ArgRole::RangeLookup => "range_lookup",
            ArgRole::LookupArray => "lookup_array",
            ArgRole::MatchType => "match_type",
            ArgRole::Array => "array",
            ArgRole::IndexNum => "index_num",
            ArgRole::Range => "range",
            ArgRole::Criteria => "criteria",
            ArgRole::Criteria1 => "criteria1",
            ArgRole::CriteriaRange1 => "criteria_range1",
            ArgRole::Criteria2 => "criteria2",
            ArgRole::SumRange => "sum_range",
            ArgRole::All => "all",
        }
    }
}

/// What the result cell shows while a step is on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum StepDisplay {
    /// Still working ("...")
    Pending,
    /// A transient marker such as "Found"
    Note(String),
    /// A partial or final value
    Value(Value),
    /// An error sentinel
    Error(ErrorKind),
}

impl StepDisplay {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Value(v) => StepDisplay::Value(v.clone()),
            Outcome::Error(k) => StepDisplay::Error(*k),
        }
    }

    pub fn render(&self) -> String {
        match self {
            StepDisplay::Pending => "...".to_string(),
            StepDisplay::Note(s) => s.clone(),
            StepDisplay::Value(v) => v.as_text(),
            StepDisplay::Error(k) => k.code().to_string(),
        }
    }
}

/// One unit of playback: a description, the cells to highlight, and the
/// intermediate display value.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStep {
    pub description: String,
    pub highlights: Vec<CellCoord>,
    pub display: StepDisplay,
    pub focus: Option<ArgRole>,
}

impl TraceStep {
    fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            highlights: Vec::new(),
            display: StepDisplay::Pending,
            focus: None,
        }
    }

    fn focus(mut self, role: ArgRole) -> Self {
        self.focus = Some(role);
        self
    }

    fn highlight(mut self, cells: Vec<CellCoord>) -> Self {
        self.highlights = cells;
        self
    }

    fn display(mut self, display: StepDisplay) -> Self {
        self.display = display;
        self
    }

    fn value(self, value: impl Into<Value>) -> Self {
        self.display(StepDisplay::Value(value.into()))
    }

    fn note(self, note: impl Into<String>) -> Self {
        self.display(StepDisplay::Note(note.into()))
    }
}

fn step(description: impl Into<String>) -> TraceStep {
    TraceStep::new(description)
}

/// An immutable, non-empty step sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    steps: Vec<TraceStep>,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TraceStep> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    pub fn final_step(&self) -> Option<&TraceStep> {
        self.steps.last()
    }
}

//==============================================================================
// Generation
//==============================================================================

/// Generate the full trace and the evaluation it narrates.
pub fn generate_trace(args: &FormulaArgs, book: &Workbook) -> (Trace, Evaluation) {
    let eval = resolver::resolve(args, book);
    let outcome = StepDisplay::from_outcome(&eval.outcome);

    let steps = match args {
        FormulaArgs::VLookup {
            lookup_value,
            col_index,
            ..
        } => trace_vlookup(lookup_value, *col_index, book, &outcome),
        FormulaArgs::HLookup {
            lookup_value,
            row_index,
            ..
        } => trace_hlookup(lookup_value, *row_index, book, &outcome),
        FormulaArgs::Match {
            lookup_value,
            column,
            ..
        } => trace_match(lookup_value, *column, book, &outcome),
        FormulaArgs::Index { row, col } => trace_index(*row, *col, book, &outcome),
        FormulaArgs::Choose { index } => trace_choose(*index, book, &outcome),
        FormulaArgs::CountIf { column, criterion } => {
            trace_countif(*column, criterion, book, &outcome)
        }
        FormulaArgs::SumIf {
            criteria_column,
            criterion,
            sum_column,
        } => trace_sumif(*criteria_column, criterion, *sum_column, book, &outcome),
        FormulaArgs::CountIfs { criteria } => trace_countifs(criteria, book, &outcome),
        FormulaArgs::SumIfs {
            sum_column,
            criteria,
        } => trace_sumifs(*sum_column, criteria, book, &outcome),
        _ => trace_text_function(args, book, &outcome),
    };

    debug_assert!(!steps.is_empty());
    debug_assert_eq!(steps.last().map(|s| &s.display), Some(&outcome));

    (Trace { steps }, eval)
}

fn vertical_span(book: &Workbook, col: usize) -> Vec<CellCoord> {
    (1..book.vertical.row_count())
        .map(|row| CellCoord::vertical(row, col))
        .collect()
}

fn header_span(book: &Workbook) -> Vec<CellCoord> {
    (1..book.horizontal.column_count())
        .map(|col| CellCoord::horizontal(0, col))
        .collect()
}

fn trace_vlookup(
    lookup_value: &str,
    col_index: i64,
    book: &Workbook,
    outcome: &StepDisplay,
) -> Vec<TraceStep> {
    let data = &book.vertical;
    let label = if book.context.is_some() { "menu code" } else { "ID" };
    let (address, needle) = match context_address(lookup_value, book) {
        Some((address, value)) => (Some(address), value),
        None => (None, lookup_value.to_string()),
    };

    let mut steps = Vec::new();

    match &address {
        Some(address) => steps.push(
            step(format!(
                "Cell {} contains \"{}\". Searching the reference table...",
                address, needle
            ))
            .focus(ArgRole::LookupValue)
            .value(needle.as_str()),
        ),
        None => steps.push(
            step(format!("Searching for {} \"{}\"...", label, needle))
                .focus(ArgRole::LookupValue),
        ),
    }

    steps.push(
        step("Scanning the first column (A) of the reference table...")
            .focus(ArgRole::TableArray)
            .highlight(vertical_span(book, 0)),
    );

    match find_vertical_row(data, &needle) {
        Some(row) => {
            let row_label = row + 1 + book.row_label_offset;
            steps.push(
                step(format!("Found \"{}\" at row {}.", needle, row_label))
                    .focus(ArgRole::TableArray)
                    .highlight(vec![CellCoord::vertical(row, 0)])
                    .note("Found"),
            );

            if col_index >= 1 && col_index <= data.column_count() as i64 {
                let col = (col_index - 1) as usize;
                let header = data.header(col).unwrap_or_default();
                steps.push(
                    step(format!(
                        "Taking the value from column {} ({})...",
                        col_index, header
                    ))
                    .focus(ArgRole::ColIndexNum)
                    .highlight(vec![
                        CellCoord::vertical(row, 0),
                        CellCoord::vertical(row, col),
                    ])
                    .display(outcome.clone()),
                );
            } else {
                steps.push(
                    step("Column index out of range.")
                        .focus(ArgRole::ColIndexNum)
                        .display(outcome.clone()),
                );
            }
        }
        None => steps.push(
            step(format!("{} not found.", label))
                .focus(ArgRole::RangeLookup)
                .display(outcome.clone()),
        ),
    }

    steps
}

fn trace_hlookup(
    lookup_value: &str,
    row_index: i64,
    book: &Workbook,
    outcome: &StepDisplay,
) -> Vec<TraceStep> {
    let data = &book.horizontal;
    let label = if book.context.is_some() { "grade" } else { "month" };
    let (address, needle) = match context_address(lookup_value, book) {
        Some((address, value)) => (Some(address), value),
        None => (None, lookup_value.to_string()),
    };

    let mut steps = Vec::new();

    match &address {
        Some(address) => steps.push(
            step(format!(
                "Cell {} contains \"{}\". Searching the reference table...",
                address, needle
            ))
            .focus(ArgRole::LookupValue)
            .value(needle.as_str()),
        ),
        None => steps.push(
            step(format!(
                "Searching for {} \"{}\" in the header row...",
                label, needle
            ))
            .focus(ArgRole::LookupValue),
        ),
    }

    steps.push(
        step(format!("Scanning the {}s in the reference table...", label))
            .focus(ArgRole::TableArray)
            .highlight(header_span(book)),
    );

    match find_header_column(data, &needle) {
        Some(col) => {
            steps.push(
                step(format!("Found {} \"{}\" at column {}.", label, needle, col))
                    .focus(ArgRole::TableArray)
                    .highlight(vec![CellCoord::horizontal(0, col)])
                    .note("Found"),
            );

            if row_index >= 1 && row_index <= data.row_count() as i64 {
                let row = (row_index - 1) as usize;
                let row_name = data.cell(row, 0).unwrap_or_default();
                steps.push(
                    step(format!(
                        "Taking the value from row {} ({})...",
                        row_index, row_name
                    ))
                    .focus(ArgRole::RowIndexNum)
                    .highlight(vec![
                        CellCoord::horizontal(0, col),
                        CellCoord::horizontal(row, col),
                    ])
                    .display(outcome.clone()),
                );
            } else {
                steps.push(
                    step("Row index out of range.")
                        .focus(ArgRole::RowIndexNum)
                        .display(outcome.clone()),
                );
            }
        }
        None => steps.push(
            step(format!("{} not found.", label))
                .focus(ArgRole::RangeLookup)
                .display(outcome.clone()),
        ),
    }

    steps
}

fn trace_match(
    lookup_value: &str,
    column: ColumnRef,
    book: &Workbook,
    outcome: &StepDisplay,
) -> Vec<TraceStep> {
    let data = &book.vertical;
    let mut steps = vec![step(format!(
        "Searching for the position of \"{}\"...",
        lookup_value
    ))
    .focus(ArgRole::LookupValue)];

    steps.push(
        step(format!(
            "Scanning array {}1:{}{}...",
            column.letter(),
            column.letter(),
            data.row_count()
        ))
        .focus(ArgRole::LookupArray)
        .highlight(vertical_span(book, column.index())),
    );

    match find_match_row(data, column.index(), lookup_value) {
        Some(row) => steps.push(
            step(format!("Found at position {}.", row))
                .focus(ArgRole::MatchType)
                .highlight(vec![CellCoord::vertical(row, column.index())])
                .display(outcome.clone()),
        ),
        None => steps.push(
            step("Not found.")
                .focus(ArgRole::MatchType)
                .display(outcome.clone()),
        ),
    }

    steps
}

fn trace_index(row: i64, col: i64, book: &Workbook, outcome: &StepDisplay) -> Vec<TraceStep> {
    let data = &book.vertical;
    let mut steps = vec![step(format!("Addressing row {}, column {}...", row, col))
        .focus(ArgRole::Array)];

    let in_bounds = row >= 1
        && col >= 1
        && row <= data.row_count() as i64
        && col <= data.column_count() as i64;
    if in_bounds {
        let (r, c) = ((row - 1) as usize, (col - 1) as usize);
        steps.push(
            step(format!("Taking the cell at row {}, column {}.", row, col))
                .focus(ArgRole::Array)
                .highlight(vec![CellCoord::vertical(r, c)])
                .display(outcome.clone()),
        );
    } else {
        steps.push(
            step("The address is outside the table.")
                .focus(ArgRole::Array)
                .display(outcome.clone()),
        );
    }

    steps
}

fn trace_choose(index: i64, book: &Workbook, outcome: &StepDisplay) -> Vec<TraceStep> {
    let options = &book.choice;
    let mut steps = vec![step(format!("Choosing option {} from the list...", index))
        .focus(ArgRole::IndexNum)];

    if index >= 1 && index <= options.column_count() as i64 {
        let col = (index - 1) as usize;
        let chosen = options.cell(0, col).unwrap_or_default();
        steps.push(
            step(format!("Index {} selects \"{}\".", index, chosen))
                .focus(ArgRole::IndexNum)
                .highlight(vec![CellCoord::choice(col)])
                .display(outcome.clone()),
        );
    } else {
        steps.push(
            step("index_num is outside the option list.")
                .focus(ArgRole::IndexNum)
                .display(outcome.clone()),
        );
    }

    steps
}

fn trace_countif(
    column: ColumnRef,
    criterion: &str,
    book: &Workbook,
    outcome: &StepDisplay,
) -> Vec<TraceStep> {
    let header = book.vertical.header(column.index()).unwrap_or_default().to_string();
    let criteria = [(column, criterion.to_string())];
    let matches = rows_matching_all(&book.vertical, &criteria);

    vec![
        step(format!(
            "Searching for \"{}\" in the {} column...",
            criterion, header
        ))
        .focus(ArgRole::Criteria)
        .highlight(vertical_span(book, column.index())),
        step(format!("Found {} matching item(s).", matches.len()))
            .focus(ArgRole::Range)
            .highlight(
                matches
                    .iter()
                    .map(|&row| CellCoord::vertical(row, column.index()))
                    .collect(),
            )
            .display(outcome.clone()),
    ]
}

fn trace_sumif(
    criteria_column: ColumnRef,
    criterion: &str,
    sum_column: ColumnRef,
    book: &Workbook,
    outcome: &StepDisplay,
) -> Vec<TraceStep> {
    let data = &book.vertical;
    let criteria_header = data.header(criteria_column.index()).unwrap_or_default().to_string();
    let sum_header = data.header(sum_column.index()).unwrap_or_default().to_string();
    let criteria = [(criteria_column, criterion.to_string())];
    let matches = rows_matching_all(data, &criteria);

    vec![
        step(format!(
            "Filtering {} by \"{}\"...",
            criteria_header, criterion
        ))
        .focus(ArgRole::Criteria),
        step(format!(
            "Total {} for \"{}\": {}",
            sum_header,
            criterion,
            outcome.render()
        ))
        .focus(ArgRole::SumRange)
        .highlight(
            matches
                .iter()
                .map(|&row| CellCoord::vertical(row, sum_column.index()))
                .collect(),
        )
        .display(outcome.clone()),
    ]
}

fn criterion_role(index: usize) -> ArgRole {
    match index {
        0 => ArgRole::Criteria1,
        1 => ArgRole::Criteria2,
        _ => ArgRole::Criteria,
    }
}

fn trace_countifs(
    criteria: &[(ColumnRef, String)],
    book: &Workbook,
    outcome: &StepDisplay,
) -> Vec<TraceStep> {
    let data = &book.vertical;
    let mut steps = Vec::new();

    for (i, (column, criterion)) in criteria.iter().enumerate() {
        let header = data.header(column.index()).unwrap_or_default().to_string();
        steps.push(
            step(format!("Filter {}: {} \"{}\"...", i + 1, header, criterion))
                .focus(criterion_role(i))
                .highlight(vertical_span(book, column.index())),
        );

        let passed = rows_matching_all(data, &criteria[..=i]);
        let cells: Vec<CellCoord> = passed
            .iter()
            .map(|&row| CellCoord::vertical(row, column.index()))
            .collect();

        if i + 1 == criteria.len() {
            steps.push(
                step(format!(
                    "Total rows passing every filter: {}",
                    passed.len()
                ))
                .focus(ArgRole::All)
                .highlight(cells)
                .display(outcome.clone()),
            );
        } else {
            steps.push(
                step(format!("Passed filter {}: {} row(s).", i + 1, passed.len()))
                    .focus(ArgRole::CriteriaRange1)
                    .highlight(cells)
                    .value(passed.len() as f64),
            );
        }
    }

    if steps.is_empty() {
        // No criteria at all: still a legal trace with the bare count.
        steps.push(
            step("No filters to apply.")
                .focus(ArgRole::All)
                .display(outcome.clone()),
        );
    }

    steps
}

fn trace_sumifs(
    sum_column: ColumnRef,
    criteria: &[(ColumnRef, String)],
    book: &Workbook,
    outcome: &StepDisplay,
) -> Vec<TraceStep> {
    let data = &book.vertical;
    let sum_header = data.header(sum_column.index()).unwrap_or_default().to_string();
    let mut steps = vec![
        step(format!("Identifying the {} sum range...", sum_header))
            .focus(ArgRole::SumRange)
            .highlight(vertical_span(book, sum_column.index())),
    ];

    for (i, (column, criterion)) in criteria.iter().enumerate() {
        let header = data.header(column.index()).unwrap_or_default().to_string();
        steps.push(
            step(format!("Checking {} {}...", header, criterion))
                .focus(criterion_role(i))
                .highlight(vertical_span(book, column.index())),
        );
    }

    let matches = rows_matching_all(data, criteria);
    steps.push(
        step(format!(
            "Total {} (combined filters): {}",
            sum_header,
            outcome.render()
        ))
        .focus(ArgRole::All)
        .highlight(
            matches
                .iter()
                .map(|&row| CellCoord::vertical(row, sum_column.index()))
                .collect(),
        )
        .display(outcome.clone()),
    );

    steps
}

//==============================================================================
// Text-function traces
//==============================================================================

/// Per-character cap before UPPER/LOWER collapse into a summary step.
const CHAR_STEP_LIMIT: usize = 6;

fn trace_text_function(
    args: &FormulaArgs,
    book: &Workbook,
    outcome: &StepDisplay,
) -> Vec<TraceStep> {
    let formula = resolver::formula_text(args, book);
    let cell = match args {
        FormulaArgs::Upper { cell }
        | FormulaArgs::Lower { cell }
        | FormulaArgs::Proper { cell }
        | FormulaArgs::Left { cell, .. }
        | FormulaArgs::Right { cell, .. }
        | FormulaArgs::Mid { cell, .. }
        | FormulaArgs::Len { cell }
        | FormulaArgs::Text { cell, .. } => *cell,
        _ => {
            return vec![step("Reading the formula...").display(outcome.clone())];
        }
    };

    let Some(source) = book.vertical.cell(cell.row, cell.col) else {
        // Out-of-table reference: the resolver already collapsed this to an
        // error sentinel; narrate just the failure.
        return vec![
            step(format!("Reading formula: {}", formula)),
            step(format!("Cell {} is outside the table.", cell.label()))
                .display(outcome.clone()),
        ];
    };
    let source = source.to_string();
    let coord = vec![CellCoord::vertical(cell.row, cell.col)];

    let mut steps = vec![step(format!("Reading formula: {}", formula))];

    match args {
        FormulaArgs::Upper { .. } => {
            steps.push(
                step(format!(
                    "Taking the text from cell {}: \"{}\"",
                    cell.label(),
                    source
                ))
                .highlight(coord.clone())
                .value(source.as_str()),
            );
            push_case_steps(&mut steps, &source, &coord, true);
            steps.push(
                step("Result of UPPER: every letter capitalized")
                    .highlight(coord)
                    .display(outcome.clone()),
            );
        }
        FormulaArgs::Lower { .. } => {
            steps.push(
                step(format!(
                    "Taking the text from cell {}: \"{}\"",
                    cell.label(),
                    source
                ))
                .highlight(coord.clone())
                .value(source.as_str()),
            );
            push_case_steps(&mut steps, &source, &coord, false);
            steps.push(
                step("Result of LOWER: every letter lowercased")
                    .highlight(coord)
                    .display(outcome.clone()),
            );
        }
        FormulaArgs::Proper { .. } => {
            steps.push(
                step(format!(
                    "Taking the text from cell {}: \"{}\"",
                    cell.label(),
                    source
                ))
                .highlight(coord.clone())
                .value(source.as_str()),
            );
            let mut done: Vec<String> = Vec::new();
            for word in source.split(' ') {
                let proper = text::proper_word(word);
                done.push(proper.clone());
                steps.push(
                    step(format!("Word \"{}\" → \"{}\"", word, proper))
                        .highlight(coord.clone())
                        .value(done.join(" ").as_str()),
                );
            }
            steps.push(
                step("Result of PROPER: every word starts with a capital letter")
                    .highlight(coord)
                    .display(outcome.clone()),
            );
        }
        FormulaArgs::Left { count, .. }
        | FormulaArgs::Right { count, .. }
        | FormulaArgs::Mid { count, .. } => {
            let chars: Vec<char> = source.chars().collect();
            steps.push(
                step(format!(
                    "Taking the text from cell {}: \"{}\" (length: {})",
                    cell.label(),
                    source,
                    chars.len()
                ))
                .highlight(coord.clone())
                .value(source.as_str()),
            );

            let (start_idx, length, announce) = match args {
                FormulaArgs::Left { count, .. } => (
                    0,
                    *count,
                    format!("Taking {} character(s) from the LEFT", count),
                ),
                FormulaArgs::Right { count, .. } => (
                    chars.len().saturating_sub(*count),
                    *count,
                    format!("Taking {} character(s) from the RIGHT", count),
                ),
                FormulaArgs::Mid { start, count, .. } => (
                    start.saturating_sub(1),
                    *count,
                    format!(
                        "Starting at character {}, taking {} character(s)",
                        start, count
                    ),
                ),
                _ => (0, *count, String::new()),
            };
            steps.push(
                step(announce)
                    .highlight(coord.clone())
                    .value(source.as_str()),
            );

            let end = (start_idx + length).min(chars.len());
            let mut extracted = String::new();
            for (i, c) in chars.iter().enumerate().take(end).skip(start_idx) {
                extracted.push(*c);
                steps.push(
                    step(format!("Taking character {}: \"{}\"", i + 1, c))
                        .highlight(coord.clone())
                        .value(extracted.as_str()),
                );
            }

            steps.push(
                step(format!(
                    "Result of {}: \"{}\"",
                    args.kind().name(),
                    outcome.render()
                ))
                .highlight(coord)
                .display(outcome.clone()),
            );
        }
        FormulaArgs::Len { .. } => {
            steps.push(
                step(format!(
                    "Taking the text from cell {}: \"{}\"",
                    cell.label(),
                    source
                ))
                .highlight(coord.clone())
                .value(source.as_str()),
            );

            let chars: Vec<char> = source.chars().collect();
            let stride = if chars.len() > 10 { 3 } else { 1 };
            let mut counted = 0;
            for i in (0..chars.len()).step_by(stride) {
                counted = i + 1;
                steps.push(
                    step(format!("Counting character {}: \"{}\"...", i + 1, chars[i]))
                        .highlight(coord.clone())
                        .value(counted as f64),
                );
            }
            if counted != chars.len() {
                steps.push(
                    step("Counting the remaining characters...")
                        .highlight(coord.clone())
                        .value(chars.len() as f64),
                );
            }

            steps.push(
                step(format!("Result of LEN: {} characters total", chars.len()))
                    .highlight(coord)
                    .display(outcome.clone()),
            );
        }
        FormulaArgs::Text { format, .. } => {
            let value = source.trim().parse::<f64>().unwrap_or(f64::NAN);
            steps.push(
                step(format!(
                    "Taking the value from cell {}: {}",
                    cell.label(),
                    crate::types::format_number(value)
                ))
                .highlight(coord.clone())
                .value(value),
            );
            steps.push(
                step(format!("Using format \"{}\"", format)).highlight(coord.clone()),
            );

            let lower = format.to_lowercase();
            let formatted = text::apply_format(value, format);
            if lower.contains("rp") || lower.contains('#') {
                steps.push(
                    step("Applying the thousands-separated number format")
                        .highlight(coord.clone())
                        .value(formatted.as_str()),
                );
            } else if lower.contains("dd") || lower.contains("mm") || lower.contains("yyyy") {
                steps.push(
                    step(format!(
                        "Converting serial number {} to a date",
                        crate::types::format_number(value)
                    ))
                    .highlight(coord.clone())
                    .value(formatted.as_str()),
                );
            } else if lower.contains('%') {
                steps.push(
                    step("Applying the percentage format")
                        .highlight(coord.clone())
                        .value(formatted.as_str()),
                );
            }

            steps.push(
                step("Result of TEXT: the number formatted as text")
                    .highlight(coord)
                    .display(outcome.clone()),
            );
        }
        _ => {}
    }

    steps
}

/// Per-character narration for UPPER/LOWER: a step for each changed
/// character among the first few, then one summary step for the rest.
fn push_case_steps(steps: &mut Vec<TraceStep>, source: &str, coord: &[CellCoord], to_upper: bool) {
    let chars: Vec<char> = source.chars().collect();
    let mut converted = String::new();
    for (i, c) in chars.iter().enumerate().take(CHAR_STEP_LIMIT) {
        let mapped: String = if to_upper {
            c.to_uppercase().collect()
        } else {
            c.to_lowercase().collect()
        };
        converted.push_str(&mapped);
        if mapped != c.to_string() {
            let partial = if i < chars.len() - 1 {
                format!("{}...", converted)
            } else {
                converted.clone()
            };
            steps.push(
                step(format!("Character \"{}\" → \"{}\"", c, mapped))
                    .highlight(coord.to_vec())
                    .value(partial.as_str()),
            );
        }
    }

    if chars.len() > CHAR_STEP_LIMIT {
        let full = if to_upper {
            text::upper(source)
        } else {
            text::lower(source)
        };
        steps.push(
            step(format!(
                "Processing the remaining {} characters...",
                chars.len() - CHAR_STEP_LIMIT
            ))
            .highlight(coord.to_vec())
            .value(full.as_str()),
        );
    }
}
