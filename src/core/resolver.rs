//! Formula resolver: one pure evaluation path per formula kind.
//!
//! `resolve` never panics and never surfaces an error for expected-bad input;
//! malformed-but-plausible arguments map to the spreadsheet error sentinels
//! (`#N/A`, `#REF!`, `#VALUE!`). Truly unanticipated failures are logged and
//! collapse to `#ERROR!` so the caller always has something to render.

use crate::core::criteria;
use crate::core::text::{self, CellRef};
use crate::data::Workbook;
use crate::error::{VlabError, VlabResult};
use crate::types::{CellCoord, ErrorKind, Evaluation, Outcome};

//==============================================================================
// Formula kinds and argument bags
//==============================================================================

/// The closed set of supported formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaKind {
    VLookup,
    HLookup,
    Match,
    Index,
    Choose,
    CountIf,
    SumIf,
    CountIfs,
    SumIfs,
    Upper,
    Lower,
    Proper,
    Left,
    Right,
    Mid,
    Len,
    Text,
}

/// Function group, as the lab tabs present them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionGroup {
    LookupReference,
    Statistical,
    Text,
}

impl FormulaKind {
    pub const ALL: [FormulaKind; 17] = [
        FormulaKind::VLookup,
        FormulaKind::HLookup,
        FormulaKind::Match,
        FormulaKind::Index,
        FormulaKind::Choose,
        FormulaKind::CountIf,
        FormulaKind::SumIf,
        FormulaKind::CountIfs,
        FormulaKind::SumIfs,
        FormulaKind::Upper,
        FormulaKind::Lower,
        FormulaKind::Proper,
        FormulaKind::Left,
        FormulaKind::Right,
        FormulaKind::Mid,
        FormulaKind::Len,
        FormulaKind::Text,
    ];

    /// Canonical spreadsheet name (also the progress-store feature key).
    pub fn name(&self) -> &'static str {
        match self {
            FormulaKind::VLookup => "VLOOKUP",
            FormulaKind::HLookup => "HLOOKUP",
            FormulaKind::Match => "MATCH",
            FormulaKind::Index => "INDEX",
            FormulaKind::Choose => "CHOOSE",
            FormulaKind::CountIf => "COUNTIF",
            FormulaKind::SumIf => "SUMIF",
            FormulaKind::CountIfs => "COUNTIFS",
            FormulaKind::SumIfs => "SUMIFS",
            FormulaKind::Upper => "UPPER",
            FormulaKind::Lower => "LOWER",
            FormulaKind::Proper => "PROPER",
            FormulaKind::Left => "LEFT",
            FormulaKind::Right => "RIGHT",
            FormulaKind::Mid => "MID",
            FormulaKind::Len => "LEN",
            FormulaKind::Text => "TEXT",
        }
    }

    pub fn group(&self) -> FunctionGroup {
        match self {
            FormulaKind::VLookup
            | FormulaKind::HLookup
            | FormulaKind::Match
            | FormulaKind::Index
            | FormulaKind::Choose => FunctionGroup::LookupReference,
            FormulaKind::CountIf
            | FormulaKind::SumIf
            | FormulaKind::CountIfs
            | FormulaKind::SumIfs => FunctionGroup::Statistical,
            _ => FunctionGroup::Text,
        }
    }

    pub fn is_text(&self) -> bool {
        self.group() == FunctionGroup::Text
    }
}

impl std::fmt::Display for FormulaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for FormulaKind {
    type Err = VlabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        FormulaKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == upper)
            .ok_or_else(|| VlabError::InvalidArgument(format!("unknown function \"{}\"", s)))
    }
}

/// Column selector for MATCH and the criteria/sum columns of the aggregate
/// family. Structured on purpose: the original free-text range strings
/// (`"B1:B5"`) were resolved by substring sniffing, which this replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    A,
    B,
    C,
    D,
}

impl ColumnRef {
    pub fn index(&self) -> usize {
        match self {
            ColumnRef::A => 0,
            ColumnRef::B => 1,
            ColumnRef::C => 2,
            ColumnRef::D => 3,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            ColumnRef::A => 'A',
            ColumnRef::B => 'B',
            ColumnRef::C => 'C',
            ColumnRef::D => 'D',
        }
    }
}

impl std::str::FromStr for ColumnRef {
    type Err = VlabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(ColumnRef::A),
            "B" => Ok(ColumnRef::B),
            "C" => Ok(ColumnRef::C),
            "D" => Ok(ColumnRef::D),
            other => Err(VlabError::InvalidArgument(format!(
                "unknown column \"{}\" (expected A-D)",
                other
            ))),
        }
    }
}

/// A formula invocation: the kind is implied by the variant, the fields are
/// that kind's argument bag. Shapes are fixed; missing required arguments
/// cannot be constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaArgs {
    VLookup {
        lookup_value: String,
        col_index: i64,
        /// Accepted for fidelity with the real signature; never branched on.
        exact: bool,
    },
    HLookup {
        lookup_value: String,
        row_index: i64,
        exact: bool,
    },
    Match {
        lookup_value: String,
        column: ColumnRef,
        /// Only exact (0) semantics exist; stored for the formula rendering.
        match_type: i64,
    },
    Index {
        row: i64,
        col: i64,
    },
    Choose {
        index: i64,
    },
    CountIf {
        column: ColumnRef,
        criterion: String,
    },
    SumIf {
        criteria_column: ColumnRef,
        criterion: String,
        sum_column: ColumnRef,
    },
    CountIfs {
        criteria: Vec<(ColumnRef, String)>,
    },
    SumIfs {
        sum_column: ColumnRef,
        criteria: Vec<(ColumnRef, String)>,
    },
    Upper {
        cell: CellRef,
    },
    Lower {
        cell: CellRef,
    },
    Proper {
        cell: CellRef,
    },
    Left {
        cell: CellRef,
        count: usize,
    },
    Right {
        cell: CellRef,
        count: usize,
    },
    Mid {
        cell: CellRef,
        start: usize,
        count: usize,
    },
    Len {
        cell: CellRef,
    },
    Text {
        cell: CellRef,
        format: String,
    },
}

impl FormulaArgs {
    pub fn kind(&self) -> FormulaKind {
        match self {
            FormulaArgs::VLookup { .. } => FormulaKind::VLookup,
            FormulaArgs::HLookup { .. } => FormulaKind::HLookup,
            FormulaArgs::Match { .. } => FormulaKind::Match,
            FormulaArgs::Index { .. } => FormulaKind::Index,
            FormulaArgs::Choose { .. } => FormulaKind::Choose,
            FormulaArgs::CountIf { .. } => FormulaKind::CountIf,
            FormulaArgs::SumIf { .. } => FormulaKind::SumIf,
            FormulaArgs::CountIfs { .. } => FormulaKind::CountIfs,
            FormulaArgs::SumIfs { .. } => FormulaKind::SumIfs,
            FormulaArgs::Upper { .. } => FormulaKind::Upper,
            FormulaArgs::Lower { .. } => FormulaKind::Lower,
            FormulaArgs::Proper { .. } => FormulaKind::Proper,
            FormulaArgs::Left { .. } => FormulaKind::Left,
            FormulaArgs::Right { .. } => FormulaKind::Right,
            FormulaArgs::Mid { .. } => FormulaKind::Mid,
            FormulaArgs::Len { .. } => FormulaKind::Len,
            FormulaArgs::Text { .. } => FormulaKind::Text,
        }
    }
}

//==============================================================================
// Resolution
//==============================================================================

/// Resolve a formula against the workbook. Infallible at the type level:
/// internal failures are logged and mapped to `#ERROR!`.
pub fn resolve(args: &FormulaArgs, book: &Workbook) -> Evaluation {
    match resolve_inner(args, book) {
        Ok(eval) => eval,
        Err(err) => {
            tracing::error!(formula = args.kind().name(), %err, "resolution failed");
            Evaluation::error(ErrorKind::Generic)
        }
    }
}

fn resolve_inner(args: &FormulaArgs, book: &Workbook) -> VlabResult<Evaluation> {
    match args {
        FormulaArgs::VLookup {
            lookup_value,
            col_index,
            ..
        } => resolve_vlookup(lookup_value, *col_index, book),
        FormulaArgs::HLookup {
            lookup_value,
            row_index,
            ..
        } => resolve_hlookup(lookup_value, *row_index, book),
        FormulaArgs::Match {
            lookup_value,
            column,
            ..
        } => Ok(resolve_match(lookup_value, *column, book)),
        FormulaArgs::Index { row, col } => Ok(resolve_index(*row, *col, book)),
        FormulaArgs::Choose { index } => Ok(resolve_choose(*index, book)),
        FormulaArgs::CountIf { column, criterion } => {
            Ok(resolve_countifs(&[(*column, criterion.clone())], book))
        }
        FormulaArgs::SumIf {
            criteria_column,
            criterion,
            sum_column,
        } => Ok(resolve_sumifs(
            *sum_column,
            &[(*criteria_column, criterion.clone())],
            book,
        )),
        FormulaArgs::CountIfs { criteria } => Ok(resolve_countifs(criteria, book)),
        FormulaArgs::SumIfs {
            sum_column,
            criteria,
        } => Ok(resolve_sumifs(*sum_column, criteria, book)),
        FormulaArgs::Upper { cell } => resolve_text(cell, book, |t| Outcome::text(text::upper(t))),
        FormulaArgs::Lower { cell } => resolve_text(cell, book, |t| Outcome::text(text::lower(t))),
        FormulaArgs::Proper { cell } => {
            resolve_text(cell, book, |t| Outcome::text(text::proper(t)))
        }
        FormulaArgs::Left { cell, count } => {
            resolve_text(cell, book, |t| Outcome::text(text::left(t, *count)))
        }
        FormulaArgs::Right { cell, count } => {
            resolve_text(cell, book, |t| Outcome::text(text::right(t, *count)))
        }
        FormulaArgs::Mid { cell, start, count } => {
            resolve_text(cell, book, |t| Outcome::text(text::mid(t, *start, *count)))
        }
        FormulaArgs::Len { cell } => {
            resolve_text(cell, book, |t| Outcome::number(text::len(t) as f64))
        }
        FormulaArgs::Text { cell, format } => resolve_text(cell, book, |t| {
            let value = t.trim().parse::<f64>().unwrap_or(f64::NAN);
            Outcome::text(text::apply_format(value, format))
        }),
    }
}

fn resolve_vlookup(lookup_value: &str, col_index: i64, book: &Workbook) -> VlabResult<Evaluation> {
    let data = &book.vertical;
    let needle = effective_lookup_value(lookup_value, book);

    let Some(row) = find_vertical_row(data, &needle) else {
        return Ok(Evaluation::error(ErrorKind::NotApplicable));
    };

    if col_index < 1 || col_index > data.column_count() as i64 {
        return Ok(Evaluation::new(
            Outcome::Error(ErrorKind::InvalidReference),
            vec![CellCoord::vertical(row, 0)],
        ));
    }

    let col = (col_index - 1) as usize;
    let cell = data
        .cell(row, col)
        .ok_or_else(|| VlabError::Dataset(format!("missing cell ({}, {})", row, col)))?;
    Ok(Evaluation::new(
        Outcome::text(cell),
        vec![CellCoord::vertical(row, 0), CellCoord::vertical(row, col)],
    ))
}

fn resolve_hlookup(lookup_value: &str, row_index: i64, book: &Workbook) -> VlabResult<Evaluation> {
    let data = &book.horizontal;
    let needle = effective_lookup_value(lookup_value, book);

    let Some(col) = find_header_column(data, &needle) else {
        return Ok(Evaluation::error(ErrorKind::NotApplicable));
    };

    if row_index < 1 || row_index > data.row_count() as i64 {
        return Ok(Evaluation::new(
            Outcome::Error(ErrorKind::InvalidReference),
            vec![CellCoord::horizontal(0, col)],
        ));
    }

    let row = (row_index - 1) as usize;
    let cell = data
        .cell(row, col)
        .ok_or_else(|| VlabError::Dataset(format!("missing cell ({}, {})", row, col)))?;
    Ok(Evaluation::new(
        Outcome::text(cell),
        vec![CellCoord::horizontal(0, col), CellCoord::horizontal(row, col)],
    ))
}

fn resolve_match(lookup_value: &str, column: ColumnRef, book: &Workbook) -> Evaluation {
    let data = &book.vertical;
    match find_match_row(data, column.index(), lookup_value) {
        Some(row) => Evaluation::new(
            // Header is row 0, so the absolute row index is already the
            // 1-based position among data rows.
            Outcome::number(row as f64),
            vec![CellCoord::vertical(row, column.index())],
        ),
        None => Evaluation::error(ErrorKind::NotApplicable),
    }
}

fn resolve_index(row: i64, col: i64, book: &Workbook) -> Evaluation {
    let data = &book.vertical;
    let in_bounds = row >= 1
        && col >= 1
        && row <= data.row_count() as i64
        && col <= data.column_count() as i64;
    if !in_bounds {
        return Evaluation::error(ErrorKind::InvalidReference);
    }
    let (r, c) = ((row - 1) as usize, (col - 1) as usize);
    match data.cell(r, c) {
        Some(cell) => Evaluation::new(Outcome::text(cell), vec![CellCoord::vertical(r, c)]),
        None => Evaluation::error(ErrorKind::InvalidReference),
    }
}

fn resolve_choose(index: i64, book: &Workbook) -> Evaluation {
    let options = &book.choice;
    if index < 1 || index > options.column_count() as i64 {
        return Evaluation::error(ErrorKind::InvalidValue);
    }
    let col = (index - 1) as usize;
    match options.cell(0, col) {
        Some(cell) => Evaluation::new(Outcome::text(cell), vec![CellCoord::choice(col)]),
        None => Evaluation::error(ErrorKind::InvalidValue),
    }
}

fn resolve_countifs(criteria: &[(ColumnRef, String)], book: &Workbook) -> Evaluation {
    let rows = rows_matching_all(&book.vertical, criteria);
    let consulted = rows
        .iter()
        .flat_map(|&row| {
            criteria
                .iter()
                .map(move |(col, _)| CellCoord::vertical(row, col.index()))
        })
        .collect();
    Evaluation::new(Outcome::number(rows.len() as f64), consulted)
}

fn resolve_sumifs(
    sum_column: ColumnRef,
    criteria: &[(ColumnRef, String)],
    book: &Workbook,
) -> Evaluation {
    let data = &book.vertical;
    let rows = rows_matching_all(data, criteria);
    let mut sum = 0.0;
    let mut consulted = Vec::with_capacity(rows.len());
    for &row in &rows {
        // A non-numeric sum cell contributes NaN and poisons the total;
        // preserved rather than guarded.
        sum += data
            .cell(row, sum_column.index())
            .and_then(|c| c.trim().parse::<f64>().ok())
            .unwrap_or(f64::NAN);
        consulted.push(CellCoord::vertical(row, sum_column.index()));
    }
    Evaluation::new(Outcome::number(sum), consulted)
}

fn resolve_text(
    cell: &CellRef,
    book: &Workbook,
    apply: impl Fn(&str) -> Outcome,
) -> VlabResult<Evaluation> {
    let data = &book.vertical;
    let source = data.cell(cell.row, cell.col).ok_or_else(|| {
        VlabError::InvalidArgument(format!("cell {} outside the table", cell.label()))
    })?;
    Ok(Evaluation::new(
        apply(source),
        vec![CellCoord::vertical(cell.row, cell.col)],
    ))
}

//==============================================================================
// Shared scan primitives (also used by the step-trace generator, so the
// animated and instant paths cannot disagree)
//==============================================================================

/// Complex-mode lookup values of the form `C2`..`C5` address the context
/// table's third column; everything else is a literal.
pub(crate) fn context_address(lookup_value: &str, book: &Workbook) -> Option<(String, String)> {
    let context = book.context.as_ref()?;
    let mut chars = lookup_value.chars();
    let (col, row) = (chars.next()?, chars.next()?);
    if chars.next().is_some() || col != 'C' || !('2'..='5').contains(&row) {
        return None;
    }
    let row_idx = row.to_digit(10)? as usize - 1;
    let value = context.cell(row_idx, 2)?;
    Some((lookup_value.to_string(), value.to_string()))
}

pub(crate) fn effective_lookup_value(lookup_value: &str, book: &Workbook) -> String {
    match context_address(lookup_value, book) {
        Some((_, value)) => value,
        None => lookup_value.to_string(),
    }
}

/// First-column scan over data rows, case-sensitive. Returns the absolute
/// row index.
pub(crate) fn find_vertical_row(data: &crate::data::Dataset, needle: &str) -> Option<usize> {
    data.data_rows()
        .find(|(_, cells)| cells.first().map(String::as_str) == Some(needle))
        .map(|(row, _)| row)
}

/// Header-row scan across columns >= 1, case-sensitive.
pub(crate) fn find_header_column(data: &crate::data::Dataset, needle: &str) -> Option<usize> {
    (1..data.column_count()).find(|&col| data.cell(0, col) == Some(needle))
}

/// Column scan over data rows, case-insensitive. Returns the absolute row
/// index, which doubles as the 1-based data-row position.
pub(crate) fn find_match_row(
    data: &crate::data::Dataset,
    col: usize,
    needle: &str,
) -> Option<usize> {
    let needle = needle.to_lowercase();
    data.data_rows()
        .find(|(_, cells)| {
            cells
                .get(col)
                .is_some_and(|c| c.to_lowercase() == needle)
        })
        .map(|(row, _)| row)
}

/// Absolute row indices of data rows satisfying every criterion pair.
pub(crate) fn rows_matching_all(
    data: &crate::data::Dataset,
    criteria: &[(ColumnRef, String)],
) -> Vec<usize> {
    data.data_rows()
        .filter(|(_, cells)| {
            criteria.iter().all(|(col, criterion)| {
                cells
                    .get(col.index())
                    .is_some_and(|c| criteria::matches(c, criterion))
            })
        })
        .map(|(row, _)| row)
        .collect()
}

//==============================================================================
// Pre-flight validation hints
//==============================================================================

/// Validate an invocation before an animated run, returning a human-readable
/// hint if the inputs cannot produce a useful animation. Mirrors the bounds
/// the resolver enforces, phrased for students.
pub fn preflight(args: &FormulaArgs, book: &Workbook) -> Option<String> {
    match args {
        FormulaArgs::VLookup {
            lookup_value,
            col_index,
            ..
        } => {
            if lookup_value.trim().is_empty() {
                return Some("lookup_value must not be empty".to_string());
            }
            let max = book.vertical.column_count() as i64;
            if *col_index < 1 || *col_index > max {
                return Some(format!(
                    "col_index_num must be between 1 and {}. You entered {}.",
                    max, col_index
                ));
            }
            None
        }
        FormulaArgs::HLookup { row_index, .. } => {
            let max = book.horizontal.row_count() as i64;
            if *row_index < 1 || *row_index > max {
                return Some(format!(
                    "row_index_num must be between 1 and {}. You entered {}.",
                    max, row_index
                ));
            }
            None
        }
        FormulaArgs::Index { row, col } => {
            let (max_row, max_col) = (
                book.vertical.row_count() as i64,
                book.vertical.column_count() as i64,
            );
            if *row < 1 || *row > max_row {
                return Some(format!(
                    "row_num must be between 1 and {}. You entered {}.",
                    max_row, row
                ));
            }
            if *col < 1 || *col > max_col {
                return Some(format!(
                    "col_num must be between 1 and {}. You entered {}.",
                    max_col, col
                ));
            }
            None
        }
        FormulaArgs::Choose { index } => {
            let max = book.choice.column_count() as i64;
            if *index < 1 || *index > max {
                return Some(format!(
                    "index_num must be between 1 and {}. You entered {}.",
                    max, index
                ));
            }
            None
        }
        _ => None,
    }
}

//==============================================================================
// Formula-bar rendering
//==============================================================================

fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn vertical_range(book: &Workbook) -> String {
    let data = &book.vertical;
    let last_col = column_letter(data.column_count().saturating_sub(1));
    if book.row_label_offset > 0 {
        let start = 1 + book.row_label_offset;
        let end = data.row_count() + book.row_label_offset;
        format!("$A${}:${}${}", start, last_col, end)
    } else {
        format!("A1:{}{}", last_col, data.row_count())
    }
}

fn horizontal_range(book: &Workbook) -> String {
    let data = &book.horizontal;
    let last_col = column_letter(data.column_count().saturating_sub(1));
    if book.row_label_offset > 0 {
        let start = 1 + book.row_label_offset;
        let end = data.row_count() + book.row_label_offset;
        format!("$A${}:${}${}", start, last_col, end)
    } else {
        format!("A1:{}{}", last_col, data.row_count())
    }
}

fn lookup_operand(lookup_value: &str, book: &Workbook) -> String {
    if context_address(lookup_value, book).is_some() {
        lookup_value.to_string()
    } else {
        format!("\"{}\"", lookup_value)
    }
}

fn bool_literal(b: bool) -> &'static str {
    if b {
        "TRUE"
    } else {
        "FALSE"
    }
}

fn header_name(book: &Workbook, col: ColumnRef) -> String {
    book.vertical
        .header(col.index())
        .unwrap_or_default()
        .to_string()
}

/// Render the invocation the way the formula bar shows it, regional
/// semicolon separators included.
pub fn formula_text(args: &FormulaArgs, book: &Workbook) -> String {
    match args {
        FormulaArgs::VLookup {
            lookup_value,
            col_index,
            exact,
        } => format!(
            "=VLOOKUP({}; {}; {}; {})",
            lookup_operand(lookup_value, book),
            vertical_range(book),
            col_index,
            bool_literal(*exact)
        ),
        FormulaArgs::HLookup {
            lookup_value,
            row_index,
            exact,
        } => format!(
            "=HLOOKUP({}; {}; {}; {})",
            lookup_operand(lookup_value, book),
            horizontal_range(book),
            row_index,
            bool_literal(*exact)
        ),
        FormulaArgs::Match {
            lookup_value,
            column,
            match_type,
        } => format!(
            "=MATCH(\"{}\"; {}1:{}{}; {})",
            lookup_value,
            column.letter(),
            column.letter(),
            book.vertical.row_count(),
            match_type
        ),
        FormulaArgs::Index { row, col } => {
            format!("=INDEX({}; {}; {})", vertical_range(book), row, col)
        }
        FormulaArgs::Choose { index } => {
            let options: Vec<String> = book
                .choice
                .rows()
                .flat_map(|r| r.iter().map(|c| format!("\"{}\"", c)))
                .collect();
            format!("=CHOOSE({}; {})", index, options.join("; "))
        }
        FormulaArgs::CountIf { column, criterion } => format!(
            "=COUNTIF({}; \"{}\")",
            header_name(book, *column),
            criterion
        ),
        FormulaArgs::SumIf {
            criteria_column,
            criterion,
            sum_column,
        } => format!(
            "=SUMIF({}; \"{}\"; {})",
            header_name(book, *criteria_column),
            criterion,
            header_name(book, *sum_column)
        ),
        FormulaArgs::CountIfs { criteria } => {
            let parts: Vec<String> = criteria
                .iter()
                .map(|(col, c)| format!("{}; \"{}\"", header_name(book, *col), c))
                .collect();
            format!("=COUNTIFS({})", parts.join("; "))
        }
        FormulaArgs::SumIfs {
            sum_column,
            criteria,
        } => {
            let parts: Vec<String> = criteria
                .iter()
                .map(|(col, c)| format!("{}; \"{}\"", header_name(book, *col), c))
                .collect();
            format!(
                "=SUMIFS({}; {})",
                header_name(book, *sum_column),
                parts.join("; ")
            )
        }
        FormulaArgs::Upper { cell } => format!("=UPPER({})", cell.label()),
        FormulaArgs::Lower { cell } => format!("=LOWER({})", cell.label()),
        FormulaArgs::Proper { cell } => format!("=PROPER({})", cell.label()),
        FormulaArgs::Left { cell, count } => format!("=LEFT({}; {})", cell.label(), count),
        FormulaArgs::Right { cell, count } => format!("=RIGHT({}; {})", cell.label(), count),
        FormulaArgs::Mid { cell, start, count } => {
            format!("=MID({}; {}; {})", cell.label(), start, count)
        }
        FormulaArgs::Len { cell } => format!("=LEN({})", cell.label()),
        FormulaArgs::Text { cell, format } => {
            format!("=TEXT({}; \"{}\")", cell.label(), format)
        }
    }
}

//==============================================================================
// Teaching copy
//==============================================================================

/// Per-function teaching copy shown alongside the simulation.
#[derive(Debug, Clone, Copy)]
pub struct FormulaInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub syntax: &'static str,
    pub challenge: &'static str,
}

pub fn info(kind: FormulaKind) -> FormulaInfo {
    match kind {
        FormulaKind::VLookup => FormulaInfo {
            title: "Vertical Lookup",
            description: "Searches down the first column of a table, then takes the value in the same row from a given column.",
            syntax: "=VLOOKUP(lookup_value; table_array; col_index_num; [range_lookup])",
            challenge: "Change col_index_num to 3 and watch the highlight move to the Harga column.",
        },
        FormulaKind::HLookup => FormulaInfo {
            title: "Horizontal Lookup",
            description: "Searches across the first row of a table, then takes the value in the same column from a given row.",
            syntax: "=HLOOKUP(lookup_value; table_array; row_index_num; [range_lookup])",
            challenge: "Change lookup_value to \"Apr\" to look up April's revenue horizontally.",
        },
        FormulaKind::Match => FormulaInfo {
            title: "Match Function",
            description: "Finds the position of a value within a list or range of cells.",
            syntax: "=MATCH(lookup_value; lookup_array; [match_type])",
            challenge: "Point lookup_array at column B and see how the position follows that column's order.",
        },
        FormulaKind::Index => FormulaInfo {
            title: "Index Function",
            description: "Takes the value of a cell addressed by row and column number.",
            syntax: "=INDEX(array; row_num; [column_num])",
            challenge: "Enter row 1, column 2: the result is the header text \"Menu\", because headers are addressable too.",
        },
        FormulaKind::Choose => FormulaInfo {
            title: "Choose Function",
            description: "Picks one value from a list of options by its 1-based index.",
            syntax: "=CHOOSE(index_num; value1; [value2]; ...)",
            challenge: "Change index_num to 3 and the third option, \"Diskon 15%\", is selected.",
        },
        FormulaKind::CountIf => FormulaInfo {
            title: "Countif Function",
            description: "Counts the cells that satisfy a single criterion.",
            syntax: "=COUNTIF(range; criteria)",
            challenge: "Try the criterion \"Minuman\": how often does that category appear?",
        },
        FormulaKind::SumIf => FormulaInfo {
            title: "Sumif Function",
            description: "Sums the values in a range for the rows that satisfy a single criterion.",
            syntax: "=SUMIF(range; criteria; [sum_range])",
            challenge: "Try \"Minuman\" and the total Omzet of all drinks is summed.",
        },
        FormulaKind::CountIfs => FormulaInfo {
            title: "Countifs Function",
            description: "Counts cells that satisfy several criteria at once (criterion 1 AND criterion 2).",
            syntax: "=COUNTIFS(criteria_range1; criteria1; ...)",
            challenge: "Set Kategori \"Makanan\" and Terjual \">20\" to count the best-selling dishes.",
        },
        FormulaKind::SumIfs => FormulaInfo {
            title: "Sumifs Function",
            description: "Sums values for the rows that satisfy several criteria at once.",
            syntax: "=SUMIFS(sum_range; criteria_range1; criteria1; ...)",
            challenge: "Change the Terjual criterion to \">40\": what is the revenue of the top sellers?",
        },
        FormulaKind::Upper => FormulaInfo {
            title: "Upper Function",
            description: "Converts every letter of a text to uppercase.",
            syntax: "=UPPER(text)",
            challenge: "Apply it to B2 and watch each lowercase letter flip to capitals.",
        },
        FormulaKind::Lower => FormulaInfo {
            title: "Lower Function",
            description: "Converts every letter of a text to lowercase.",
            syntax: "=LOWER(text)",
            challenge: "Apply it to B3, a name stored in all capitals.",
        },
        FormulaKind::Proper => FormulaInfo {
            title: "Proper Function",
            description: "Capitalizes the first letter of every word and lowercases the rest.",
            syntax: "=PROPER(text)",
            challenge: "Apply it to B4, a name with mixed capitalization.",
        },
        FormulaKind::Left => FormulaInfo {
            title: "Left Function",
            description: "Takes a number of characters from the start of a text.",
            syntax: "=LEFT(text; num_chars)",
            challenge: "Take the first 4 characters of B2.",
        },
        FormulaKind::Right => FormulaInfo {
            title: "Right Function",
            description: "Takes a number of characters from the end of a text.",
            syntax: "=RIGHT(text; num_chars)",
            challenge: "Take the last 7 characters of B2.",
        },
        FormulaKind::Mid => FormulaInfo {
            title: "Mid Function",
            description: "Takes characters from the middle of a text, starting at a 1-based position.",
            syntax: "=MID(text; start_num; num_chars)",
            challenge: "Start at position 6 of B2 and take 7 characters.",
        },
        FormulaKind::Len => FormulaInfo {
            title: "Len Function",
            description: "Counts the characters in a text, spaces included.",
            syntax: "=LEN(text)",
            challenge: "Compare the lengths of B2 and B4.",
        },
        FormulaKind::Text => FormulaInfo {
            title: "Text Function",
            description: "Formats a number as text: currency, dates from serial numbers, or percentages.",
            syntax: "=TEXT(value; format_text)",
            challenge: "Format D2 with \"Rp #.##0\", then try E2 with \"dd-mm-yyyy\".",
        },
    }
}
