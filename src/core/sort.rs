//! Sort & filter lab engine: per-column value filters followed by a stable
//! multi-level sort, over the same rectangular datasets the formula labs use.

use crate::data::Dataset;
use crate::error::{VlabError, VlabResult};
use std::cmp::Ordering;

/// Sort levels beyond this are a UI lie, not a bigger sort.
pub const MAX_SORT_LEVELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One level of a custom sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortLevel {
    pub column: usize,
    pub direction: SortDirection,
}

/// Keep only rows whose cell in `column` is one of `allowed`. An empty
/// `allowed` list means the filter is inactive (everything shows).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub column: usize,
    pub allowed: Vec<String>,
}

/// Compare two cells the way the lab sorts: numerically when both sides
/// parse as numbers, as strings otherwise.
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// Apply filters, then a stable multi-level sort, returning a new dataset
/// with the header row preserved in place.
pub fn filter_and_sort(
    data: &Dataset,
    filters: &[ColumnFilter],
    levels: &[SortLevel],
) -> VlabResult<Dataset> {
    if levels.len() > MAX_SORT_LEVELS {
        return Err(VlabError::InvalidArgument(format!(
            "at most {} sort levels are supported (got {})",
            MAX_SORT_LEVELS,
            levels.len()
        )));
    }
    let width = data.column_count();
    for level in levels {
        if level.column >= width {
            return Err(VlabError::InvalidArgument(format!(
                "sort column {} outside a {}-column table",
                level.column, width
            )));
        }
    }
    for filter in filters {
        if filter.column >= width {
            return Err(VlabError::InvalidArgument(format!(
                "filter column {} outside a {}-column table",
                filter.column, width
            )));
        }
    }

    let mut rows: Vec<Vec<String>> = data
        .data_rows()
        .filter(|(_, cells)| {
            filters.iter().all(|filter| {
                filter.allowed.is_empty()
                    || filter
                        .allowed
                        .iter()
                        .any(|v| Some(v.as_str()) == cells.get(filter.column).map(String::as_str))
            })
        })
        .map(|(_, cells)| cells.to_vec())
        .collect();

    rows.sort_by(|a, b| {
        for level in levels {
            let ord = compare_cells(&a[level.column], &b[level.column]);
            let ord = match level.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });

    let mut result = Vec::with_capacity(rows.len() + 1);
    if let Some(header) = data.rows().next() {
        result.push(header.to_vec());
    }
    result.extend(rows);
    Dataset::new(result)
}

/// Distinct values of a column over data rows, sorted, for building filter
/// menus.
pub fn unique_values(data: &Dataset, column: usize) -> Vec<String> {
    let mut values: Vec<String> = data
        .data_rows()
        .filter_map(|(_, cells)| cells.get(column).cloned())
        .collect();
    values.sort();
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grades() -> Dataset {
        let rows = [
            ["Nama", "Kelas", "Nilai", "Status"],
            ["Budi", "7B", "85", "Lulus"],
            ["Ani", "7A", "90", "Lulus"],
            ["Dedi", "7B", "70", "Remedial"],
            ["Sari", "7A", "85", "Lulus"],
            ["Rina", "7C", "60", "Remedial"],
        ];
        Dataset::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    fn column(data: &Dataset, col: usize) -> Vec<String> {
        data.data_rows()
            .map(|(_, cells)| cells[col].clone())
            .collect()
    }

    #[test]
    fn numeric_sort_descending() {
        let sorted = filter_and_sort(
            &grades(),
            &[],
            &[SortLevel {
                column: 2,
                direction: SortDirection::Descending,
            }],
        )
        .unwrap();
        assert_eq!(column(&sorted, 2), vec!["90", "85", "85", "70", "60"]);
    }

    #[test]
    fn multi_level_sort_breaks_ties_with_later_levels() {
        let sorted = filter_and_sort(
            &grades(),
            &[],
            &[
                SortLevel {
                    column: 1,
                    direction: SortDirection::Ascending,
                },
                SortLevel {
                    column: 2,
                    direction: SortDirection::Descending,
                },
            ],
        )
        .unwrap();
        // 7A by score desc, then 7B by score desc, then 7C.
        assert_eq!(column(&sorted, 0), vec!["Ani", "Sari", "Budi", "Dedi", "Rina"]);
    }

    #[test]
    fn stable_for_equal_keys() {
        let sorted = filter_and_sort(
            &grades(),
            &[],
            &[SortLevel {
                column: 3,
                direction: SortDirection::Ascending,
            }],
        )
        .unwrap();
        // Original order preserved within "Lulus" and within "Remedial".
        assert_eq!(column(&sorted, 0), vec!["Budi", "Ani", "Sari", "Dedi", "Rina"]);
    }

    #[test]
    fn filters_keep_only_allowed_values() {
        let filtered = filter_and_sort(
            &grades(),
            &[ColumnFilter {
                column: 1,
                allowed: vec!["7A".to_string()],
            }],
            &[],
        )
        .unwrap();
        assert_eq!(column(&filtered, 0), vec!["Ani", "Sari"]);
        // Header row survives filtering.
        assert_eq!(filtered.header(0), Some("Nama"));
    }

    #[test]
    fn empty_filter_list_means_show_all() {
        let filtered = filter_and_sort(
            &grades(),
            &[ColumnFilter {
                column: 3,
                allowed: vec![],
            }],
            &[],
        )
        .unwrap();
        assert_eq!(filtered.row_count(), 6);
    }

    #[test]
    fn too_many_levels_rejected() {
        let level = SortLevel {
            column: 0,
            direction: SortDirection::Ascending,
        };
        let err = filter_and_sort(&grades(), &[], &[level; 4]);
        assert!(err.is_err());
    }

    #[test]
    fn unique_values_sorted_and_deduped() {
        assert_eq!(unique_values(&grades(), 1), vec!["7A", "7B", "7C"]);
        assert_eq!(unique_values(&grades(), 3), vec!["Lulus", "Remedial"]);
    }
}
