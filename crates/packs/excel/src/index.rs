//! Row and column index lists such as `0,2,5:8`.

use std::collections::BTreeSet;

use crate::error::ExcelError;

fn parse_int(token: &str) -> Result<i64, ExcelError> {
    token
        .trim()
        .parse()
        .map_err(|_| ExcelError::InvalidIndex(token.trim().to_owned()))
}

/// Largest zero-based row index of an `.xlsx` sheet.
pub const MAX_ROW_INDEX: i64 = 1_048_575;
/// Largest zero-based column index of an `.xlsx` sheet.
pub const MAX_COLUMN_INDEX: i64 = 16_383;

/// Members of `from..=to` that fall inside `lo..=hi`.
///
/// A negative `from` is kept as the first member so that validation still
/// rejects it.
fn clamped_range(from: i64, to: i64, lo: i64, hi: i64) -> impl Iterator<Item = i64> {
    let negative = (from < 0 && from <= to).then_some(from);
    negative
        .into_iter()
        .chain(from.max(lo).max(0)..=to.min(hi))
}

/// Parse a comma separated list of indexes and `a:b` ranges.
///
/// Range members outside `first..=last` are left out, since validation drops
/// them anyway. Range members already in the list are not repeated. Tokens
/// with more than one `:` are ignored.
pub fn parse_index_list(index: &str, first: u32, last: u32) -> Result<Vec<i64>, ExcelError> {
    let mut out = Vec::new();
    let mut seen = BTreeSet::new();
    for token in index.split(',') {
        let parts: Vec<&str> = token.trim().split(':').collect();
        match parts.as_slice() {
            [single] => {
                let i = parse_int(single)?;
                seen.insert(i);
                out.push(i);
            }
            [from, to] => {
                let range = clamped_range(
                    parse_int(from)?,
                    parse_int(to)?,
                    i64::from(first),
                    i64::from(last),
                );
                for i in range {
                    if seen.insert(i) {
                        out.push(i);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Keep the indexes inside `first..=last`.
///
/// A negative index is an input error rather than an out-of-range value.
pub fn validate_index(
    list: &[i64],
    first: u32,
    last: u32,
    is_row: bool,
) -> Result<Vec<u32>, ExcelError> {
    let mut out = Vec::with_capacity(list.len());
    for &i in list {
        let Ok(index) = u32::try_from(i) else {
            return Err(negative_index(is_row));
        };
        if (first..=last).contains(&index) {
            out.push(index);
        }
    }
    Ok(out)
}

pub(crate) fn negative_index(is_row: bool) -> ExcelError {
    ExcelError::Operation(if is_row {
        "The rowIndex input is not valid. The valid row index must be equal or greater than 0."
            .to_owned()
    } else {
        "The columnIndex input is not valid. The valid column index must be equal or greater than 0."
            .to_owned()
    })
}

/// Target positions for data written by add-data.
///
/// Without an explicit list, rows are appended after the last row of the
/// sheet and columns start at `0`. With a header, row positions move down by
/// one unless data is already being appended below existing rows.
pub fn data_index_list(
    index: &str,
    last_row: u32,
    data_rows: usize,
    data_columns: usize,
    is_row: bool,
    has_header: bool,
) -> Result<Vec<u32>, ExcelError> {
    let offset: i64 = if is_row && has_header { 1 } else { 0 };
    let (start, count) = if is_row {
        let start = if last_row > 0 { last_row + 1 } else { 0 };
        (i64::from(start), data_rows)
    } else {
        (0, data_columns)
    };

    let list: Vec<i64> = if index.trim().is_empty() {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        (start..start.saturating_add(count))
            .map(|i| if start == 0 { i + offset } else { i })
            .collect()
    } else {
        let mut out = Vec::new();
        for token in index.split(',') {
            match token.trim().split_once(':') {
                Some((from, to)) => {
                    let max = if is_row { MAX_ROW_INDEX } else { MAX_COLUMN_INDEX };
                    let range = clamped_range(parse_int(from)?, parse_int(to)?, 0, max);
                    out.extend(range.map(|i| i + offset));
                }
                None => out.push(parse_int(token)? + offset),
            }
        }
        out
    };

    list.into_iter()
        .map(|i| u32::try_from(i).map_err(|_| negative_index(is_row)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_singles_and_ranges() {
        assert_eq!(parse_index_list("0,2,5:7", 0, 10).unwrap(), vec![0, 2, 5, 6, 7]);
        assert_eq!(parse_index_list(" 3 , 1:3 ", 0, 10).unwrap(), vec![3, 1, 2]);
        assert_eq!(parse_index_list("1:2:3,4", 0, 10).unwrap(), vec![4]);
        assert_eq!(parse_index_list("4:2", 0, 10).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn rejects_non_numeric() {
        let err = parse_index_list("1,x", 0, 10).unwrap_err();
        assert_eq!(err.to_string(), "The index value 'x' is not a valid integer.");
        assert!(parse_index_list("1,,2", 0, 10).is_err());
    }

    #[test]
    fn ranges_are_clamped_to_bounds() {
        assert_eq!(parse_index_list("0:9,20", 3, 5).unwrap(), vec![3, 4, 5, 20]);
        let whole_sheet = parse_index_list("0:1048575", 0, 10).unwrap();
        assert_eq!(whole_sheet.len(), 11);
        let all = parse_index_list("0:1048575,0:1048575", 0, 1_048_575).unwrap();
        assert_eq!(all.len(), 1_048_576);
    }

    #[test]
    fn negative_range_start_still_fails_validation() {
        let list = parse_index_list("-2:3", 0, 5).unwrap();
        assert_eq!(list[0], -2);
        assert!(validate_index(&list, 0, 5, true).is_err());
    }

    #[test]
    fn data_ranges_are_clamped_to_sheet_limits() {
        let cols = data_index_list("0:4000000", 0, 1, 1, false, false).unwrap();
        assert_eq!(cols.len(), 16_384);
        assert!(data_index_list("-1:2", 0, 1, 1, true, false).is_err());
    }

    #[test]
    fn validate_filters_out_of_range() {
        assert_eq!(validate_index(&[0, 3, 9], 0, 5, true).unwrap(), vec![0, 3]);
        let err = validate_index(&[-1], 0, 5, false).unwrap_err();
        assert!(err.to_string().starts_with("The columnIndex input is not valid."));
    }

    #[test]
    fn default_rows_on_empty_sheet_with_header() {
        let rows = data_index_list("", 0, 3, 2, true, true).unwrap();
        assert_eq!(rows, vec![1, 2, 3]);
        let rows = data_index_list("", 0, 3, 2, true, false).unwrap();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn default_rows_append_after_last_row() {
        let rows = data_index_list("", 4, 2, 2, true, true).unwrap();
        assert_eq!(rows, vec![5, 6]);
    }

    #[test]
    fn default_columns_start_at_zero() {
        let cols = data_index_list("", 4, 2, 3, false, true).unwrap();
        assert_eq!(cols, vec![0, 1, 2]);
    }

    #[test]
    fn explicit_rows_shift_for_header() {
        let rows = data_index_list("0,2:3", 10, 3, 1, true, true).unwrap();
        assert_eq!(rows, vec![1, 3, 4]);
        let cols = data_index_list("1,3", 10, 3, 2, false, true).unwrap();
        assert_eq!(cols, vec![1, 3]);
    }
}
