//! Typed comparison of cell values against a query value.

use crate::format::{parse_number, parse_time_fraction, parse_ymd_serial};
use crate::workbook::{Cell, CellValue};

/// Comparison operators accepted by the row query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    pub const VALUES: &'static [&'static str] = &["==", "!=", "<", ">", "<=", ">="];

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            ">" => Some(Self::Gt),
            "<=" => Some(Self::Le),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }

    #[allow(clippy::float_cmp)]
    fn compare_numbers(self, left: f64, right: f64) -> bool {
        match self {
            Self::Eq => left == right,
            Self::Ne => left != right,
            Self::Lt => left < right,
            Self::Gt => left > right,
            Self::Le => left <= right,
            Self::Ge => left >= right,
        }
    }
}

/// A value classified for comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Date(f64),
    Time(f64),
    Text(String),
}

impl Operand {
    /// Classify query text: number, percentage, `YYYY/MM/DD` date,
    /// `HH:MM[:SS]` time, `date time` pair, or plain text.
    pub fn from_query(value: &str) -> Self {
        if let Some(n) = parse_number(value) {
            return Self::Number(n);
        }
        if value.contains('%') {
            let mut parts: Vec<&str> = value.split('%').collect();
            while parts.last().is_some_and(|p| p.is_empty()) {
                parts.pop();
            }
            if let [number] = parts.as_slice() {
                if let Some(n) = parse_number(number) {
                    return Self::Number(n / 100.0);
                }
            }
        }
        if let Some(serial) = parse_ymd_serial(value) {
            return Self::Date(serial);
        }
        if let Some(fraction) = parse_time_fraction(value) {
            return Self::Time(fraction);
        }
        let parts: Vec<&str> = value.trim().split(' ').collect();
        if let [date, time] = parts.as_slice() {
            if let (Some(serial), Some(fraction)) =
                (parse_ymd_serial(date), parse_time_fraction(time))
            {
                return Self::Date(serial + fraction);
            }
        }
        Self::Text(value.to_owned())
    }

    /// Classify a cell, using the cached result of formula cells.
    ///
    /// Error cells have no comparable value.
    pub fn from_cell(cell: Option<&Cell>) -> Option<Self> {
        let Some(cell) = cell else {
            return Some(Self::Text(String::new()));
        };
        Some(match &cell.value {
            CellValue::Error(_) => return None,
            CellValue::Number(n) => Self::Number(*n),
            CellValue::Date(serial) if *serial < 1.0 => Self::Time(*serial),
            CellValue::Date(serial) => Self::Date(*serial),
            CellValue::Text(s) => Self::Text(s.clone()),
            CellValue::Bool(b) => Self::Text(if *b { "TRUE" } else { "FALSE" }.to_owned()),
            CellValue::Empty => Self::Text(String::new()),
        })
    }

    fn numeric(&self) -> Option<f64> {
        match self {
            Self::Number(n) | Self::Date(n) | Self::Time(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    fn same_class(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Whether a cell operand satisfies `cell <op> query`.
///
/// Text only supports `==` and `!=`. Operands of different kinds only match
/// under `!=`.
pub fn matches(cell: &Operand, op: Operator, query: &Operand) -> bool {
    if !cell.same_class(query) {
        return op == Operator::Ne;
    }
    match (cell, query) {
        (Operand::Text(left), Operand::Text(right)) => match op {
            Operator::Eq => left == right,
            Operator::Ne => left != right,
            _ => false,
        },
        _ => match (cell.numeric(), query.numeric()) {
            (Some(left), Some(right)) => op.compare_numbers(left, right),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_query_values() {
        assert_eq!(Operand::from_query("12.5"), Operand::Number(12.5));
        assert_eq!(Operand::from_query("50%"), Operand::Number(0.5));
        assert!(matches!(Operand::from_query("2021/03/05"), Operand::Date(_)));
        assert_eq!(Operand::from_query("12:00"), Operand::Time(0.5));
        assert!(matches!(
            Operand::from_query("2021/03/05 12:00"),
            Operand::Date(d) if (d - 44_260.5).abs() < 1e-9
        ));
        assert_eq!(Operand::from_query("apple"), Operand::Text("apple".into()));
        assert_eq!(Operand::from_query("5%0"), Operand::Text("5%0".into()));
        assert_eq!(Operand::from_query("%50"), Operand::Text("%50".into()));
    }

    #[test]
    fn classifies_cells() {
        let number = Cell::new(CellValue::Number(3.0));
        assert_eq!(Operand::from_cell(Some(&number)), Some(Operand::Number(3.0)));
        let time = Cell::new(CellValue::Date(0.25));
        assert_eq!(Operand::from_cell(Some(&time)), Some(Operand::Time(0.25)));
        let flag = Cell::new(CellValue::Bool(true));
        assert_eq!(
            Operand::from_cell(Some(&flag)),
            Some(Operand::Text("TRUE".into()))
        );
        let error = Cell::new(CellValue::Error("#N/A".into()));
        assert_eq!(Operand::from_cell(Some(&error)), None);
        assert_eq!(Operand::from_cell(None), Some(Operand::Text(String::new())));
    }

    #[test]
    fn numeric_comparisons() {
        let cell = Operand::Number(10.0);
        let query = Operand::Number(5.0);
        assert!(matches(&cell, Operator::Gt, &query));
        assert!(matches(&cell, Operator::Ge, &query));
        assert!(!matches(&cell, Operator::Lt, &query));
        assert!(matches(&cell, Operator::Ne, &query));
        assert!(matches(&cell, Operator::Eq, &Operand::Number(10.0)));
    }

    #[test]
    fn text_only_supports_equality() {
        let cell = Operand::Text("b".into());
        let query = Operand::Text("a".into());
        assert!(matches(&cell, Operator::Ne, &query));
        assert!(!matches(&cell, Operator::Gt, &query));
        assert!(matches(&cell, Operator::Eq, &Operand::Text("b".into())));
    }

    #[test]
    fn mixed_kinds_only_match_not_equal() {
        let cell = Operand::Text("5".into());
        let query = Operand::Number(5.0);
        assert!(matches(&cell, Operator::Ne, &query));
        assert!(!matches(&cell, Operator::Eq, &query));
        assert!(!matches(&Operand::Date(44_000.0), Operator::Gt, &query));
    }

    #[test]
    fn parses_operators() {
        assert_eq!(Operator::parse(">="), Some(Operator::Ge));
        assert_eq!(Operator::parse("=>"), None);
    }
}
