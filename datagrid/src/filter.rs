//! Column filter functions.
//!
//! A column filter is a `(FilterFn, FilterValue)` pair: the function is
//! declared on the column, the value lives in the view state. Filters are
//! prepared once per derivation so regex patterns and fuzzy patterns are
//! not rebuilt for every row.

use std::fmt;
use std::sync::Arc;

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::value::CellValue;

/// Custom filter predicate.
pub type CustomFilter = Arc<dyn Fn(&CellValue, &FilterValue) -> bool + Send + Sync>;

/// The value a column is currently filtered by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    /// Free text (substring, fuzzy, regex).
    Text(String),
    /// A single exact value.
    Value(CellValue),
    /// A set of accepted values.
    List(Vec<CellValue>),
    /// Inclusive numeric range; either end may be open.
    Range(Option<f64>, Option<f64>),
}

impl FilterValue {
    /// Empty filter values are skipped by the pipeline.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.trim().is_empty(),
            FilterValue::Value(v) => v.is_null(),
            FilterValue::List(items) => items.is_empty(),
            FilterValue::Range(min, max) => min.is_none() && max.is_none(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

/// How a column interprets its filter value.
#[derive(Clone, Default)]
pub enum FilterFn {
    /// Case-insensitive substring match on the stringified cell.
    #[default]
    IncludesString,
    /// Case-sensitive substring match.
    IncludesStringSensitive,
    /// Case-insensitive whole-string equality.
    EqualsString,
    /// Exact value equality.
    Equals,
    /// Cell equals one of the listed values; list cells match if any
    /// element is listed.
    InList,
    /// Numeric cell within an inclusive range.
    InRange,
    /// Fuzzy match on the stringified cell.
    Fuzzy,
    /// Regular expression on the stringified cell (case-insensitive).
    Regex,
    /// Caller-supplied predicate.
    Custom(CustomFilter),
}

impl fmt::Debug for FilterFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterFn::IncludesString => "IncludesString",
            FilterFn::IncludesStringSensitive => "IncludesStringSensitive",
            FilterFn::EqualsString => "EqualsString",
            FilterFn::Equals => "Equals",
            FilterFn::InList => "InList",
            FilterFn::InRange => "InRange",
            FilterFn::Fuzzy => "Fuzzy",
            FilterFn::Regex => "Regex",
            FilterFn::Custom(_) => "Custom",
        };
        f.write_str(name)
    }
}

/// A filter ready to be applied to many rows.
pub(crate) enum PreparedFilter {
    Includes { needle: String, sensitive: bool },
    EqualsString(String),
    Equals(CellValue),
    InList(Vec<CellValue>),
    InRange(Option<f64>, Option<f64>),
    Fuzzy(Pattern),
    Regex(Regex),
    Custom(CustomFilter, FilterValue),
    /// Filter that cannot match (bad pattern, mismatched value kind).
    Never,
}

impl PreparedFilter {
    /// Build the prepared form of `value` for `filter_fn`.
    pub(crate) fn prepare(column: &str, filter_fn: &FilterFn, value: &FilterValue) -> Self {
        match (filter_fn, value) {
            (FilterFn::Custom(f), v) => PreparedFilter::Custom(f.clone(), v.clone()),
            (FilterFn::IncludesString, v) => PreparedFilter::Includes {
                needle: text_of(v).to_lowercase(),
                sensitive: false,
            },
            (FilterFn::IncludesStringSensitive, v) => PreparedFilter::Includes {
                needle: text_of(v),
                sensitive: true,
            },
            (FilterFn::EqualsString, v) => PreparedFilter::EqualsString(text_of(v).to_lowercase()),
            (FilterFn::Equals, FilterValue::Value(v)) => PreparedFilter::Equals(v.clone()),
            (FilterFn::Equals, FilterValue::Text(s)) => {
                PreparedFilter::Equals(CellValue::Text(s.clone()))
            }
            (FilterFn::InList, FilterValue::List(items)) => PreparedFilter::InList(items.clone()),
            (FilterFn::InList, FilterValue::Value(v)) => PreparedFilter::InList(vec![v.clone()]),
            (FilterFn::InRange, FilterValue::Range(min, max)) => {
                PreparedFilter::InRange(*min, *max)
            }
            (FilterFn::Fuzzy, v) => PreparedFilter::Fuzzy(Pattern::new(
                &text_of(v),
                CaseMatching::Ignore,
                Normalization::Smart,
                AtomKind::Fuzzy,
            )),
            (FilterFn::Regex, v) => {
                match RegexBuilder::new(&text_of(v)).case_insensitive(true).build() {
                    Ok(re) => PreparedFilter::Regex(re),
                    Err(e) => {
                        log::warn!("Invalid regex filter on column '{}': {}", column, e);
                        PreparedFilter::Never
                    }
                }
            }
            (f, v) => {
                log::warn!(
                    "Filter value {:?} is not usable with {:?} on column '{}'",
                    v,
                    f,
                    column
                );
                PreparedFilter::Never
            }
        }
    }

    /// Test a cell against this filter.
    pub(crate) fn matches(&self, cell: &CellValue, matcher: &mut Matcher) -> bool {
        match self {
            PreparedFilter::Includes { needle, sensitive } => {
                let hay = cell.to_string();
                if *sensitive {
                    hay.contains(needle.as_str())
                } else {
                    hay.to_lowercase().contains(needle.as_str())
                }
            }
            PreparedFilter::EqualsString(s) => cell.to_string().to_lowercase() == *s,
            PreparedFilter::Equals(v) => values_equal(cell, v),
            PreparedFilter::InList(items) => match cell {
                CellValue::List(cells) => cells
                    .iter()
                    .any(|c| items.iter().any(|i| values_equal(c, i))),
                c => items.iter().any(|i| values_equal(c, i)),
            },
            PreparedFilter::InRange(min, max) => match cell.as_f64() {
                Some(n) => min.is_none_or(|m| n >= m) && max.is_none_or(|m| n <= m),
                None => false,
            },
            PreparedFilter::Fuzzy(pattern) => {
                let hay = cell.to_string();
                let mut buf = Vec::new();
                pattern.score(Utf32Str::new(&hay, &mut buf), matcher).is_some()
            }
            PreparedFilter::Regex(re) => re.is_match(&cell.to_string()),
            PreparedFilter::Custom(f, value) => f(cell, value),
            PreparedFilter::Never => false,
        }
    }
}

/// Matcher shared by every fuzzy filter in one derivation.
pub(crate) fn new_matcher() -> Matcher {
    Matcher::new(Config::DEFAULT)
}

/// Case-insensitive substring test used by the global filter.
pub(crate) fn contains_folded(cell: &CellValue, needle_lower: &str) -> bool {
    cell.to_string().to_lowercase().contains(needle_lower)
}

fn values_equal(a: &CellValue, b: &CellValue) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn text_of(value: &FilterValue) -> String {
    match value {
        FilterValue::Text(s) => s.clone(),
        FilterValue::Value(v) => v.to_string(),
        FilterValue::List(items) => CellValue::List(items.clone()).to_string(),
        FilterValue::Range(min, max) => format!(
            "{}..{}",
            min.map(|m| m.to_string()).unwrap_or_default(),
            max.map(|m| m.to_string()).unwrap_or_default()
        ),
    }
}
