//! Aggregation of grouped rows.

use std::fmt;
use std::sync::Arc;

use crate::value::CellValue;

/// Custom aggregation over the member values of a group.
pub type CustomAggregation = Arc<dyn Fn(&[CellValue]) -> CellValue + Send + Sync>;

/// How a column summarizes the members of a grouped row.
#[derive(Clone)]
pub enum Aggregation {
    /// Number of members.
    Count,
    /// Sum of numeric members; non-numeric members are skipped.
    Sum,
    /// Smallest member.
    Min,
    /// Largest member.
    Max,
    /// Arithmetic mean of numeric members.
    Mean,
    /// Number of distinct member values.
    UniqueCount,
    /// Caller-supplied aggregation.
    Custom(CustomAggregation),
}

impl fmt::Debug for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Aggregation::Count => "Count",
            Aggregation::Sum => "Sum",
            Aggregation::Min => "Min",
            Aggregation::Max => "Max",
            Aggregation::Mean => "Mean",
            Aggregation::UniqueCount => "UniqueCount",
            Aggregation::Custom(_) => "Custom",
        };
        f.write_str(name)
    }
}

impl Aggregation {
    /// Aggregate the member values of one group.
    pub fn apply(&self, values: &[CellValue]) -> CellValue {
        match self {
            Aggregation::Count => CellValue::Int(values.len() as i64),
            Aggregation::Sum => sum(values),
            Aggregation::Min => values
                .iter()
                .filter(|v| !v.is_null())
                .min_by(|a, b| a.total_cmp(b))
                .cloned()
                .unwrap_or_default(),
            Aggregation::Max => values
                .iter()
                .filter(|v| !v.is_null())
                .max_by(|a, b| a.total_cmp(b))
                .cloned()
                .unwrap_or_default(),
            Aggregation::Mean => {
                let nums: Vec<f64> = values.iter().filter_map(CellValue::as_f64).collect();
                if nums.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::Float(nums.iter().sum::<f64>() / nums.len() as f64)
                }
            }
            Aggregation::UniqueCount => {
                let mut seen: Vec<&CellValue> = Vec::new();
                for v in values {
                    if !seen.iter().any(|s| *s == v) {
                        seen.push(v);
                    }
                }
                CellValue::Int(seen.len() as i64)
            }
            Aggregation::Custom(f) => f(values),
        }
    }
}

fn sum(values: &[CellValue]) -> CellValue {
    let all_int = values
        .iter()
        .all(|v| matches!(v, CellValue::Int(_) | CellValue::Null));
    if all_int {
        let total = values
            .iter()
            .filter_map(|v| match v {
                CellValue::Int(i) => Some(*i),
                _ => None,
            })
            .fold(0i64, i64::saturating_add);
        CellValue::Int(total)
    } else {
        CellValue::Float(values.iter().filter_map(CellValue::as_f64).sum())
    }
}
