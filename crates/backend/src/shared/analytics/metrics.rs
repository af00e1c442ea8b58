//! Raw aggregate rows and their conversion to typed, rounded metrics.
//!
//! Drivers hand back counts and sums as integers, floats, decimals or
//! numeric strings depending on backend and column type. Everything is
//! coerced here, once, and ratios are computed in Rust so a zero
//! denominator is always `0` instead of NULL or a division error.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::QueryResult;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One column value as the driver returned it
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Numeric view; NULL and unparsable text are `0.0`
    pub fn as_f64(&self) -> f64 {
        let value = match self {
            RawValue::Null => 0.0,
            RawValue::Int(v) => *v as f64,
            RawValue::Float(v) => *v,
            RawValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    /// Integer view; fractional values are truncated
    pub fn as_i64(&self) -> i64 {
        match self {
            RawValue::Int(v) => *v,
            RawValue::Text(s) => s
                .trim()
                .parse::<i64>()
                .unwrap_or_else(|_| self.as_f64().trunc() as i64),
            _ => self.as_f64().trunc() as i64,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Null => None,
            RawValue::Int(v) => Some(v.to_string()),
            RawValue::Float(v) => Some(v.to_string()),
            RawValue::Text(s) => Some(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(RawValue::Null)
    }
}

/// One result row keyed by column alias
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    values: BTreeMap<String, RawValue>,
}

static NULL: RawValue = RawValue::Null;

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<RawValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: impl Into<RawValue>) {
        self.values.insert(column.to_string(), value.into());
    }

    /// Missing columns read as NULL
    pub fn get(&self, column: &str) -> &RawValue {
        self.values.get(column).unwrap_or(&NULL)
    }

    /// Read the listed columns out of a driver row
    pub fn from_query_result(row: &QueryResult, columns: &[&str]) -> Self {
        let mut raw = RawRow::new();
        for column in columns {
            raw.insert(column, read_value(row, column));
        }
        raw
    }
}

fn read_value(row: &QueryResult, column: &str) -> RawValue {
    if let Ok(v) = row.try_get::<Option<i64>>("", column) {
        return v.into();
    }
    if let Ok(v) = row.try_get::<Option<f64>>("", column) {
        return v.into();
    }
    // MySQL SUM over integer/decimal columns
    if let Ok(v) = row.try_get::<Option<Decimal>>("", column) {
        return v.and_then(|d| d.to_f64()).into();
    }
    if let Ok(v) = row.try_get::<Option<String>>("", column) {
        return v.into();
    }
    RawValue::Null
}

/// How one output field is computed from raw columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Derivation {
    /// Integer, NULL is 0
    Int(&'static str),
    /// Float rounded to `decimals`, NULL is 0
    Float(&'static str, u32),
    /// Integer that stays absent when NULL
    OptionalInt(&'static str),
    /// Float that stays absent when NULL
    OptionalFloat(&'static str, u32),
    Text(&'static str),
    /// `100 * numerator / denominator`
    Percent {
        numerator: &'static str,
        denominator: &'static str,
        decimals: u32,
    },
    /// `sum / count`
    Average {
        sum: &'static str,
        count: &'static str,
        decimals: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub derivation: Derivation,
}

impl FieldSpec {
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            derivation: Derivation::Int(name),
        }
    }

    /// Currency amount, two decimals
    pub const fn money(name: &'static str) -> Self {
        Self {
            name,
            derivation: Derivation::Float(name, 2),
        }
    }

    pub const fn optional_int(name: &'static str) -> Self {
        Self {
            name,
            derivation: Derivation::OptionalInt(name),
        }
    }

    pub const fn optional_money(name: &'static str) -> Self {
        Self {
            name,
            derivation: Derivation::OptionalFloat(name, 2),
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            derivation: Derivation::Text(name),
        }
    }

    pub const fn percent(
        name: &'static str,
        numerator: &'static str,
        denominator: &'static str,
        decimals: u32,
    ) -> Self {
        Self {
            name,
            derivation: Derivation::Percent {
                numerator,
                denominator,
                decimals,
            },
        }
    }

    pub const fn average(
        name: &'static str,
        sum: &'static str,
        count: &'static str,
        decimals: u32,
    ) -> Self {
        Self {
            name,
            derivation: Derivation::Average {
                sum,
                count,
                decimals,
            },
        }
    }

    fn columns(&self) -> Vec<&'static str> {
        match self.derivation {
            Derivation::Int(c)
            | Derivation::Float(c, _)
            | Derivation::OptionalInt(c)
            | Derivation::OptionalFloat(c, _)
            | Derivation::Text(c) => vec![c],
            Derivation::Percent {
                numerator,
                denominator,
                ..
            } => vec![numerator, denominator],
            Derivation::Average { sum, count, .. } => vec![sum, count],
        }
    }

    fn derive(&self, raw: &RawRow) -> MetricValue {
        match self.derivation {
            Derivation::Int(c) => MetricValue::Int(raw.get(c).as_i64()),
            Derivation::Float(c, dp) => MetricValue::Float(round_to(raw.get(c).as_f64(), dp)),
            Derivation::OptionalInt(c) => match raw.get(c) {
                RawValue::Null => MetricValue::Null,
                v => MetricValue::Int(v.as_i64()),
            },
            Derivation::OptionalFloat(c, dp) => match raw.get(c) {
                RawValue::Null => MetricValue::Null,
                v => MetricValue::Float(round_to(v.as_f64(), dp)),
            },
            Derivation::Text(c) => match raw.get(c).as_text() {
                Some(text) => MetricValue::Text(text),
                None => MetricValue::Null,
            },
            Derivation::Percent {
                numerator,
                denominator,
                decimals,
            } => MetricValue::Float(percentage(
                raw.get(numerator).as_f64(),
                raw.get(denominator).as_f64(),
                decimals,
            )),
            Derivation::Average {
                sum,
                count,
                decimals,
            } => MetricValue::Float(round_to(
                safe_ratio(raw.get(sum).as_f64(), raw.get(count).as_f64()),
                decimals,
            )),
        }
    }
}

/// Ordered list of output fields for one metric family
#[derive(Debug, Clone, Copy)]
pub struct DerivationSpec {
    fields: &'static [FieldSpec],
}

impl DerivationSpec {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Every raw column the table reads, first occurrence order
    pub fn raw_columns(&self) -> Vec<&'static str> {
        let mut columns: Vec<&'static str> = Vec::new();
        for column in self.fields.iter().flat_map(FieldSpec::columns) {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }

    pub fn derive(&self, raw: &RawRow) -> TypedMetrics {
        TypedMetrics {
            values: self
                .fields
                .iter()
                .map(|field| (field.name, field.derive(raw)))
                .collect(),
        }
    }

    pub fn derive_all(&self, rows: &[RawRow]) -> Vec<TypedMetrics> {
        rows.iter().map(|row| self.derive(row)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Null => serializer.serialize_none(),
            MetricValue::Int(v) => serializer.serialize_i64(*v),
            MetricValue::Float(v) => serializer.serialize_f64(*v),
            MetricValue::Text(v) => serializer.serialize_str(v),
        }
    }
}

/// Derived metrics of one row, in table field order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypedMetrics {
    values: Vec<(&'static str, MetricValue)>,
}

impl TypedMetrics {
    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn int(&self, name: &str) -> i64 {
        self.opt_int(name).unwrap_or(0)
    }

    pub fn float(&self, name: &str) -> f64 {
        self.opt_float(name).unwrap_or(0.0)
    }

    pub fn opt_int(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(MetricValue::Int(v)) => Some(*v),
            Some(MetricValue::Float(v)) => Some(v.trunc() as i64),
            _ => None,
        }
    }

    pub fn opt_float(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(MetricValue::Float(v)) => Some(*v),
            Some(MetricValue::Int(v)) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<String> {
        match self.get(name) {
            Some(MetricValue::Text(v)) => Some(v.clone()),
            Some(MetricValue::Int(v)) => Some(v.to_string()),
            _ => None,
        }
    }
}

impl Serialize for TypedMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// `numerator / denominator`, or `0` when the denominator is zero
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn percentage(numerator: f64, denominator: f64, decimals: u32) -> f64 {
    round_to(safe_ratio(numerator, denominator) * 100.0, decimals)
}

/// Round half away from zero. Non-finite input becomes `0`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // no "-0.0" in responses
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
