//! Tagged attribute values and premise operators

use serde::{Deserialize, Serialize};

/// Attribute kind, declared once per column of the schema.
///
/// Discrete attributes are consumed by a split and branch per observed
/// value; continuous attributes split on a threshold and may split again
/// further down the same path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrKind {
    Discrete,
    Continuous,
}

/// A single cell of a data row
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Discrete(i64),
    Continuous(f64),
}

impl Value {
    /// Numeric view used by ordered comparisons
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Discrete(v) => v as f64,
            Value::Continuous(v) => v,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Discrete(v) => write!(f, "{v}"),
            Value::Continuous(v) => write!(f, "{v}"),
        }
    }
}

/// Three-valued premise operator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// `row value >= premise value` (continuous branches)
    Ge,
    /// `row value < premise value` (continuous branches)
    Lt,
    /// `row value = premise value` (discrete branches)
    Eq,
}

impl Op {
    /// Evaluate `lhs op rhs`
    pub fn holds(self, lhs: Value, rhs: Value) -> bool {
        match self {
            Op::Ge => lhs.as_f64() >= rhs.as_f64(),
            Op::Lt => lhs.as_f64() < rhs.as_f64(),
            Op::Eq => lhs == rhs,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Op::Ge => ">=",
            Op::Lt => "<",
            Op::Eq => "=",
        };
        f.write_str(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_view() {
        assert_eq!(Value::Discrete(3).as_f64(), 3.0);
        assert_eq!(Value::Continuous(2.5).as_f64(), 2.5);
    }

    #[test]
    fn test_ordered_operators_compare_numerically() {
        assert!(Op::Ge.holds(Value::Continuous(2.5), Value::Discrete(2)));
        assert!(!Op::Ge.holds(Value::Discrete(1), Value::Continuous(1.5)));
        assert!(Op::Lt.holds(Value::Discrete(1), Value::Continuous(1.5)));
        assert!(!Op::Lt.holds(Value::Continuous(1.5), Value::Continuous(1.5)));
    }

    #[test]
    fn test_equality_respects_tags() {
        assert!(Op::Eq.holds(Value::Discrete(4), Value::Discrete(4)));
        assert!(!Op::Eq.holds(Value::Discrete(4), Value::Discrete(5)));
        // Same number, different tag: not equal
        assert!(!Op::Eq.holds(Value::Discrete(4), Value::Continuous(4.0)));
    }

    #[test]
    fn test_display_symbols() {
        assert_eq!(Op::Ge.to_string(), ">=");
        assert_eq!(Op::Lt.to_string(), "<");
        assert_eq!(Op::Eq.to_string(), "=");
    }
}
