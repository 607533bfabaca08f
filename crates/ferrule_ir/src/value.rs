//! Constant values carried by literal expressions.
//!
//! [`Value`] is the runtime representation of a Java constant. Every
//! primitive is stored at its exact width so that a literal of type `byte`
//! cannot hold an out-of-range number.

use crate::java_fmt;
use crate::types::{PrimitiveType, Type};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A compile-time constant value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// The `null` reference.
    Null,
    /// A `boolean` constant.
    Bool(bool),
    /// A `char` constant, one UTF-16 code unit.
    Char(u16),
    /// A `byte` constant.
    Byte(i8),
    /// A `short` constant.
    Short(i16),
    /// An `int` constant.
    Int(i32),
    /// A `long` constant.
    Long(i64),
    /// A `float` constant.
    Float(f32),
    /// A `double` constant.
    Double(f64),
    /// A `String` constant.
    String(String),
}

impl Value {
    /// Returns the type a literal of this value has when written in source.
    pub fn natural_type(&self) -> Type {
        match self {
            Value::Null => Type::Null,
            Value::String(_) => Type::String,
            other => match other.primitive_type() {
                Some(p) => Type::Primitive(p),
                None => Type::Object,
            },
        }
    }

    /// Returns the primitive kind of this value, `None` for `null` and strings.
    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        Some(match self {
            Value::Bool(_) => PrimitiveType::Boolean,
            Value::Char(_) => PrimitiveType::Char,
            Value::Byte(_) => PrimitiveType::Byte,
            Value::Short(_) => PrimitiveType::Short,
            Value::Int(_) => PrimitiveType::Int,
            Value::Long(_) => PrimitiveType::Long,
            Value::Float(_) => PrimitiveType::Float,
            Value::Double(_) => PrimitiveType::Double,
            Value::Null | Value::String(_) => return None,
        })
    }

    /// Returns the value of an integral constant (including `char`) widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Char(c) => Some(i64::from(c)),
            Value::Byte(b) => Some(i64::from(b)),
            Value::Short(s) => Some(i64::from(s)),
            Value::Int(i) => Some(i64::from(i)),
            Value::Long(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the value of any numeric constant widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(f) => Some(f64::from(f)),
            Value::Double(d) => Some(d),
            _ => self.as_i64().map(|i| i as f64),
        }
    }

    /// Returns the value of a boolean constant.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Returns `true` for a numeric constant equal to zero (either sign for floating values).
    pub fn is_zero(&self) -> bool {
        self.as_f64() == Some(0.0)
    }

    /// Returns `true` for a numeric constant equal to one.
    pub fn is_one(&self) -> bool {
        self.as_f64() == Some(1.0)
    }

    /// Converts the value to text the way string concatenation does (`String.valueOf`).
    pub fn to_java_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Char(c) => String::from_utf16_lossy(&[*c]),
            Value::Byte(b) => b.to_string(),
            Value::Short(s) => s.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Long(l) => l.to_string(),
            Value::Float(f) => java_fmt::format_float(*f),
            Value::Double(d) => java_fmt::format_double(*d),
            Value::String(s) => s.clone(),
        }
    }
}

/// Renders the value as a Java literal, e.g. `5L`, `98.0F`, `'a'`, `"text"`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => {
                let mut out = String::from("'");
                java_fmt::escape_char(*c, '\'', &mut out);
                out.push('\'');
                f.write_str(&out)
            }
            Value::Byte(b) => write!(f, "{b}"),
            Value::Short(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Long(l) => write!(f, "{l}L"),
            Value::Float(v) if v.is_nan() => f.write_str("Float.NaN"),
            Value::Float(v) if v.is_infinite() => f.write_str(if *v > 0.0 {
                "Float.POSITIVE_INFINITY"
            } else {
                "Float.NEGATIVE_INFINITY"
            }),
            Value::Float(v) => write!(f, "{}F", java_fmt::format_float(*v)),
            Value::Double(v) if v.is_nan() => f.write_str("Double.NaN"),
            Value::Double(v) if v.is_infinite() => f.write_str(if *v > 0.0 {
                "Double.POSITIVE_INFINITY"
            } else {
                "Double.NEGATIVE_INFINITY"
            }),
            Value::Double(v) => f.write_str(&java_fmt::format_double(*v)),
            Value::String(s) => f.write_str(&java_fmt::quote_string(s)),
        }
    }
}
