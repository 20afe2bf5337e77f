//! Typed literal values.

use crate::error::{SporkError, SporkResult};
use serde::{ser, Deserialize, Serialize, Serializer};
use std::fmt;

/// Scalar constant rendered in SQL form.
///
/// Rust values are converted through [`IntoLiteral`]; dynamically typed JSON
/// values go through `TryFrom<serde_json::Value>`. Non-finite floats have no
/// JSON form, so serializing one fails.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum Literal {
    Null,
    Text(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
}

impl Literal {
    /// Name of the value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::Text(_) => "text",
            Literal::Boolean(_) => "boolean",
            Literal::Integer(_) => "integer",
            Literal::Float(_) => "float",
        }
    }

    /// Float literal that rejects NaN and infinities
    pub fn float(value: f64) -> SporkResult<Self> {
        if value.is_finite() {
            Ok(Literal::Float(value))
        } else {
            Err(non_finite(value))
        }
    }
}

fn non_finite(value: f64) -> SporkError {
    SporkError::UnsupportedLiteralType {
        type_name: format!("non-finite float {}", value),
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("NULL"),
            Literal::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Boolean(true) => f.write_str("TRUE"),
            Literal::Boolean(false) => f.write_str("FALSE"),
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Float(v) if v.is_nan() => f.write_str("'NaN'::float"),
            Literal::Float(v) if v.is_infinite() && *v > 0.0 => {
                f.write_str("'Infinity'::float")
            }
            Literal::Float(v) if v.is_infinite() => f.write_str("'-Infinity'::float"),
            // Debug keeps the decimal point: 1.0 rather than 1
            Literal::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl TryFrom<serde_json::Value> for Literal {
    type Error = SporkError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(Literal::Null),
            Value::Bool(b) => Ok(Literal::Boolean(b)),
            Value::String(s) => Ok(Literal::Text(s)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Literal::Integer(i)),
                None => n
                    .as_f64()
                    .map(Literal::Float)
                    .ok_or_else(|| SporkError::UnsupportedLiteralType {
                        type_name: format!("number {}", n),
                    }),
            },
            Value::Array(_) => Err(SporkError::UnsupportedLiteralType {
                type_name: "array".to_string(),
            }),
            Value::Object(_) => Err(SporkError::UnsupportedLiteralType {
                type_name: "object".to_string(),
            }),
        }
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Literal::Null => serializer.serialize_unit(),
            Literal::Text(s) => serializer.serialize_str(s),
            Literal::Boolean(b) => serializer.serialize_bool(*b),
            Literal::Integer(i) => serializer.serialize_i64(*i),
            Literal::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            Literal::Float(v) => Err(ser::Error::custom(non_finite(*v))),
        }
    }
}

macro_rules! wide_integer_literal {
    ($($t:ty),*) => {
        $(
            impl TryFrom<$t> for Literal {
                type Error = SporkError;

                fn try_from(value: $t) -> SporkResult<Self> {
                    i64::try_from(value)
                        .map(Literal::Integer)
                        .map_err(|_| SporkError::UnsupportedLiteralType {
                            type_name: format!("{} {}", stringify!($t), value),
                        })
                }
            }
        )*
    };
}

wide_integer_literal!(u64, usize, isize);

/// Conversion of Rust scalars into literals.
///
/// `u64`, `usize` and `isize` may not fit in an `i64` and go through the
/// checked `Literal::try_from` instead.
pub trait IntoLiteral {
    fn into_literal(self) -> Literal;
}

impl IntoLiteral for Literal {
    fn into_literal(self) -> Literal {
        self
    }
}

impl IntoLiteral for &str {
    fn into_literal(self) -> Literal {
        Literal::Text(self.to_string())
    }
}

impl IntoLiteral for String {
    fn into_literal(self) -> Literal {
        Literal::Text(self)
    }
}

impl IntoLiteral for bool {
    fn into_literal(self) -> Literal {
        Literal::Boolean(self)
    }
}

macro_rules! integer_literal {
    ($($t:ty),*) => {
        $(
            impl IntoLiteral for $t {
                fn into_literal(self) -> Literal {
                    Literal::Integer(i64::from(self))
                }
            }
        )*
    };
}

integer_literal!(i8, i16, i32, i64, u8, u16, u32);

impl IntoLiteral for f32 {
    fn into_literal(self) -> Literal {
        Literal::Float(f64::from(self))
    }
}

impl IntoLiteral for f64 {
    fn into_literal(self) -> Literal {
        Literal::Float(self)
    }
}

impl<T: IntoLiteral> IntoLiteral for Option<T> {
    fn into_literal(self) -> Literal {
        match self {
            Some(v) => v.into_literal(),
            None => Literal::Null,
        }
    }
}
