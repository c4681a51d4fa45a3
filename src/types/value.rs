use std::cmp::Ordering;
use std::fmt;

/// Static types of the expression language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Integer,
    /// Real (double precision) numbers
    Number,
    String,
    /// Type of the `null` literal
    Null,
}

impl DataType {
    /// Common type two operands must be coerced to, if any.
    ///
    /// Identical types widen to themselves and `Integer` widens to `Number`.
    /// Every other pair is incompatible.
    pub fn widen(self, other: DataType) -> Option<DataType> {
        match (self, other) {
            (a, b) if a == b => Some(a),
            (DataType::Integer, DataType::Number) | (DataType::Number, DataType::Integer) => {
                Some(DataType::Number)
            }
            _ => None,
        }
    }

    /// Widen a whole list of types to a single common type
    pub fn widen_all(types: &[DataType]) -> Option<DataType> {
        let (first, rest) = types.split_first()?;
        rest.iter()
            .try_fold(*first, |acc, data_type| acc.widen(*data_type))
    }

    /// Whether a value of this type may be used where `target` is expected
    pub fn widens_to(self, target: DataType) -> bool {
        self.widen(target) == Some(target)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Integer | DataType::Number)
    }

    pub fn is_string(self) -> bool {
        self == DataType::String
    }

    pub fn is_boolean(self) -> bool {
        self == DataType::Boolean
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Boolean => "Boolean",
            DataType::Integer => "Integer",
            DataType::Number => "Number",
            DataType::String => "String",
            DataType::Null => "Null",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime values produced by evaluating expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
}

impl Value {
    /// Get the data type of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Boolean(_) => DataType::Boolean,
            Value::Integer(_) => DataType::Integer,
            Value::Number(_) => DataType::Number,
            Value::String(_) => DataType::String,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert this value to the given declared type.
    ///
    /// NULL fits any type and integers widen to numbers; `None` when the
    /// value cannot be stored under `data_type`.
    pub fn conform_to(self, data_type: DataType) -> Option<Value> {
        match (self, data_type) {
            (Value::Null, _) => Some(Value::Null),
            (Value::Integer(i), DataType::Number) => Some(Value::Number(i as f64)),
            (value, _) if value.data_type() == data_type => Some(value),
            _ => None,
        }
    }

    /// Numeric view of the value, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Order two values of compatible types.
    ///
    /// Integers and numbers compare after widening; `None` for nulls,
    /// incompatible types and NaN. A mixed Integer/Number pair is compared
    /// as `f64`, so integers beyond 2^53 can compare equal to a nearby
    /// number.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Number(n) => write!(f, "{:?}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
