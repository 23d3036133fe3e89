//! Various utilities
use num_traits::{Float, FromPrimitive};
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Any error from this library
#[derive(Debug, Clone, PartialEq)]
pub enum IndexError {
    /// A statistic was requested before anything was inserted
    Empty,
    /// A value that has no place in the ordering (NaN or infinite)
    InvalidValue(f64),
    /// Text that couldn't be read as a value
    Input(String),
}

impl<'a> From<&'a str> for IndexError {
    fn from(msg: &'a str) -> IndexError {
        IndexError::Input(String::from(msg))
    }
}

impl Display for IndexError {
    fn fmt(&self, formatter: &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            IndexError::Empty => write!(formatter, "index error: no values have been inserted"),
            IndexError::InvalidValue(val) => {
                write!(formatter, "index error: {} can't be ordered", val)
            }
            IndexError::Input(msg) => write!(formatter, "index error: {}", msg),
        }
    }
}

impl Error for IndexError {}

/// Bit pattern used to hash a float
///
/// Negative zero is folded into positive zero so both hash to the same key, as they compare
/// equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatKey(u64);

impl FloatKey {
    pub fn new(val: f64) -> FloatKey {
        FloatKey(normalize(val).to_bits())
    }
}

/// Fold negative zero into positive zero
pub fn normalize(val: f64) -> f64 {
    if val == 0.0 {
        0.0
    } else {
        val
    }
}

/// weighted average between two values, weight given to high
pub fn weighted_average<T: Float + FromPrimitive>(low: T, high: T, weight: f64) -> Option<T> {
    Some(low * T::from_f64(1.0 - weight)? + high * T::from_f64(weight)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_keys_match() {
        assert_eq!(FloatKey::new(0.0), FloatKey::new(-0.0));
        assert_ne!(FloatKey::new(1.0), FloatKey::new(-1.0));
        assert_eq!(0.0f64.to_bits(), normalize(-0.0).to_bits());
    }

    #[test]
    fn weighted_average_tests() {
        assert_eq!(Some(3.5), weighted_average(3.0, 4.0, 0.5));
        assert_eq!(Some(3.0), weighted_average(3.0, 3.0, 0.5));
        assert_eq!(Some(2.0f32), weighted_average(2.0f32, 6.0f32, 0.0));
        assert_eq!(Some(6.0), weighted_average(2.0, 6.0, 1.0));
    }

    #[test]
    fn error_display() {
        assert_eq!("index error: no values have been inserted", IndexError::Empty.to_string());
        assert_eq!("index error: NaN can't be ordered", IndexError::InvalidValue(f64::NAN).to_string());
        assert_eq!("index error: bad token", IndexError::from("bad token").to_string());
    }
}
