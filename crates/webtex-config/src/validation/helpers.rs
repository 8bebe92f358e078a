//! Range check shared by the section validators.

use std::fmt::Display;

/// Record an error unless `min <= value <= max`. NaN is always out of range.
pub(crate) fn validate_range<T>(errors: &mut Vec<String>, name: &str, value: T, min: T, max: T)
where
    T: PartialOrd + Display,
{
    let in_range = value >= min && value <= max;
    if !in_range {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}
