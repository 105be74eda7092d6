//! Environment variable helpers.

use std::env;
use std::str::FromStr;

/// Read a variable, treating unset and blank values as absent.
pub(super) fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// First non-blank value among `names`, in order.
pub(super) fn first_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| var(name))
}

/// Read and parse a variable.
pub(super) fn parse_var<T>(name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Invalid value for {name} ('{raw}'): {e}")),
        None => Ok(None),
    }
}
