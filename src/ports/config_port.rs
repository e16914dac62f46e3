//! Configuration access port trait.

use crate::domain::error::VixboosterError;
use std::str::FromStr;

/// Typed lookups return the default when the key is absent and
/// `ConfigInvalid` when it is present but malformed.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, VixboosterError> {
        parse_or_default(self.get_string(section, key), section, key, default)
    }

    fn get_usize(
        &self,
        section: &str,
        key: &str,
        default: usize,
    ) -> Result<usize, VixboosterError> {
        parse_or_default(self.get_string(section, key), section, key, default)
    }
}

fn parse_or_default<T>(
    raw: Option<String>,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, VixboosterError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => s.parse().map_err(|e: T::Err| VixboosterError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("'{s}': {e}"),
        }),
    }
}
