//! Holdings store port trait.

use crate::domain::error::VixboosterError;
use crate::domain::holdings::Holdings;

/// Persists the user's holdings. Only the outer layer calls `save`.
pub trait HoldingsPort {
    /// `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Holdings>, VixboosterError>;

    fn save(&self, holdings: &Holdings) -> Result<(), VixboosterError>;
}
