//! Advisory market-sentiment reading. Displayed next to a decision, never
//! used to make one.

use crate::domain::error::VixboosterError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentiment {
    pub score: Option<u8>,
    pub rating: Option<String>,
}

impl Sentiment {
    pub fn new(score: Option<u8>, rating: Option<String>) -> Result<Self, VixboosterError> {
        if let Some(s) = score.filter(|s| *s > 100) {
            return Err(VixboosterError::MissingIndicator {
                name: "sentiment_score".into(),
                reason: format!("{s} is outside [0, 100]"),
            });
        }
        Ok(Self {
            score,
            rating: rating.filter(|r| !r.trim().is_empty()),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.score.is_none() && self.rating.is_none()
    }
}
