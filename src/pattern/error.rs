// Mon Oct 19 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Invalid token {token:?} at position {index}")]
    Syntax { token: String, index: usize },
    #[error("Pattern must start with a concrete anchor byte")]
    Anchor,
    #[error("Mask length {mask} does not match byte length {bytes}")]
    MaskMismatch { bytes: usize, mask: usize },
    #[error("Ambiguous grammar: delimiter {delimiter:?}, wildcard {wildcard:?}")]
    Grammar { delimiter: char, wildcard: char },
}

impl PatternError {
    pub fn syntax(token: &str, index: usize) -> Self {
        Self::Syntax {
            token: token.to_string(),
            index,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self, Self::Anchor)
    }
}
