// Mon Oct 19 2026 - Alex

use crate::pattern::{CompiledPattern, OptionalByte, PatternError};

pub const DEFAULT_DELIMITER: char = ' ';
pub const DEFAULT_WILDCARD: char = '?';

/// Tokens are two hex digits or the wildcard written once or twice (`"48 8B ?? 05"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternCompiler {
    delimiter: char,
    wildcard: char,
}

impl PatternCompiler {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            wildcard: DEFAULT_WILDCARD,
        }
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn wildcard(mut self, wildcard: char) -> Self {
        self.wildcard = wildcard;
        self
    }

    pub fn delimiter_char(&self) -> char {
        self.delimiter
    }

    pub fn wildcard_char(&self) -> char {
        self.wildcard
    }

    /// The delimiter and wildcard must differ and neither may be a hex digit.
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.delimiter == self.wildcard
            || self.delimiter.is_ascii_hexdigit()
            || self.wildcard.is_ascii_hexdigit()
        {
            return Err(PatternError::Grammar {
                delimiter: self.delimiter,
                wildcard: self.wildcard,
            });
        }
        Ok(())
    }

    pub fn compile(&self, text: &str) -> Result<CompiledPattern, PatternError> {
        self.validate()?;
        if text.is_empty() {
            return Err(PatternError::Anchor);
        }

        let bytes = text
            .split(self.delimiter)
            .enumerate()
            .map(|(index, token)| self.parse_token(token, index))
            .collect::<Result<Vec<_>, _>>()?;

        CompiledPattern::new(bytes)
    }

    fn parse_token(&self, token: &str, index: usize) -> Result<OptionalByte, PatternError> {
        let mut chars = token.chars();
        let (first, second) = match (chars.next(), chars.next(), chars.next()) {
            (Some(first), second, None) => (first, second),
            _ => return Err(PatternError::syntax(token, index)),
        };

        match second {
            None if first == self.wildcard => Ok(None),
            Some(second) if first == self.wildcard && second == self.wildcard => Ok(None),
            Some(second) => match (first.to_digit(16), second.to_digit(16)) {
                (Some(high), Some(low)) => Ok(Some(((high << 4) | low) as u8)),
                _ => Err(PatternError::syntax(token, index)),
            },
            None => Err(PatternError::syntax(token, index)),
        }
    }
}

impl Default for PatternCompiler {
    fn default() -> Self {
        Self::new()
    }
}

pub fn compile(text: &str) -> Result<CompiledPattern, PatternError> {
    PatternCompiler::new().compile(text)
}
