use super::span::Position;
use thiserror::Error;

/// Errors raised while tokenizing or parsing a script
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected character '{character}' at {position}")]
    UnexpectedCharacter { character: char, position: Position },

    #[error("unterminated string literal starting at {position}")]
    UnterminatedString { position: Position },

    #[error("unterminated comment starting at {position}")]
    UnterminatedComment { position: Position },

    #[error("expected {expected}, found {found} at {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    #[error("invalid number {text} at {position}")]
    InvalidNumber { text: String, position: Position },

    #[error("expression nested deeper than {limit} levels at {position}")]
    NestingTooDeep { limit: usize, position: Position },
}
