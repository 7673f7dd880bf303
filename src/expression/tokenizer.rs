//! Tokenizer for location expressions.

use super::ExpressionError;

/// Expression token. Identifiers borrow from the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Identifier(&'a str),
    /// Single-quoted literal; `''` inside the quotes is a literal quote.
    StringLiteral(String),
    Hash,
    At,
    Dot,
    Plus,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Eof,
}

impl Token<'_> {
    pub fn describe(&self) -> String {
        match self {
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::StringLiteral(text) => format!("string '{}'", text),
            Token::Hash => "'#'".to_string(),
            Token::At => "'@'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
            Token::LeftBracket => "'['".to_string(),
            Token::RightBracket => "']'".to_string(),
            Token::Eof => "end of expression".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    current: Option<(usize, char)>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.char_indices();
        let current = chars.next();
        Self {
            source,
            chars,
            current,
        }
    }

    pub fn next_token(&mut self) -> Result<Token<'a>, ExpressionError> {
        while let Some((_, ch)) = self.current {
            if !ch.is_whitespace() {
                break;
            }
            self.advance();
        }

        let token = match self.current {
            None => return Ok(Token::Eof),
            Some((_, '#')) => Token::Hash,
            Some((_, '@')) => Token::At,
            Some((_, '.')) => Token::Dot,
            Some((_, '+')) => Token::Plus,
            Some((_, '(')) => Token::LeftParen,
            Some((_, ')')) => Token::RightParen,
            Some((_, '[')) => Token::LeftBracket,
            Some((_, ']')) => Token::RightBracket,
            Some((offset, '\'')) => return self.read_string_literal(offset),
            Some((start, ch)) if ch.is_ascii_alphabetic() || ch == '_' => {
                return Ok(Token::Identifier(self.read_identifier(start)));
            }
            Some((offset, ch)) => return Err(ExpressionError::UnexpectedCharacter { ch, offset }),
        };
        self.advance();
        Ok(token)
    }

    fn advance(&mut self) {
        self.current = self.chars.next();
    }

    fn read_identifier(&mut self, start: usize) -> &'a str {
        while let Some((_, ch)) = self.current {
            if !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-') {
                break;
            }
            self.advance();
        }
        let end = self.current.map_or(self.source.len(), |(offset, _)| offset);
        &self.source[start..end]
    }

    fn read_string_literal(&mut self, start: usize) -> Result<Token<'a>, ExpressionError> {
        self.advance();
        let mut text = String::new();
        loop {
            match self.current {
                None => return Err(ExpressionError::UnterminatedString { offset: start }),
                Some((_, '\'')) => {
                    self.advance();
                    if let Some((_, '\'')) = self.current {
                        text.push('\'');
                        self.advance();
                    } else {
                        return Ok(Token::StringLiteral(text));
                    }
                }
                Some((_, ch)) => {
                    text.push(ch);
                    self.advance();
                }
            }
        }
    }
}
