//! Evaluation of a single `#{...}` expression.
//!
//! Grammar:
//!
//! ```text
//! expr    := postfix ('+' postfix)*
//! postfix := primary ('.' IDENT ('(' ')')? | '[' STRING ']')*
//! primary := STRING | '#' IDENT | '@' IDENT | 'env' | '(' expr ')'
//! ```

use serde_json::Value;

use super::tokenizer::{Token, Tokenizer};
use super::{EvaluationContext, ExpressionError};
use cache_data_types::Region;

/// Deepest parenthesized nesting accepted in one expression.
pub(super) const MAX_NESTING: usize = 32;

/// Intermediate result while walking an expression.
enum Operand<'c> {
    Text(String),
    Json(Value),
    Region(&'c dyn Region),
    Environment,
}

impl Operand<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Operand::Text(_) => "string",
            Operand::Json(value) => cache_data_types::portable::json_shape(value),
            Operand::Region(_) => "region",
            Operand::Environment => "environment",
        }
    }

    fn render(self) -> Result<String, ExpressionError> {
        match self {
            Operand::Text(text) => Ok(text),
            Operand::Json(Value::String(text)) => Ok(text),
            Operand::Json(Value::Number(n)) => Ok(n.to_string()),
            Operand::Json(Value::Bool(b)) => Ok(b.to_string()),
            other => Err(ExpressionError::NotRenderable { kind: other.kind() }),
        }
    }
}

pub(super) struct Evaluator<'a, 'c> {
    tokenizer: Tokenizer<'a>,
    lookahead: Token<'a>,
    context: &'c EvaluationContext<'c>,
    depth: usize,
}

impl<'a, 'c> Evaluator<'a, 'c> {
    pub(super) fn evaluate(
        source: &'a str,
        context: &'c EvaluationContext<'c>,
    ) -> Result<String, ExpressionError> {
        let mut tokenizer = Tokenizer::new(source);
        let lookahead = tokenizer.next_token()?;
        let mut evaluator = Evaluator {
            tokenizer,
            lookahead,
            context,
            depth: 0,
        };
        let result = evaluator.expression()?;
        evaluator.expect(Token::Eof, "end of expression")?;
        Ok(result)
    }

    fn bump(&mut self) -> Result<Token<'a>, ExpressionError> {
        let next = self.tokenizer.next_token()?;
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    fn expect(&mut self, token: Token<'a>, expected: &'static str) -> Result<(), ExpressionError> {
        if self.lookahead == token {
            self.bump()?;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> ExpressionError {
        ExpressionError::UnexpectedToken {
            expected,
            found: self.lookahead.describe(),
        }
    }

    fn identifier(&mut self) -> Result<&'a str, ExpressionError> {
        match self.lookahead {
            Token::Identifier(name) => {
                self.bump()?;
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn string_literal(&mut self) -> Result<String, ExpressionError> {
        match self.bump()? {
            Token::StringLiteral(text) => Ok(text),
            other => Err(ExpressionError::UnexpectedToken {
                expected: "string literal",
                found: other.describe(),
            }),
        }
    }

    fn expression(&mut self) -> Result<String, ExpressionError> {
        let mut result = self.postfix()?.render()?;
        while self.lookahead == Token::Plus {
            self.bump()?;
            result.push_str(&self.postfix()?.render()?);
        }
        Ok(result)
    }

    fn postfix(&mut self) -> Result<Operand<'c>, ExpressionError> {
        let mut operand = self.primary()?;
        loop {
            match self.lookahead {
                Token::Dot => {
                    self.bump()?;
                    let member = self.identifier()?;
                    if self.lookahead == Token::LeftParen {
                        self.bump()?;
                        self.expect(Token::RightParen, "')'")?;
                        operand = call(operand, member)?;
                    } else {
                        operand = property(operand, member)?;
                    }
                }
                Token::LeftBracket => {
                    self.bump()?;
                    let key = self.string_literal()?;
                    self.expect(Token::RightBracket, "']'")?;
                    operand = self.index(operand, &key)?;
                }
                _ => return Ok(operand),
            }
        }
    }

    fn primary(&mut self) -> Result<Operand<'c>, ExpressionError> {
        match self.bump()? {
            Token::StringLiteral(text) => Ok(Operand::Text(text)),
            Token::Hash => {
                let name = self.identifier()?;
                self.variable(name)
            }
            Token::At => {
                let name = self.identifier()?;
                self.context
                    .components()
                    .get(name)
                    .cloned()
                    .map(Operand::Json)
                    .ok_or_else(|| ExpressionError::UnknownComponent(name.to_string()))
            }
            Token::Identifier("env") => Ok(Operand::Environment),
            Token::LeftParen => {
                if self.depth == MAX_NESTING {
                    return Err(ExpressionError::TooDeeplyNested { limit: MAX_NESTING });
                }
                self.depth += 1;
                let inner = self.expression()?;
                self.depth -= 1;
                self.expect(Token::RightParen, "')'")?;
                Ok(Operand::Text(inner))
            }
            other => Err(ExpressionError::UnexpectedToken {
                expected: "expression",
                found: other.describe(),
            }),
        }
    }

    fn variable(&self, name: &str) -> Result<Operand<'c>, ExpressionError> {
        let region = self.context.region();
        match name {
            "region" => Ok(Operand::Region(region)),
            "regionName" => Ok(Operand::Text(region.name().to_string())),
            "regionPath" => Ok(Operand::Text(region.full_path())),
            _ => Err(ExpressionError::UnknownVariable(name.to_string())),
        }
    }

    fn index(&self, operand: Operand<'c>, key: &str) -> Result<Operand<'c>, ExpressionError> {
        match operand {
            Operand::Environment => self
                .context
                .environment()
                .property(key)
                .map(|value| Operand::Text(value.to_string()))
                .ok_or_else(|| ExpressionError::UnknownProperty(key.to_string())),
            other => property(other, key),
        }
    }
}

fn property<'c>(operand: Operand<'c>, name: &str) -> Result<Operand<'c>, ExpressionError> {
    match operand {
        Operand::Region(region) => match name {
            "name" => Ok(Operand::Text(region.name().to_string())),
            "fullPath" => Ok(Operand::Text(region.full_path())),
            _ => Err(unknown_member("region", name)),
        },
        Operand::Json(Value::Object(mut map)) => map
            .remove(name)
            .map(Operand::Json)
            .ok_or_else(|| unknown_member("object", name)),
        other => Err(unknown_member(other.kind(), name)),
    }
}

fn call<'c>(operand: Operand<'c>, method: &str) -> Result<Operand<'c>, ExpressionError> {
    let kind = operand.kind();
    let text = match operand {
        Operand::Text(text) | Operand::Json(Value::String(text)) => text,
        _ => return Err(unknown_member(kind, method)),
    };
    match method {
        "toLowerCase" => Ok(Operand::Text(text.to_lowercase())),
        "toUpperCase" => Ok(Operand::Text(text.to_uppercase())),
        "trim" => Ok(Operand::Text(text.trim().to_string())),
        _ => Err(unknown_member("string", method)),
    }
}

fn unknown_member(target: &'static str, member: &str) -> ExpressionError {
    ExpressionError::UnknownMember {
        target,
        member: member.to_string(),
    }
}
