//! Template evaluation for per-region resource location overrides.
//!
//! A template is literal text with two kinds of substitutions:
//!
//! - `${name}` / `${name:default}` - an environment property
//! - `#{expression}` - a small expression over the evaluation context
//!
//! Expressions support string literals (`'text'`), the variables
//! `#region`, `#regionName` and `#regionPath`, region members `name` and
//! `fullPath`, named components (`@name`, `@name.field`), environment lookup
//! (`env['key']`), `+` concatenation and the string methods `toLowerCase()`,
//! `toUpperCase()` and `trim()`. Nothing else is evaluated.
//!
//! ```text
//! file://${app.home}/snapshots/#{#region.name.toLowerCase() + '.json'}
//! ```

mod eval;
mod tokenizer;

use std::collections::BTreeMap;
use std::fmt;

use cache_data_types::{Environment, Region};
use serde_json::Value;

use eval::Evaluator;

/// Named application components visible to expressions as `@name`.
#[derive(Debug, Clone, Default)]
pub struct Components {
    named: BTreeMap<String, Value>,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, component: Value) -> &mut Self {
        self.named.insert(name.into(), component);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty()
    }
}

/// Everything a template can see while it is evaluated.
pub struct EvaluationContext<'c> {
    region: &'c dyn Region,
    environment: &'c Environment,
    components: &'c Components,
}

impl<'c> EvaluationContext<'c> {
    pub fn new(
        region: &'c dyn Region,
        environment: &'c Environment,
        components: &'c Components,
    ) -> Self {
        Self {
            region,
            environment,
            components,
        }
    }

    pub fn region(&self) -> &'c dyn Region {
        self.region
    }

    pub fn environment(&self) -> &'c Environment {
        self.environment
    }

    pub fn components(&self) -> &'c Components {
        self.components
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionError {
    UnexpectedCharacter { ch: char, offset: usize },
    UnterminatedString { offset: usize },
    /// `${` or `#{` without a closing brace.
    UnterminatedTemplate { offset: usize },
    UnexpectedToken { expected: &'static str, found: String },
    UnknownVariable(String),
    UnknownComponent(String),
    UnknownProperty(String),
    UnknownMember { target: &'static str, member: String },
    /// The expression produced a value with no text form (objects, regions, null).
    NotRenderable { kind: &'static str },
    /// Parentheses nested deeper than the evaluator allows.
    TooDeeplyNested { limit: usize },
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionError::UnexpectedCharacter { ch, offset } => {
                write!(f, "unexpected character '{}' at offset {}", ch, offset)
            }
            ExpressionError::UnterminatedString { offset } => {
                write!(f, "unterminated string literal starting at offset {}", offset)
            }
            ExpressionError::UnterminatedTemplate { offset } => {
                write!(f, "unterminated template placeholder starting at offset {}", offset)
            }
            ExpressionError::UnexpectedToken { expected, found } => {
                write!(f, "expected {} but found {}", expected, found)
            }
            ExpressionError::UnknownVariable(name) => write!(f, "unknown variable #{}", name),
            ExpressionError::UnknownComponent(name) => write!(f, "unknown component @{}", name),
            ExpressionError::UnknownProperty(name) => {
                write!(f, "property [{}] is not set", name)
            }
            ExpressionError::UnknownMember { target, member } => {
                write!(f, "{} has no member '{}'", target, member)
            }
            ExpressionError::NotRenderable { kind } => {
                write!(f, "a {} value cannot be rendered as text", kind)
            }
            ExpressionError::TooDeeplyNested { limit } => {
                write!(f, "expression nests more than {} levels of parentheses", limit)
            }
        }
    }
}

impl std::error::Error for ExpressionError {}

/// Expand every `${...}` and `#{...}` in `template`.
pub fn evaluate_template(
    template: &str,
    context: &EvaluationContext<'_>,
) -> Result<String, ExpressionError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find(['$', '#']) {
        let marker = rest[start..].chars().next().unwrap_or('$');
        if !rest[start + 1..].starts_with('{') {
            out.push_str(&rest[..start + 1]);
            offset += start + 1;
            rest = &rest[start + 1..];
            continue;
        }

        out.push_str(&rest[..start]);
        let body_start = start + 2;
        let body_len = closing_brace(&rest[body_start..]).ok_or(
            ExpressionError::UnterminatedTemplate {
                offset: offset + start,
            },
        )?;
        let body = &rest[body_start..body_start + body_len];

        if marker == '$' {
            out.push_str(&placeholder(body, context.environment())?);
        } else {
            out.push_str(&Evaluator::evaluate(body, context)?);
        }

        let consumed = body_start + body_len + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Resolve `name` or `name:default` against the environment.
fn placeholder(body: &str, environment: &Environment) -> Result<String, ExpressionError> {
    let (name, default) = match body.split_once(':') {
        Some((name, default)) => (name.trim(), Some(default)),
        None => (body.trim(), None),
    };
    environment
        .property(name)
        .map(str::to_string)
        .or_else(|| default.map(str::to_string))
        .ok_or_else(|| ExpressionError::UnknownProperty(name.to_string()))
}

/// Byte length up to the `}` closing a placeholder body, skipping quoted text.
fn closing_brace(body: &str) -> Option<usize> {
    let mut in_quote = false;
    for (index, ch) in body.char_indices() {
        match ch {
            '\'' => in_quote = !in_quote,
            '}' if !in_quote => return Some(index),
            _ => {}
        }
    }
    None
}
