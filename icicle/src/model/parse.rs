//! Parser for textual type descriptors such as `java.util.ArrayList<Foo>[]`.
//!
//! Grammar:
//!
//! ```text
//! type     := name arguments? dims
//! name     := ident ('.' ident)*
//! arguments:= '<' argument (',' argument)* '>'
//! argument := type | '?' (('extends' | 'super') type)?
//! dims     := ('[' ']')*
//! ```
//!
//! Wildcards are erased: `? extends T` becomes `T`, while a bare `?` or
//! `? super T` becomes `java.lang.Object`.

use std::iter::Peekable;
use std::str::CharIndices;

use super::types::{DeclaredType, is_identifier};
use crate::error::IcicleError;

const OBJECT: &str = "java.lang.Object";

pub(super) struct TypeParser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> TypeParser<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    pub(super) fn parse(mut self) -> Result<DeclaredType, IcicleError> {
        let ty = self.parse_type()?;
        self.skip_whitespace();
        match self.chars.next() {
            None => Ok(ty),
            Some((_, c)) => Err(self.error(format!("unexpected '{c}' after type"))),
        }
    }

    fn parse_type(&mut self) -> Result<DeclaredType, IcicleError> {
        let name = self.parse_name()?;
        let mut ty = DeclaredType::new(name);
        self.skip_whitespace();
        if self.eat('<') {
            ty = ty.with_arguments(self.parse_arguments()?);
        }
        let dimensions = self.parse_dimensions()?;
        Ok(ty.with_dimensions(dimensions))
    }

    fn parse_arguments(&mut self) -> Result<Vec<DeclaredType>, IcicleError> {
        let mut arguments = Vec::new();
        loop {
            self.skip_whitespace();
            arguments.push(self.parse_argument()?);
            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat('>') {
                return Ok(arguments);
            }
            return Err(self.error("expected ',' or '>' in generic arguments"));
        }
    }

    fn parse_argument(&mut self) -> Result<DeclaredType, IcicleError> {
        if !self.eat('?') {
            return self.parse_type();
        }
        self.skip_whitespace();
        if self.chars.peek().is_some_and(|(_, c)| c.is_alphabetic()) {
            let keyword = self.parse_name()?;
            self.skip_whitespace();
            let bound = self.parse_type()?;
            return match keyword.as_str() {
                "extends" => Ok(bound),
                "super" => Ok(DeclaredType::new(OBJECT)),
                other => Err(self.error(format!("unexpected '{other}' after wildcard"))),
            };
        }
        Ok(DeclaredType::new(OBJECT))
    }

    fn parse_dimensions(&mut self) -> Result<usize, IcicleError> {
        let mut dimensions = 0;
        loop {
            self.skip_whitespace();
            if !self.eat('[') {
                return Ok(dimensions);
            }
            self.skip_whitespace();
            if !self.eat(']') {
                return Err(self.error("expected ']'"));
            }
            dimensions += 1;
        }
    }

    fn parse_name(&mut self) -> Result<String, IcicleError> {
        let mut name = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '$' | '.') {
                name.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        if name.split('.').all(is_identifier) {
            Ok(name)
        } else {
            Err(self.error("expected a type name"))
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.chars
            .next_if(|&(_, c)| c == expected)
            .is_some()
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn error(&mut self, reason: impl Into<String>) -> IcicleError {
        let position = self
            .chars
            .peek()
            .map_or(self.input.len(), |&(index, _)| index);
        IcicleError::type_syntax(
            self.input,
            format!("{} at offset {position}", reason.into()),
        )
    }
}
