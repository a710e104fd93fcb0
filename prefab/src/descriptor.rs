//! Structural type keys.
//!
//! A [`TypeDescriptor`] names a type by a stable identity string plus the
//! ordered descriptors of its generic arguments. Descriptors are plain values:
//! equality and hashing are structural and recursive, so two descriptors built
//! from the same parts are interchangeable as map keys.

use std::fmt;
use std::str::FromStr;

use crate::error::{PrefabError, Result};

/// Identity of the root object type, used for generic arguments that were never bound
pub const OBJECT: &str = "Object";

/// Immutable key for a (possibly generic) type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDescriptor {
    identity: String,
    arguments: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    /// Create a descriptor from an identity and its type arguments in declaration order
    pub fn new(identity: impl Into<String>, arguments: Vec<TypeDescriptor>) -> Result<Self> {
        let identity = identity.into();
        let trimmed = identity.trim();
        if trimmed.is_empty() {
            return Err(PrefabError::invalid_argument(
                "type identity must not be empty",
            ));
        }
        if trimmed.contains(['<', '>', ',']) {
            return Err(PrefabError::invalid_argument(format!(
                "type identity '{}' contains generic syntax; pass arguments separately",
                trimmed
            )));
        }
        Ok(Self {
            identity: trimmed.to_string(),
            arguments,
        })
    }

    /// Create a descriptor without type arguments
    pub fn of(identity: impl Into<String>) -> Result<Self> {
        Self::new(identity, Vec::new())
    }

    /// The root object type
    pub fn object() -> Self {
        Self {
            identity: OBJECT.to_string(),
            arguments: Vec::new(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn arguments(&self) -> &[TypeDescriptor] {
        &self.arguments
    }

    /// The argument at `index`, if the descriptor carries that many
    pub fn argument(&self, index: usize) -> Option<&TypeDescriptor> {
        self.arguments.get(index)
    }

    /// The argument at `index`, or `Object` when the descriptor is raw or too short
    pub fn argument_or_object(&self, index: usize) -> TypeDescriptor {
        self.argument(index)
            .cloned()
            .unwrap_or_else(TypeDescriptor::object)
    }

    pub fn is_generic(&self) -> bool {
        !self.arguments.is_empty()
    }

    /// Same identity, different arguments
    pub fn with_arguments(&self, arguments: Vec<TypeDescriptor>) -> Self {
        Self {
            identity: self.identity.clone(),
            arguments,
        }
    }

    /// Same arguments, different identity
    pub fn rename(&self, identity: impl Into<String>) -> Result<Self> {
        Self::new(identity, self.arguments.clone())
    }

    /// Replace type parameters with the arguments bound to them.
    ///
    /// A descriptor whose identity names one of `parameters` and that carries no
    /// arguments of its own is a type variable. It is replaced by the argument at
    /// the same position, or by `Object` when the enclosing descriptor is raw.
    pub fn substitute(&self, parameters: &[String], arguments: &[TypeDescriptor]) -> Self {
        if self.arguments.is_empty() {
            if let Some(position) = parameters.iter().position(|p| *p == self.identity) {
                return arguments
                    .get(position)
                    .cloned()
                    .unwrap_or_else(TypeDescriptor::object);
            }
            return self.clone();
        }

        Self {
            identity: self.identity.clone(),
            arguments: self
                .arguments
                .iter()
                .map(|arg| arg.substitute(parameters, arguments))
                .collect(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity)?;
        if !self.arguments.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl FromStr for TypeDescriptor {
    type Err = PrefabError;

    /// Parse `Name<Arg, Other<Inner>>` syntax
    fn from_str(input: &str) -> Result<Self> {
        let mut parser = Parser {
            input,
            chars: input.char_indices().peekable(),
        };
        let descriptor = parser.descriptor()?;
        parser.skip_whitespace();
        match parser.chars.next() {
            None => Ok(descriptor),
            Some((at, c)) => Err(parser.error(format!("unexpected '{}' at offset {}", c, at))),
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Parser<'_> {
    fn descriptor(&mut self) -> Result<TypeDescriptor> {
        self.skip_whitespace();
        let mut identity = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '<' || c == '>' || c == ',' || c.is_whitespace() {
                break;
            }
            identity.push(c);
            self.chars.next();
        }
        if identity.is_empty() {
            return Err(self.error("expected a type identity"));
        }

        self.skip_whitespace();
        let mut arguments = Vec::new();
        if let Some(&(_, '<')) = self.chars.peek() {
            self.chars.next();
            loop {
                arguments.push(self.descriptor()?);
                self.skip_whitespace();
                match self.chars.next() {
                    Some((_, ',')) => continue,
                    Some((_, '>')) => break,
                    Some((at, c)) => {
                        return Err(self.error(format!("unexpected '{}' at offset {}", c, at)));
                    }
                    None => return Err(self.error("unclosed '<'")),
                }
            }
        }

        TypeDescriptor::new(identity, arguments)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.chars.next();
        }
    }

    fn error(&self, message: impl fmt::Display) -> PrefabError {
        PrefabError::invalid_argument(format!(
            "malformed type descriptor '{}': {}",
            self.input, message
        ))
    }
}

/// Conversion into a descriptor, accepting either a built descriptor or its textual form
pub trait IntoDescriptor {
    fn into_descriptor(self) -> Result<TypeDescriptor>;
}

impl IntoDescriptor for TypeDescriptor {
    fn into_descriptor(self) -> Result<TypeDescriptor> {
        Ok(self)
    }
}

impl IntoDescriptor for &TypeDescriptor {
    fn into_descriptor(self) -> Result<TypeDescriptor> {
        Ok(self.clone())
    }
}

impl IntoDescriptor for &str {
    fn into_descriptor(self) -> Result<TypeDescriptor> {
        self.parse()
    }
}

impl IntoDescriptor for String {
    fn into_descriptor(self) -> Result<TypeDescriptor> {
        self.parse()
    }
}
