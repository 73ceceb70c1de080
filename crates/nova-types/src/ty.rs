use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == keyword)
    }
}

/// A Java type as it appears in source.
///
/// Reference types are kept as their source spelling (including any type
/// arguments), e.g. `java.util.List<java.lang.String>`. Generated code copies
/// them verbatim so producers should hand over fully qualified names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Type {
    Void,
    Primitive(PrimitiveType),
    Named(String),
    Array(Box<Type>),
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(name.into())
    }

    pub fn array_of(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Primitive(p) => f.write_str(p.keyword()),
            Type::Named(name) => f.write_str(name),
            Type::Array(elem) => write!(f, "{elem}[]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("empty type name")]
    Empty,
    #[error("`void` cannot be used as an array element type")]
    VoidArray,
    #[error("unbalanced type arguments in `{0}`")]
    Unbalanced(String),
}

impl FromStr for Type {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TypeParseError::Empty);
        }

        if let Some(elem) = s.strip_suffix("[]") {
            let elem: Type = elem.parse()?;
            if elem.is_void() {
                return Err(TypeParseError::VoidArray);
            }
            return Ok(Type::array_of(elem));
        }

        if s == "void" {
            return Ok(Type::Void);
        }
        if let Some(p) = PrimitiveType::from_keyword(s) {
            return Ok(Type::Primitive(p));
        }

        let mut depth = 0i32;
        for ch in s.chars() {
            match ch {
                '<' => depth += 1,
                '>' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return Err(TypeParseError::Unbalanced(s.to_string()));
            }
        }
        if depth != 0 {
            return Err(TypeParseError::Unbalanced(s.to_string()));
        }

        Ok(Type::Named(s.to_string()))
    }
}

impl TryFrom<String> for Type {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Type> for String {
    fn from(ty: Type) -> Self {
        ty.to_string()
    }
}
