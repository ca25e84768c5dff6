//! Declared parameter types, coerced values and the type resolver
//!
//! A command declares one [`DeclaredType`] per parameter. Raw string tokens
//! are coerced against the parameter's *expected* type, which is the declared
//! type with an optional wrapper peeled off (see [`expected_type`]).

use std::{fmt, path::PathBuf};

use strum::Display;

use crate::error::CoercionError;

/// Converter for user-defined types. The error string is diagnostic only.
pub type Converter = fn(&str) -> std::result::Result<Value, String>;

/// Built-in scalar types a token can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ScalarType {
    Str,
    Int,
    Float,
    Bool,
    Path,
}

/// A named user-supplied conversion from a raw token.
#[derive(Clone, Copy)]
pub struct CustomType {
    name: &'static str,
    convert: Converter,
}

impl CustomType {
    #[must_use]
    pub const fn new(name: &'static str, convert: Converter) -> Self {
        Self { name, convert }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomType").field("name", &self.name).finish()
    }
}

impl PartialEq for CustomType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// The type a parameter is declared with.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    Scalar(ScalarType),
    Custom(CustomType),
    /// The explicit absence marker used inside optional wrappers.
    NoneType,
    Union(Vec<DeclaredType>),
}

impl DeclaredType {
    pub const STR: Self = Self::Scalar(ScalarType::Str);
    pub const INT: Self = Self::Scalar(ScalarType::Int);
    pub const FLOAT: Self = Self::Scalar(ScalarType::Float);
    pub const BOOL: Self = Self::Scalar(ScalarType::Bool);
    pub const PATH: Self = Self::Scalar(ScalarType::Path);

    /// `inner` or absent.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Union(vec![inner, Self::NoneType])
    }

    #[must_use]
    pub const fn custom(name: &'static str, convert: Converter) -> Self {
        Self::Custom(CustomType::new(name, convert))
    }

    /// Whether a value is acceptable for this type, used to validate defaults.
    #[must_use]
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Scalar(scalar), value) => value.scalar_type() == Some(*scalar),
            (Self::Custom(_), Value::None) => false,
            (Self::Custom(_), _) | (Self::NoneType, Value::None) => true,
            (Self::NoneType, _) => false,
            (Self::Union(members), value) => members.iter().any(|member| member.admits(value)),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_name(self))
    }
}

/// A coerced argument value, also the representation of parameter defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Path(PathBuf),
    None,
}

impl Value {
    #[must_use]
    pub const fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Self::Str(_) => Some(ScalarType::Str),
            Self::Int(_) => Some(ScalarType::Int),
            Self::Float(_) => Some(ScalarType::Float),
            Self::Bool(_) => Some(ScalarType::Bool),
            Self::Path(_) => Some(ScalarType::Path),
            Self::None => None,
        }
    }

    /// Short name of the value's kind, for error messages.
    #[must_use]
    pub fn kind_name(&self) -> String {
        self.scalar_type()
            .map_or_else(|| "None".to_string(), |scalar| scalar.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::None => f.write_str("None"),
        }
    }
}

/// Concrete type to coerce into.
///
/// A union of exactly one type and the absence marker unwraps to that type.
/// Every other shape, including larger unions, is returned unchanged.
#[must_use]
pub fn expected_type(declared: &DeclaredType) -> &DeclaredType {
    match declared {
        DeclaredType::Union(members) => match members.as_slice() {
            [inner, DeclaredType::NoneType] => inner,
            _ => declared,
        },
        other => other,
    }
}

/// Human-facing name of a type. Never used for coercion decisions.
#[must_use]
pub fn display_name(ty: &DeclaredType) -> String {
    match ty {
        DeclaredType::Scalar(scalar) => scalar.to_string(),
        DeclaredType::Custom(custom) => custom.name().to_string(),
        DeclaredType::NoneType => "None".to_string(),
        DeclaredType::Union(members) => {
            members.iter().map(display_name).collect::<Vec<_>>().join(" | ")
        }
    }
}

/// Apply `ty` as a constructor over `raw`.
pub fn coerce(raw: &str, ty: &DeclaredType) -> std::result::Result<Value, CoercionError> {
    let failed = || CoercionError {
        value: raw.to_string(),
        type_name: display_name(ty),
    };

    match ty {
        DeclaredType::Scalar(ScalarType::Str) => Ok(Value::Str(raw.to_string())),
        DeclaredType::Scalar(ScalarType::Path) => Ok(Value::Path(PathBuf::from(raw))),
        DeclaredType::Scalar(ScalarType::Int) => {
            raw.trim().parse().map(Value::Int).map_err(|_| failed())
        }
        DeclaredType::Scalar(ScalarType::Float) => {
            raw.trim().parse().map(Value::Float).map_err(|_| failed())
        }
        DeclaredType::Scalar(ScalarType::Bool) => parse_bool(raw).map(Value::Bool).ok_or_else(failed),
        DeclaredType::Custom(custom) => (custom.convert)(raw).map_err(|reason| {
            tracing::debug!(value = raw, type_name = custom.name(), %reason, "custom conversion failed");
            failed()
        }),
        DeclaredType::NoneType | DeclaredType::Union(_) => Err(failed()),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Extraction of a Rust value from a coerced [`Value`].
pub trait FromValue: Sized {
    fn type_name() -> &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for String {
    fn type_name() -> &'static str {
        "str"
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn type_name() -> &'static str {
        "int"
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn type_name() -> &'static str {
        "float"
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl FromValue for bool {
    fn type_name() -> &'static str {
        "bool"
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for PathBuf {
    fn type_name() -> &'static str {
        "path"
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Path(p) => Some(p.clone()),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn type_name() -> &'static str {
        T::type_name()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::None => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}
