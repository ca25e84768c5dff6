//! Argument binding
//!
//! Splits raw string tokens into positional values and `--flag` values
//! according to a command's parameters, coercing each token on the way.
//!
//! - `--name` addresses a flag-only parameter. Boolean flags take no value,
//!   every other flag consumes exactly the next token.
//! - Any other token is the next positional argument, typed by the positional
//!   parameter at that index in declaration order.
//! - The positional count must fall within the command's [`Arity`].

use std::collections::BTreeMap;

use crate::{
    command::{Command, ParameterSpec},
    error::BindingError,
    types::{coerce, DeclaredType, FromValue, Value},
    Error, Result,
};

/// Prefix marking a token as a flag.
pub const FLAG_PREFIX: &str = "--";

/// Accepted range of positional argument counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
}

impl Arity {
    /// `min` is one past the last positional without a default, `max` counts
    /// every positional. Flag-only parameters never count.
    #[must_use]
    pub fn of(command: &Command) -> Self {
        let positional: Vec<&ParameterSpec> = command.positional_parameters().collect();
        let min = positional
            .iter()
            .rposition(|p| !p.has_default())
            .map_or(0, |index| index + 1);

        Self {
            min,
            max: positional.len(),
        }
    }

    #[must_use]
    pub const fn contains(&self, count: usize) -> bool {
        self.min <= count && count <= self.max
    }

    /// `"2"` or `"1 to 3"`.
    #[must_use]
    pub fn expected(&self) -> String {
        if self.min == self.max {
            self.min.to_string()
        } else {
            format!("{} to {}", self.min, self.max)
        }
    }
}

/// Coerced tokens exactly as supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    positional: Vec<Value>,
    flags: BTreeMap<String, Value>,
}

impl BoundArgs {
    #[must_use]
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    #[must_use]
    pub const fn flags(&self) -> &BTreeMap<String, Value> {
        &self.flags
    }
}

/// Bind `raw_args` to the parameters of `command`.
///
/// # Errors
///
/// Returns an error if:
/// - A `--flag` names no flag-only parameter
/// - A non-boolean flag is the last token
/// - A token cannot be coerced to its parameter's type
/// - The positional count is outside the command's arity
/// - A flag without a default was never supplied
pub fn bind<S: AsRef<str>>(command: &Command, raw_args: &[S]) -> Result<BoundArgs> {
    let positional: Vec<&ParameterSpec> = command.positional_parameters().collect();
    let arity = Arity::of(command);
    let arity_error = || BindingError::Arity {
        fullname: command.fullname().to_string(),
        expected: arity.expected(),
    };

    let mut bound = BoundArgs::default();
    let mut tokens = raw_args.iter().map(AsRef::as_ref);

    while let Some(token) = tokens.next() {
        if let Some(flag) = token.strip_prefix(FLAG_PREFIX) {
            let parameter = command.flag(flag).ok_or_else(|| BindingError::UnknownFlag {
                flag: flag.to_string(),
                fullname: command.fullname().to_string(),
            })?;

            let expected = parameter.expected_type();
            let value = if *expected == DeclaredType::BOOL {
                Value::Bool(true)
            } else {
                let raw = tokens.next().ok_or_else(|| BindingError::MissingFlagValue {
                    flag: flag.to_string(),
                })?;
                coerce(raw, expected)?
            };

            bound.flags.insert(flag.to_string(), value);
        } else {
            let parameter = positional
                .get(bound.positional.len())
                .ok_or_else(arity_error)?;
            bound.positional.push(coerce(token, parameter.expected_type())?);
        }
    }

    if !arity.contains(bound.positional.len()) {
        return Err(arity_error().into());
    }

    if let Some(missing) = command
        .flag_parameters()
        .find(|p| !p.has_default() && !bound.flags.contains_key(p.name()))
    {
        return Err(BindingError::MissingFlag {
            flag: missing.name().to_string(),
            fullname: command.fullname().to_string(),
        }
        .into());
    }

    tracing::debug!(
        command = command.fullname(),
        positional = bound.positional.len(),
        flags = bound.flags.len(),
        "arguments bound"
    );

    Ok(bound)
}

/// Arguments handed to a command handler, with defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct CallArgs {
    fullname: String,
    positional: Vec<(String, Value)>,
    flags: BTreeMap<String, Value>,
}

impl CallArgs {
    /// Fill unsupplied positionals and flags from their defaults.
    #[must_use]
    pub fn from_bound(command: &Command, bound: BoundArgs) -> Self {
        let mut supplied = bound.positional.into_iter();
        let positional = command
            .positional_parameters()
            .filter_map(|parameter| {
                supplied
                    .next()
                    .or_else(|| parameter.default().cloned())
                    .map(|value| (parameter.name().to_string(), value))
            })
            .collect();

        let mut flags = bound.flags;
        for parameter in command.flag_parameters() {
            if let Some(default) = parameter.default() {
                flags
                    .entry(parameter.name().to_string())
                    .or_insert_with(|| default.clone());
            }
        }

        Self {
            fullname: command.fullname().to_string(),
            positional,
            flags,
        }
    }

    /// Positional values in declaration order.
    pub fn positional(&self) -> impl Iterator<Item = &Value> {
        self.positional.iter().map(|(_, value)| value)
    }

    #[must_use]
    pub const fn flags(&self) -> &BTreeMap<String, Value> {
        &self.flags
    }

    /// Value of the parameter called `name`, positional or flag.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.flags.get(name).or_else(|| {
            self.positional
                .iter()
                .find(|(param, _)| param == name)
                .map(|(_, value)| value)
        })
    }

    /// Typed value of the parameter called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command has no such parameter, or its value is
    /// not a `T`.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self.value(name).ok_or_else(|| BindingError::UnknownArgument {
            fullname: self.fullname.clone(),
            parameter: name.to_string(),
        })?;

        T::from_value(value).ok_or_else(|| {
            Error::from(BindingError::ArgumentType {
                parameter: name.to_string(),
                actual: value.kind_name(),
                requested: T::type_name().to_string(),
            })
        })
    }
}
