//! Error types for terrorist-core with categorization:
//!
//! - **Registration errors**: bad command definitions, fatal at startup
//! - **Resolution errors**: a name matched zero or several commands
//! - **Binding errors**: raw tokens do not fit the command's parameters
//! - **Coercion errors**: a token cannot be converted to its expected type
//! - **Config errors**: the user config file or environment is invalid
//! - **Execution errors**: the command handler itself failed
//!
//! Every variant is surfaced once to the caller; nothing here is retried.

use thiserror::Error;

/// Errors raised while registering a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("Command \"{fullname}\" parameter \"{parameter}\" must have a type annotation.")]
    MissingType { fullname: String, parameter: String },

    #[error("Command \"{fullname}\" declares parameter \"{parameter}\" more than once.")]
    DuplicateParameter { fullname: String, parameter: String },

    #[error("Command \"{fullname}\" parameter \"{parameter}\" has a default that is not a \"{type_name}\".")]
    InvalidDefault {
        fullname: String,
        parameter: String,
        type_name: String,
    },

    #[error("Command \"{fullname}\" is already registered.")]
    DuplicateCommand { fullname: String },
}

/// Errors raised while resolving a name to a single command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("No command {name}")]
    NotFound { name: String },

    /// Candidates are the conflicting fullnames, sorted.
    #[error("Command \"{name}\" is ambiguous, it matches: {}", candidates.join(", "))]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },
}

/// Errors raised while binding raw tokens to a command's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("No flag \"{flag}\" for command \"{fullname}\".")]
    UnknownFlag { flag: String, fullname: String },

    #[error("Flag \"{flag}\" requires a value.")]
    MissingFlagValue { flag: String },

    #[error("Flag \"--{flag}\" is required for command \"{fullname}\".")]
    MissingFlag { flag: String, fullname: String },

    #[error("Incorrect number of arguments for command \"{fullname}\", expected {expected}")]
    Arity { fullname: String, expected: String },

    #[error("Command \"{fullname}\" has no parameter \"{parameter}\".")]
    UnknownArgument { fullname: String, parameter: String },

    #[error("Argument \"{parameter}\" holds a \"{actual}\", not a \"{requested}\".")]
    ArgumentType {
        parameter: String,
        actual: String,
        requested: String,
    },
}

/// A raw token could not be converted to the expected type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not coerce \"{value}\" to a \"{type_name}\".")]
pub struct CoercionError {
    pub value: String,
    pub type_name: String,
}

/// Errors raised while loading user configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid value for {key}: '{value}'. Must be 'true' or 'false'")]
    InvalidValue { key: String, value: String },
}

/// Top-level error type for every terrorist-core operation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The handler ran and returned an error.
    #[error("Command \"{command}\" failed: {source:#}")]
    Execution {
        command: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Result type alias for terrorist-core operations
pub type Result<T> = std::result::Result<T, Error>;
