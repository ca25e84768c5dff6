//! terrorist-core - Command registration and dispatch
//!
//! Commands are registered under a namespaced name with a typed signature,
//! then run by name with raw string arguments:
//!
//! - [`Registry`]: fullname and short-name indices, registration checks
//! - [`binder`]: positional/flag separation, coercion, arity
//! - [`Dispatcher`]: resolution, invocation and the completion report
//! - [`types`]: declared types and the type resolver
//! - [`config`]: user configuration
//!
//! ```
//! use terrorist_core::{Command, Config, DeclaredType, Dispatcher, Registry, Signature, Value};
//!
//! # fn main() -> terrorist_core::Result<()> {
//! let mut registry = Registry::new();
//! Command::builder("greet", |args| {
//!     let name: String = args.get("name")?;
//!     let times: Option<i64> = args.get("times")?;
//!     let loud: bool = args.get("loud")?;
//!     let line = if loud { name.to_uppercase() } else { name };
//!     for _ in 0..times.unwrap_or(1) {
//!         println!("hello {line}");
//!     }
//!     Ok(())
//! })
//! .description("Say hello")
//! .signature(
//!     Signature::new()
//!         .positional("name", DeclaredType::STR)
//!         .positional_with_default("times", DeclaredType::optional(DeclaredType::INT), Value::Int(1))
//!         .switch("loud"),
//! )
//! .register(&mut registry)?;
//!
//! Dispatcher::new(&registry, Config::default()).run("greet", &["world", "--loud"])?;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod binder;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod types;

pub use binder::{bind, Arity, BoundArgs, CallArgs, FLAG_PREFIX};
pub use command::{Command, CommandBuilder, Handler, ParamKind, ParameterSpec, Signature};
pub use config::{load_config, load_config_from, Config, DispatchConfig};
pub use dispatcher::Dispatcher;
pub use error::{
    BindingError, CoercionError, ConfigError, Error, RegistrationError, ResolutionError, Result,
};
pub use registry::{Registry, Resolution};
pub use types::{
    coerce, display_name, expected_type, CustomType, DeclaredType, FromValue, ScalarType, Value,
};
