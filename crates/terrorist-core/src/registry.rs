//! Command registry
//!
//! Two indices over the same set of commands: `by_fullname` (unique) and
//! `by_shortname` (one to many). Both are only written by [`Registry::register`],
//! which takes `&mut self`, so they always change together.

use std::{collections::HashMap, sync::Arc};

use itertools::Itertools;

use crate::{
    command::{Command, CommandBuilder},
    error::{RegistrationError, ResolutionError},
    Result,
};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: Vec<Arc<Command>>,
    by_fullname: HashMap<String, Arc<Command>>,
    by_shortname: HashMap<String, Vec<Arc<Command>>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Validate and insert a command.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A parameter has no declared type, or is declared twice
    /// - A default does not fit its parameter's type
    /// - The fullname is already registered
    ///
    /// On error the registry is left untouched.
    pub fn register(&mut self, builder: CommandBuilder) -> Result<Arc<Command>> {
        let fullname = builder.fullname();
        if self.by_fullname.contains_key(&fullname) {
            return Err(RegistrationError::DuplicateCommand { fullname }.into());
        }

        let command = Arc::new(builder.build()?);

        self.by_fullname.insert(fullname, Arc::clone(&command));
        self.by_shortname
            .entry(command.name().to_string())
            .or_default()
            .push(Arc::clone(&command));
        self.commands.push(Arc::clone(&command));

        tracing::debug!(
            command = command.fullname(),
            parameters = command.parameters().len(),
            "registered command"
        );

        Ok(command)
    }

    /// Exact fullname lookup, no short-name fallback.
    #[must_use]
    pub fn get(&self, fullname: &str) -> Option<&Arc<Command>> {
        self.by_fullname.get(fullname)
    }

    /// Every command, in registration order.
    #[must_use]
    pub fn get_all(&self) -> &[Arc<Command>] {
        &self.commands
    }

    /// Resolve `name` to zero, one or many commands.
    ///
    /// An exact fullname always wins. Otherwise, only when
    /// `short_name_resolution` is on, every command with that short name matches.
    #[must_use]
    pub fn resolve(&self, name: &str, short_name_resolution: bool) -> Resolution {
        let matches = match self.by_fullname.get(name) {
            Some(command) => vec![Arc::clone(command)],
            None if short_name_resolution => {
                self.by_shortname.get(name).cloned().unwrap_or_default()
            }
            None => Vec::new(),
        };

        Resolution {
            name: name.to_string(),
            matches,
        }
    }
}

/// Outcome of [`Registry::resolve`].
#[derive(Debug, Clone)]
pub struct Resolution {
    name: String,
    matches: Vec<Arc<Command>>,
}

impl Resolution {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn matches(&self) -> &[Arc<Command>] {
        &self.matches
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.matches.len() > 1
    }

    /// The match, if there is exactly one.
    #[must_use]
    pub fn single(&self) -> Option<&Arc<Command>> {
        match self.matches.as_slice() {
            [command] => Some(command),
            _ => None,
        }
    }

    /// Demand exactly one match.
    ///
    /// # Errors
    ///
    /// `NotFound` for zero matches, `Ambiguous` (listing every conflicting
    /// fullname, sorted) for several.
    pub fn into_single(self) -> std::result::Result<Arc<Command>, ResolutionError> {
        let mut matches = self.matches;
        match matches.len() {
            0 => Err(ResolutionError::NotFound { name: self.name }),
            1 => matches
                .pop()
                .ok_or(ResolutionError::NotFound { name: self.name }),
            _ => Err(ResolutionError::Ambiguous {
                name: self.name,
                candidates: matches
                    .iter()
                    .map(|command| command.fullname().to_string())
                    .sorted()
                    .collect(),
            }),
        }
    }
}
