//! Builtin commands: `list` and `help`
//!
//! Both only read the registry's public surface. Their handlers are `'static`
//! closures living inside the registry they describe, so they read a frozen
//! [`Catalog`] snapshot through a `Weak` handle instead of borrowing it.

use std::sync::{Arc, OnceLock, Weak};

use anyhow::Result;
use itertools::Itertools;
use terrorist_core::{
    display_name, Command, Config, DeclaredType, Registry, ResolutionError, Signature, Value,
};

pub const LIST: &str = "list";
pub const HELP: &str = "help";

/// Usage column is at least this wide in `list` output.
const MIN_USAGE_WIDTH: usize = 32;

/// Read-only view of the finished registry, filled once registration is done.
#[derive(Debug, Default)]
pub struct Catalog {
    frozen: OnceLock<(Registry, Config)>,
}

impl Catalog {
    /// Snapshot `registry`. Later calls are ignored.
    pub fn freeze(&self, registry: &Registry, config: &Config) {
        if self.frozen.set((registry.clone(), config.clone())).is_err() {
            tracing::debug!("Catalog already frozen, ignoring");
        }
    }

    fn get(&self) -> Result<&(Registry, Config)> {
        self.frozen
            .get()
            .ok_or_else(|| anyhow::anyhow!("Command catalog is not ready"))
    }
}

fn upgrade(catalog: &Weak<Catalog>) -> Result<Arc<Catalog>> {
    catalog
        .upgrade()
        .ok_or_else(|| anyhow::anyhow!("Command catalog is no longer available"))
}

/// Register `list` and `help` into `registry`.
///
/// # Errors
///
/// Returns an error if either name is already taken.
pub fn register(registry: &mut Registry, catalog: &Arc<Catalog>) -> Result<()> {
    let weak = Arc::downgrade(catalog);
    Command::builder(LIST, move |args| {
        let catalog = upgrade(&weak)?;
        let (registry, _) = catalog.get()?;
        let namespace: Option<String> = args.get("namespace")?;
        for line in list_lines(registry.get_all(), namespace.as_deref()) {
            println!("{line}");
        }
        Ok(())
    })
    .description("List all commands")
    .completion_output(false)
    .signature(Signature::new().positional_with_default(
        "namespace",
        DeclaredType::optional(DeclaredType::STR),
        Value::None,
    ))
    .register(registry)?;

    let weak = Arc::downgrade(catalog);
    Command::builder(HELP, move |args| {
        let catalog = upgrade(&weak)?;
        let (registry, config) = catalog.get()?;
        let name: String = args.get("name")?;
        let resolution = registry.resolve(&name, config.short_name_resolution());
        match resolution.into_single() {
            Ok(command) => print!("{}", help_text(&command)),
            Err(ResolutionError::NotFound { .. }) => println!("No command \"{name}\"."),
            Err(ambiguous) => println!("{ambiguous}"),
        }
        Ok(())
    })
    .description("See command usage")
    .completion_output(false)
    .signature(Signature::new().positional("name", DeclaredType::STR))
    .register(registry)?;

    Ok(())
}

/// Compact usage for `list`: `fullname req [opt] [FLAGS]`.
pub fn list_usage(command: &Command) -> String {
    let mut usage = command.fullname().to_string();
    for parameter in command.positional_parameters() {
        if parameter.has_default() {
            usage.push_str(&format!(" [{}]", parameter.name()));
        } else {
            usage.push_str(&format!(" {}", parameter.name()));
        }
    }
    if command.flag_parameters().next().is_some() {
        usage.push_str(" [FLAGS]");
    }
    usage
}

/// One right-aligned line per command, optionally limited to a namespace.
pub fn list_lines(commands: &[Arc<Command>], namespace: Option<&str>) -> Vec<String> {
    let prefix = namespace.map(|ns| format!("{ns}."));
    let entries: Vec<(String, &str)> = commands
        .iter()
        .filter(|command| {
            prefix
                .as_deref()
                .map_or(true, |p| command.fullname().to_lowercase().starts_with(p))
        })
        .map(|command| (list_usage(command), command.description()))
        .collect();

    let width = entries
        .iter()
        .map(|(usage, _)| usage.chars().count())
        .max()
        .map_or(MIN_USAGE_WIDTH, |longest| longest.max(MIN_USAGE_WIDTH));

    entries
        .iter()
        .map(|(usage, description)| format!("{usage:>width$}\t{description}"))
        .collect()
}

/// Typed usage for `help`: `fullname name:str [times:int=1] [--loud]`.
pub fn usage_line(command: &Command) -> String {
    let mut usage = command.fullname().to_string();
    for parameter in command.parameters() {
        let name = parameter.name();
        let expected = parameter.expected_type();
        let type_name = display_name(expected);
        let part = if parameter.is_flag() {
            if *expected == DeclaredType::BOOL {
                format!(" [--{name}]")
            } else {
                format!(" [--{name} {type_name}]")
            }
        } else if let Some(default) = parameter.default() {
            format!(" [{name}:{type_name}={default}]")
        } else {
            format!(" {name}:{type_name}")
        };
        usage.push_str(&part);
    }
    usage
}

/// Usage line, description, then the trimmed doc text.
pub fn help_text(command: &Command) -> String {
    let mut text = usage_line(command);
    text.push('\n');

    if !command.description().is_empty() {
        text.push_str(command.description());
        text.push('\n');
    }

    if let Some(doc) = command.doc() {
        let body = dedent(doc);
        if !body.is_empty() {
            text.push('\n');
            text.push_str(&body);
            text.push('\n');
        }
    }

    text
}

/// Strip the common leading indentation, then surrounding blank lines.
fn dedent(doc: &str) -> String {
    let indent = doc
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    doc.lines()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Result<Registry> {
        let mut registry = Registry::new();
        Command::builder("greet", |_| Ok(()))
            .description("Say hello")
            .doc("\n    Greets someone.\n\n      Indented example.\n")
            .signature(
                Signature::new()
                    .positional("name", DeclaredType::STR)
                    .positional_with_default(
                        "times",
                        DeclaredType::optional(DeclaredType::INT),
                        Value::Int(1),
                    )
                    .switch("loud")
                    .flag_with_default("style", DeclaredType::STR, Value::Str("plain".to_string())),
            )
            .register(&mut registry)?;
        Command::builder("build", |_| Ok(()))
            .namespace("web")
            .description("Build the site")
            .register(&mut registry)?;
        Ok(registry)
    }

    #[test]
    fn test_list_usage() -> Result<()> {
        let registry = sample()?;
        let greet = registry.get("greet").ok_or_else(|| anyhow::anyhow!("missing"))?;
        assert_eq!(list_usage(greet), "greet name [times] [FLAGS]");
        Ok(())
    }

    #[test]
    fn test_list_lines_alignment() -> Result<()> {
        let registry = sample()?;
        let lines = list_lines(registry.get_all(), None);

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!("{:>32}\tSay hello", "greet name [times] [FLAGS]")
        );
        assert_eq!(lines[1], format!("{:>32}\tBuild the site", "web.build"));
        Ok(())
    }

    #[test]
    fn test_list_lines_namespace_filter() -> Result<()> {
        let registry = sample()?;
        let lines = list_lines(registry.get_all(), Some("web"));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].trim_start().starts_with("web.build"));
        Ok(())
    }

    #[test]
    fn test_list_lines_grow_past_minimum_width() -> Result<()> {
        let mut registry = Registry::new();
        let long_name = "a".repeat(40);
        Command::builder(long_name.clone(), |_| Ok(())).register(&mut registry)?;

        let lines = list_lines(registry.get_all(), None);
        assert_eq!(lines, vec![format!("{long_name}\t")]);
        Ok(())
    }

    #[test]
    fn test_list_lines_align_non_ascii_names() -> Result<()> {
        let mut registry = Registry::new();
        Command::builder("café", |_| Ok(()))
            .description("Brew")
            .register(&mut registry)?;
        Command::builder("build", |_| Ok(()))
            .description("Build")
            .register(&mut registry)?;

        let lines = list_lines(registry.get_all(), None);
        let columns: Vec<usize> = lines
            .iter()
            .filter_map(|line| line.split('\t').next())
            .map(|usage| usage.chars().count())
            .collect();
        assert_eq!(columns, vec![32, 32]);

        let long_name = "é".repeat(40);
        Command::builder(long_name.clone(), |_| Ok(())).register(&mut registry)?;
        let lines = list_lines(registry.get_all(), None);
        assert_eq!(lines[0], format!("{:>40}\tBrew", "café"));
        assert_eq!(lines[2], format!("{long_name}\t"));
        Ok(())
    }

    #[test]
    fn test_usage_line() -> Result<()> {
        let registry = sample()?;
        let greet = registry.get("greet").ok_or_else(|| anyhow::anyhow!("missing"))?;
        assert_eq!(
            usage_line(greet),
            "greet name:str [times:int=1] [--loud] [--style str]"
        );
        Ok(())
    }

    #[test]
    fn test_help_text() -> Result<()> {
        let registry = sample()?;
        let greet = registry.get("greet").ok_or_else(|| anyhow::anyhow!("missing"))?;
        assert_eq!(
            help_text(greet),
            "greet name:str [times:int=1] [--loud] [--style str]\n\
             Say hello\n\
             \n\
             Greets someone.\n\
             \n  Indented example.\n"
        );
        Ok(())
    }

    #[test]
    fn test_help_text_without_description_or_doc() -> Result<()> {
        let registry = sample()?;
        let build = registry.get("web.build").ok_or_else(|| anyhow::anyhow!("missing"))?;
        assert_eq!(help_text(build), "web.build\n");
        Ok(())
    }

    #[test]
    fn test_register_builtins() -> Result<()> {
        let mut registry = Registry::new();
        let catalog = Arc::new(Catalog::default());
        register(&mut registry, &catalog)?;

        let list = registry.get(LIST).ok_or_else(|| anyhow::anyhow!("missing"))?;
        assert!(!list.completion_output());
        assert_eq!(usage_line(list), "list [namespace:str=None]");
        assert!(register(&mut registry, &catalog).is_err());
        Ok(())
    }
}
