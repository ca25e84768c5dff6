//! Dispatcher: resolve a name, bind its arguments, run it, report.

use std::{io::Write, sync::Arc, time::Instant};

use crate::{
    binder::{bind, CallArgs},
    command::Command,
    config::Config,
    registry::{Registry, Resolution},
    Error, Result,
};

/// Runs commands from a frozen [`Registry`].
///
/// The [`Config`] is owned: later changes to the caller's copy have no effect.
#[derive(Debug)]
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    config: Config,
}

impl<'a> Dispatcher<'a> {
    #[must_use]
    pub const fn new(registry: &'a Registry, config: Config) -> Self {
        Self { registry, config }
    }

    #[must_use]
    pub const fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve using the configured short-name policy.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Resolution {
        let resolution = self
            .registry
            .resolve(name, self.config.short_name_resolution());
        tracing::debug!(
            name,
            matches = resolution.matches().len(),
            short_names = self.config.short_name_resolution(),
            "resolved command name"
        );
        resolution
    }

    /// Resolve `name` to exactly one command.
    ///
    /// # Errors
    ///
    /// Returns an error if no command matches, or several do. The ambiguity
    /// error lists every conflicting fullname.
    pub fn lookup(&self, name: &str) -> Result<Arc<Command>> {
        Ok(self.resolve(name).into_single()?)
    }

    /// [`Dispatcher::run_with_output`] reporting to stdout.
    pub fn run<S: AsRef<str>>(&self, name: &str, raw_args: &[S]) -> Result<()> {
        self.run_with_output(name, raw_args, &mut std::io::stdout())
    }

    /// Resolve, bind and invoke `name`, writing the completion report to `out`.
    ///
    /// The report (`Succeeded: 0.001s` / `Failed: 0.001s`) is written only for
    /// commands with `completion_output`, and only once the handler has run.
    /// A failed handler's error is returned after the report.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name resolves to zero or several commands
    /// - The arguments do not bind
    /// - The handler fails
    pub fn run_with_output<S, W>(&self, name: &str, raw_args: &[S], out: &mut W) -> Result<()>
    where
        S: AsRef<str>,
        W: Write + ?Sized,
    {
        let command = self.lookup(name)?;
        let bound = bind(&command, raw_args)?;
        let args = CallArgs::from_bound(&command, bound);

        let started = Instant::now();
        let outcome = command.invoke(&args);
        let elapsed = started.elapsed().as_secs_f64();

        if command.completion_output() {
            let label = if outcome.is_ok() { "Succeeded" } else { "Failed" };
            if let Err(e) = writeln!(out, "{label}: {elapsed:.3}s") {
                tracing::warn!(command = command.fullname(), "Failed to write completion report: {e}");
            }
        }

        tracing::info!(
            command = command.fullname(),
            elapsed_secs = elapsed,
            succeeded = outcome.is_ok(),
            "command finished"
        );

        outcome.map_err(|source| Error::Execution {
            command: command.fullname().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::{error::ResolutionError, types::DeclaredType, Signature};

    fn counting(registry: &mut Registry, namespace: &str, name: &str) -> Result<Arc<AtomicUsize>> {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        registry.register(
            Command::builder(name, move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .namespace(namespace),
        )?;
        Ok(calls)
    }

    #[test]
    fn test_run_reports_success() -> Result<()> {
        let mut registry = Registry::new();
        let calls = counting(&mut registry, "ns", "build")?;
        let dispatcher = Dispatcher::new(&registry, Config::default());

        let mut out: Vec<u8> = Vec::new();
        dispatcher.run_with_output::<&str, _>("ns.build", &[], &mut out)?;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let report = String::from_utf8_lossy(&out);
        assert!(report.starts_with("Succeeded: "));
        assert!(report.trim_end().ends_with('s'));
        Ok(())
    }

    #[test]
    fn test_failed_handler_reports_then_propagates() -> Result<()> {
        let mut registry = Registry::new();
        registry.register(Command::builder("explode", |_| anyhow::bail!("boom")))?;
        let dispatcher = Dispatcher::new(&registry, Config::default());

        let mut out: Vec<u8> = Vec::new();
        let result = dispatcher.run_with_output::<&str, _>("explode", &[], &mut out);

        assert!(matches!(result, Err(Error::Execution { ref command, .. }) if command == "explode"));
        assert!(String::from_utf8_lossy(&out).starts_with("Failed: "));
        Ok(())
    }

    #[test]
    fn test_completion_output_disabled() -> Result<()> {
        let mut registry = Registry::new();
        registry.register(Command::builder("quiet", |_| Ok(())).completion_output(false))?;
        let dispatcher = Dispatcher::new(&registry, Config::default());

        let mut out: Vec<u8> = Vec::new();
        dispatcher.run_with_output::<&str, _>("quiet", &[], &mut out)?;
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn test_binding_failure_skips_handler_and_report() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut registry = Registry::new();
        registry.register(
            Command::builder("count", move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .signature(Signature::new().positional("n", DeclaredType::INT)),
        )?;
        let dispatcher = Dispatcher::new(&registry, Config::default());

        let mut out: Vec<u8> = Vec::new();
        let result = dispatcher.run_with_output("count", &["seven"], &mut out);

        assert!(matches!(result, Err(Error::Coercion(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn test_ambiguity_enumerated_on_run() -> Result<()> {
        let mut registry = Registry::new();
        counting(&mut registry, "ns2", "build")?;
        counting(&mut registry, "ns1", "build")?;
        let dispatcher = Dispatcher::new(&registry, Config::default().with_short_name_resolution(true));

        let result = dispatcher.run::<&str>("build", &[]);
        assert!(matches!(
            result,
            Err(Error::Resolution(ResolutionError::Ambiguous { ref candidates, .. }))
                if candidates == &["ns1.build".to_string(), "ns2.build".to_string()]
        ));
        Ok(())
    }

    #[test]
    fn test_short_names_off_by_default() -> Result<()> {
        let mut registry = Registry::new();
        counting(&mut registry, "ns1", "build")?;
        let dispatcher = Dispatcher::new(&registry, Config::default());

        assert!(matches!(
            dispatcher.lookup("build"),
            Err(Error::Resolution(ResolutionError::NotFound { .. }))
        ));
        assert!(dispatcher.lookup("ns1.build").is_ok());
        Ok(())
    }

    #[test]
    fn test_config_is_snapshotted_at_construction() -> Result<()> {
        let mut registry = Registry::new();
        counting(&mut registry, "ns1", "build")?;

        let mut config = Config::default().with_short_name_resolution(true);
        let dispatcher = Dispatcher::new(&registry, config.clone());
        config = config.with_short_name_resolution(false);

        assert!(!config.short_name_resolution());
        assert!(dispatcher.config().short_name_resolution());
        assert_eq!(dispatcher.registry().len(), 1);
        assert!(dispatcher.lookup("build").is_ok());
        Ok(())
    }
}
