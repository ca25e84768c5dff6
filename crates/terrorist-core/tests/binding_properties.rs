#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Property tests for registration and argument binding.

use std::sync::Arc;

use proptest::prelude::*;
use terrorist_core::{
    bind, BindingError, Command, CommandBuilder, DeclaredType, Error, Registry, RegistrationError,
    Signature, Value,
};

// ═══════════════════════════════════════════════════════════════════════════
// DETERMINISTIC CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════

fn deterministic_config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        max_shrink_iters: 1024,
        ..ProptestConfig::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// GENERATORS
// ═══════════════════════════════════════════════════════════════════════════

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

fn builder(namespace: Option<&str>, name: &str) -> CommandBuilder {
    let builder = Command::builder(name, |_| Ok(()));
    match namespace {
        Some(ns) => builder.namespace(ns),
        None => builder,
    }
}

/// `required` string positionals, then `optional` int positionals with
/// defaults, plus one switch that must never count toward arity.
fn arity_command(required: usize, optional: usize) -> Arc<Command> {
    let mut signature = Signature::new().switch("verbose");
    for i in 0..required {
        signature = signature.positional(format!("req{i}"), DeclaredType::STR);
    }
    for i in 0..optional {
        signature = signature.positional_with_default(format!("opt{i}"), DeclaredType::INT, Value::Int(0));
    }

    let mut registry = Registry::new();
    builder(None, "cmd")
        .signature(signature)
        .register(&mut registry)
        .unwrap()
}

fn tokens(count: usize) -> Vec<String> {
    (0..count).map(|i| i.to_string()).collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(deterministic_config())]

    /// A second registration with the same fullname fails and changes nothing.
    #[test]
    fn prop_duplicate_fullname_rejected(
        namespace in proptest::option::of(identifier()),
        name in identifier(),
    ) {
        let mut registry = Registry::new();
        registry.register(builder(namespace.as_deref(), &name)).unwrap();
        let before = registry.len();

        let result = registry.register(builder(namespace.as_deref(), &name));

        let is_duplicate = matches!(
            result,
            Err(Error::Registration(RegistrationError::DuplicateCommand { .. }))
        );
        prop_assert!(is_duplicate);
        prop_assert_eq!(registry.len(), before);
    }

    /// Binding succeeds exactly for positional counts in `[m, k]`.
    #[test]
    fn prop_arity_range(required in 0usize..4, optional in 0usize..4, supplied in 0usize..10) {
        let command = arity_command(required, optional);
        let mut raw = tokens(supplied);
        raw.insert(0, "--verbose".to_string());

        let result = bind(&command, &raw);

        if (required..=required + optional).contains(&supplied) {
            prop_assert!(result.is_ok());
            prop_assert_eq!(result.unwrap().positional().len(), supplied);
        } else {
            let is_arity = matches!(result, Err(Error::Binding(BindingError::Arity { .. })));
            prop_assert!(is_arity);
        }
    }

    /// A boolean flag never swallows the token after it.
    #[test]
    fn prop_boolean_flag_consumes_nothing(word in "[a-z]{1,10}") {
        let mut registry = Registry::new();
        let command = builder(None, "say")
            .signature(Signature::new().positional("message", DeclaredType::STR).switch("verbose"))
            .register(&mut registry)
            .unwrap();

        let bound = bind(&command, &["--verbose".to_string(), word.clone()]).unwrap();

        prop_assert_eq!(bound.positional(), &[Value::Str(word)][..]);
        prop_assert_eq!(bound.flags().get("verbose"), Some(&Value::Bool(true)));
    }

    /// Integer flags coerce the following token.
    #[test]
    fn prop_int_flag_coerces(count in any::<i64>()) {
        let mut registry = Registry::new();
        let command = builder(None, "repeat")
            .signature(Signature::new().flag_with_default("count", DeclaredType::INT, Value::Int(1)))
            .register(&mut registry)
            .unwrap();

        let bound = bind(&command, &["--count".to_string(), count.to_string()]).unwrap();

        prop_assert_eq!(bound.flags().get("count"), Some(&Value::Int(count)));
    }
}
