//! Command definitions
//!
//! A [`Command`] is built from a [`CommandBuilder`]: a handler closure plus a
//! statically declared [`Signature`]. The signature is validated when the
//! command is registered and frozen into [`ParameterSpec`]s.

use std::{collections::HashSet, fmt, sync::Arc};

use crate::{
    binder::CallArgs,
    error::RegistrationError,
    registry::Registry,
    types::{display_name, expected_type, DeclaredType, Value},
    Result,
};

/// Uniform invocation shape shared by every registered command.
pub type Handler = Arc<dyn Fn(&CallArgs) -> anyhow::Result<()> + Send + Sync>;

/// How a parameter receives its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Filled from bare tokens, in declaration order.
    Positional,
    /// Only settable as `--name [value]`.
    FlagOnly,
}

/// A validated, immutable parameter of a registered command.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    name: String,
    declared: DeclaredType,
    kind: ParamKind,
    default: Option<Value>,
}

impl ParameterSpec {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type that raw tokens for this parameter are coerced into.
    #[must_use]
    pub fn expected_type(&self) -> &DeclaredType {
        expected_type(&self.declared)
    }

    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        self.kind
    }

    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    #[must_use]
    pub fn is_flag(&self) -> bool {
        self.kind == ParamKind::FlagOnly
    }
}

#[derive(Debug, Clone)]
struct ParamDecl {
    name: String,
    declared: Option<DeclaredType>,
    kind: ParamKind,
    default: Option<Value>,
}

/// Parameter list declared by the implementer of a command.
///
/// # Example
///
/// ```
/// use terrorist_core::{DeclaredType, Signature, Value};
///
/// let signature = Signature::new()
///     .positional("name", DeclaredType::STR)
///     .positional_with_default("times", DeclaredType::optional(DeclaredType::INT), Value::Int(1))
///     .switch("loud");
/// assert_eq!(signature.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Signature {
    params: Vec<ParamDecl>,
}

impl Signature {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Required positional parameter.
    pub fn positional(self, name: impl Into<String>, ty: DeclaredType) -> Self {
        self.push(name, Some(ty), ParamKind::Positional, None)
    }

    /// Positional parameter that may be omitted.
    pub fn positional_with_default(
        self,
        name: impl Into<String>,
        ty: DeclaredType,
        default: Value,
    ) -> Self {
        self.push(name, Some(ty), ParamKind::Positional, Some(default))
    }

    /// Flag-only parameter that must be supplied.
    pub fn flag(self, name: impl Into<String>, ty: DeclaredType) -> Self {
        self.push(name, Some(ty), ParamKind::FlagOnly, None)
    }

    /// Flag-only parameter that may be omitted.
    pub fn flag_with_default(self, name: impl Into<String>, ty: DeclaredType, default: Value) -> Self {
        self.push(name, Some(ty), ParamKind::FlagOnly, Some(default))
    }

    /// Boolean flag, `false` unless present.
    pub fn switch(self, name: impl Into<String>) -> Self {
        self.flag_with_default(name, DeclaredType::BOOL, Value::Bool(false))
    }

    /// Positional parameter with no declared type. Registration rejects it.
    pub fn untyped(self, name: impl Into<String>) -> Self {
        self.push(name, None, ParamKind::Positional, None)
    }

    fn push(
        mut self,
        name: impl Into<String>,
        declared: Option<DeclaredType>,
        kind: ParamKind,
        default: Option<Value>,
    ) -> Self {
        self.params.push(ParamDecl {
            name: name.into(),
            declared,
            kind,
            default,
        });
        self
    }

    fn into_parameters(
        self,
        fullname: &str,
    ) -> std::result::Result<Vec<ParameterSpec>, RegistrationError> {
        let mut seen = HashSet::new();

        self.params
            .into_iter()
            .map(|decl| {
                let declared = decl.declared.ok_or_else(|| RegistrationError::MissingType {
                    fullname: fullname.to_string(),
                    parameter: decl.name.clone(),
                })?;

                if !seen.insert(decl.name.clone()) {
                    return Err(RegistrationError::DuplicateParameter {
                        fullname: fullname.to_string(),
                        parameter: decl.name,
                    });
                }

                if let Some(default) = &decl.default {
                    if !declared.admits(default) {
                        return Err(RegistrationError::InvalidDefault {
                            fullname: fullname.to_string(),
                            parameter: decl.name,
                            type_name: display_name(&declared),
                        });
                    }
                }

                Ok(ParameterSpec {
                    name: decl.name,
                    declared,
                    kind: decl.kind,
                    default: decl.default,
                })
            })
            .collect()
    }
}

/// A registered command. Immutable; identity is its fullname.
pub struct Command {
    namespace: Option<String>,
    name: String,
    fullname: String,
    description: String,
    doc: Option<String>,
    parameters: Vec<ParameterSpec>,
    completion_output: bool,
    handler: Handler,
}

impl Command {
    /// Start declaring a command named `name` that runs `handler`.
    pub fn builder<F>(name: impl Into<String>, handler: F) -> CommandBuilder
    where
        F: Fn(&CallArgs) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        CommandBuilder {
            namespace: None,
            name: name.into(),
            description: String::new(),
            doc: None,
            completion_output: true,
            signature: Signature::new(),
            handler: Arc::new(handler),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Unqualified name, shared across namespaces.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `namespace.name`, or `name` without a namespace.
    #[must_use]
    pub fn fullname(&self) -> &str {
        &self.fullname
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Longer documentation shown by `help`.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    #[must_use]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    #[must_use]
    pub const fn completion_output(&self) -> bool {
        self.completion_output
    }

    pub fn positional_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|p| !p.is_flag())
    }

    pub fn flag_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|p| p.is_flag())
    }

    /// Flag-only parameter called `name`.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<&ParameterSpec> {
        self.flag_parameters().find(|p| p.name == name)
    }

    pub(crate) fn invoke(&self, args: &CallArgs) -> anyhow::Result<()> {
        (self.handler)(args)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("fullname", &self.fullname)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("completion_output", &self.completion_output)
            .finish_non_exhaustive()
    }
}

/// Fluent declaration of a command, consumed by [`Registry::register`].
pub struct CommandBuilder {
    namespace: Option<String>,
    name: String,
    description: String,
    doc: Option<String>,
    completion_output: bool,
    signature: Signature,
    handler: Handler,
}

impl CommandBuilder {
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Whether the dispatcher prints the `Succeeded`/`Failed` timing line.
    pub const fn completion_output(mut self, enabled: bool) -> Self {
        self.completion_output = enabled;
        self
    }

    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    #[must_use]
    pub fn fullname(&self) -> String {
        self.namespace
            .as_ref()
            .map_or_else(|| self.name.clone(), |ns| format!("{ns}.{}", self.name))
    }

    /// Register into `registry`, returning the frozen command.
    pub fn register(self, registry: &mut Registry) -> Result<Arc<Command>> {
        registry.register(self)
    }

    pub(crate) fn build(self) -> std::result::Result<Command, RegistrationError> {
        let fullname = self.fullname();
        let parameters = self.signature.into_parameters(&fullname)?;

        Ok(Command {
            namespace: self.namespace,
            name: self.name,
            fullname,
            description: self.description,
            doc: self.doc,
            parameters,
            completion_output: self.completion_output,
            handler: self.handler,
        })
    }
}
