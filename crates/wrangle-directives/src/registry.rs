//! Directive registry.
//!
//! Maps directive names to their usage definitions and constructors. The
//! default registry holds every built-in directive and is built once.
//!
//! # Example
//!
//! ```
//! use wrangle_directives::default_registry;
//!
//! let mut step = default_registry().compose("swap :a :b").unwrap();
//! assert!(step.is_initialized());
//! step.destroy();
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use wrangle_model::ParseError;

use crate::arguments::Arguments;
use crate::column::Swap;
use crate::directive::{Directive, DirectivePlugin};
use crate::step::Step;
use crate::tokenizer::parse_step;
use crate::usage::UsageDefinition;

/// Everything needed to build a directive by name.
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    define: fn() -> UsageDefinition,
    create: fn(&Arguments) -> Result<Box<dyn Directive>, ParseError>,
}

impl Registration {
    /// Registration for the directive type `D`.
    pub fn of<D: DirectivePlugin>() -> Self {
        Self {
            name: D::NAME,
            description: D::DESCRIPTION,
            category: D::CATEGORY,
            define: D::define,
            create: create_boxed::<D>,
        }
    }

    /// Usage definition of the directive.
    pub fn define(&self) -> UsageDefinition {
        (self.define)()
    }

    /// Build a directive instance from bound arguments.
    ///
    /// # Errors
    ///
    /// Returns the directive's [`ParseError`].
    pub fn create(&self, args: &Arguments) -> Result<Box<dyn Directive>, ParseError> {
        (self.create)(args)
    }
}

fn create_boxed<D: DirectivePlugin>(args: &Arguments) -> Result<Box<dyn Directive>, ParseError> {
    Ok(Box::new(D::initialize(args)?))
}

/// Registry of directives indexed by lower-case name.
#[derive(Debug, Default)]
pub struct DirectiveRegistry {
    directives: BTreeMap<String, Registration>,
}

impl DirectiveRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directive, replacing any with the same name.
    pub fn register(&mut self, registration: Registration) {
        self.directives
            .insert(registration.name.to_ascii_lowercase(), registration);
    }

    /// Look up a directive by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&Registration> {
        self.directives.get(&name.to_ascii_lowercase())
    }

    /// An uninitialized step for the directive `name`.
    ///
    /// # Errors
    ///
    /// [`ParseError::UnknownDirective`] if `name` is not registered.
    pub fn step(&self, name: &str) -> Result<Step, ParseError> {
        self.get(name)
            .map(|registration| Step::new(*registration))
            .ok_or_else(|| ParseError::UnknownDirective(name.to_string()))
    }

    /// Parse a recipe step such as `swap :a :b` into an initialized step.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed text, unknown directives or
    /// invalid arguments.
    pub fn compose(&self, text: &str) -> Result<Step, ParseError> {
        let parsed = parse_step(text)?;
        let mut step = self.step(&parsed.directive)?;
        step.initialize(parsed.tokens)?;
        Ok(step)
    }

    /// Registrations ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &Registration> + '_ {
        self.directives.values()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

static DEFAULT_REGISTRY: OnceLock<DirectiveRegistry> = OnceLock::new();

/// Registry with all built-in directives, built on first access.
pub fn default_registry() -> &'static DirectiveRegistry {
    DEFAULT_REGISTRY.get_or_init(build_default_registry)
}

fn build_default_registry() -> DirectiveRegistry {
    let mut registry = DirectiveRegistry::new();
    registry.register(Registration::of::<Swap>());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_swap() {
        let registry = default_registry();
        let swap = registry.get("swap").unwrap();
        assert_eq!(swap.name, "swap");
        assert_eq!(swap.category, "column");
        assert_eq!(swap.define().usage(), "swap :left :right");
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(default_registry().get("SWAP").map(|r| r.name), Some("swap"));
    }

    #[test]
    fn unknown_directive_is_reported() {
        let error = default_registry().compose("explode :a").unwrap_err();
        assert_eq!(error, ParseError::UnknownDirective("explode".into()));
    }

    #[test]
    fn compose_propagates_binding_errors() {
        let error = default_registry().compose("swap :a").unwrap_err();
        assert_eq!(
            error,
            ParseError::MissingArgument {
                directive: "swap".into(),
                parameter: "right".into(),
            }
        );
    }
}
