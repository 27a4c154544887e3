//! Directive lifecycle.
//!
//! A [`Step`] owns one directive through
//! `Uninitialized -> Initialized -> Destroyed`. Using it out of order is
//! reported as a [`LifecycleError`] rather than ignored. Lifecycle transitions
//! need `&mut self` while executions only need `&self`, so initialize and
//! destroy cannot overlap an execution.

use tracing::{debug, info};
use wrangle_model::{ExecutionError, LifecycleError, Mutation, ParseError, Row, Token};
use wrangle_relational::{Relation, RelationError, RelationalContext};

use crate::arguments::Arguments;
use crate::directive::{Capabilities, Directive};
use crate::registry::Registration;

enum StepState {
    Uninitialized,
    Initialized(Box<dyn Directive>),
    Destroyed,
}

/// One directive in a pipeline, with its lifecycle state.
pub struct Step {
    registration: Registration,
    state: StepState,
}

impl Step {
    /// A step for `registration`, not yet initialized.
    pub fn new(registration: Registration) -> Self {
        Self {
            registration,
            state: StepState::Uninitialized,
        }
    }

    /// Directive name.
    pub fn name(&self) -> &'static str {
        self.registration.name
    }

    /// Usage string of the directive.
    pub fn usage(&self) -> String {
        self.registration.define().usage()
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, StepState::Initialized(_))
    }

    /// Bind `tokens` and build the directive instance.
    ///
    /// A failed bind leaves the step uninitialized.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for invalid arguments, or a lifecycle error if
    /// the step was already initialized or destroyed.
    pub fn initialize(&mut self, tokens: Vec<Token>) -> Result<(), ParseError> {
        match self.state {
            StepState::Uninitialized => {}
            StepState::Initialized(_) => {
                return Err(LifecycleError::AlreadyInitialized {
                    directive: self.name().to_string(),
                }
                .into());
            }
            StepState::Destroyed => {
                return Err(self.destroyed().into());
            }
        }

        let args = Arguments::bind(&self.registration.define(), tokens)?;
        let directive = self.registration.create(&args)?;
        info!(
            directive = self.name(),
            capabilities = %directive.capabilities(),
            "initialized directive"
        );
        self.state = StepState::Initialized(directive);
        Ok(())
    }

    /// Capabilities of the bound directive.
    ///
    /// # Errors
    ///
    /// Returns a lifecycle error unless the step is initialized.
    pub fn capabilities(&self) -> Result<Capabilities, LifecycleError> {
        Ok(self.directive()?.capabilities())
    }

    /// Run the directive row-wise over `rows`.
    ///
    /// # Errors
    ///
    /// Returns the directive's execution error, or a lifecycle error unless
    /// the step is initialized.
    pub fn execute(&self, rows: Vec<Row>) -> Result<Vec<Row>, ExecutionError> {
        let directive = self.directive()?;
        debug!(directive = self.name(), rows = rows.len(), "execute batch");
        directive.execute(rows)
    }

    /// Fold the directive into `relation`.
    ///
    /// # Errors
    ///
    /// [`RelationError::Unsupported`] when the directive has no relational
    /// form, otherwise whatever the directive reports.
    pub fn transform(
        &self,
        context: &RelationalContext,
        relation: &Relation,
    ) -> Result<Relation, RelationError> {
        let directive = self.directive()?;
        let Some(compiler) = directive.as_relational() else {
            return Err(RelationError::Unsupported {
                directive: self.name().to_string(),
            });
        };
        debug!(directive = self.name(), relation = relation.name(), "transform relation");
        compiler.transform(context, relation)
    }

    /// Lineage of the bound directive, if it reports any.
    ///
    /// # Errors
    ///
    /// Returns a lifecycle error unless the step is initialized.
    pub fn lineage(&self) -> Result<Option<Mutation>, LifecycleError> {
        Ok(self
            .directive()?
            .as_lineage()
            .map(|reporter| reporter.lineage()))
    }

    /// Release the directive. Safe in any state; repeated calls do nothing.
    pub fn destroy(&mut self) {
        if let StepState::Initialized(directive) = &mut self.state {
            directive.destroy();
            debug!(directive = self.name(), "destroyed directive");
        }
        self.state = StepState::Destroyed;
    }

    fn directive(&self) -> Result<&dyn Directive, LifecycleError> {
        match &self.state {
            StepState::Initialized(directive) => Ok(directive.as_ref()),
            StepState::Uninitialized => Err(LifecycleError::NotInitialized {
                directive: self.name().to_string(),
            }),
            StepState::Destroyed => Err(self.destroyed()),
        }
    }

    fn destroyed(&self) -> LifecycleError {
        LifecycleError::Destroyed {
            directive: self.name().to_string(),
        }
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            StepState::Uninitialized => "uninitialized",
            StepState::Initialized(_) => "initialized",
            StepState::Destroyed => "destroyed",
        };
        f.debug_struct("Step")
            .field("directive", &self.name())
            .field("state", &state)
            .finish()
    }
}
