//! Field-level lineage records.
//!
//! A [`Mutation`] is the provenance a directive reports about itself: a
//! sentence for people and a set of `outputs <- inputs` relations for tools.
//! It is a static property of a bound directive, so it never depends on the
//! rows that flowed through it.

use serde::{Deserialize, Serialize};

/// Output columns derived from input columns. Both sides may hold many names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRelation {
    pub outputs: Vec<String>,
    pub inputs: Vec<String>,
}

impl FieldRelation {
    /// Relation where every output derives from every input.
    pub fn new<O, I, S, T>(outputs: O, inputs: I) -> Self
    where
        O: IntoIterator<Item = S>,
        I: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            outputs: outputs.into_iter().map(Into::into).collect(),
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lineage reported by one directive instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    /// Human-readable description of the effect.
    pub readable: String,
    pub relations: Vec<FieldRelation>,
}

impl Mutation {
    /// Start building a mutation.
    pub fn builder() -> MutationBuilder {
        MutationBuilder::default()
    }

    /// Input columns the given output column derives from, in report order.
    pub fn inputs_of(&self, output: &str) -> Vec<&str> {
        self.relations
            .iter()
            .filter(|relation| relation.outputs.iter().any(|name| name == output))
            .flat_map(|relation| relation.inputs.iter().map(String::as_str))
            .collect()
    }

    /// All `(output, input)` pairs described by the relations.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let mut edges = Vec::new();
        for relation in &self.relations {
            for output in &relation.outputs {
                for input in &relation.inputs {
                    edges.push((output.as_str(), input.as_str()));
                }
            }
        }
        edges
    }
}

/// Builder for [`Mutation`].
#[derive(Debug, Default)]
pub struct MutationBuilder {
    readable: String,
    relations: Vec<FieldRelation>,
}

impl MutationBuilder {
    /// Set the human-readable description.
    #[must_use]
    pub fn readable(mut self, text: impl Into<String>) -> Self {
        self.readable = text.into();
        self
    }

    /// Record that `outputs` derive from `inputs`.
    #[must_use]
    pub fn relation<O, I, S, T>(mut self, outputs: O, inputs: I) -> Self
    where
        O: IntoIterator<Item = S>,
        I: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        self.relations.push(FieldRelation::new(outputs, inputs));
        self
    }

    /// Build the mutation.
    pub fn build(self) -> Mutation {
        Mutation {
            readable: self.readable,
            relations: self.relations,
        }
    }
}
