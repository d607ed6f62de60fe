// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Token processing pipelines.
//!
//! A pipeline is an ordered stack of labeled functions, each mapping a
//! token to zero, one or several replacement tokens. Documents run through
//! the build pipeline on their way into the index; query terms run through
//! the search pipeline before vocabulary expansion.
//!
//! Pipelines serialize as their list of labels, so every function that
//! appears in a serialized index must be present in the process-wide
//! registry when that index is loaded. The built-in functions are
//! registered up front; custom ones go through
//! [`Pipeline::register_function`]. Registering the same label twice
//! replaces the previous entry with a warning.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, LazyLock};

use log::warn;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::filters;
use crate::token::{Metadata, Token};

/// The process-wide label → function registry.
static REGISTRY: LazyLock<RwLock<HashMap<String, PipelineFunction>>> = LazyLock::new(|| {
    let mut registry = HashMap::new();
    for function in filters::builtin_functions() {
        registry.insert(function.label().to_string(), function);
    }
    RwLock::new(registry)
});

/// A labeled pipeline stage.
///
/// The function receives the token, the token's position in the current
/// list, and the whole list. It returns the replacement tokens: an empty
/// vector drops the token, several tokens expand it. Expanded tokens are
/// not re-fed into the same stage within the same run.
#[derive(Clone)]
pub struct PipelineFunction {
    label: String,
    function: Arc<dyn Fn(Token, usize, &[Token]) -> Vec<Token> + Send + Sync>,
}

impl PipelineFunction {
    pub fn new(
        label: impl Into<String>,
        function: impl Fn(Token, usize, &[Token]) -> Vec<Token> + Send + Sync + 'static,
    ) -> Self {
        PipelineFunction {
            label: label.into(),
            function: Arc::new(function),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn invoke(&self, token: Token, index: usize, tokens: &[Token]) -> Vec<Token> {
        (self.function)(token, index, tokens)
    }
}

impl fmt::Debug for PipelineFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineFunction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// An ordered stack of pipeline functions with per-field skip sets.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stack: Vec<PipelineFunction>,
    skip: HashMap<String, HashSet<String>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline::default()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Put a function into the process-wide registry, replacing (with a
    /// warning) any previous holder of the label.
    pub fn register_function(function: PipelineFunction) {
        let mut registry = REGISTRY.write();
        if registry.contains_key(function.label()) {
            warn!(
                "overwriting existing registered pipeline function {:?}",
                function.label()
            );
        }
        registry.insert(function.label().to_string(), function);
    }

    /// Fetch a function from the registry by label.
    pub fn registered_function(label: &str) -> Option<PipelineFunction> {
        REGISTRY.read().get(label).cloned()
    }

    /// Rebuild a pipeline from serialized labels. Every label must be
    /// registered.
    pub fn load(labels: &[String]) -> Result<Pipeline> {
        let mut pipeline = Pipeline::new();
        for label in labels {
            let function =
                Self::registered_function(label).ok_or_else(|| Error::UnregisteredFunction {
                    label: label.clone(),
                })?;
            pipeline.stack.push(function);
        }
        Ok(pipeline)
    }

    fn warn_if_not_registered(&self, function: &PipelineFunction) {
        if Self::registered_function(function.label()).is_none() {
            warn!(
                "pipeline function {:?} is not registered; serializing this index will \
                 produce a pipeline that cannot be loaded",
                function.label()
            );
        }
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.stack.iter().position(|f| f.label() == label)
    }

    /// Append functions to the end of the stack.
    pub fn add(&mut self, function: PipelineFunction) -> &mut Self {
        self.warn_if_not_registered(&function);
        self.stack.push(function);
        self
    }

    /// Insert a function before an existing one, identified by label.
    pub fn before(&mut self, existing_label: &str, function: PipelineFunction) -> Result<()> {
        self.warn_if_not_registered(&function);
        let position = self
            .position(existing_label)
            .ok_or_else(|| Error::AnchorNotFound {
                label: existing_label.to_string(),
            })?;
        self.stack.insert(position, function);
        Ok(())
    }

    /// Insert a function after an existing one, identified by label.
    pub fn after(&mut self, existing_label: &str, function: PipelineFunction) -> Result<()> {
        self.warn_if_not_registered(&function);
        let position = self
            .position(existing_label)
            .ok_or_else(|| Error::AnchorNotFound {
                label: existing_label.to_string(),
            })?;
        self.stack.insert(position + 1, function);
        Ok(())
    }

    /// Remove a function from the stack; absent labels are ignored.
    pub fn remove(&mut self, label: &str) {
        if let Some(position) = self.position(label) {
            self.stack.remove(position);
        }
    }

    /// Record fields for which the given function is bypassed during
    /// [`Pipeline::run`].
    pub fn skip<S: Into<String>>(&mut self, label: &str, field_names: impl IntoIterator<Item = S>) {
        self.skip
            .entry(label.to_string())
            .or_default()
            .extend(field_names.into_iter().map(Into::into));
    }

    /// Run the stack over a token list. Each stage consumes the previous
    /// stage's full output; a stage skipped for `field_name` passes tokens
    /// through untouched.
    pub fn run(&self, mut tokens: Vec<Token>, field_name: Option<&str>) -> Vec<Token> {
        for function in &self.stack {
            if let Some(field) = field_name {
                if self
                    .skip
                    .get(function.label())
                    .is_some_and(|fields| fields.contains(field))
                {
                    continue;
                }
            }
            let mut results = Vec::with_capacity(tokens.len());
            for index in 0..tokens.len() {
                let token = tokens[index].clone();
                results.extend(function.invoke(token, index, &tokens));
            }
            tokens = results;
        }
        tokens
    }

    /// Wrap a string in a token, run it through the stack, and return the
    /// resulting strings. Skip sets never apply here.
    pub fn run_string(&self, string: &str, metadata: Metadata) -> Vec<String> {
        let token = Token::new(string, metadata);
        self.run(vec![token], None)
            .into_iter()
            .map(|token| token.as_str().to_string())
            .collect()
    }

    /// Drop every function from the stack.
    pub fn reset(&mut self) {
        self.stack.clear();
    }

    /// The stack as an ordered list of labels.
    pub fn serialize(&self) -> Vec<String> {
        self.stack
            .iter()
            .map(|function| function.label().to_string())
            .collect()
    }
}
