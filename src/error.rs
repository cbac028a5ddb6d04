//! Error types for dependency resolution

use crate::context::InjectionContext;
use crate::desire::{Desire, ServiceType};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while solving a dependency graph
#[derive(Error, Debug, Clone)]
pub enum SolverError {
    /// No binding function can produce a terminal, instantiable desire
    /// for the request.
    #[error("unresolvable dependency: no binding satisfies {desire}\n{context}")]
    UnresolvableDependency {
        desire: Desire,
        context: ContextSnapshot,
    },

    /// The resolution path exceeded the solver's maximum context depth,
    /// which is taken as evidence of a dependency cycle.
    #[error(
        "likely dependency cycle: maximum context depth of {depth} reached while resolving {desire}"
    )]
    CyclicDependency { desire: Desire, depth: usize },

    /// A binding function returned a structurally invalid result.
    #[error("invalid binding for {service_type}: {reason}")]
    InvalidBinding {
        service_type: ServiceType,
        reason: String,
    },

    /// A binding function matched multiple candidates and could not
    /// disambiguate them.
    #[error("{count} bindings match {desire} at the same distance and cannot be disambiguated")]
    MultipleBindings { desire: Desire, count: usize },
}

impl SolverError {
    /// Create an UnresolvableDependency error, snapshotting the context.
    pub fn unresolvable(desire: Desire, context: &InjectionContext) -> Self {
        Self::UnresolvableDependency {
            desire,
            context: ContextSnapshot::of(context),
        }
    }

    /// Create a CyclicDependency error.
    pub fn cyclic(desire: Desire, depth: usize) -> Self {
        Self::CyclicDependency { desire, depth }
    }

    /// Create an InvalidBinding error.
    pub fn invalid_binding(service_type: ServiceType, reason: impl Into<String>) -> Self {
        Self::InvalidBinding {
            service_type,
            reason: reason.into(),
        }
    }

    /// Create a MultipleBindings error.
    pub fn multiple_bindings(desire: Desire, count: usize) -> Self {
        Self::MultipleBindings { desire, count }
    }
}

/// An owned snapshot of an [`InjectionContext`] taken at failure time:
/// the type path from root to the current parent and the desires
/// followed in the fixpoint chain, each formatted as `[qualifier:]type`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSnapshot {
    type_path: Vec<String>,
    prior_desires: Vec<String>,
}

impl ContextSnapshot {
    /// Snapshot the given context.
    pub fn of(context: &InjectionContext) -> Self {
        let type_path = context
            .frames()
            .iter()
            .map(|frame| match frame.attributes().qualifier() {
                Some(q) => format!("{}:{}", q, frame.satisfaction().service_type()),
                None => frame.satisfaction().service_type().to_string(),
            })
            .collect();
        let prior_desires = context
            .prior_desires()
            .iter()
            .map(Desire::to_string)
            .collect();
        Self {
            type_path,
            prior_desires,
        }
    }

    /// The formatted type path, root first.
    #[inline]
    pub fn type_path(&self) -> &[String] {
        &self.type_path
    }

    /// The formatted desires followed for the failing injection point.
    #[inline]
    pub fn prior_desires(&self) -> &[String] {
        &self.prior_desires
    }
}

impl fmt::Display for ContextSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Context:")?;
        writeln!(f, "  Type path:")?;
        for entry in &self.type_path {
            writeln!(f, "    {}", entry)?;
        }
        writeln!(f, "  Prior desires:")?;
        for entry in &self.prior_desires {
            writeln!(f, "    {}", entry)?;
        }
        Ok(())
    }
}

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, SolverError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desire::Attributes;
    use crate::qualifier::Qualifier;
    use crate::satisfaction::Satisfaction;

    struct App;
    struct Repo;

    #[test]
    fn test_unresolvable_message_includes_context() {
        let mut ctx = InjectionContext::new().push(
            Satisfaction::class(ServiceType::of::<App>(), vec![]),
            Attributes::qualified(Qualifier::new("primary")),
        );
        ctx.record_desire(Desire::for_type::<Repo>());

        let err = SolverError::unresolvable(Desire::for_type::<Repo>(), &ctx);
        let message = err.to_string();

        assert!(message.contains("no binding satisfies Repo"));
        assert!(message.contains("Type path:"));
        assert!(message.contains("primary:App"));
        assert!(message.contains("Prior desires:"));
    }

    #[test]
    fn test_cyclic_message_names_depth() {
        let err = SolverError::cyclic(Desire::for_type::<App>(), 10);
        assert!(err.to_string().contains("maximum context depth of 10"));
        assert!(err.to_string().contains("App"));
    }

    #[test]
    fn test_invalid_binding_message() {
        let err = SolverError::invalid_binding(ServiceType::of::<App>(), "type mismatch");
        assert_eq!(err.to_string(), "invalid binding for App: type mismatch");
    }

    #[test]
    fn test_multiple_bindings_message() {
        let err = SolverError::multiple_bindings(Desire::for_type::<App>(), 2);
        assert!(err.to_string().contains("2 bindings match App"));
    }
}
