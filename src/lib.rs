//! # Dependency Solver - Graph-Building Dependency Resolution for Rust
//!
//! The core of a dependency injection container: a solver that turns
//! typed, qualified component requests into a shared dependency graph,
//! ready to be walked by an instantiator.
//!
//! ## Features
//!
//! - 🧩 **Pluggable bindings** - Policies are ordered [`BindingFunction`]s; the first
//!   opinion wins, so custom functions override defaults
//! - 🕸️ **Shared graph** - Satisfactions with identical resolved dependencies are
//!   merged into one node; context-sensitive bindings stay distinct
//! - 🎯 **Qualified requests** - Qualifier tags with inheritance and a distance
//!   metric for ranking candidate bindings
//! - 🪂 **Skippable defaults** - A default binding whose own dependencies cannot be
//!   met is dropped instead of failing the request
//! - 🔁 **Bounded resolution** - A configurable context-depth limit stands in for
//!   cycle detection, since a later context rule may legitimately break an
//!   apparent cycle
//! - 📊 **Observable** - Optional tracing integration with JSON or pretty output
//!
//! ## Quick Start
//!
//! ```rust
//! use dependency_solver::{
//!     BindRule, Desire, DependencySolver, InjectionPoint, RuleBindingFunction,
//!     Satisfaction, ServiceType,
//! };
//!
//! trait Repository {}
//! struct SqlRepository;
//! struct Connection;
//!
//! // SqlRepository needs a Connection in its first constructor slot
//! let repo_deps = vec![Desire::from_injection_point(
//!     InjectionPoint::constructor_parameter(0, ServiceType::of::<Connection>()),
//! )];
//!
//! let bindings = RuleBindingFunction::new(vec![
//!     BindRule::to_satisfaction(
//!         ServiceType::of::<dyn Repository>(),
//!         Satisfaction::class(ServiceType::of::<SqlRepository>(), repo_deps),
//!     ),
//!     BindRule::to_satisfaction(
//!         ServiceType::of::<Connection>(),
//!         Satisfaction::class(ServiceType::of::<Connection>(), vec![]),
//!     ),
//! ]);
//!
//! let mut solver = DependencySolver::new(vec![Box::new(bindings)], 16);
//! solver.resolve(&Desire::for_type::<dyn Repository>()).unwrap();
//!
//! // root, SqlRepository, Connection
//! assert_eq!(solver.graph().node_count(), 3);
//! ```
//!
//! ## Sharing
//!
//! Nodes are reused between dependents when their own resolved
//! dependency sets are identical, so a service required by many others
//! appears once in the graph. When a context-sensitive binding gives
//! two dependents different configurations of the same type, the graph
//! keeps two nodes.
//!
//! ## Concurrency
//!
//! A solver instance is single-threaded: `resolve` takes `&mut self`
//! and the shared graph is mutated only inside it. Resolve concurrently
//! by using separate solver instances; read the graph freely once
//! `resolve` has returned.

mod binding;
mod context;
mod desire;
mod error;
pub mod graph;
#[cfg(feature = "logging")]
pub mod logging;
pub mod qualifier;
mod satisfaction;
mod solver;

pub use binding::*;
pub use context::*;
pub use desire::*;
pub use error::*;
pub use graph::{DependencyGraph, EdgeId, NodeId};
pub use qualifier::Qualifier;
pub use satisfaction::*;
pub use solver::*;

// Re-export tracing macros for convenience when logging is enabled
#[cfg(feature = "logging")]
pub use tracing::{debug, error, info, trace, warn};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BindRule, BindingFunction, BindingResult, DependencySolver, Desire, InjectionContext,
        InjectionPoint, Qualifier, Result, RuleBindingFunction, Satisfaction, ServiceType,
        SolverError,
    };
}
