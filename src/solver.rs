//! The dependency solver
//!
//! [`DependencySolver`] turns desires into a shared dependency graph.
//! Each `resolve` call builds a per-request resolution tree (duplicating
//! satisfactions that occur along distinct paths) and folds it into the
//! shared output graph, reusing nodes whose satisfaction and resolved
//! dependency set are identical.
//!
//! The solver does not support cyclic dependencies: a context rule
//! later in the path might legitimately break an apparent type-level
//! cycle, so instead of identity-based cycle detection it bounds the
//! context depth.
//!
//! # Examples
//!
//! ```rust
//! use dependency_solver::{
//!     BindRule, Desire, DependencySolver, RuleBindingFunction, Satisfaction, ServiceType,
//! };
//!
//! trait Greeter {}
//! struct EnglishGreeter;
//!
//! let bindings = RuleBindingFunction::new(vec![BindRule::to_satisfaction(
//!     ServiceType::of::<dyn Greeter>(),
//!     Satisfaction::class(ServiceType::of::<EnglishGreeter>(), vec![]),
//! )]);
//!
//! let mut solver = DependencySolver::new(vec![Box::new(bindings)], 16);
//! solver.resolve(&Desire::for_type::<dyn Greeter>()).unwrap();
//!
//! // root plus the resolved satisfaction
//! assert_eq!(solver.graph().node_count(), 2);
//! ```

use crate::binding::{BindingFunction, BindingResult};
use crate::context::InjectionContext;
use crate::desire::Desire;
use crate::error::{Result, SolverError};
use crate::graph::{DependencyGraph, NodeId};
use crate::satisfaction::Satisfaction;
use ahash::RandomState;
use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "logging")]
use tracing::{debug, info, trace};

/// Default bound on the context-path length.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// The chain of desires followed by one fixpoint resolution, from the
/// original request to the terminal desire.
pub type DesireChain = Vec<Desire>;

/// The shared output graph: satisfaction-labelled nodes (the root
/// carries `None`) and single-desire edge labels.
pub type SolverGraph = DependencyGraph<Option<Satisfaction>, Desire>;

/// Per-request tree: same node labels, but edges carry the full desire
/// chain that led from the parent to each satisfaction.
type ResolutionTree = DependencyGraph<Option<Satisfaction>, DesireChain>;

/// Resolves desires into a shared dependency graph.
///
/// Binding functions are consulted in order, first-wins. The graph
/// accumulates across successive `resolve` calls; nodes are shared
/// between dependents whenever their satisfaction and resolved
/// dependency set coincide.
///
/// A solver instance is not safe for concurrent resolution; once
/// `resolve` returns, the graph may be read without synchronization
/// provided no other resolution is running.
pub struct DependencySolver {
    functions: Vec<Box<dyn BindingFunction>>,
    max_depth: usize,
    graph: SolverGraph,
    root: NodeId,
}

/// Outcome of one fixpoint resolution.
struct Resolved {
    satisfaction: Satisfaction,
    chain: DesireChain,
    /// Next desire of the most recent skip-if-unusable binding in the
    /// winning chain, if any.
    skip_candidate: Option<Desire>,
}

/// Internal failure wrapper distinguishing a desire whose own fixpoint
/// failed from a failure bubbling up out of a deeper subtree. Only the
/// former may be absorbed by a skippable binding.
struct ResolveFailure {
    error: SolverError,
    immediate: bool,
}

impl DependencySolver {
    /// Create a solver with the given binding functions and maximum
    /// context depth.
    ///
    /// # Panics
    ///
    /// Panics if `max_depth` is zero.
    pub fn new(functions: Vec<Box<dyn BindingFunction>>, max_depth: usize) -> Self {
        assert!(max_depth >= 1, "max depth must be at least 1");

        let mut graph = SolverGraph::new();
        let root = graph.add_node(None);

        #[cfg(feature = "logging")]
        info!(max_depth, "dependency solver created");

        Self {
            functions,
            max_depth,
            graph,
            root,
        }
    }

    /// The shared output graph.
    #[inline]
    pub fn graph(&self) -> &SolverGraph {
        &self.graph
    }

    /// The root node of the shared graph; its label is empty.
    #[inline]
    pub fn root_node(&self) -> NodeId {
        self.root
    }

    /// The configured context-depth bound.
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Update the shared graph to include the given desire. After a
    /// successful return an edge labelled with the desire runs from the
    /// root to its resolved satisfaction.
    ///
    /// On failure the graph is left as the partial resolution produced
    /// it; callers needing atomicity must snapshot first.
    pub fn resolve(&mut self, desire: &Desire) -> Result<()> {
        #[cfg(feature = "logging")]
        info!(desire = %desire, "resolving desire");

        let mut tree = ResolutionTree::new();
        let tree_root = tree.add_node(None);

        self.resolve_fully(desire, tree_root, &mut tree, &InjectionContext::new())
            .map_err(|failure| failure.error)?;
        self.merge(&tree, tree_root);
        Ok(())
    }

    /// Recursively resolve `desire` and its transitive dependencies
    /// into the tree under `parent`.
    fn resolve_fully(
        &self,
        desire: &Desire,
        parent: NodeId,
        tree: &mut ResolutionTree,
        context: &InjectionContext,
    ) -> std::result::Result<NodeId, ResolveFailure> {
        if context.depth() > self.max_depth {
            return Err(ResolveFailure {
                error: SolverError::cyclic(desire.clone(), self.max_depth),
                immediate: false,
            });
        }

        // Desires rejected in earlier attempts because their skippable
        // binding turned out to be unusable.
        let mut excluded: Vec<Desire> = Vec::new();
        let mut skipped = false;

        loop {
            let mut branch = context.clone();
            let resolved = match self.resolve_one(desire, &mut branch, &excluded) {
                Ok(resolved) => resolved,
                Err(error @ SolverError::UnresolvableDependency { .. }) => {
                    if skipped && desire.injection_point().is_nullable() {
                        // every usable default was skipped; a nullable
                        // point accepts the absent value
                        let node =
                            tree.add_node(Some(Satisfaction::null(desire.service_type())));
                        tree.add_edge(parent, node, vec![desire.clone()]);
                        return Ok(node);
                    }
                    return Err(ResolveFailure {
                        error,
                        immediate: true,
                    });
                }
                Err(error) => {
                    return Err(ResolveFailure {
                        error,
                        immediate: false,
                    });
                }
            };

            let Resolved {
                satisfaction,
                chain,
                skip_candidate,
            } = resolved;

            let node = tree.add_node(Some(satisfaction.clone()));
            tree.add_edge(parent, node, chain);

            let mut failed: Option<ResolveFailure> = None;
            for dependency in satisfaction.dependencies() {
                #[cfg(feature = "logging")]
                trace!(
                    dependency = %dependency,
                    of = %satisfaction,
                    "attempting to satisfy dependency"
                );

                let child_context = context.push(
                    satisfaction.clone(),
                    desire.injection_point().attributes().clone(),
                );
                if let Err(failure) = self.resolve_fully(dependency, node, tree, &child_context) {
                    failed = Some(failure);
                    break;
                }
            }

            let Some(failure) = failed else {
                return Ok(node);
            };

            if failure.immediate {
                if let Some(skip_desire) = skip_candidate {
                    #[cfg(feature = "logging")]
                    debug!(
                        desire = %desire,
                        skipped = %skip_desire,
                        "skippable binding is unusable, retrying without it"
                    );
                    tree.remove_subtree(node);
                    excluded.push(skip_desire);
                    skipped = true;
                    continue;
                }
            }

            // from the parent's perspective this failure is transitive
            return Err(ResolveFailure {
                error: failure.error,
                immediate: false,
            });
        }
    }

    /// The fixpoint loop: apply binding functions to `desire` until a
    /// terminal, instantiable desire is reached.
    fn resolve_one(
        &self,
        desire: &Desire,
        context: &mut InjectionContext,
        excluded: &[Desire],
    ) -> Result<Resolved> {
        let mut current = desire.clone();
        let mut skip_candidate = None;

        loop {
            #[cfg(feature = "logging")]
            trace!(desire = %current, "current desire");

            let mut binding: Option<BindingResult> = None;
            for function in &self.functions {
                if let Some(result) = function.bind(context, &current)? {
                    // a result whose next desire was already followed,
                    // or was skipped as unusable, counts as no opinion
                    if context.prior_desires().contains(result.desire())
                        || excluded.contains(result.desire())
                    {
                        continue;
                    }
                    validate_binding(&current, &result)?;
                    binding = Some(result);
                    break;
                }
            }

            let had_binding = binding.is_some();
            let mut terminate = true;
            if let Some(result) = binding {
                context.record_desire(current.clone());
                if result.is_skip_if_unusable() {
                    skip_candidate = Some(result.desire().clone());
                }
                #[cfg(feature = "logging")]
                if result.defer() {
                    debug!(desire = %result.desire(), "deferred binding treated as non-terminating");
                }
                terminate = result.effective_terminates();
                current = result.into_desire();
            }

            if terminate {
                if let Some(satisfaction) = current.satisfaction().filter(|s| s.instantiable()) {
                    let satisfaction = satisfaction.clone();
                    // the terminal desire is part of the recorded chain
                    context.record_desire(current.clone());

                    #[cfg(feature = "logging")]
                    debug!(desire = %desire, satisfaction = %satisfaction, "desire satisfied");

                    return Ok(Resolved {
                        satisfaction,
                        chain: context.prior_desires().to_vec(),
                        skip_candidate,
                    });
                }
            }

            if !had_binding {
                // terminate stayed true but the desire cannot be used
                // directly and no binding is left to follow
                return Err(SolverError::unresolvable(current, context));
            }
        }
    }

    /// Fold the per-request tree into the shared graph. Sorting leaves
    /// first guarantees every dependency is merged before its
    /// dependents look it up.
    fn merge(&mut self, tree: &ResolutionTree, tree_root: NodeId) {
        let sorted = tree.sort(tree_root);
        let mut merged: HashMap<NodeId, NodeId, RandomState> = HashMap::default();

        for tree_node in sorted {
            if tree_node == tree_root {
                // the synthetic tree root stands in for the shared
                // root; chains downsize to their first desire
                for (_, child, chain) in tree.outgoing_edges(tree_node) {
                    let Some(label) = chain.first() else { continue };
                    let Some(&tail) = merged.get(&child) else { continue };
                    // at the root context configurations cannot
                    // diverge, so one edge per desire suffices
                    if self.graph.outgoing_edge(self.root, label).is_none() {
                        self.graph.add_edge(self.root, tail, label.clone());
                    }
                }
                continue;
            }

            let Some(Some(satisfaction)) = tree.node_label(tree_node) else {
                // only the synthetic root is unlabelled
                continue;
            };

            let mut dependencies: BTreeSet<NodeId> = BTreeSet::new();
            for (_, child, _) in tree.outgoing_edges(tree_node) {
                if let Some(&mapped) = merged.get(&child) {
                    dependencies.insert(mapped);
                }
            }

            let options = self.dependency_options(satisfaction);
            let output_node = match options.get(&dependencies) {
                Some(&existing) => {
                    #[cfg(feature = "logging")]
                    trace!(satisfaction = %satisfaction, "node already in shared graph");
                    existing
                }
                None => {
                    #[cfg(feature = "logging")]
                    debug!(satisfaction = %satisfaction, "adding node to shared graph");

                    let node = self.graph.add_node(Some(satisfaction.clone()));
                    let mut connected: Vec<(NodeId, Desire)> = Vec::new();
                    for (_, child, chain) in tree.outgoing_edges(tree_node) {
                        let Some(label) = chain.first() else { continue };
                        let Some(&tail) = merged.get(&child) else { continue };
                        // sibling tree edges with equal label and tail
                        // collapse into a single shared edge
                        if connected.iter().any(|(t, l)| *t == tail && l == label) {
                            continue;
                        }
                        self.graph.add_edge(node, tail, label.clone());
                        connected.push((tail, label.clone()));
                    }
                    node
                }
            };
            merged.insert(tree_node, output_node);
        }
    }

    /// All previously merged nodes carrying `satisfaction`, keyed by
    /// their outgoing-tail sets.
    fn dependency_options(
        &self,
        satisfaction: &Satisfaction,
    ) -> HashMap<BTreeSet<NodeId>, NodeId, RandomState> {
        let mut options: HashMap<BTreeSet<NodeId>, NodeId, RandomState> = HashMap::default();
        for node in self.graph.nodes() {
            if self.graph.node_label(node).and_then(Option::as_ref) == Some(satisfaction) {
                let tails: BTreeSet<NodeId> = self.graph.outgoing_tails(node).collect();
                options.insert(tails, node);
            }
        }
        options
    }
}

impl std::fmt::Debug for DependencySolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencySolver")
            .field("binding_functions", &self.functions.len())
            .field("max_depth", &self.max_depth)
            .field("graph_nodes", &self.graph.node_count())
            .finish()
    }
}

/// Reject structurally inconsistent binding results at the site of
/// discovery.
fn validate_binding(current: &Desire, result: &BindingResult) -> Result<()> {
    if let Some(satisfaction) = result.desire().satisfaction() {
        if satisfaction.service_type() != result.desire().service_type() {
            return Err(SolverError::invalid_binding(
                current.service_type(),
                format!(
                    "produced a desire for {} carrying a satisfaction of {}",
                    result.desire().service_type(),
                    satisfaction.service_type()
                ),
            ));
        }
    }
    Ok(())
}
