//! The binding-function protocol
//!
//! A [`BindingFunction`] maps a desire, within an injection context, to
//! another desire. The solver consults its functions in priority order
//! and follows the first result whose next desire has not already been
//! visited for the current injection point.
//!
//! Most configurations are expressed as [`BindRule`]s collected into a
//! [`RuleBindingFunction`], which matches rules by type and qualifier
//! and ranks candidates by qualifier distance. Ad-hoc policies (e.g.
//! context-sensitive rules) can be closures: any
//! `Fn(&InjectionContext, &Desire) -> Result<Option<BindingResult>>`
//! is a binding function.

use crate::context::InjectionContext;
use crate::desire::{Desire, ServiceType};
use crate::error::{Result, SolverError};
use crate::qualifier::{self, Qualifier};
use crate::satisfaction::Satisfaction;

// =============================================================================
// BindingResult
// =============================================================================

/// The outcome of one binding step: the next desire, whether the
/// fixpoint halts here, and flags controlling how the solver treats the
/// binding.
#[derive(Clone, Debug, PartialEq)]
pub struct BindingResult {
    desire: Desire,
    terminates: bool,
    defer: bool,
    skip_if_unusable: bool,
}

impl BindingResult {
    /// A non-terminating result: the solver keeps applying binding
    /// functions to the next desire.
    pub fn new(desire: Desire) -> Self {
        Self {
            desire,
            terminates: false,
            defer: false,
            skip_if_unusable: false,
        }
    }

    /// A terminating result: the fixpoint halts and the solver uses the
    /// desire's satisfaction directly.
    pub fn terminal(desire: Desire) -> Self {
        Self {
            terminates: true,
            ..Self::new(desire)
        }
    }

    /// Mark this result as deferred.
    ///
    /// Deferred bindings ("revisit me after the rest of the tree is
    /// built") are not supported; the solver treats a deferred result
    /// as non-terminating.
    pub fn deferred(mut self) -> Self {
        self.defer = true;
        self
    }

    /// Mark the binding as skippable: if the resulting satisfaction's
    /// own dependencies cannot be met, the solver retries as if this
    /// binding had not been offered.
    pub fn skip_if_unusable(mut self) -> Self {
        self.skip_if_unusable = true;
        self
    }

    /// The next desire to follow.
    #[inline]
    pub fn desire(&self) -> &Desire {
        &self.desire
    }

    /// Whether this result asks the fixpoint to halt.
    #[inline]
    pub fn terminates(&self) -> bool {
        self.terminates
    }

    /// Whether this result was marked deferred.
    #[inline]
    pub fn defer(&self) -> bool {
        self.defer
    }

    /// Whether the binding may be skipped when unusable.
    #[inline]
    pub fn is_skip_if_unusable(&self) -> bool {
        self.skip_if_unusable
    }

    /// Whether the solver should halt the fixpoint on this result.
    /// Deferred results never terminate.
    #[inline]
    pub fn effective_terminates(&self) -> bool {
        self.terminates && !self.defer
    }

    /// Consume the result, yielding the next desire.
    #[inline]
    pub fn into_desire(self) -> Desire {
        self.desire
    }
}

// =============================================================================
// BindingFunction
// =============================================================================

/// A pluggable policy mapping a desire within a context to a
/// [`BindingResult`].
///
/// Contract: pure with respect to the solver; `Ok(None)` means "no
/// opinion about this desire"; a result whose next desire was already
/// visited in the context's prior-desires list is ignored by the solver,
/// which moves on to the next function.
pub trait BindingFunction {
    /// Attempt to bind the desire.
    fn bind(&self, context: &InjectionContext, desire: &Desire) -> Result<Option<BindingResult>>;
}

impl<F> BindingFunction for F
where
    F: Fn(&InjectionContext, &Desire) -> Result<Option<BindingResult>>,
{
    fn bind(&self, context: &InjectionContext, desire: &Desire) -> Result<Option<BindingResult>> {
        self(context, desire)
    }
}

// =============================================================================
// BindRule
// =============================================================================

/// What a [`BindRule`] rewrites a matched desire into.
#[derive(Clone, Debug, PartialEq)]
enum BindTarget {
    /// Choose a satisfaction for the desire.
    Satisfaction(Satisfaction),
    /// Redirect to another type, to be bound by a later step.
    Type(ServiceType),
}

/// A declarative binding: when a desire's type and qualifier match, the
/// desire is rewritten to the rule's target.
///
/// Rules qualified with a more specific qualifier win over inherited
/// matches; see [`RuleBindingFunction`].
///
/// # Examples
///
/// ```rust
/// use dependency_solver::{BindRule, Satisfaction, ServiceType};
///
/// trait Store {}
/// struct MemoryStore;
///
/// let rule = BindRule::to_satisfaction(
///     ServiceType::of::<dyn Store>(),
///     Satisfaction::class(ServiceType::of::<MemoryStore>(), vec![]),
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BindRule {
    matched: ServiceType,
    qualifier: Option<Qualifier>,
    target: BindTarget,
    terminates: bool,
    skip_if_unusable: bool,
}

impl BindRule {
    /// Bind `matched` to a satisfaction. Terminates the fixpoint by
    /// default.
    pub fn to_satisfaction(matched: ServiceType, satisfaction: Satisfaction) -> Self {
        Self {
            matched,
            qualifier: None,
            target: BindTarget::Satisfaction(satisfaction),
            terminates: true,
            skip_if_unusable: false,
        }
    }

    /// Bind `matched` to another type, leaving the new desire to later
    /// binding steps. Non-terminating by default.
    pub fn to_type(matched: ServiceType, target: ServiceType) -> Self {
        Self {
            matched,
            qualifier: None,
            target: BindTarget::Type(target),
            terminates: false,
            skip_if_unusable: false,
        }
    }

    /// Restrict the rule to desires whose qualifier inherits from the
    /// given qualifier.
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    /// Override whether the rule terminates the fixpoint.
    pub fn terminal(mut self, terminates: bool) -> Self {
        self.terminates = terminates;
        self
    }

    /// Mark the rule's binding as skippable when its satisfaction's
    /// dependencies cannot be met.
    pub fn skip_if_unusable(mut self) -> Self {
        self.skip_if_unusable = true;
        self
    }

    /// Whether this rule applies to the desire.
    pub fn matches(&self, desire: &Desire) -> bool {
        desire.service_type() == self.matched
            && qualifier::inherits(desire.qualifier(), self.qualifier.as_ref())
    }

    /// Qualifier distance between the desire and this rule; `-1` when
    /// the rule does not match.
    pub fn distance(&self, desire: &Desire) -> i32 {
        if desire.service_type() != self.matched {
            return -1;
        }
        qualifier::distance(desire.qualifier(), self.qualifier.as_ref())
    }

    /// Rewrite the desire according to this rule.
    pub fn apply(&self, desire: &Desire) -> BindingResult {
        let next = match &self.target {
            BindTarget::Satisfaction(sat) => desire.resolved_with(sat.clone()),
            BindTarget::Type(ty) => desire.redirected(*ty),
        };
        let mut result = if self.terminates {
            BindingResult::terminal(next)
        } else {
            BindingResult::new(next)
        };
        if self.skip_if_unusable {
            result = result.skip_if_unusable();
        }
        result
    }
}

// =============================================================================
// RuleBindingFunction
// =============================================================================

/// A [`BindingFunction`] over an ordered rule set.
///
/// All matching rules are ranked by qualifier distance and the closest
/// match wins. Two distinct rules tied at the minimum distance cannot be
/// disambiguated and produce [`SolverError::MultipleBindings`].
///
/// # Examples
///
/// ```rust
/// use dependency_solver::{BindRule, RuleBindingFunction, Satisfaction, ServiceType};
///
/// trait Cache {}
/// struct LruCache;
///
/// let bindings = RuleBindingFunction::new(vec![BindRule::to_satisfaction(
///     ServiceType::of::<dyn Cache>(),
///     Satisfaction::class(ServiceType::of::<LruCache>(), vec![]),
/// )]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RuleBindingFunction {
    rules: Vec<BindRule>,
}

impl RuleBindingFunction {
    /// Create a binding function over the given rules.
    pub fn new(rules: Vec<BindRule>) -> Self {
        Self { rules }
    }

    /// Append a rule.
    pub fn with_rule(mut self, rule: BindRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The configured rules, in order.
    #[inline]
    pub fn rules(&self) -> &[BindRule] {
        &self.rules
    }
}

impl BindingFunction for RuleBindingFunction {
    fn bind(&self, _context: &InjectionContext, desire: &Desire) -> Result<Option<BindingResult>> {
        let mut best: Option<(&BindRule, i32)> = None;
        let mut tied = 0usize;

        for rule in &self.rules {
            let distance = rule.distance(desire);
            if distance < 0 {
                continue;
            }
            match best {
                None => {
                    best = Some((rule, distance));
                    tied = 1;
                }
                Some((winner, best_distance)) => {
                    if distance < best_distance {
                        best = Some((rule, distance));
                        tied = 1;
                    } else if distance == best_distance && rule != winner {
                        tied += 1;
                    }
                }
            }
        }

        match best {
            None => Ok(None),
            Some((rule, _)) if tied == 1 => Ok(Some(rule.apply(desire))),
            Some(_) => Err(SolverError::multiple_bindings(desire.clone(), tied)),
        }
    }
}
