//! Injection contexts: where the solver currently is in the graph
//!
//! An [`InjectionContext`] records the stack of satisfactions from the
//! root request down to the current parent, plus the desires already
//! followed while resolving the current injection point. Context-aware
//! binding functions match against the type path; the solver uses the
//! prior-desires list to keep its fixpoint loop finite.

use crate::desire::{Attributes, Desire, ServiceType};
use crate::satisfaction::Satisfaction;

/// One frame of the context stack: the satisfaction being populated and
/// the attributes of the desire that led to it.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextFrame {
    satisfaction: Satisfaction,
    attributes: Attributes,
}

impl ContextFrame {
    /// The satisfaction whose dependencies are being resolved.
    #[inline]
    pub fn satisfaction(&self) -> &Satisfaction {
        &self.satisfaction
    }

    /// The attributes of the desire that created this frame.
    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// The contextual state of a single resolution branch.
///
/// Immutable under [`push`](Self::push): pushing returns a new context
/// with one more frame and a freshly reset prior-desires list. The
/// prior-desires list grows via [`record_desire`](Self::record_desire)
/// while the resolver follows a binding chain for one injection point.
///
/// # Examples
///
/// ```rust
/// use dependency_solver::{Attributes, InjectionContext, Satisfaction, ServiceType};
///
/// struct App;
///
/// let root = InjectionContext::new();
/// assert_eq!(root.depth(), 0);
///
/// let child = root.push(
///     Satisfaction::class(ServiceType::of::<App>(), vec![]),
///     Attributes::none(),
/// );
/// assert_eq!(child.depth(), 1);
/// assert!(child.prior_desires().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct InjectionContext {
    frames: Vec<ContextFrame>,
    prior_desires: Vec<Desire>,
}

impl InjectionContext {
    /// An empty root context.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A new context with one more frame and an empty prior-desires
    /// list.
    pub fn push(&self, satisfaction: Satisfaction, attributes: Attributes) -> Self {
        let mut frames = self.frames.clone();
        frames.push(ContextFrame {
            satisfaction,
            attributes,
        });
        Self {
            frames,
            prior_desires: Vec::new(),
        }
    }

    /// Record a desire followed while resolving the current injection
    /// point.
    pub fn record_desire(&mut self, desire: Desire) {
        self.prior_desires.push(desire);
    }

    /// The frames from root to current parent.
    #[inline]
    pub fn frames(&self) -> &[ContextFrame] {
        &self.frames
    }

    /// The desires already followed for the current injection point, in
    /// order.
    #[inline]
    pub fn prior_desires(&self) -> &[Desire] {
        &self.prior_desires
    }

    /// The erased types of the satisfactions in the frame stack,
    /// root first.
    pub fn type_path(&self) -> impl DoubleEndedIterator<Item = ServiceType> + '_ {
        self.frames.iter().map(|f| f.satisfaction.service_type())
    }

    /// The number of frames, i.e. the length of the type path.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desire::ServiceType;

    struct Outer;
    struct Inner;

    fn sat<T: 'static>() -> Satisfaction {
        Satisfaction::class(ServiceType::of::<T>(), vec![])
    }

    #[test]
    fn test_push_appends_frame_and_resets_prior_desires() {
        let mut root = InjectionContext::new();
        root.record_desire(Desire::for_type::<Outer>());
        assert_eq!(root.prior_desires().len(), 1);

        let child = root.push(sat::<Outer>(), Attributes::none());
        assert_eq!(child.depth(), 1);
        assert!(child.prior_desires().is_empty());

        // the original context is untouched
        assert_eq!(root.depth(), 0);
        assert_eq!(root.prior_desires().len(), 1);
    }

    #[test]
    fn test_type_path_is_root_first() {
        let ctx = InjectionContext::new()
            .push(sat::<Outer>(), Attributes::none())
            .push(sat::<Inner>(), Attributes::none());

        let path: Vec<ServiceType> = ctx.type_path().collect();
        assert_eq!(path, vec![ServiceType::of::<Outer>(), ServiceType::of::<Inner>()]);
        assert_eq!(ctx.depth(), 2);
    }

    #[test]
    fn test_record_desire_is_ordered() {
        let mut ctx = InjectionContext::new();
        ctx.record_desire(Desire::for_type::<Outer>());
        ctx.record_desire(Desire::for_type::<Inner>());

        let recorded: Vec<ServiceType> = ctx
            .prior_desires()
            .iter()
            .map(|d| d.service_type())
            .collect();
        assert_eq!(recorded, vec![ServiceType::of::<Outer>(), ServiceType::of::<Inner>()]);
    }

    #[test]
    fn test_frame_carries_attributes() {
        let attrs = Attributes::qualified(crate::qualifier::Qualifier::new("primary"));
        let ctx = InjectionContext::new().push(sat::<Outer>(), attrs.clone());

        assert_eq!(ctx.frames().len(), 1);
        assert_eq!(ctx.frames()[0].attributes(), &attrs);
        assert_eq!(
            ctx.frames()[0].satisfaction().service_type(),
            ServiceType::of::<Outer>()
        );
    }
}
