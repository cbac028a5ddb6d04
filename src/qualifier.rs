//! Qualifier tags for refining type-based requests
//!
//! A [`Qualifier`] is an opaque tag attached to a desire. Qualifiers may
//! form a parent chain, and a qualifier may be marked as inheriting the
//! default (unqualified) binding. Binding functions consult
//! [`inherits`] and [`distance`] when ranking candidate bindings.

use std::any::Any;
use std::fmt;

/// A tag refining the meaning of a type-based request.
///
/// Qualifiers are plain values with an optional parent. A child
/// qualifier can satisfy a request for any of its ancestors; a
/// default-inheriting qualifier can satisfy an unqualified request.
///
/// # Examples
///
/// ```rust
/// use dependency_solver::qualifier::{self, Qualifier};
///
/// let role_a = Qualifier::new("role-a");
/// let role_b = Qualifier::new("role-b").with_parent(role_a.clone());
///
/// assert!(qualifier::inherits(Some(&role_b), Some(&role_a)));
/// assert_eq!(qualifier::distance(Some(&role_b), Some(&role_a)), 1);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Qualifier {
    name: String,
    parent: Option<Box<Qualifier>>,
    inherits_default: bool,
}

impl Qualifier {
    /// Create a qualifier with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            inherits_default: false,
        }
    }

    /// Attach a parent qualifier, making this one able to satisfy
    /// requests for the parent.
    pub fn with_parent(mut self, parent: Qualifier) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Mark this qualifier as inheriting the default binding: it can
    /// satisfy an unqualified request at distance 1.
    pub fn inheriting_default(mut self) -> Self {
        self.inherits_default = true;
        self
    }

    /// The qualifier's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared parent, if any.
    #[inline]
    pub fn parent(&self) -> Option<&Qualifier> {
        self.parent.as_deref()
    }

    /// Whether this qualifier inherits the default binding.
    #[inline]
    pub fn inherits_default(&self) -> bool {
        self.inherits_default
    }
}

impl fmt::Debug for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Qualifier")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("inherits_default", &self.inherits_default)
            .finish()
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Check whether a value is usable as a qualifier.
pub fn is_qualifier(value: &dyn Any) -> bool {
    value.is::<Qualifier>()
}

/// Check whether qualifier `a` can satisfy a request for qualifier `b`.
///
/// True when `a == b`, when `a`'s parent chain reaches `b`, or when `b`
/// is absent and `a` inherits the default. Two absent qualifiers match.
pub fn inherits(a: Option<&Qualifier>, b: Option<&Qualifier>) -> bool {
    distance(a, b) >= 0
}

/// The number of parent hops from `a` to `b`, or `-1` if `a` does not
/// inherit from `b`.
///
/// Identity distance is 0, including absent-to-absent. A
/// default-inheriting qualifier is at distance 1 from the absent
/// qualifier, counted from wherever in `a`'s parent chain the
/// default-inheriting ancestor sits.
pub fn distance(a: Option<&Qualifier>, b: Option<&Qualifier>) -> i32 {
    match (a, b) {
        (None, None) => 0,
        (None, Some(_)) => -1,
        (Some(a), None) => {
            let mut hops = 0;
            let mut current = Some(a);
            while let Some(q) = current {
                if q.inherits_default() {
                    return hops + 1;
                }
                hops += 1;
                current = q.parent();
            }
            -1
        }
        (Some(a), Some(b)) => {
            let mut hops = 0;
            let mut current = Some(a);
            while let Some(q) = current {
                if q == b {
                    return hops;
                }
                hops += 1;
                current = q.parent();
            }
            -1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role_a() -> Qualifier {
        Qualifier::new("role-a")
    }

    fn role_b() -> Qualifier {
        Qualifier::new("role-b").with_parent(role_a())
    }

    fn role_c() -> Qualifier {
        Qualifier::new("role-c").with_parent(role_b())
    }

    fn role_d() -> Qualifier {
        Qualifier::new("role-d").inheriting_default()
    }

    #[test]
    fn test_equality() {
        assert_eq!(role_a(), role_a());
        assert_ne!(role_a(), role_b());
        assert_eq!(role_b().parent(), Some(&role_a()));
        assert!(role_a().parent().is_none());
    }

    #[test]
    fn test_is_qualifier() {
        assert!(is_qualifier(&role_a()));
        assert!(!is_qualifier(&"role-a"));
        assert!(!is_qualifier(&42u32));
    }

    #[test]
    fn test_inherits() {
        assert!(inherits(Some(&role_a()), Some(&role_a())));
        assert!(inherits(Some(&role_b()), Some(&role_a())));
        assert!(inherits(Some(&role_c()), Some(&role_a())));
        assert!(inherits(Some(&role_d()), None));

        assert!(!inherits(Some(&role_a()), Some(&role_b())));
        assert!(!inherits(Some(&role_d()), Some(&role_a())));
        assert!(!inherits(Some(&role_a()), None));
        assert!(!inherits(None, Some(&role_a())));

        assert!(inherits(None, None));
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(Some(&role_a()), Some(&role_a())), 0);
        assert_eq!(distance(Some(&role_b()), Some(&role_a())), 1);
        assert_eq!(distance(Some(&role_c()), Some(&role_a())), 2);
        assert_eq!(distance(Some(&role_d()), None), 1);

        assert_eq!(distance(Some(&role_a()), Some(&role_b())), -1);
        assert_eq!(distance(Some(&role_d()), Some(&role_a())), -1);
        assert_eq!(distance(Some(&role_a()), None), -1);
        assert_eq!(distance(None, Some(&role_a())), -1);

        assert_eq!(distance(None, None), 0);
    }

    #[test]
    fn test_distance_through_default_inheriting_ancestor() {
        let child = Qualifier::new("child").with_parent(role_d());
        assert_eq!(distance(Some(&child), None), 2);
        assert!(inherits(Some(&child), None));
    }
}
