//! Desires and the injection points that raise them
//!
//! A [`Desire`] is a typed, possibly-qualified request for a value to be
//! supplied at a specific [`InjectionPoint`]. Desires are immutable;
//! binding functions derive new desires from old ones via
//! [`Desire::resolved_with`] and [`Desire::redirected`].

use crate::qualifier::Qualifier;
use crate::satisfaction::Satisfaction;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// ServiceType
// =============================================================================

/// An erased type token: a `TypeId` paired with the type's name.
///
/// Equality and hashing use only the `TypeId`; the name is carried for
/// diagnostics.
///
/// # Examples
///
/// ```rust
/// use dependency_solver::ServiceType;
///
/// struct Database;
///
/// let ty = ServiceType::of::<Database>();
/// assert_eq!(ty, ServiceType::of::<Database>());
/// assert_eq!(ty.short_name(), "Database");
/// ```
#[derive(Clone, Copy)]
pub struct ServiceType {
    id: TypeId,
    name: &'static str,
}

impl ServiceType {
    /// The service type token for `T`. Unsized types (e.g. trait
    /// objects) are fine; only the erased identity is kept.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying `TypeId`.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// The full type name, including module path.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type name with the module path stripped.
    #[inline]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for ServiceType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceType {}

impl std::hash::Hash for ServiceType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceType({})", self.short_name())
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// Attributes attached to an injection point.
///
/// Carried into context frames when the solver descends into a
/// satisfaction's dependencies, so context-sensitive binding functions
/// can inspect the attributes of the desire that led to each frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    qualifier: Option<Qualifier>,
    nullable: bool,
}

impl Attributes {
    /// Empty attribute set: no qualifier, not nullable.
    #[inline]
    pub fn none() -> Self {
        Self::default()
    }

    /// Attributes carrying a qualifier.
    pub fn qualified(qualifier: Qualifier) -> Self {
        Self {
            qualifier: Some(qualifier),
            nullable: false,
        }
    }

    /// Mark the attributed point as nullable.
    pub fn with_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The qualifier, if any.
    #[inline]
    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }

    /// Whether the attributed point accepts a null value.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

// =============================================================================
// InjectionPoint
// =============================================================================

/// The location a value is placed into.
#[derive(Clone, Debug, PartialEq)]
pub enum InjectionPointKind {
    /// A struct field.
    Field { name: &'static str },
    /// A positional constructor parameter.
    ConstructorParameter { index: usize },
    /// A setter method parameter.
    SetterParameter { name: &'static str },
    /// A synthetic point for root requests that have no member.
    NoArgument,
}

/// A place a value must be supplied: type, qualifier, attributes, and a
/// nullable flag. Immutable.
///
/// # Examples
///
/// ```rust
/// use dependency_solver::{InjectionPoint, ServiceType};
///
/// struct Database;
///
/// let point = InjectionPoint::constructor_parameter(0, ServiceType::of::<Database>());
/// assert!(!point.is_nullable());
/// assert!(point.qualifier().is_none());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InjectionPoint {
    ty: ServiceType,
    kind: InjectionPointKind,
    attributes: Attributes,
}

impl InjectionPoint {
    /// An injection point wrapping a struct field.
    pub fn field(name: &'static str, ty: ServiceType) -> Self {
        Self {
            ty,
            kind: InjectionPointKind::Field { name },
            attributes: Attributes::none(),
        }
    }

    /// An injection point wrapping a constructor parameter.
    pub fn constructor_parameter(index: usize, ty: ServiceType) -> Self {
        Self {
            ty,
            kind: InjectionPointKind::ConstructorParameter { index },
            attributes: Attributes::none(),
        }
    }

    /// An injection point wrapping a setter parameter.
    pub fn setter_parameter(name: &'static str, ty: ServiceType) -> Self {
        Self {
            ty,
            kind: InjectionPointKind::SetterParameter { name },
            attributes: Attributes::none(),
        }
    }

    /// A synthetic injection point for a root request.
    pub fn no_argument(ty: ServiceType) -> Self {
        Self {
            ty,
            kind: InjectionPointKind::NoArgument,
            attributes: Attributes::none(),
        }
    }

    /// Attach a qualifier to this point.
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.attributes.qualifier = Some(qualifier);
        self
    }

    /// Mark this point as accepting a null value.
    pub fn with_nullable(mut self) -> Self {
        self.attributes.nullable = true;
        self
    }

    /// The type requested at this point.
    #[inline]
    pub fn service_type(&self) -> ServiceType {
        self.ty
    }

    /// What kind of member this point wraps.
    #[inline]
    pub fn kind(&self) -> &InjectionPointKind {
        &self.kind
    }

    /// The point's attributes.
    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// The qualifier on this point, if any.
    #[inline]
    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.attributes.qualifier()
    }

    /// Whether this point accepts a null value.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.attributes.is_nullable()
    }
}

impl fmt::Display for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(q) = self.qualifier() {
            write!(f, "{}:", q)?;
        }
        write!(f, "{}", self.ty)?;
        match &self.kind {
            InjectionPointKind::Field { name } => write!(f, " (field {})", name),
            InjectionPointKind::ConstructorParameter { index } => {
                write!(f, " (constructor parameter {})", index)
            }
            InjectionPointKind::SetterParameter { name } => write!(f, " (setter {})", name),
            InjectionPointKind::NoArgument => Ok(()),
        }
    }
}

// =============================================================================
// Desire
// =============================================================================

/// A typed, possibly-qualified request for a value.
///
/// A desire starts out unsatisfied; binding functions rewrite it until a
/// satisfaction is chosen. The injection point is preserved across
/// rewrites so diagnostics can always point at the original request
/// site.
///
/// # Examples
///
/// ```rust
/// use dependency_solver::{Desire, InjectionPoint, Satisfaction, ServiceType};
///
/// trait Repo {}
/// struct SqlRepo;
///
/// let desire = Desire::from_injection_point(
///     InjectionPoint::no_argument(ServiceType::of::<dyn Repo>()),
/// );
/// assert!(!desire.instantiable());
///
/// let bound = desire.resolved_with(Satisfaction::class(ServiceType::of::<SqlRepo>(), vec![]));
/// assert!(bound.instantiable());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Desire {
    ty: ServiceType,
    qualifier: Option<Qualifier>,
    injection_point: Arc<InjectionPoint>,
    satisfaction: Option<Satisfaction>,
}

impl Desire {
    /// Assemble a desire from parts.
    ///
    /// This is the constructor for external collaborators (e.g. a
    /// reflection layer) that carry their own notion of the desired
    /// type; [`from_injection_point`](Self::from_injection_point) is
    /// the common case. The solver checks that a supplied satisfaction
    /// produces the desired type when the desire comes out of a binding
    /// function.
    pub fn new(
        ty: ServiceType,
        qualifier: Option<Qualifier>,
        injection_point: InjectionPoint,
        satisfaction: Option<Satisfaction>,
    ) -> Self {
        Self {
            ty,
            qualifier,
            injection_point: Arc::new(injection_point),
            satisfaction,
        }
    }

    /// A desire for exactly what an injection point requests.
    pub fn from_injection_point(point: InjectionPoint) -> Self {
        Self {
            ty: point.service_type(),
            qualifier: point.qualifier().cloned(),
            injection_point: Arc::new(point),
            satisfaction: None,
        }
    }

    /// A root desire for type `T` with a synthetic injection point.
    pub fn for_type<T: ?Sized + 'static>() -> Self {
        Self::from_injection_point(InjectionPoint::no_argument(ServiceType::of::<T>()))
    }

    /// The desired type.
    #[inline]
    pub fn service_type(&self) -> ServiceType {
        self.ty
    }

    /// The qualifier refining this request, if any.
    #[inline]
    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }

    /// The place the value is needed.
    #[inline]
    pub fn injection_point(&self) -> &InjectionPoint {
        &self.injection_point
    }

    /// The satisfaction chosen for this desire, if any.
    #[inline]
    pub fn satisfaction(&self) -> Option<&Satisfaction> {
        self.satisfaction.as_ref()
    }

    /// True when a satisfaction is chosen and can be used directly.
    #[inline]
    pub fn instantiable(&self) -> bool {
        self.satisfaction
            .as_ref()
            .is_some_and(Satisfaction::instantiable)
    }

    /// Derive a desire with the given satisfaction chosen.
    ///
    /// The desired type becomes the satisfaction's type and the
    /// qualifier is cleared (it was consumed by the binding match); the
    /// injection point is preserved.
    pub fn resolved_with(&self, satisfaction: Satisfaction) -> Self {
        Self {
            ty: satisfaction.service_type(),
            qualifier: None,
            injection_point: Arc::clone(&self.injection_point),
            satisfaction: Some(satisfaction),
        }
    }

    /// Derive an unsatisfied desire for another type, preserving the
    /// injection point. Used by chained bindings (`Iface -> OtherIface`).
    pub fn redirected(&self, ty: ServiceType) -> Self {
        Self {
            ty,
            qualifier: None,
            injection_point: Arc::clone(&self.injection_point),
            satisfaction: None,
        }
    }
}

impl fmt::Display for Desire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(q) = &self.qualifier {
            write!(f, "{}:", q)?;
        }
        write!(f, "{}", self.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    struct Other;

    #[test]
    fn test_service_type_identity() {
        assert_eq!(ServiceType::of::<Plain>(), ServiceType::of::<Plain>());
        assert_ne!(ServiceType::of::<Plain>(), ServiceType::of::<Other>());
    }

    #[test]
    fn test_service_type_short_name() {
        assert_eq!(ServiceType::of::<Plain>().short_name(), "Plain");
        assert!(ServiceType::of::<Plain>().name().contains("::"));
    }

    #[test]
    fn test_injection_point_accessors() {
        let q = Qualifier::new("primary");
        let point = InjectionPoint::field("db", ServiceType::of::<Plain>())
            .with_qualifier(q.clone())
            .with_nullable();

        assert_eq!(point.service_type(), ServiceType::of::<Plain>());
        assert_eq!(point.qualifier(), Some(&q));
        assert!(point.is_nullable());
        assert_eq!(
            point.kind(),
            &InjectionPointKind::Field { name: "db" }
        );
    }

    #[test]
    fn test_desire_inherits_point_qualifier() {
        let q = Qualifier::new("primary");
        let desire = Desire::from_injection_point(
            InjectionPoint::no_argument(ServiceType::of::<Plain>()).with_qualifier(q.clone()),
        );
        assert_eq!(desire.qualifier(), Some(&q));
        assert!(!desire.instantiable());
        assert!(desire.satisfaction().is_none());
    }

    #[test]
    fn test_resolved_with_rewrites_type_and_clears_qualifier() {
        let desire = Desire::from_injection_point(
            InjectionPoint::no_argument(ServiceType::of::<Plain>())
                .with_qualifier(Qualifier::new("primary")),
        );
        let bound = desire.resolved_with(Satisfaction::class(ServiceType::of::<Other>(), vec![]));

        assert_eq!(bound.service_type(), ServiceType::of::<Other>());
        assert!(bound.qualifier().is_none());
        assert!(bound.instantiable());
        assert_eq!(bound.injection_point(), desire.injection_point());
    }

    #[test]
    fn test_redirected_keeps_point_and_drops_satisfaction() {
        let desire = Desire::for_type::<Plain>();
        let redirected = desire.redirected(ServiceType::of::<Other>());

        assert_eq!(redirected.service_type(), ServiceType::of::<Other>());
        assert!(redirected.satisfaction().is_none());
        assert_eq!(redirected.injection_point(), desire.injection_point());
    }

    #[test]
    fn test_display_formats_qualifier_and_type() {
        let desire = Desire::from_injection_point(
            InjectionPoint::no_argument(ServiceType::of::<Plain>())
                .with_qualifier(Qualifier::new("primary")),
        );
        assert_eq!(desire.to_string(), "primary:Plain");
        assert_eq!(Desire::for_type::<Plain>().to_string(), "Plain");
    }
}
