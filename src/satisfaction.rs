//! Satisfactions: resolved choices of how to produce a value
//!
//! A [`Satisfaction`] is the outcome of binding a desire: construct via
//! a registered constructor, hand out a pre-made instance, delegate to a
//! provider, or supply a legal null. Equality is structural: two
//! satisfactions are equal iff they would instantiate identically given
//! identical dependencies.

use crate::desire::{Desire, ServiceType};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A chosen way to produce a value for a desire.
///
/// The solver never instantiates anything itself; it only needs the
/// satisfaction's type, its dependency desires, and whether it can be
/// used directly or still needs further binding.
///
/// # Examples
///
/// ```rust
/// use dependency_solver::{Satisfaction, ServiceType};
///
/// struct Config {
///     url: String,
/// }
///
/// let sat = Satisfaction::instance(Config { url: "localhost".into() });
/// assert_eq!(sat.service_type(), ServiceType::of::<Config>());
/// assert!(sat.instantiable());
/// assert!(sat.dependencies().is_empty());
/// ```
#[derive(Clone)]
pub enum Satisfaction {
    /// Construct via a registered constructor.
    Class {
        ty: ServiceType,
        dependencies: Arc<[Desire]>,
        /// Whether a usable constructor is registered. A satisfaction
        /// describing an abstract type carries dependency metadata but
        /// cannot be used directly.
        instantiable: bool,
    },
    /// A pre-made value.
    Instance {
        ty: ServiceType,
        value: Arc<dyn Any + Send + Sync>,
    },
    /// Delegate to a factory that produces the value.
    Provider {
        provider: ServiceType,
        provided: ServiceType,
        dependencies: Arc<[Desire]>,
    },
    /// The legal value is absent.
    Null { ty: ServiceType },
}

impl Satisfaction {
    /// A class satisfaction with a usable constructor.
    pub fn class(ty: ServiceType, dependencies: Vec<Desire>) -> Self {
        Self::Class {
            ty,
            dependencies: dependencies.into(),
            instantiable: true,
        }
    }

    /// A class satisfaction for an abstract type: carries dependency
    /// metadata but needs further binding before it can be used.
    pub fn abstract_class(ty: ServiceType, dependencies: Vec<Desire>) -> Self {
        Self::Class {
            ty,
            dependencies: dependencies.into(),
            instantiable: false,
        }
    }

    /// An instance satisfaction wrapping a pre-made value.
    pub fn instance<T: Send + Sync + 'static>(value: T) -> Self {
        Self::Instance {
            ty: ServiceType::of::<T>(),
            value: Arc::new(value),
        }
    }

    /// An instance satisfaction from an already-shared value.
    pub fn instance_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self::Instance {
            ty: ServiceType::of::<T>(),
            value,
        }
    }

    /// A provider satisfaction: `provider` produces values of `provided`.
    pub fn provider(provider: ServiceType, provided: ServiceType, dependencies: Vec<Desire>) -> Self {
        Self::Provider {
            provider,
            provided,
            dependencies: dependencies.into(),
        }
    }

    /// A null satisfaction for a nullable injection point.
    pub fn null(ty: ServiceType) -> Self {
        Self::Null { ty }
    }

    /// The erased type this satisfaction produces.
    #[inline]
    pub fn service_type(&self) -> ServiceType {
        match self {
            Self::Class { ty, .. } => *ty,
            Self::Instance { ty, .. } => *ty,
            Self::Provider { provided, .. } => *provided,
            Self::Null { ty } => *ty,
        }
    }

    /// The child desires this satisfaction induces.
    #[inline]
    pub fn dependencies(&self) -> &[Desire] {
        match self {
            Self::Class { dependencies, .. } => dependencies,
            Self::Provider { dependencies, .. } => dependencies,
            Self::Instance { .. } | Self::Null { .. } => &[],
        }
    }

    /// Whether this satisfaction can be used directly, as opposed to
    /// needing further binding.
    #[inline]
    pub fn instantiable(&self) -> bool {
        match self {
            Self::Class { instantiable, .. } => *instantiable,
            Self::Instance { .. } | Self::Provider { .. } | Self::Null { .. } => true,
        }
    }

    /// Access the pre-made value of an instance satisfaction.
    pub fn instance_value(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        match self {
            Self::Instance { value, .. } => Some(value),
            _ => None,
        }
    }
}

impl PartialEq for Satisfaction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Class {
                    ty: a,
                    dependencies: da,
                    instantiable: ia,
                },
                Self::Class {
                    ty: b,
                    dependencies: db,
                    instantiable: ib,
                },
            ) => a == b && ia == ib && da == db,
            // Two instance satisfactions instantiate identically only
            // when they hand out the same shared value.
            (Self::Instance { ty: a, value: va }, Self::Instance { ty: b, value: vb }) => {
                a == b && Arc::ptr_eq(va, vb)
            }
            (
                Self::Provider {
                    provider: pa,
                    provided: ta,
                    dependencies: da,
                },
                Self::Provider {
                    provider: pb,
                    provided: tb,
                    dependencies: db,
                },
            ) => pa == pb && ta == tb && da == db,
            (Self::Null { ty: a }, Self::Null { ty: b }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Satisfaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class {
                ty,
                dependencies,
                instantiable,
            } => f
                .debug_struct("Class")
                .field("ty", ty)
                .field("dependencies", &dependencies.len())
                .field("instantiable", instantiable)
                .finish(),
            Self::Instance { ty, .. } => f.debug_struct("Instance").field("ty", ty).finish(),
            Self::Provider {
                provider, provided, ..
            } => f
                .debug_struct("Provider")
                .field("provider", provider)
                .field("provided", provided)
                .finish(),
            Self::Null { ty } => f.debug_struct("Null").field("ty", ty).finish(),
        }
    }
}

impl fmt::Display for Satisfaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class { ty, .. } => write!(f, "class {}", ty),
            Self::Instance { ty, .. } => write!(f, "instance of {}", ty),
            Self::Provider {
                provider, provided, ..
            } => write!(f, "{} provided by {}", provided, provider),
            Self::Null { ty } => write!(f, "null {}", ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desire::InjectionPoint;

    struct Widget;
    struct WidgetFactory;
    struct Gear;

    fn gear_desire() -> Desire {
        Desire::from_injection_point(InjectionPoint::constructor_parameter(
            0,
            ServiceType::of::<Gear>(),
        ))
    }

    #[test]
    fn test_class_satisfaction() {
        let sat = Satisfaction::class(ServiceType::of::<Widget>(), vec![gear_desire()]);

        assert_eq!(sat.service_type(), ServiceType::of::<Widget>());
        assert!(sat.instantiable());
        assert_eq!(sat.dependencies().len(), 1);
        assert_eq!(sat.dependencies()[0].service_type(), ServiceType::of::<Gear>());
    }

    #[test]
    fn test_abstract_class_is_not_instantiable() {
        let sat = Satisfaction::abstract_class(ServiceType::of::<Widget>(), vec![]);
        assert!(!sat.instantiable());
    }

    #[test]
    fn test_provider_satisfaction() {
        let sat = Satisfaction::provider(
            ServiceType::of::<WidgetFactory>(),
            ServiceType::of::<Widget>(),
            vec![gear_desire()],
        );

        assert_eq!(sat.service_type(), ServiceType::of::<Widget>());
        assert!(sat.instantiable());
        assert_eq!(sat.dependencies().len(), 1);
    }

    #[test]
    fn test_null_satisfaction() {
        let sat = Satisfaction::null(ServiceType::of::<Widget>());
        assert!(sat.instantiable());
        assert!(sat.dependencies().is_empty());
    }

    #[test]
    fn test_structural_equality() {
        let a = Satisfaction::class(ServiceType::of::<Widget>(), vec![gear_desire()]);
        let b = Satisfaction::class(ServiceType::of::<Widget>(), vec![gear_desire()]);
        let c = Satisfaction::class(ServiceType::of::<Widget>(), vec![]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Satisfaction::null(ServiceType::of::<Widget>()));
    }

    #[test]
    fn test_instance_equality_is_pointer_identity() {
        let shared = Arc::new(Widget);
        let a = Satisfaction::instance_arc(Arc::clone(&shared));
        let b = Satisfaction::instance_arc(shared);
        let c = Satisfaction::instance(Widget);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_instance_value_access() {
        let sat = Satisfaction::instance(42u32);
        let value = sat.instance_value().and_then(|v| v.downcast_ref::<u32>());
        assert_eq!(value, Some(&42));
    }
}
