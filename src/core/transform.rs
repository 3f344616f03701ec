use std::fmt;
use std::sync::{Arc, LazyLock};

use super::ChartProps;

type StageFn = dyn Fn(&ChartProps) -> ChartProps + Send + Sync + 'static;

static IDENTITY: LazyLock<TransformFn> = LazyLock::new(|| TransformFn::new(ChartProps::clone));

/// Shared data-transform stage.
///
/// Used for the pre-transform, transform and post-transform hooks alike.
/// Memoization compares stages by allocation, so hold on to one
/// `TransformFn` instead of rebuilding the closure every render cycle.
#[derive(Clone)]
pub struct TransformFn(Arc<StageFn>);

impl TransformFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ChartProps) -> ChartProps + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Process-wide identity stage; every call returns the same allocation.
    #[must_use]
    pub fn identity() -> Self {
        IDENTITY.clone()
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.ptr_eq(&IDENTITY)
    }

    #[must_use]
    pub fn apply(&self, props: &ChartProps) -> ChartProps {
        (self.0)(props)
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        // Compare data pointers only; vtable pointers are not stable across codegen units.
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for TransformFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TransformFn")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Identity-aware equality for optional stages; `None` only matches `None`.
#[must_use]
pub fn same_stage(a: Option<&TransformFn>, b: Option<&TransformFn>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.ptr_eq(b),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{TransformFn, same_stage};
    use crate::core::ChartProps;

    #[test]
    fn identity_returns_input_allocation() {
        let props = ChartProps::builder().payload(json!([1])).build();
        let out = TransformFn::identity().apply(&props);
        assert!(out.ptr_eq(&props));
        assert!(TransformFn::identity().ptr_eq(&TransformFn::identity()));
        assert!(TransformFn::identity().is_identity());
    }

    #[test]
    fn clones_share_identity_but_fresh_closures_do_not() {
        let double = TransformFn::new(|props| props.clone());
        let other = TransformFn::new(|props| props.clone());
        assert!(double.ptr_eq(&double.clone()));
        assert!(!double.ptr_eq(&other));
        assert!(!double.is_identity());
    }

    #[test]
    fn same_stage_handles_absence() {
        let stage = TransformFn::identity();
        assert!(same_stage(None, None));
        assert!(same_stage(Some(&stage), Some(&stage.clone())));
        assert!(!same_stage(Some(&stage), None));
    }
}
