use std::cell::RefCell;

use crate::core::{ChartProps, TransformFn};

use super::memo::{Memo, MemoKey, MemoStats};

struct PipelineKey {
    pre: TransformFn,
    transform: TransformFn,
    post: TransformFn,
    chart_props: ChartProps,
}

impl MemoKey for PipelineKey {
    fn same(&self, other: &Self) -> bool {
        self.pre.ptr_eq(&other.pre)
            && self.transform.ptr_eq(&other.transform)
            && self.post.ptr_eq(&other.post)
            && self.chart_props.ptr_eq(&other.chart_props)
    }
}

/// Memoized `post(transform(pre(chart_props)))` composition.
///
/// Unchanged inputs (by identity) return the previous output allocation, so
/// components can skip redraws by comparing with [`ChartProps::ptr_eq`].
#[derive(Default)]
pub struct TransformPipeline {
    memo: RefCell<Memo<PipelineKey, ChartProps>>,
}

impl TransformPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Absent `pre` or `post` stages run as [`TransformFn::identity`].
    pub fn compute(
        &self,
        pre: Option<&TransformFn>,
        transform: &TransformFn,
        post: Option<&TransformFn>,
        chart_props: &ChartProps,
    ) -> ChartProps {
        let key = PipelineKey {
            pre: pre.cloned().unwrap_or_else(TransformFn::identity),
            transform: transform.clone(),
            post: post.cloned().unwrap_or_else(TransformFn::identity),
            chart_props: chart_props.clone(),
        };

        if let Some(cached) = self.memo.borrow_mut().get(&key) {
            return cached;
        }

        // Stages are host code; no borrow is held while they run.
        let output = compose(&key.pre, &key.transform, &key.post, &key.chart_props);
        self.memo.borrow_mut().insert(key, output.clone());
        output
    }

    pub fn clear(&self) {
        self.memo.borrow_mut().clear();
    }

    #[must_use]
    pub fn stats(&self) -> MemoStats {
        self.memo.borrow().stats()
    }
}

/// Uncached composition, fixed to pre, then transform, then post.
#[must_use]
pub fn compose(
    pre: &TransformFn,
    transform: &TransformFn,
    post: &TransformFn,
    chart_props: &ChartProps,
) -> ChartProps {
    post.apply(&transform.apply(&pre.apply(chart_props)))
}
