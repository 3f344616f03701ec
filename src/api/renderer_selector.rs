use crate::core::{TransformFn, same_stage};
use crate::render::Element;

use super::loadable_renderer::{LoadableRenderer, RenderHooks, RenderProps};
use super::memo::{Memo, MemoKey, MemoStats};

/// Renderer chosen for one `(chart_type, override_transform)` pair.
#[derive(Debug, Clone)]
pub enum ActiveRenderer {
    /// Selected for an empty chart type: resolves nothing and renders nothing.
    Empty,
    Loadable(LoadableRenderer),
}

impl ActiveRenderer {
    pub fn preload(&self) {
        if let Self::Loadable(renderer) = self {
            renderer.preload();
        }
    }

    pub fn render(&self, props: RenderProps, hooks: RenderHooks) -> Option<Element> {
        match self {
            Self::Empty => None,
            Self::Loadable(renderer) => renderer.render(props, hooks),
        }
    }

    pub fn unmount(&self) {
        if let Self::Loadable(renderer) = self {
            renderer.unmount();
        }
    }

    pub fn teardown(&self) {
        if let Self::Loadable(renderer) = self {
            renderer.teardown();
        }
    }

    #[must_use]
    pub fn as_loadable(&self) -> Option<&LoadableRenderer> {
        match self {
            Self::Empty => None,
            Self::Loadable(renderer) => Some(renderer),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn has_pending_invalidation(&self) -> bool {
        self.as_loadable()
            .is_some_and(LoadableRenderer::has_pending_invalidation)
    }

    /// Same selection result: both empty, or the same loadable unit.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Loadable(a), Self::Loadable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

struct SelectorKey {
    chart_type: String,
    override_transform: Option<TransformFn>,
}

impl MemoKey for SelectorKey {
    fn same(&self, other: &Self) -> bool {
        self.chart_type == other.chart_type
            && same_stage(
                self.override_transform.as_ref(),
                other.override_transform.as_ref(),
            )
    }
}

/// Caches the renderer for the last `(chart_type, override_transform)` pair.
#[derive(Default)]
pub struct RendererSelector {
    memo: Memo<SelectorKey, ActiveRenderer>,
}

impl RendererSelector {
    /// Returns the cached renderer for an unchanged pair, otherwise builds a
    /// new one with `build`.
    ///
    /// The second element is the renderer evicted by a changed pair; the
    /// caller owns its teardown.
    pub fn select(
        &mut self,
        chart_type: &str,
        override_transform: Option<&TransformFn>,
        build: impl FnOnce(&str, Option<&TransformFn>) -> ActiveRenderer,
    ) -> (ActiveRenderer, Option<ActiveRenderer>) {
        let key = SelectorKey {
            chart_type: chart_type.to_owned(),
            override_transform: override_transform.cloned(),
        };
        if let Some(renderer) = self.memo.get(&key) {
            return (renderer, None);
        }
        let renderer = build(chart_type, override_transform);
        let evicted = self.memo.insert(key, renderer.clone());
        (renderer, evicted)
    }

    #[must_use]
    pub fn current(&self) -> Option<&ActiveRenderer> {
        self.memo.peek()
    }

    pub fn clear(&mut self) -> Option<ActiveRenderer> {
        self.memo.clear()
    }

    #[must_use]
    pub fn stats(&self) -> MemoStats {
        self.memo.stats()
    }
}
