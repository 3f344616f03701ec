use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::FutureExt;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use superchart::api::{ChartContext, LoadPhase, SuperChartCore, SuperChartProps};
use superchart::core::TransformFn;
use superchart::extensions::ChartPlugin;
use superchart::registry::ChartRegistries;
use superchart::render::{NullChart, SharedComponent};
use superchart::{ChartError, ChartResult};

fn loadable_phase(core: &SuperChartCore) -> Option<LoadPhase> {
    core.active_renderer()
        .and_then(|active| active.as_loadable())
        .map(|renderer| renderer.phase())
}

#[test]
fn orchestrators_share_one_deferred_load() {
    let mut pool = LocalPool::new();
    let registries = ChartRegistries::new();
    let loads = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = oneshot::channel::<SharedComponent>();
    let rx = rx.shared();

    let counter = loads.clone();
    ChartPlugin::lazy(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        let rx = rx.clone();
        async move { rx.await.map_err(|err| ChartError::load_failed("heatmap", err)) }.boxed()
    })
    .register("heatmap", &registries)
    .expect("register plugin");

    let context = ChartContext::from_registries(&registries, Rc::new(pool.spawner()));
    let mut left = SuperChartCore::new(context.clone());
    let mut right = SuperChartCore::new(context);
    let props = SuperChartProps::new("heatmap");

    let _ = left.render(&props);
    let _ = right.render(&props);
    pool.run_until_stalled();
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(loadable_phase(&left), Some(LoadPhase::Loading));

    tx.send(Arc::new(NullChart::new("Heatmap")))
        .map_err(|_| "receiver dropped")
        .expect("send component");
    pool.run_until_stalled();

    assert_eq!(loadable_phase(&left), Some(LoadPhase::Loaded));
    assert_eq!(loadable_phase(&right), Some(LoadPhase::Loaded));
    assert!(left.has_pending_invalidation());
    assert!(right.has_pending_invalidation());

    let mut late = SuperChartCore::new(ChartContext::from_registries(
        &registries,
        Rc::new(pool.spawner()),
    ));
    let _ = late.render(&props);
    pool.run_until_stalled();
    assert_eq!(loadable_phase(&late), Some(LoadPhase::Loaded));
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn registering_after_failure_allows_a_new_orchestrator_to_succeed() {
    let mut pool = LocalPool::new();
    let registries = ChartRegistries::new();
    let context = ChartContext::from_registries(&registries, Rc::new(pool.spawner()));

    let mut first = SuperChartCore::new(context.clone());
    let props = SuperChartProps::new("gauge");
    let _ = first.render(&props);
    pool.run_until_stalled();
    assert_eq!(loadable_phase(&first), Some(LoadPhase::Error));

    ChartPlugin::new(Arc::new(NullChart::new("Gauge")))
        .with_lazy_transform(|| {
            futures::future::ready(ChartResult::Ok(TransformFn::identity())).boxed()
        })
        .register("gauge", &registries)
        .expect("register plugin");

    // A unit never retries; the failed orchestrator keeps its diagnostic.
    let element = first.render(&props).expect("container");
    assert!(element.find_diagnostic().is_some());

    let mut second = SuperChartCore::new(context);
    let _ = second.render(&props);
    pool.run_until_stalled();
    let element = second.render(&props).expect("container");
    assert_eq!(
        element.find_chart().map(|chart| chart.component.as_str()),
        Some("Gauge")
    );
}
