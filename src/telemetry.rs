//! Tracing setup for hosts embedding `superchart`.
//!
//! Registry lookups, loader dispatch and settlement are logged under the
//! `superchart` target. Nothing is installed unless the host asks for it.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "superchart=info";

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_DIRECTIVES`].
///
/// Returns `false` when the `telemetry` feature is off or the host already
/// installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_DIRECTIVES)
}

/// Same as [`init_default_tracing`] with caller-provided fallback directives,
/// e.g. `"superchart::registry=trace"` to follow in-flight load sharing.
#[must_use]
pub fn init_tracing(fallback_directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback_directives))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directives;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{init_default_tracing, init_tracing};

    #[cfg(not(feature = "telemetry"))]
    #[test]
    fn tracing_init_is_noop_without_feature() {
        assert!(!init_default_tracing());
        assert!(!init_tracing("superchart::registry=trace"));
    }

    #[cfg(feature = "telemetry")]
    #[test]
    fn only_the_first_init_installs_a_subscriber() {
        let _ = init_tracing("superchart::registry=trace");
        assert!(!init_default_tracing());
        assert!(!init_tracing("not a [valid filter"));
    }
}
