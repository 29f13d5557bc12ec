use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled {
        return Ok(());
    }

    if PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);

    metrics::describe_counter!(
        "question_selection_tier_total",
        "Question selections grouped by the fallback tier that produced the result"
    );
    metrics::describe_counter!("documents_generated_total", "Generated paper and key PDFs");
    metrics::describe_histogram!(
        "document_render_seconds",
        "Time spent laying out and encoding a PDF document"
    );

    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}
