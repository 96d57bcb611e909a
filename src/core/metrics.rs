use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

pub(crate) const ATTEMPTS_STARTED_TOTAL: &str = "attempts_started_total";
pub(crate) const ATTEMPTS_COMPLETED_TOTAL: &str = "attempts_completed_total";
pub(crate) const ANSWERS_RECORDED_TOTAL: &str = "answers_recorded_total";

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);

    metrics::describe_counter!(ATTEMPTS_STARTED_TOTAL, "Exam attempts created");
    metrics::describe_counter!(
        ATTEMPTS_COMPLETED_TOTAL,
        "Exam attempts completed, labelled by trigger"
    );
    metrics::describe_counter!(ANSWERS_RECORDED_TOTAL, "Answers inserted or overwritten");
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}
