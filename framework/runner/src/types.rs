/// Recommended error type for code driving a sweep. Per-level failures are reported through
/// [build_sweep_report_model::RunResult] rather than through this type.
pub type SweepResult<T> = anyhow::Result<T>;
