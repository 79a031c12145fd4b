//! Metric names recorded by the scheduler. The crate installs no recorder
//! or exporter — recording is a no-op until the embedding application
//! installs one.

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: agenda windows resolved.
pub const RESOLVES_TOTAL: &str = "shiftgrid_resolves_total";

/// Histogram: resolve latency in seconds (fetch + expand + sort).
pub const RESOLVE_DURATION_SECONDS: &str = "shiftgrid_resolve_duration_seconds";

/// Counter: resolves discarded because a newer fetch superseded them.
pub const RESOLVES_STALE_DROPPED_TOTAL: &str = "shiftgrid_resolves_stale_dropped_total";

/// Counter: drag commits attempted.
pub const COMMITS_TOTAL: &str = "shiftgrid_commits_total";

/// Counter: drag commits rejected by the store.
pub const COMMIT_FAILURES_TOTAL: &str = "shiftgrid_commit_failures_total";

/// Counter: assignment sets recomputed (bulk booking replacement).
pub const ASSIGNMENTS_REPLACED_TOTAL: &str = "shiftgrid_assignments_replaced_total";
