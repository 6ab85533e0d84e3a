//! Tracing/logging setup shared by processes and test harnesses that run imports.

/// Initialize process-wide logging, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize process-wide logging with an explicit filter directive
/// (e.g. `"rolesync_import=debug"`), ignoring `RUST_LOG`.
pub fn init_with_filter(directive: &str) {
    tracing::init_with_filter(directive);
}

/// Tracing subscriber configuration (filters, formatting).
pub mod tracing;
