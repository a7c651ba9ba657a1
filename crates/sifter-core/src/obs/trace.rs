use crate::obs::sink::{CompileEvent, CompileSink};

///
/// TracingSink
/// Forwards compile events to `tracing` under the `sifter` target.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl CompileSink for TracingSink {
    fn record(&self, event: CompileEvent<'_>) {
        match event {
            CompileEvent::CompileStart { filter, entity } => {
                tracing::debug!(target: "sifter", filter, entity, "compile start");
            }
            CompileEvent::CompileFinish {
                filter,
                entity,
                predicates,
                joins,
            } => {
                tracing::debug!(target: "sifter", filter, entity, predicates, joins, "compile finish");
            }
            CompileEvent::CompileFailed {
                filter,
                entity,
                error,
            } => {
                tracing::warn!(target: "sifter", filter, entity, error = %error, "compile failed");
            }
            CompileEvent::ModelCacheHit { filter } => {
                tracing::trace!(target: "sifter", filter, "filter model cache hit");
            }
            CompileEvent::ModelCacheMiss { filter } => {
                tracing::debug!(target: "sifter", filter, "filter model cache miss");
            }
            CompileEvent::FieldSkipped { field, reason } => {
                tracing::trace!(target: "sifter", field, reason = ?reason, "field skipped");
            }
            CompileEvent::JoinCreated {
                owner,
                association,
                path,
            } => {
                tracing::trace!(target: "sifter", owner, association, path, "join created");
            }
            CompileEvent::JoinReused { owner, association } => {
                tracing::trace!(target: "sifter", owner, association, "join reused");
            }
            CompileEvent::PredicateBuilt { field, op, column } => {
                tracing::trace!(target: "sifter", field, op = %op, column, "predicate built");
            }
            CompileEvent::QueryStart { kind, entity, page } => {
                tracing::info!(
                    target: "sifter",
                    kind = ?kind,
                    entity,
                    page = page.map(|p| p.page()),
                    size = page.map(|p| p.size()),
                    "query start"
                );
            }
            CompileEvent::QueryFinish { kind, entity, rows } => {
                tracing::info!(target: "sifter", kind = ?kind, entity, rows, "query finish");
            }
        }
    }
}
