//! Compile sink boundary.
//!
//! Compiler and repository code MUST NOT depend on a concrete sink.
//! All instrumentation flows through `CompileEvent` and `CompileSink`.
use crate::{error::CompileError, filter::Operator, repository::PageRequest};
use std::sync::atomic::{AtomicU64, Ordering};

///
/// SkipReason
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SkipReason {
    Ignored,
    Unset,
}

///
/// QueryKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueryKind {
    Find,
    Count,
}

///
/// CompileEvent
///

#[derive(Clone, Copy, Debug)]
pub enum CompileEvent<'a> {
    CompileStart {
        filter: &'a str,
        entity: &'a str,
    },
    CompileFinish {
        filter: &'a str,
        entity: &'a str,
        predicates: usize,
        joins: usize,
    },
    CompileFailed {
        filter: &'a str,
        entity: &'a str,
        error: &'a CompileError,
    },
    ModelCacheHit {
        filter: &'a str,
    },
    ModelCacheMiss {
        filter: &'a str,
    },
    FieldSkipped {
        field: &'a str,
        reason: SkipReason,
    },
    JoinCreated {
        owner: &'a str,
        association: &'a str,
        path: &'a str,
    },
    JoinReused {
        owner: &'a str,
        association: &'a str,
    },
    PredicateBuilt {
        field: &'a str,
        op: Operator,
        column: &'a str,
    },
    QueryStart {
        kind: QueryKind,
        entity: &'a str,
        page: Option<PageRequest>,
    },
    QueryFinish {
        kind: QueryKind,
        entity: &'a str,
        rows: u64,
    },
}

///
/// CompileSink
///

pub trait CompileSink: Send + Sync {
    fn record(&self, event: CompileEvent<'_>);
}

///
/// NoopSink
/// Default sink; drops every event.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl CompileSink for NoopSink {
    fn record(&self, _: CompileEvent<'_>) {}
}

///
/// CompileReport
///
/// Counting sink. Safe to share across threads; counters only ever grow.
///

#[derive(Debug, Default)]
pub struct CompileReport {
    compiles: AtomicU64,
    failures: AtomicU64,
    predicates: AtomicU64,
    joins_created: AtomicU64,
    joins_reused: AtomicU64,
    fields_skipped: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    queries: AtomicU64,
}

impl CompileReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> CompileReportSnapshot {
        CompileReportSnapshot {
            compiles: self.compiles.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            predicates: self.predicates.load(Ordering::Relaxed),
            joins_created: self.joins_created.load(Ordering::Relaxed),
            joins_reused: self.joins_reused.load(Ordering::Relaxed),
            fields_skipped: self.fields_skipped.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            queries: self.queries.load(Ordering::Relaxed),
        }
    }
}

impl CompileSink for CompileReport {
    fn record(&self, event: CompileEvent<'_>) {
        let counter = match event {
            CompileEvent::CompileFinish { .. } => &self.compiles,
            CompileEvent::CompileFailed { .. } => &self.failures,
            CompileEvent::PredicateBuilt { .. } => &self.predicates,
            CompileEvent::JoinCreated { .. } => &self.joins_created,
            CompileEvent::JoinReused { .. } => &self.joins_reused,
            CompileEvent::FieldSkipped { .. } => &self.fields_skipped,
            CompileEvent::ModelCacheHit { .. } => &self.cache_hits,
            CompileEvent::ModelCacheMiss { .. } => &self.cache_misses,
            CompileEvent::QueryFinish { .. } => &self.queries,
            CompileEvent::CompileStart { .. } | CompileEvent::QueryStart { .. } => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

///
/// CompileReportSnapshot
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CompileReportSnapshot {
    pub compiles: u64,
    pub failures: u64,
    pub predicates: u64,
    pub joins_created: u64,
    pub joins_reused: u64,
    pub fields_skipped: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub queries: u64,
}
