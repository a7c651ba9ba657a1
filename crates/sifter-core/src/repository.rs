//! Repository glue: compile a filter and hand the specification to an
//! external execution engine for paged reads or counts.

use crate::{
    error::CompileError,
    filter::QueryFilter,
    obs::{CompileEvent, QueryKind},
    query::{CompileRequest, Predicate, QueryCompiler, SortSpec, Specification},
};
use serde::Serialize;
use thiserror::Error as ThisError;

///
/// PageRequest
/// Zero-based page number and a non-zero page size.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    pub const fn of(page: u32, size: u32) -> Result<Self, PageError> {
        if size == 0 {
            return Err(PageError::ZeroPageSize);
        }

        Ok(Self { page, size })
    }

    /// First page with `size` rows.
    pub const fn first(size: u32) -> Result<Self, PageError> {
        Self::of(0, size)
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Rows to skip before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }

    #[must_use]
    pub const fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
        }
    }

    /// Same page number with the size capped at `max`.
    #[must_use]
    pub fn clamped(self, max: u32) -> Self {
        Self {
            page: self.page,
            size: self.size.min(max.max(1)),
        }
    }
}

///
/// Page
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            size: request.size,
            total,
        }
    }

    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }

        self.total.div_ceil(self.size as u64)
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        (self.page as u64) + 1 < self.total_pages()
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 0
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
        }
    }
}

///
/// QueryExecutor
///
/// The execution engine a specification is handed to. Sifter never
/// executes anything itself.
///

pub trait QueryExecutor {
    type Row;
    type Error: From<CompileError>;

    fn find_page(
        &self,
        spec: &Specification,
        page: PageRequest,
    ) -> Result<Page<Self::Row>, Self::Error>;

    fn count(&self, spec: &Specification) -> Result<u64, Self::Error>;
}

///
/// FilterRepository
///
/// Find/count-by-filter surface over one root entity.
///

pub struct FilterRepository<'a, X> {
    compiler: QueryCompiler<'a>,
    executor: X,
    entity: String,
}

impl<'a, X: QueryExecutor> FilterRepository<'a, X> {
    #[must_use]
    pub fn new(compiler: QueryCompiler<'a>, executor: X, entity: &str) -> Self {
        Self {
            compiler,
            executor,
            entity: entity.to_string(),
        }
    }

    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    #[must_use]
    pub const fn executor(&self) -> &X {
        &self.executor
    }

    pub fn find_by_query<F: QueryFilter + 'static>(
        &self,
        filter: &F,
        page: PageRequest,
    ) -> Result<Page<X::Row>, X::Error> {
        self.find_by_query_with(filter, page, None, Vec::new())
    }

    pub fn find_by_query_sorted<F: QueryFilter + 'static>(
        &self,
        filter: &F,
        page: PageRequest,
        sort: SortSpec,
    ) -> Result<Page<X::Row>, X::Error> {
        self.find_by_query_with(filter, page, Some(sort), Vec::new())
    }

    /// Page number and size instead of a `PageRequest`; a zero size falls
    /// back to the configured default.
    pub fn find_by_page<F: QueryFilter + 'static>(
        &self,
        filter: &F,
        page: u32,
        size: u32,
    ) -> Result<Page<X::Row>, X::Error> {
        let size = if size == 0 {
            self.compiler.config().default_page_size
        } else {
            size
        };
        let page = PageRequest::of(page, size).map_err(CompileError::from)?;

        self.find_by_query(filter, page)
    }

    pub fn find_by_query_with<F: QueryFilter + 'static>(
        &self,
        filter: &F,
        page: PageRequest,
        sort: Option<SortSpec>,
        extra: Vec<Predicate>,
    ) -> Result<Page<X::Row>, X::Error> {
        let page = page.clamped(self.compiler.config().max_page_size);
        let sink = self.compiler.sink();
        sink.record(CompileEvent::QueryStart {
            kind: QueryKind::Find,
            entity: &self.entity,
            page: Some(page),
        });

        let request = CompileRequest::new(filter, &self.entity)
            .extra_predicates(extra)
            .sort_opt(sort);
        let spec = self.compiler.compile_request(request)?;
        let result = self.executor.find_page(&spec, page)?;

        sink.record(CompileEvent::QueryFinish {
            kind: QueryKind::Find,
            entity: &self.entity,
            rows: result.items.len() as u64,
        });

        Ok(result)
    }

    pub fn count_by_query<F: QueryFilter + 'static>(&self, filter: &F) -> Result<u64, X::Error> {
        let sink = self.compiler.sink();
        sink.record(CompileEvent::QueryStart {
            kind: QueryKind::Count,
            entity: &self.entity,
            page: None,
        });

        let spec = self.compiler.compile(filter, &self.entity)?;
        let count = self.executor.count(&spec)?;

        sink.record(CompileEvent::QueryFinish {
            kind: QueryKind::Count,
            entity: &self.entity,
            rows: count,
        });

        Ok(count)
    }
}

/// Pagination failures.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PageError {
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CompilerConfig,
        obs::CompileReport,
        query::{ColumnRef, SchemaPathError},
        test_support::{fixtures::PersonFilter, schema},
    };
    use std::sync::Mutex;

    ///
    /// FakeExecutor
    /// Records every specification it is handed and returns canned rows.
    ///

    #[derive(Default)]
    struct FakeExecutor {
        rows: u64,
        seen: Mutex<Vec<(Specification, Option<PageRequest>)>>,
    }

    impl FakeExecutor {
        fn with_rows(rows: u64) -> Self {
            Self {
                rows,
                ..Self::default()
            }
        }

        fn seen(&self) -> Vec<(Specification, Option<PageRequest>)> {
            self.seen.lock().expect("seen lock").clone()
        }
    }

    #[derive(Debug, Eq, PartialEq)]
    enum FakeError {
        Compile(CompileError),
    }

    impl From<CompileError> for FakeError {
        fn from(err: CompileError) -> Self {
            Self::Compile(err)
        }
    }

    impl QueryExecutor for FakeExecutor {
        type Row = u64;
        type Error = FakeError;

        fn find_page(
            &self,
            spec: &Specification,
            page: PageRequest,
        ) -> Result<Page<u64>, FakeError> {
            self.seen
                .lock()
                .expect("seen lock")
                .push((spec.clone(), Some(page)));

            let items = (page.offset()..self.rows)
                .take(page.size() as usize)
                .collect();

            Ok(Page::new(items, page, self.rows))
        }

        fn count(&self, spec: &Specification) -> Result<u64, FakeError> {
            self.seen.lock().expect("seen lock").push((spec.clone(), None));

            Ok(self.rows)
        }
    }

    fn ann() -> PersonFilter {
        PersonFilter {
            name: Some("Ann".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert_eq!(PageRequest::of(3, 0), Err(PageError::ZeroPageSize));
        assert_eq!(PageRequest::first(5).map(|p| p.offset()), Ok(0));
        assert_eq!(PageRequest::of(3, 10).map(|p| p.offset()), Ok(30));
    }

    #[test]
    fn page_navigation_flags() {
        let request = PageRequest::of(1, 10).expect("page");
        let page = Page::new(vec![0u8; 10], request, 25);

        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());

        let last = Page::new(vec![0u8; 5], request.next(), 25);
        assert!(!last.has_next());
        assert_eq!(last.map(u32::from).items.len(), 5);
    }

    #[test]
    fn find_by_query_hands_the_compiled_spec_to_the_executor() {
        let schema = schema();
        let compiler = QueryCompiler::new(&schema);
        let repo = FilterRepository::new(compiler.clone(), FakeExecutor::with_rows(42), "Person");

        let page = repo
            .find_by_query(&ann(), PageRequest::of(1, 20).expect("page"))
            .expect("find");

        assert_eq!(page.items.len(), 20);
        assert_eq!(page.items[0], 20);
        assert!(page.has_next());

        let expected = compiler.compile(&ann(), "Person").expect("compile");
        let seen = repo.executor().seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, expected);
    }

    #[test]
    fn requested_page_size_is_clamped() {
        let schema = schema();
        let config = CompilerConfig {
            max_page_size: 5,
            default_page_size: 5,
            ..CompilerConfig::default()
        };
        let compiler = QueryCompiler::new(&schema).with_config(config);
        let repo = FilterRepository::new(compiler, FakeExecutor::with_rows(100), "Person");

        let page = repo
            .find_by_query(&ann(), PageRequest::first(500).expect("page"))
            .expect("find");

        assert_eq!(page.size, 5);
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn find_by_page_falls_back_to_default_size() {
        let schema = schema();
        let repo =
            FilterRepository::new(QueryCompiler::new(&schema), FakeExecutor::with_rows(3), "Person");

        let page = repo.find_by_page(&ann(), 0, 0).expect("find");

        assert_eq!(page.size, CompilerConfig::default().default_page_size);
        assert_eq!(page.items, [0, 1, 2]);
        assert_eq!(repo.executor().seen()[0].1.map(|p| p.page()), Some(0));
    }

    #[test]
    fn sorted_find_carries_ordering_and_extras() {
        let schema = schema();
        let repo =
            FilterRepository::new(QueryCompiler::new(&schema), FakeExecutor::default(), "Person");
        let extra = Predicate::is_not_null(ColumnRef::root("email"));

        repo.find_by_query_sorted(
            &ann(),
            PageRequest::first(10).expect("page"),
            SortSpec::new().desc("age"),
        )
        .expect("sorted");
        repo.find_by_query_with(
            &ann(),
            PageRequest::first(10).expect("page"),
            None,
            vec![extra.clone()],
        )
        .expect("with extras");

        let seen = repo.executor().seen();
        assert_eq!(seen[0].0.order().len(), 1);
        assert_eq!(seen[1].0.predicates().last(), Some(&extra));
        assert!(seen[1].0.order().is_empty());
    }

    #[test]
    fn count_by_query_reports_executor_count() {
        let schema = schema();
        let report = CompileReport::new();
        let compiler = QueryCompiler::new(&schema).with_sink(&report);
        let repo = FilterRepository::new(compiler, FakeExecutor::with_rows(7), "Person");

        assert_eq!(repo.count_by_query(&ann()), Ok(7));
        assert_eq!(repo.executor().seen()[0].1, None);
        assert!(repo.executor().seen()[0].0.order().is_empty());
        assert_eq!(report.snapshot().queries, 1);
        assert_eq!(report.snapshot().compiles, 1);
    }

    #[test]
    fn compile_errors_convert_into_executor_errors() {
        let schema = schema();
        let repo =
            FilterRepository::new(QueryCompiler::new(&schema), FakeExecutor::default(), "Robot");

        let err = repo.count_by_query(&ann()).expect_err("unknown entity");

        assert_eq!(
            err,
            FakeError::Compile(CompileError::SchemaPath(SchemaPathError::UnknownEntity {
                entity: "Robot".to_string(),
            }))
        );
        assert!(repo.executor().seen().is_empty());
    }
}
