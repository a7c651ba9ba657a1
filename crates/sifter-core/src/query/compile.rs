use crate::{
    config::CompilerConfig,
    error::CompileError,
    filter::{FieldSpec, QueryFilter, cache, extract},
    model::SchemaProvider,
    obs::{CompileEvent, CompileSink, NoopSink, SkipReason},
    query::{
        join::JoinSet,
        operator::{build_predicate, resolve_operator},
        path::{SchemaPathError, resolve_path},
        predicate::{ColumnRef, Predicate},
        sort::{SortSpec, resolve_order},
        spec::Specification,
    },
};
use std::any::type_name;

static NOOP_SINK: NoopSink = NoopSink;

///
/// CompileRequest
///
/// One compilation: a filter value, the root entity, and the optional
/// caller-supplied extras (additional predicates and ordering).
///

#[derive(Debug)]
pub struct CompileRequest<'r, F> {
    filter: &'r F,
    entity: &'r str,
    extra: Vec<Predicate>,
    sort: Option<SortSpec>,
}

impl<'r, F: QueryFilter> CompileRequest<'r, F> {
    #[must_use]
    pub const fn new(filter: &'r F, entity: &'r str) -> Self {
        Self {
            filter,
            entity,
            extra: Vec::new(),
            sort: None,
        }
    }

    /// Predicates AND-ed after the filter's own predicates, in order.
    #[must_use]
    pub fn extra_predicates(mut self, extra: impl IntoIterator<Item = Predicate>) -> Self {
        self.extra.extend(extra);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    #[must_use]
    pub(crate) fn sort_opt(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }
}

///
/// QueryCompiler
///
/// Stateless between calls: every compilation builds its own join set, so
/// one compiler can be shared across threads.
///

#[derive(Clone)]
pub struct QueryCompiler<'a> {
    schema: &'a dyn SchemaProvider,
    sink: &'a dyn CompileSink,
    config: CompilerConfig,
}

impl<'a> QueryCompiler<'a> {
    #[must_use]
    pub fn new(schema: &'a dyn SchemaProvider) -> Self {
        Self {
            schema,
            sink: &NOOP_SINK,
            config: CompilerConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: &'a dyn CompileSink) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub(crate) fn sink(&self) -> &'a dyn CompileSink {
        self.sink
    }

    /// Compile `filter` against `entity` with no extras.
    pub fn compile<F: QueryFilter + 'static>(
        &self,
        filter: &F,
        entity: &str,
    ) -> Result<Specification, CompileError> {
        self.compile_request(CompileRequest::new(filter, entity))
    }

    pub fn compile_request<F: QueryFilter + 'static>(
        &self,
        request: CompileRequest<'_, F>,
    ) -> Result<Specification, CompileError> {
        let filter = type_name::<F>();
        let entity = request.entity;

        self.sink.record(CompileEvent::CompileStart { filter, entity });
        let result = self.assemble(request);
        match &result {
            Ok(spec) => self.sink.record(CompileEvent::CompileFinish {
                filter,
                entity,
                predicates: spec.predicates().len(),
                joins: spec.joins().len(),
            }),
            Err(error) => self.sink.record(CompileEvent::CompileFailed {
                filter,
                entity,
                error,
            }),
        }

        result
    }

    fn assemble<F: QueryFilter + 'static>(
        &self,
        request: CompileRequest<'_, F>,
    ) -> Result<Specification, CompileError> {
        let lookup = if self.config.cache_filter_models {
            cache::model_for::<F>()?
        } else {
            cache::model_uncached::<F>()?
        };
        let model = lookup.model;
        self.sink.record(if lookup.hit {
            CompileEvent::ModelCacheHit {
                filter: model.name(),
            }
        } else {
            CompileEvent::ModelCacheMiss {
                filter: model.name(),
            }
        });

        let (fields, overrides) = extract(request.filter, &model)?;

        if self.schema.entity(request.entity).is_none() {
            return Err(SchemaPathError::UnknownEntity {
                entity: request.entity.to_string(),
            }
            .into());
        }

        let mut joins = JoinSet::new();
        let mut predicates = Vec::with_capacity(fields.len() + request.extra.len());

        for field in fields {
            if field.ignored || field.value.is_null() {
                let reason = if field.ignored {
                    SkipReason::Ignored
                } else {
                    SkipReason::Unset
                };
                self.sink.record(CompileEvent::FieldSkipped {
                    field: &field.name,
                    reason,
                });
                continue;
            }

            let segments = field.segments(self.config.path_separator);
            let resolved = resolve_path(self.schema, request.entity, &segments)?;
            let source = joins.plan(&resolved.steps, self.sink);
            let column = ColumnRef::under(source, joins.path_of(source), &resolved.column);
            let op = resolve_operator(&field, &overrides);

            let FieldSpec { name, value, .. } = field;
            let predicate = build_predicate(
                &name,
                op,
                value,
                column,
                &resolved.column_kind,
                self.config.like_escape,
            )?;
            self.sink.record(CompileEvent::PredicateBuilt {
                field: &name,
                op,
                column: &predicate.column().path,
            });
            predicates.push(predicate);
        }

        predicates.extend(request.extra);

        let order = match &request.sort {
            Some(sort) => resolve_order(self.schema, request.entity, &mut joins, sort, self.sink)?,
            None => Vec::new(),
        };

        Ok(Specification::new(
            request.entity.to_string(),
            joins.into_nodes(),
            predicates,
            order,
        ))
    }
}
