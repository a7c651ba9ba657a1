//! Process-wide memo of validated filter models, keyed by filter type.

use crate::filter::{
    QueryFilter,
    extract::{MetadataError, ValidatedFilterModel},
};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{
        Arc, OnceLock, PoisonError, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

// Read-mostly: entries are immutable once inserted, and insertion keeps the
// first model stored for a key.
static CACHE: OnceLock<RwLock<HashMap<TypeId, Arc<ValidatedFilterModel>>>> = OnceLock::new();
static HITS: AtomicUsize = AtomicUsize::new(0);
static MISSES: AtomicUsize = AtomicUsize::new(0);

///
/// CacheStats
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub size: usize,
}

///
/// Lookup
///

pub(crate) struct Lookup {
    pub(crate) model: Arc<ValidatedFilterModel>,
    pub(crate) hit: bool,
}

fn cache() -> &'static RwLock<HashMap<TypeId, Arc<ValidatedFilterModel>>> {
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Return the validated model for `F`, validating and storing it on first use.
/// Validation failures are not stored; they are reported on every call.
pub(crate) fn model_for<F: QueryFilter + 'static>() -> Result<Lookup, MetadataError> {
    let key = TypeId::of::<F>();

    let cached = cache()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .cloned();
    if let Some(model) = cached {
        HITS.fetch_add(1, Ordering::Relaxed);
        return Ok(Lookup { model, hit: true });
    }

    let validated = Arc::new(ValidatedFilterModel::new(F::filter_model())?);
    MISSES.fetch_add(1, Ordering::Relaxed);

    let model = cache()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(key)
        .or_insert(validated)
        .clone();

    Ok(Lookup { model, hit: false })
}

/// Validate `F`'s model without touching the cache.
pub(crate) fn model_uncached<F: QueryFilter>() -> Result<Lookup, MetadataError> {
    Ok(Lookup {
        model: Arc::new(ValidatedFilterModel::new(F::filter_model())?),
        hit: false,
    })
}

// Statistics are best-effort only; relaxed atomics are sufficient.
#[must_use]
pub fn stats() -> CacheStats {
    let size = CACHE
        .get()
        .map_or(0, |cache| cache.read().unwrap_or_else(PoisonError::into_inner).len());

    CacheStats {
        hits: HITS.load(Ordering::Relaxed),
        misses: MISSES.load(Ordering::Relaxed),
        size,
    }
}

#[cfg(test)]
pub(crate) fn contains<F: 'static>() -> bool {
    CACHE.get().is_some_and(|cache| {
        cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<F>())
    })
}
