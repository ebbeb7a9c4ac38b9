//! Storage executor capabilities.
//!
//! Compiled queries are run by collaborators outside this crate: a
//! relational query executor and the platform photo-library dispatcher.
//! They are modelled as traits and handed to a [`QueryService`] as shared
//! handles, so every query call names the bridge it goes through.
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::compiler::{
    PhotoLibraryCompiler, PhotoQuery, PredicateCompiler, RelationalCompiler, RelationalPredicates,
};
use crate::predicates::PredicateSet;
use crate::result_set::ResultSet;

pub type BoxedResultSet = Box<dyn ResultSet + Send>;

/// Runs relational predicates against a table.
pub trait RelationalExecutor: Send + Sync {
    fn query(&self, predicates: &RelationalPredicates, columns: &[String])
        -> Result<BoxedResultSet>;
}

/// Passes a photo query to the platform photo library.
pub trait PhotoLibraryDispatcher: Send + Sync {
    /// `album` selects album fetches instead of asset fetches.
    fn dispatch(&self, query: &PhotoQuery, album: bool) -> Result<BoxedResultSet>;
}

/// Compiles predicate sets and runs them through explicitly provided backends.
#[derive(Clone, Default)]
pub struct QueryService {
    relational: Option<Arc<dyn RelationalExecutor>>,
    photos: Option<Arc<dyn PhotoLibraryDispatcher>>,
}

impl QueryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relational(mut self, executor: Arc<dyn RelationalExecutor>) -> Self {
        self.relational = Some(executor);
        self
    }

    pub fn with_photos(mut self, dispatcher: Arc<dyn PhotoLibraryDispatcher>) -> Self {
        self.photos = Some(dispatcher);
        self
    }

    pub fn query_relational(
        &self,
        set: &PredicateSet,
        table: &str,
        columns: &[String],
    ) -> Result<BoxedResultSet> {
        let executor = self
            .relational
            .as_ref()
            .context("No relational executor configured")?;
        let predicates = RelationalCompiler::new(table).compile(set);
        debug!("Relational query: {}", predicates.to_sql(columns));
        executor
            .query(&predicates, columns)
            .with_context(|| format!("Relational query on {table} failed"))
    }

    pub fn query_photos(&self, set: &PredicateSet, album: bool) -> Result<BoxedResultSet> {
        let dispatcher = self
            .photos
            .as_ref()
            .context("No photo library dispatcher configured")?;
        let query = PhotoLibraryCompiler::new(album)
            .try_compile(set)
            .context("Predicate cannot run on the photo library")?;
        dispatcher.dispatch(&query, album)
    }
}
