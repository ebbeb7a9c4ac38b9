//! Compiler backends for the predicate IR.
//!
//! ```text
//! PredicateSet
//!   ├── RelationalCompiler    → RelationalPredicates  (total)
//!   │     └── MediaStoreCompiler → MediaStoreQuery    (column rewrite)
//!   └── PhotoLibraryCompiler  → Option<PhotoQuery>    (partial)
//! ```
//!
//! The two primary backends are asymmetric: the relational one
//! accumulates structured clauses with bind parameters and never fails, the
//! photo-library one concatenates a platform expression string and gives up
//! on the first operation or field it cannot express.
pub mod media_store;
pub mod photos;
pub mod relational;

use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::predicates::PredicateSet;

pub use media_store::{MediaStoreCompiler, MediaStoreQuery};
pub use photos::{PhotoLibraryCompiler, PhotoQuery};
pub use relational::{JoinClause, JoinCondition, JoinType, RelationalCompiler, RelationalPredicates};

/// A backend that turns a predicate set into its native query form.
pub trait PredicateCompiler {
    /// What a compile produces. Partial backends wrap it in `Option`.
    type Output;

    /// Human-readable backend name.
    fn name(&self) -> &str;

    fn compile(&self, set: &PredicateSet) -> Self::Output;
}

/// Backend selector used by the CLI and the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    #[default]
    Relational,
    Photos,
    MediaStore,
}

/// Per-call inputs that are not part of the predicate set itself.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub table: String,
    pub album: bool,
    pub columns: Vec<String>,
}

/// Output of any backend, for callers that pick the backend at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "backend", rename_all = "kebab-case")]
pub enum CompiledQuery {
    Relational(RelationalPredicates),
    Photos(PhotoQuery),
    MediaStore(MediaStoreQuery),
}

impl Backend {
    /// Compile with this backend.
    ///
    /// Only the photo-library backend can fail.
    pub fn compile(
        self,
        set: &PredicateSet,
        options: &CompileOptions,
    ) -> Result<CompiledQuery, CompileError> {
        match self {
            Backend::Relational => {
                let compiler = RelationalCompiler::new(&options.table);
                Ok(CompiledQuery::Relational(compiler.compile(set)))
            }
            Backend::Photos => {
                let compiler = PhotoLibraryCompiler::new(options.album);
                compiler.try_compile(set).map(CompiledQuery::Photos)
            }
            Backend::MediaStore => {
                let compiler = MediaStoreCompiler::new(options.album, options.columns.clone());
                Ok(CompiledQuery::MediaStore(compiler.compile(set)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use crate::predicates::OperationKind;

    fn sample() -> PredicateSet {
        let mut set = PredicateSet::new();
        set.equal_to("media_type", 1).order_by_asc("date_added");
        set
    }

    #[test]
    fn test_backend_dispatch() {
        let options = CompileOptions {
            table: "Photos".into(),
            ..Default::default()
        };
        assert!(matches!(
            Backend::Relational.compile(&sample(), &options),
            Ok(CompiledQuery::Relational(_))
        ));
        assert!(matches!(
            Backend::Photos.compile(&sample(), &options),
            Ok(CompiledQuery::Photos(_))
        ));
        assert!(matches!(
            Backend::MediaStore.compile(&sample(), &options),
            Ok(CompiledQuery::MediaStore(_))
        ));
    }

    #[test]
    fn test_photos_failure_surfaces() {
        let mut set = PredicateSet::new();
        set.or();
        assert_eq!(
            Backend::Photos.compile(&set, &CompileOptions::default()),
            Err(CompileError::Unsupported(OperationKind::Or))
        );
    }

    #[test]
    fn test_compiled_query_serializes_with_backend_tag() {
        let compiled = Backend::Photos
            .compile(&sample(), &CompileOptions::default())
            .unwrap();
        let json = serde_json::to_value(&compiled).unwrap();
        assert_eq!(json["backend"], "photos");
        assert_eq!(json["where_clause"], "mediaType == 1");
    }

    #[test]
    fn test_backend_serde_names() {
        let b: Backend = serde_json::from_str("\"media-store\"").unwrap();
        assert_eq!(b, Backend::MediaStore);
    }
}
