// Generation pipeline: normalize, filter, resolve names, emit, aggregate
pub mod aggregator;
pub mod emitter;
pub mod filter;
pub mod name_resolver;
pub mod normalizer;


pub use aggregator::aggregate;
pub use emitter::{strip_banner, Emitter, INDEX_MODULE};
pub use filter::{filter_tables, is_excluded};
pub use name_resolver::{camelize, resolve_names, sanitize_identifier, NamingPolicy};
pub use normalizer::normalize;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::{Dialect, GenerateRequest, GenerationPlan};
use crate::error::GeneratorResult;
use crate::introspection::{
    fetch_rows, DialectAdapter, MsSqlAdapter, MySqlAdapter, PostgresAdapter, RawColumn,
    SqlSession,
};
use crate::types::GenerationResult;

impl GenerationPlan {
    /// Introspect through `session` and generate
    pub async fn run<S: SqlSession>(&self, session: &S) -> GeneratorResult<GenerationResult> {
        match self.dialect {
            Dialect::MySql => self.run_with(&MySqlAdapter, session).await,
            Dialect::Postgres => self.run_with(&PostgresAdapter, session).await,
            Dialect::MsSql => self.run_with(&MsSqlAdapter, session).await,
        }
    }

    async fn run_with<A, S>(&self, adapter: &A, session: &S) -> GeneratorResult<GenerationResult>
    where
        A: DialectAdapter,
        S: SqlSession,
    {
        let rows = fetch_rows(adapter, session, &self.target).await?;
        self.generate_from_rows(&rows, Utc::now())
    }

    /// Synchronous part of the pipeline, from raw rows to the result
    pub fn generate_from_rows<R: RawColumn>(
        &self,
        rows: &[R],
        generated_at: DateTime<Utc>,
    ) -> GeneratorResult<GenerationResult> {
        info!(dialect = %self.dialect, rows = rows.len(), "Normalizing introspected columns");

        let schema = normalize(rows)?;
        let schema = filter_tables(schema, &self.exclude);
        let schema = resolve_names(schema, self.naming)?;
        let buffer = Emitter::new(&self.emit, self.target.qualifier(), generated_at).render(&schema)?;

        Ok(aggregate(schema, buffer))
    }
}

/// Validate `request`, then introspect through `session` and generate
///
/// Configuration errors are returned before the session is queried.
pub async fn generate<S: SqlSession>(
    request: &GenerateRequest,
    session: &S,
) -> GeneratorResult<GenerationResult> {
    let plan = request.validate()?;
    plan.run(session).await
}
