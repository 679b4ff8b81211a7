//! Shared plumbing for the `PostgreSQL` repositories: pool handling,
//! blocking-call bridging, and diesel error classification.

use crate::error::{DbOp, OpErrorKind, RepositoryError, RepositoryResult};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the repositories.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

diesel::define_sql_function! {
    /// SQL `LOWER`, used for case-insensitive project-name comparisons.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Builds a connection pool for the given database URL.
///
/// # Errors
///
/// Returns [`RepositoryError::Connection`] when the pool cannot be
/// initialised.
pub fn build_pool(database_url: &str, max_size: u32) -> RepositoryResult<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|err| RepositoryError::connection(err.to_string()))
}

/// Runs a diesel closure on the blocking thread pool.
///
/// Pool-checkout and worker failures both classify as connection errors;
/// statement-level errors are mapped by the closure itself, where the
/// operation kind is known.
pub(super) async fn run_blocking<F, T>(pool: &PgPool, f: F) -> RepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let owned = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = owned
            .get()
            .map_err(|err| RepositoryError::connection(err.to_string()))?;
        f(&mut connection)
    })
    .await
    .map_err(|err| RepositoryError::connection(format!("database worker failed: {err}")))?
}

/// Classifies a diesel error under the repository taxonomy.
pub(super) fn map_diesel(op: DbOp, err: DieselError) -> RepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            RepositoryError::operation(op, OpErrorKind::UniqueViolation, info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            RepositoryError::operation(
                op,
                OpErrorKind::ForeignKeyViolation,
                info.message().to_owned(),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            RepositoryError::connection(info.message().to_owned())
        }
        DieselError::BrokenTransactionManager => {
            RepositoryError::connection("transaction manager is broken".to_owned())
        }
        other => RepositoryError::operation(op, OpErrorKind::Other, other.to_string()),
    }
}

/// Escapes LIKE metacharacters and wraps the term for substring matching.
pub(super) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Converts a non-negative SQL count to `u64`.
pub(super) fn sql_count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}
