use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait};

use crate::error::CatalogError;

/// Runs `work` inside one transaction. It commits when `work` returns `Ok` and
/// rolls back otherwise, so every listing of a request reads one snapshot.
///
/// ```ignore
/// let rows = session(&db, |txn| Box::pin(async move { category_list(txn, filters).await })).await?;
/// ```
pub async fn session<F, T>(db: &DatabaseConnection, work: F) -> Result<T, CatalogError>
where
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, CatalogError>> + Send + 'c>>
        + Send,
    T: Send,
{
    db.transaction::<F, T, CatalogError>(work)
        .await
        .map_err(|err| match err {
            TransactionError::Connection(err) => CatalogError::Db(err),
            TransactionError::Transaction(err) => err,
        })
}
