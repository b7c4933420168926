// Transaction settlement
use crate::error::DatabaseError;
use crate::store::HierarchyTransaction;
use tracing::{debug, warn};

/// Commit `tx` when `result` is `Ok`, roll it back otherwise.
///
/// A failed commit replaces the successful result with the commit error. A
/// failed rollback is logged and the original error is returned.
pub async fn settle<T, E>(tx: Box<dyn HierarchyTransaction>, result: Result<T, E>) -> Result<T, E>
where
    E: From<DatabaseError>,
{
    match result {
        Ok(value) => {
            tx.commit().await?;
            debug!("Transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Transaction rollback failed");
            } else {
                debug!("Transaction rolled back");
            }
            Err(err)
        }
    }
}
