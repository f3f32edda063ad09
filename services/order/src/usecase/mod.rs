mod create_order;
mod manage_order;
mod payment_proof;
mod read_order;
mod resolve_discount;
mod validate_stock;
mod verify_discount;

use std::boxed::Box;
use std::future::Future;
use std::result::Result as DefaultResult;
use std::sync::Arc;
use std::time::Duration;

use ecommerce_common::logging::{app_log_event, AppLogContext, AppLogLevel};

pub use create_order::{CreateOrderUcError, CreateOrderUseCase};
pub use manage_order::{
    CancelOrderUseCase, ConfirmReceiptUseCase, OrderLifecycleUcError, ValidateRepayUseCase,
};
pub use payment_proof::{PaymentProofUcError, UploadPaymentProofUseCase};
pub use read_order::{FetchOrderDetailUseCase, FetchOrderPageUseCase, FetchOrderUcError};
pub use resolve_discount::resolve_discount;
pub use validate_stock::{validate_stock, StockCheckError};
pub use verify_discount::{DiscountRejectReason, VerifyDiscountUcError, VerifyDiscountUseCase};

use crate::error::AppError;
use crate::repository::AbsDStoreTxn;

/// commit the transaction on success, otherwise roll it back and keep
/// the original error
async fn finish_txn<T, E>(
    txn: Box<dyn AbsDStoreTxn>,
    result: DefaultResult<T, E>,
    logctx: &Arc<AppLogContext>,
) -> DefaultResult<T, E>
where
    E: From<AppError>,
{
    match result {
        Ok(v) => {
            txn.commit().await?;
            Ok(v)
        }
        Err(e) => {
            if let Err(re) = txn.rollback().await {
                app_log_event!(logctx, AppLogLevel::ERROR, "rollback-failure: {}", re);
            }
            Err(e)
        }
    }
}

/// The unfinished future is dropped on timeout, along with any transaction
/// handle it owns, so no staged write survives.
async fn within_time_limit<T, E, F>(
    limit_secs: u16,
    fut: F,
    on_timeout: E,
) -> DefaultResult<T, E>
where
    F: Future<Output = DefaultResult<T, E>>,
{
    let limit = Duration::from_secs(limit_secs as u64);
    match tokio::time::timeout(limit, fut).await {
        Ok(r) => r,
        Err(_elapsed) => Err(on_timeout),
    }
}
