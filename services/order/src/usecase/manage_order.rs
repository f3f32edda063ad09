use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local as LocalTime};

use ecommerce_common::logging::{app_log_event, AppLogContext, AppLogLevel};

use super::{finish_txn, within_time_limit};
use crate::api::dto::OrderRepayRespDto;
use crate::error::AppError;
use crate::model::{OrderModel, OrderStatus, OrderTransitionError, RepayRejectReason};
use crate::notification::{AppOrderNotifyQueue, OrderNotifyEvent};
use crate::repository::{
    AbsDStoreTxn, AbsOrderReadRepo, AbsOrderTxnRepo, AbsStockTxnRepo, AbsUnitOfWork,
};

#[derive(Debug)]
pub enum OrderLifecycleUcError {
    OrderNotFound,
    InvalidOrderStatus(OrderStatus),
    PaymentExpired { deadline: DateTime<FixedOffset> },
    TransactionTimeout,
    DataStore(AppError),
}

impl From<AppError> for OrderLifecycleUcError {
    fn from(value: AppError) -> Self {
        Self::DataStore(value)
    }
}

impl From<OrderTransitionError> for OrderLifecycleUcError {
    fn from(value: OrderTransitionError) -> Self {
        Self::InvalidOrderStatus(value.current)
    }
}

pub struct CancelOrderUseCase {
    pub uow: Box<dyn AbsUnitOfWork>,
    pub notify: AppOrderNotifyQueue,
    pub logctx: Arc<AppLogContext>,
    pub txn_timeout_secs: u16,
}

pub struct ConfirmReceiptUseCase {
    pub uow: Box<dyn AbsUnitOfWork>,
    pub logctx: Arc<AppLogContext>,
    pub txn_timeout_secs: u16,
}

pub struct ValidateRepayUseCase {
    pub repo: Box<dyn AbsOrderReadRepo>,
    pub payment_window_mins: u32,
}

async fn load_owned_order(
    repo: &mut dyn AbsDStoreTxn,
    usr_id: u32,
    oid: &str,
) -> DefaultResult<OrderModel, OrderLifecycleUcError> {
    repo.fetch_order(usr_id, oid)
        .await?
        .ok_or(OrderLifecycleUcError::OrderNotFound)
}

impl CancelOrderUseCase {
    /// Cancel the order and return its reserved quantity to the store
    /// stock. The notification is queued only after commit, a failure to
    /// queue it does not affect the cancellation.
    pub async fn execute(
        self,
        usr_id: u32,
        oid: String,
    ) -> DefaultResult<OrderModel, OrderLifecycleUcError> {
        let result = within_time_limit(
            self.txn_timeout_secs,
            self.run_txn(usr_id, oid.as_str()),
            OrderLifecycleUcError::TransactionTimeout,
        )
        .await;
        let logctx = &self.logctx;
        match result.as_ref() {
            Ok(order) => {
                app_log_event!(logctx, AppLogLevel::INFO, "order-cancelled, oid:{}", order.id);
                let evt = OrderNotifyEvent::OrderCancelled {
                    usr_id: order.usr_id,
                    store_id: order.store_id,
                    oid: order.id.clone(),
                };
                self.notify.enqueue(evt);
            }
            Err(e) => app_log_event!(
                logctx,
                AppLogLevel::WARNING,
                "cancel-failure, usr:{}, oid:{}, reason:{:?}",
                usr_id,
                oid,
                e
            ),
        }
        result
    }

    async fn run_txn(
        &self,
        usr_id: u32,
        oid: &str,
    ) -> DefaultResult<OrderModel, OrderLifecycleUcError> {
        let mut txn = self.uow.begin().await?;
        let result = Self::cancel_and_restock(&mut *txn, usr_id, oid).await;
        finish_txn(txn, result, &self.logctx).await
    }

    async fn cancel_and_restock(
        repo: &mut dyn AbsDStoreTxn,
        usr_id: u32,
        oid: &str,
    ) -> DefaultResult<OrderModel, OrderLifecycleUcError> {
        let mut order = load_owned_order(&mut *repo, usr_id, oid).await?;
        order.cancel(LocalTime::now().fixed_offset())?;
        repo.update_order(&order).await?;
        for line in order.lines.iter() {
            repo.restore_stock(order.store_id, line.product_id, line.quantity)
                .await?;
        }
        Ok(order)
    }
} // end of impl CancelOrderUseCase

impl ConfirmReceiptUseCase {
    pub async fn execute(
        self,
        usr_id: u32,
        oid: String,
    ) -> DefaultResult<OrderModel, OrderLifecycleUcError> {
        let result = within_time_limit(
            self.txn_timeout_secs,
            self.run_txn(usr_id, oid.as_str()),
            OrderLifecycleUcError::TransactionTimeout,
        )
        .await;
        if let Err(e) = result.as_ref() {
            let logctx = &self.logctx;
            app_log_event!(
                logctx,
                AppLogLevel::WARNING,
                "confirm-failure, usr:{}, oid:{}, reason:{:?}",
                usr_id,
                oid,
                e
            );
        }
        result
    }

    async fn run_txn(
        &self,
        usr_id: u32,
        oid: &str,
    ) -> DefaultResult<OrderModel, OrderLifecycleUcError> {
        let mut txn = self.uow.begin().await?;
        let result = Self::confirm(&mut *txn, usr_id, oid).await;
        finish_txn(txn, result, &self.logctx).await
    }

    async fn confirm(
        repo: &mut dyn AbsDStoreTxn,
        usr_id: u32,
        oid: &str,
    ) -> DefaultResult<OrderModel, OrderLifecycleUcError> {
        let mut order = load_owned_order(&mut *repo, usr_id, oid).await?;
        order.confirm_receipt(LocalTime::now().fixed_offset())?;
        repo.update_order(&order).await?;
        Ok(order)
    }
} // end of impl ConfirmReceiptUseCase

impl ValidateRepayUseCase {
    /// the order is payable again only while pending payment within the
    /// payment window counted from its creation
    pub async fn execute(
        self,
        usr_id: u32,
        oid: String,
    ) -> DefaultResult<OrderRepayRespDto, OrderLifecycleUcError> {
        let order = self
            .repo
            .fetch_detail(usr_id, oid.as_str())
            .await?
            .ok_or(OrderLifecycleUcError::OrderNotFound)?;
        let now = LocalTime::now().fixed_offset();
        let window = self.payment_window_mins;
        order.validate_repay(now, window).map_err(|e| match e {
            RepayRejectReason::InvalidStatus(s) => OrderLifecycleUcError::InvalidOrderStatus(s),
            RepayRejectReason::Expired { deadline } => {
                OrderLifecycleUcError::PaymentExpired { deadline }
            }
        })?;
        Ok(OrderRepayRespDto {
            payment_deadline: order.payment_deadline(window),
            order_id: order.id,
            total_price: order.total_price,
        })
    }
}
