use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use chrono::Local as LocalTime;

use ecommerce_common::config::AppOrderCfg;
use ecommerce_common::logging::{app_log_event, AppLogContext, AppLogLevel};

use super::{finish_txn, within_time_limit};
use crate::constant::OBJ_STORAGE_PROOF_FOLDER;
use crate::error::AppError;
use crate::model::{OrderModel, OrderStatus, OrderTransitionError};
use crate::repository::{AbsDStoreTxn, AbsOrderTxnRepo, AbsUnitOfWork};
use crate::storage::AbsObjStorage;

#[derive(Debug)]
pub enum PaymentProofUcError {
    PaymentProofRequired,
    OrderNotFound,
    InvalidOrderStatus(OrderStatus),
    Storage(AppError),
    TransactionTimeout,
    DataStore(AppError),
}

impl From<AppError> for PaymentProofUcError {
    fn from(value: AppError) -> Self {
        Self::DataStore(value)
    }
}

impl From<OrderTransitionError> for PaymentProofUcError {
    fn from(value: OrderTransitionError) -> Self {
        Self::InvalidOrderStatus(value.current)
    }
}

pub struct UploadPaymentProofUseCase {
    pub uow: Box<dyn AbsUnitOfWork>,
    pub storage: Arc<Box<dyn AbsObjStorage>>,
    pub logctx: Arc<AppLogContext>,
    pub cfg: AppOrderCfg,
}

impl UploadPaymentProofUseCase {
    /// Store the proof file then record its URL against the order. Without
    /// a file, a placeholder URL is recorded unless the configuration
    /// requires a real proof.
    pub async fn execute(
        self,
        usr_id: u32,
        oid: String,
        file: Option<Vec<u8>>,
    ) -> DefaultResult<OrderModel, PaymentProofUcError> {
        let url = self.resolve_proof_url(oid.as_str(), file).await?;
        let result = within_time_limit(
            self.cfg.txn_timeout_secs,
            self.run_txn(usr_id, oid.as_str(), url),
            PaymentProofUcError::TransactionTimeout,
        )
        .await;
        let logctx = &self.logctx;
        match result.as_ref() {
            Ok(order) => app_log_event!(
                logctx,
                AppLogLevel::INFO,
                "payment-proof-recorded, oid:{}",
                order.id
            ),
            Err(e) => app_log_event!(
                logctx,
                AppLogLevel::WARNING,
                "payment-proof-failure, usr:{}, oid:{}, reason:{:?}",
                usr_id,
                oid,
                e
            ),
        }
        result
    }

    async fn resolve_proof_url(
        &self,
        oid: &str,
        file: Option<Vec<u8>>,
    ) -> DefaultResult<String, PaymentProofUcError> {
        if let Some(content) = file {
            let url = self
                .storage
                .upload(OBJ_STORAGE_PROOF_FOLDER, content)
                .await
                .map_err(|e| {
                    let logctx = &self.logctx;
                    app_log_event!(logctx, AppLogLevel::ERROR, "upload-failure, {}", e);
                    PaymentProofUcError::Storage(e)
                })?;
            Ok(url)
        } else if self.cfg.require_payment_proof {
            Err(PaymentProofUcError::PaymentProofRequired)
        } else {
            Ok(self.cfg.proof_placeholder_url.clone() + oid)
        }
    }

    async fn run_txn(
        &self,
        usr_id: u32,
        oid: &str,
        url: String,
    ) -> DefaultResult<OrderModel, PaymentProofUcError> {
        let mut txn = self.uow.begin().await?;
        let result = Self::attach_proof(&mut *txn, usr_id, oid, url).await;
        finish_txn(txn, result, &self.logctx).await
    }

    async fn attach_proof(
        repo: &mut dyn AbsDStoreTxn,
        usr_id: u32,
        oid: &str,
        url: String,
    ) -> DefaultResult<OrderModel, PaymentProofUcError> {
        let mut order = repo
            .fetch_order(usr_id, oid)
            .await?
            .ok_or(PaymentProofUcError::OrderNotFound)?;
        order.attach_payment_proof(url, LocalTime::now().fixed_offset())?;
        repo.update_order(&order).await?;
        Ok(order)
    }
} // end of impl UploadPaymentProofUseCase
