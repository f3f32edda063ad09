use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local as LocalTime};
use rust_decimal::Decimal;

use ecommerce_common::logging::{app_log_event, AppLogContext, AppLogLevel};

use crate::api::dto::{DiscountVerifyKindDto, DiscountVerifyReqDto, DiscountVerifyRespDto};
use crate::error::AppError;
use crate::model::{DiscountKind, DiscountModel, PriceCutModel, ProductStockModel};
use crate::repository::{AbsDStoreTxn, AbsDiscountTxnRepo, AbsStockTxnRepo, AbsUnitOfWork};

#[derive(Debug, Clone, PartialEq)]
pub enum DiscountRejectReason {
    /// unknown code, expired, deleted or bound to other store
    NotFound,
    RequiredProductAbsent { product_id: u64 },
    BonusStockShortage { required: u32, available: u32 },
    MinPurchaseNotMet { min_purchase: Decimal },
}

#[derive(Debug)]
pub enum VerifyDiscountUcError {
    DiscountNotApplicable(DiscountRejectReason),
    DataStore(AppError),
}

impl From<AppError> for VerifyDiscountUcError {
    fn from(value: AppError) -> Self {
        Self::DataStore(value)
    }
}

impl From<DiscountRejectReason> for VerifyDiscountUcError {
    fn from(value: DiscountRejectReason) -> Self {
        Self::DiscountNotApplicable(value)
    }
}

/// Check a promo code against the items a user is about to order, before
/// the order is placed. Unlike order creation, an unmet minimum purchase
/// is reported as rejection.
pub struct VerifyDiscountUseCase {
    pub uow: Box<dyn AbsUnitOfWork>,
    pub logctx: Arc<AppLogContext>,
}

impl VerifyDiscountUseCase {
    pub async fn execute(
        self,
        req: DiscountVerifyReqDto,
    ) -> DefaultResult<DiscountVerifyRespDto, VerifyDiscountUcError> {
        let now = LocalTime::now().fixed_offset();
        let mut txn = self.uow.begin().await?;
        let result = Self::verify(&mut *txn, &req, now).await;
        // nothing written, release the session in any case
        if let Err(e) = txn.rollback().await {
            let logctx = &self.logctx;
            app_log_event!(logctx, AppLogLevel::ERROR, "rollback-failure: {}", e);
        }
        if let Err(VerifyDiscountUcError::DataStore(e)) = result.as_ref() {
            let logctx = &self.logctx;
            app_log_event!(
                logctx,
                AppLogLevel::ERROR,
                "datastore-failure, code:{}, {}",
                req.code,
                e
            );
        }
        result
    }

    async fn verify(
        repo: &mut dyn AbsDStoreTxn,
        req: &DiscountVerifyReqDto,
        now: DateTime<FixedOffset>,
    ) -> DefaultResult<DiscountVerifyRespDto, VerifyDiscountUcError> {
        let code = req.code.trim();
        if code.is_empty() {
            return Err(DiscountRejectReason::NotFound.into());
        }
        let store_id = req.store_id;
        let discount = repo
            .find_applicable_discount(code, store_id, now)
            .await?
            .ok_or(DiscountRejectReason::NotFound)?;
        match (discount.kind, discount.product_id) {
            (DiscountKind::BuyOneGetOne, Some(product_id)) => {
                let quantity = Self::required_item_quantity(req, product_id)?;
                let available = repo.fetch_stock(store_id, product_id).await?;
                let stock = ProductStockModel {
                    store_id,
                    product_id,
                    quantity: available,
                };
                stock.check_cover(quantity.saturating_mul(2)).map_err(|e| {
                    DiscountRejectReason::BonusStockShortage {
                        required: e.required,
                        available: e.available,
                    }
                })?;
            }
            (DiscountKind::Manual, Some(product_id)) => {
                let _quantity = Self::required_item_quantity(req, product_id)?;
            }
            _others => {}
        }
        if discount.kind == DiscountKind::MinPurchase && !discount.meets_min_purchase(req.subtotal)
        {
            let min_purchase = discount.min_purchase.unwrap_or_default();
            return Err(DiscountRejectReason::MinPurchaseNotMet { min_purchase }.into());
        }
        Ok(Self::into_resp(discount))
    } // end of fn verify

    fn required_item_quantity(
        req: &DiscountVerifyReqDto,
        product_id: u64,
    ) -> DefaultResult<u32, DiscountRejectReason> {
        req.items
            .iter()
            .find(|i| i.product_id == product_id)
            .map(|i| i.quantity)
            .ok_or(DiscountRejectReason::RequiredProductAbsent { product_id })
    }

    fn into_resp(discount: DiscountModel) -> DiscountVerifyRespDto {
        let (kind, value) = match discount.kind {
            DiscountKind::FreeShipping => (DiscountVerifyKindDto::FreeShipping, Decimal::ZERO),
            DiscountKind::BuyOneGetOne => (DiscountVerifyKindDto::BuyOneGetOne, Decimal::ZERO),
            DiscountKind::Manual | DiscountKind::MinPurchase => match discount.price_cut() {
                Some(PriceCutModel::Percentage(v)) => (DiscountVerifyKindDto::Percentage, v),
                Some(PriceCutModel::Fixed(v)) => (DiscountVerifyKindDto::Fixed, v),
                None => (DiscountVerifyKindDto::Fixed, Decimal::ZERO),
            },
        };
        DiscountVerifyRespDto {
            code: discount.code,
            description: discount.description,
            kind,
            value,
            product_id: discount.product_id,
        }
    }
} // end of impl VerifyDiscountUseCase
