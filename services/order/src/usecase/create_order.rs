use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Local as LocalTime;
use rust_decimal::Decimal;

use ecommerce_common::logging::{app_log_event, AppLogContext, AppLogLevel};

use super::{
    finish_txn, resolve_discount, validate_stock, within_time_limit, StockCheckError,
};
use crate::api::dto::OrderCreateReqDto;
use crate::constant::app_meta;
use crate::error::AppError;
use crate::generate_custom_uid;
use crate::model::{OrderCreateReqModel, OrderModel, PricingCalculator};
use crate::repository::{
    AbsAddressTxnRepo, AbsCartTxnRepo, AbsDStoreTxn, AbsOrderTxnRepo, AbsUnitOfWork,
};

#[derive(Debug)]
pub enum CreateOrderUcError {
    EmptyCart,
    InsufficientStock {
        product_id: u64,
        required: u32,
        available: u32,
    },
    AddressNotFound,
    InvalidShippingCost(String),
    TransactionTimeout,
    DataStore(AppError),
}

impl From<AppError> for CreateOrderUcError {
    fn from(value: AppError) -> Self {
        Self::DataStore(value)
    }
}

impl From<StockCheckError> for CreateOrderUcError {
    fn from(value: StockCheckError) -> Self {
        match value {
            StockCheckError::Shortage(s) => Self::InsufficientStock {
                product_id: s.product_id,
                required: s.required,
                available: s.available,
            },
            StockCheckError::DataStore(e) => Self::DataStore(e),
        }
    }
}

pub struct CreateOrderUseCase {
    pub uow: Box<dyn AbsUnitOfWork>,
    pub logctx: Arc<AppLogContext>,
    pub txn_timeout_secs: u16,
}

impl CreateOrderUseCase {
    /// Convert the user's cart of a store into an order in one atomic
    /// unit of work. Nothing is persisted if any step fails or the
    /// transaction runs out of time.
    pub async fn execute(
        self,
        usr_id: u32,
        req: OrderCreateReqDto,
    ) -> DefaultResult<OrderModel, CreateOrderUcError> {
        let store_id = req.store_id;
        let result = within_time_limit(
            self.txn_timeout_secs,
            self.run_txn(usr_id, req),
            CreateOrderUcError::TransactionTimeout,
        )
        .await;
        match result.as_ref() {
            Ok(order) => {
                let logctx = &self.logctx;
                app_log_event!(
                    logctx,
                    AppLogLevel::INFO,
                    "order-created, usr:{}, store:{}, oid:{}, total:{}",
                    usr_id,
                    store_id,
                    order.id,
                    order.total_price
                );
            }
            Err(e) => self.log_failure(usr_id, store_id, e),
        }
        result
    } // end of fn execute

    async fn run_txn(
        &self,
        usr_id: u32,
        req: OrderCreateReqDto,
    ) -> DefaultResult<OrderModel, CreateOrderUcError> {
        let mut txn = self.uow.begin().await?;
        let result = self.place_order(&mut *txn, usr_id, req).await;
        finish_txn(txn, result, &self.logctx).await
    }

    async fn place_order(
        &self,
        repo: &mut dyn AbsDStoreTxn,
        usr_id: u32,
        req: OrderCreateReqDto,
    ) -> DefaultResult<OrderModel, CreateOrderUcError> {
        let store_id = req.store_id;
        let cart = repo
            .fetch_cart(usr_id, store_id)
            .await?
            .filter(|c| !c.is_empty())
            .ok_or(CreateOrderUcError::EmptyCart)?;
        validate_stock(&mut *repo, store_id, &cart.lines, None).await?;

        let address = repo
            .find_user_address(req.address_id, usr_id)
            .await?
            .ok_or(CreateOrderUcError::AddressNotFound)?;
        let destination = address.destination();
        let shipping_cost = parse_shipping_cost(req.shipping_cost.as_str())?;
        let subtotal = cart.subtotal();
        let now = LocalTime::now().fixed_offset();

        let promo_code = req.promo_code.as_deref();
        let applied =
            resolve_discount(&mut *repo, promo_code, store_id, subtotal, &cart, now).await?;
        if applied.is_none() {
            if let Some(code) = promo_code.filter(|c| !c.trim().is_empty()) {
                let logctx = &self.logctx;
                app_log_event!(
                    logctx,
                    AppLogLevel::DEBUG,
                    "discount-skipped, code:{}, store:{}, subtotal:{}",
                    code,
                    store_id,
                    subtotal
                );
            }
        }
        let bonus_product = applied.as_ref().and_then(|a| a.effect.bonus_product());
        validate_stock(&mut *repo, store_id, &cart.lines, bonus_product).await?;

        let lines = cart.adjusted_lines(bonus_product);
        let effect = applied.as_ref().map(|a| &a.effect);
        let price = PricingCalculator::compute_with_effect(subtotal, shipping_cost, effect);
        let oid = generate_custom_uid(app_meta::MACHINE_CODE)
            .simple()
            .to_string();
        let req_m = OrderCreateReqModel {
            usr_id,
            store_id,
            address_id: address.id,
            payment_method_id: req.payment_method_id,
            destination,
            lines,
            price,
            discount: applied,
        };
        let order = OrderModel::new(oid, req_m, now);
        repo.create_order(&order).await?;
        Ok(order)
    } // end of fn place_order

    fn log_failure(&self, usr_id: u32, store_id: u32, e: &CreateOrderUcError) {
        let logctx = &self.logctx;
        match e {
            CreateOrderUcError::InsufficientStock {
                product_id,
                required,
                available,
            } => app_log_event!(
                logctx,
                AppLogLevel::WARNING,
                "stock-shortage, usr:{}, store:{}, product:{}, required:{}, available:{}",
                usr_id,
                store_id,
                product_id,
                required,
                available
            ),
            CreateOrderUcError::TransactionTimeout => app_log_event!(
                logctx,
                AppLogLevel::ERROR,
                "txn-timeout, usr:{}, store:{}, limit-secs:{}",
                usr_id,
                store_id,
                self.txn_timeout_secs
            ),
            CreateOrderUcError::DataStore(de) => app_log_event!(
                logctx,
                AppLogLevel::ERROR,
                "datastore-failure, usr:{}, store:{}, {}",
                usr_id,
                store_id,
                de
            ),
            _others => app_log_event!(
                logctx,
                AppLogLevel::INFO,
                "order-rejected, usr:{}, store:{}, reason:{:?}",
                usr_id,
                store_id,
                e
            ),
        }
    } // end of fn log_failure
} // end of impl CreateOrderUseCase

/// non-negative monetary amount
fn parse_shipping_cost(raw: &str) -> DefaultResult<Decimal, CreateOrderUcError> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|e| CreateOrderUcError::InvalidShippingCost(format!("{raw}, {e}")))?;
    if value < Decimal::ZERO {
        Err(CreateOrderUcError::InvalidShippingCost(format!("{raw}, negative")))
    } else {
        Ok(value)
    }
}
