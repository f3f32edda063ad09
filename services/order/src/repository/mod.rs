use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use ecommerce_common::error::AppErrorCode;

use crate::error::AppError;
use crate::model::{CartModel, DiscountModel, OrderModel, OrderPageModel, UserAddressModel};
use crate::AppDataStoreContext;

mod in_mem;
// make in-memory repo visible only for testing purpose
pub use in_mem::{InMemDStoreTxn, InMemOrderReadRepo, InMemUnitOfWork};

#[cfg(feature = "mariadb")]
mod mariadb;

#[cfg(feature = "mariadb")]
use mariadb::{MariaDbOrderReadRepo, MariaDbUnitOfWork};

// Every collaborator below is called with the same transaction handle, all
// reads and writes within one handle belong to one atomic unit of work.
// The handle may be held across an await and moved between threads, it is
// the reason to add `Send` as super-trait

#[async_trait]
pub trait AbsCartTxnRepo: Send {
    /// cart with its lines, each line carries the current product price
    async fn fetch_cart(
        &mut self,
        usr_id: u32,
        store_id: u32,
    ) -> DefaultResult<Option<CartModel>, AppError>;
    async fn discard_cart(&mut self, usr_id: u32, store_id: u32) -> DefaultResult<(), AppError>;
}

#[async_trait]
pub trait AbsStockTxnRepo: Send {
    /// Available quantity, zero if the stock record does not exist. The row
    /// stays locked against concurrent writers until the handle finishes.
    async fn fetch_stock(&mut self, store_id: u32, product_id: u64) -> DefaultResult<u32, AppError>;
    /// conditional decrement, fails with `StockShortage` instead of going
    /// below zero
    async fn deduct_stock(
        &mut self,
        store_id: u32,
        product_id: u64,
        amount: u32,
    ) -> DefaultResult<(), AppError>;
    async fn restore_stock(
        &mut self,
        store_id: u32,
        product_id: u64,
        amount: u32,
    ) -> DefaultResult<(), AppError>;
}

#[async_trait]
pub trait AbsDiscountTxnRepo: Send {
    /// case-insensitive code lookup, only discounts applicable to the store
    /// at the given time are returned
    async fn find_applicable_discount(
        &mut self,
        code: &str,
        store_id: u32,
        now: DateTime<FixedOffset>,
    ) -> DefaultResult<Option<DiscountModel>, AppError>;
}

#[async_trait]
pub trait AbsAddressTxnRepo: Send {
    async fn find_user_address(
        &mut self,
        address_id: u64,
        usr_id: u32,
    ) -> DefaultResult<Option<UserAddressModel>, AppError>;
}

#[async_trait]
pub trait AbsOrderTxnRepo: Send {
    /// insert the order with its lines, deduct stock for each line, then
    /// empty the cart the order comes from
    async fn create_order(&mut self, order: &OrderModel) -> DefaultResult<(), AppError>;
    /// order owned by the user, locked for update
    async fn fetch_order(
        &mut self,
        usr_id: u32,
        oid: &str,
    ) -> DefaultResult<Option<OrderModel>, AppError>;
    /// save status, payment proof and last-update time
    async fn update_order(&mut self, order: &OrderModel) -> DefaultResult<(), AppError>;
}

#[async_trait]
pub trait AbsDStoreTxn:
    AbsCartTxnRepo + AbsStockTxnRepo + AbsDiscountTxnRepo + AbsAddressTxnRepo + AbsOrderTxnRepo
{
    async fn commit(self: Box<Self>) -> DefaultResult<(), AppError>;
    async fn rollback(self: Box<Self>) -> DefaultResult<(), AppError>;
}

#[async_trait]
pub trait AbsUnitOfWork: Sync + Send {
    async fn begin(&self) -> DefaultResult<Box<dyn AbsDStoreTxn>, AppError>;
}

#[async_trait]
pub trait AbsOrderReadRepo: Sync + Send {
    async fn fetch_detail(
        &self,
        usr_id: u32,
        oid: &str,
    ) -> DefaultResult<Option<OrderModel>, AppError>;
    /// `page` starts from 1, newest order first
    async fn fetch_page(
        &self,
        usr_id: u32,
        page: u32,
        page_size: u32,
    ) -> DefaultResult<OrderPageModel, AppError>;
}

pub async fn app_repo_unit_of_work(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsUnitOfWork>, AppError> {
    #[cfg(feature = "mariadb")]
    if let Some(dbs) = ds.sql_dbs.as_ref() {
        let obj = MariaDbUnitOfWork::try_build(dbs)?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::FeatureDisabled,
            detail: Some("mariadb".to_string()),
        })
    }
    #[cfg(not(feature = "mariadb"))]
    if let Some(m) = ds.in_mem.as_ref() {
        let obj = InMemUnitOfWork::build(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("unknwon-type".to_string()),
        })
    }
}

pub async fn app_repo_order_read(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsOrderReadRepo>, AppError> {
    #[cfg(feature = "mariadb")]
    if let Some(dbs) = ds.sql_dbs.as_ref() {
        let obj = MariaDbOrderReadRepo::try_build(dbs)?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::FeatureDisabled,
            detail: Some("mariadb".to_string()),
        })
    }
    #[cfg(not(feature = "mariadb"))]
    if let Some(m) = ds.in_mem.as_ref() {
        let obj = InMemOrderReadRepo::build(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("unknwon-type".to_string()),
        })
    }
}
