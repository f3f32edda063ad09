mod address;
mod cart;
mod discount;
mod order;
mod product;
mod stock;

use std::boxed::Box;
use std::fmt::Display;
use std::result::Result as DefaultResult;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use ecommerce_common::error::AppErrorCode;

use crate::datastore::{AppInMemDstoreTxn, AppInMemFetchedSingleRow, AppInMemoryDStore};
use crate::error::AppError;
use crate::model::{
    CartModel, DiscountModel, OrderModel, ProductModel, ProductStockModel, UserAddressModel,
};
use crate::repository::{AbsDStoreTxn, AbsUnitOfWork};

pub use order::InMemOrderReadRepo;

const ALL_TABLES: [&str; 7] = [
    product::ProductTable::LABEL,
    cart::CartLineTable::LABEL,
    stock::StockTable::LABEL,
    discount::DiscountTable::LABEL,
    address::AddressTable::LABEL,
    order::OrderTopLvlTable::LABEL,
    order::OrderLineTable::LABEL,
];

pub struct InMemUnitOfWork {
    dstore: Arc<AppInMemoryDStore>,
}

pub struct InMemDStoreTxn {
    inner: AppInMemDstoreTxn,
}

async fn create_all_tables(m: &AppInMemoryDStore) -> DefaultResult<(), AppError> {
    for label in ALL_TABLES {
        m.create_table(label).await?;
    }
    Ok(())
}

impl InMemUnitOfWork {
    pub async fn build(m: Arc<AppInMemoryDStore>) -> DefaultResult<Self, AppError> {
        create_all_tables(&m).await?;
        Ok(Self { dstore: m })
    }

    async fn begin_inner(&self) -> InMemDStoreTxn {
        InMemDStoreTxn {
            inner: self.dstore.begin().await,
        }
    }

    // following functions set up initial records directly, the records are
    // maintained by other services in production

    pub async fn seed_products(&self, items: Vec<ProductModel>) -> DefaultResult<(), AppError> {
        let mut txn = self.begin_inner().await;
        product::ProductTable::save(&mut txn.inner, items)?;
        txn.inner.commit();
        Ok(())
    }

    pub async fn seed_stock(&self, items: Vec<ProductStockModel>) -> DefaultResult<(), AppError> {
        let mut txn = self.begin_inner().await;
        stock::StockTable::save(&mut txn.inner, items)?;
        txn.inner.commit();
        Ok(())
    }

    pub async fn seed_discounts(&self, items: Vec<DiscountModel>) -> DefaultResult<(), AppError> {
        let mut txn = self.begin_inner().await;
        discount::DiscountTable::save(&mut txn.inner, items)?;
        txn.inner.commit();
        Ok(())
    }

    pub async fn seed_addresses(
        &self,
        items: Vec<UserAddressModel>,
    ) -> DefaultResult<(), AppError> {
        let mut txn = self.begin_inner().await;
        address::AddressTable::save(&mut txn.inner, items)?;
        txn.inner.commit();
        Ok(())
    }

    /// only product and quantity of each line are kept
    pub async fn seed_cart(&self, cart: CartModel) -> DefaultResult<(), AppError> {
        let mut txn = self.begin_inner().await;
        cart::CartLineTable::save(&mut txn.inner, &cart)?;
        txn.inner.commit();
        Ok(())
    }

    pub async fn seed_orders(&self, items: Vec<OrderModel>) -> DefaultResult<(), AppError> {
        let mut txn = self.begin_inner().await;
        for o in items.iter() {
            order::OrderTopLvlTable::save(&mut txn.inner, o)?;
            order::OrderLineTable::save(&mut txn.inner, o)?;
        }
        txn.inner.commit();
        Ok(())
    }

    pub async fn stock_quantity(
        &self,
        store_id: u32,
        product_id: u64,
    ) -> DefaultResult<Option<u32>, AppError> {
        let txn = self.begin_inner().await;
        let found = stock::StockTable::fetch(&txn.inner, store_id, product_id)?;
        Ok(found.map(|s| s.quantity))
    }

    pub async fn num_orders(&self, usr_id: u32) -> DefaultResult<usize, AppError> {
        let txn = self.begin_inner().await;
        let ids = order::OrderTopLvlTable::ids_by_owner(&txn.inner, usr_id)?;
        Ok(ids.len())
    }

    pub async fn cart_size(&self, usr_id: u32, store_id: u32) -> DefaultResult<usize, AppError> {
        let txn = self.begin_inner().await;
        let lines = cart::CartLineTable::fetch(&txn.inner, usr_id, store_id)?;
        Ok(lines.len())
    }
} // end of impl InMemUnitOfWork

#[async_trait]
impl AbsUnitOfWork for InMemUnitOfWork {
    async fn begin(&self) -> DefaultResult<Box<dyn AbsDStoreTxn>, AppError> {
        let txn = self.begin_inner().await;
        Ok(Box::new(txn))
    }
}

#[async_trait]
impl AbsDStoreTxn for InMemDStoreTxn {
    async fn commit(self: Box<Self>) -> DefaultResult<(), AppError> {
        self.inner.commit();
        Ok(())
    }
    async fn rollback(self: Box<Self>) -> DefaultResult<(), AppError> {
        // staged writes are discarded along with the session
        Ok(())
    }
}

fn parse_column<T>(row: &AppInMemFetchedSingleRow, idx: usize, label: &str) -> DefaultResult<T, AppError>
where
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    let raw = row.get(idx).ok_or(AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("missing-column, table:{label}, idx:{idx}")),
    })?;
    raw.parse::<T>().map_err(|e| AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("table:{label}, idx:{idx}, reason:{e}")),
    })
}

fn parse_opt_column<T>(
    row: &AppInMemFetchedSingleRow,
    idx: usize,
    label: &str,
) -> DefaultResult<Option<T>, AppError>
where
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    match row.get(idx) {
        Some(s) if s.is_empty() => Ok(None),
        _others => parse_column(row, idx, label).map(Some),
    }
}

fn parse_time_column(
    row: &AppInMemFetchedSingleRow,
    idx: usize,
    label: &str,
) -> DefaultResult<DateTime<FixedOffset>, AppError> {
    let raw = parse_column::<String>(row, idx, label)?;
    DateTime::parse_from_rfc3339(raw.as_str()).map_err(|e| AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("table:{label}, idx:{idx}, reason:{e}")),
    })
}

fn opt_to_column<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(T::to_string).unwrap_or_default()
}

fn split_key<const N: usize>(key: &str, label: &str) -> DefaultResult<[String; N], AppError> {
    let tokens = key.split('-').map(String::from).collect::<Vec<_>>();
    <[String; N]>::try_from(tokens).map_err(|_| AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("table:{label}, key:{key}")),
    })
}
