use std::result::Result as DefaultResult;

use crate::error::AppError;
use crate::model::{CartLineModel, ProductStockModel, StockShortageModel};
use crate::repository::AbsStockTxnRepo;

#[derive(Debug)]
pub enum StockCheckError {
    Shortage(StockShortageModel),
    DataStore(AppError),
}

impl From<AppError> for StockCheckError {
    fn from(value: AppError) -> Self {
        Self::DataStore(value)
    }
}

/// Check every line against the stock of the store. The line matching
/// `bonus_product` requires twice its quantity. Lines are checked in
/// order and the first shortage is reported.
pub async fn validate_stock<R>(
    repo: &mut R,
    store_id: u32,
    lines: &[CartLineModel],
    bonus_product: Option<u64>,
) -> DefaultResult<(), StockCheckError>
where
    R: AbsStockTxnRepo + ?Sized,
{
    for line in lines {
        let required = line.required_quantity(bonus_product);
        let quantity = repo.fetch_stock(store_id, line.product_id).await?;
        let stock = ProductStockModel {
            store_id,
            product_id: line.product_id,
            quantity,
        };
        stock.check_cover(required).map_err(StockCheckError::Shortage)?;
    }
    Ok(())
}
