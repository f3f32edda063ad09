use std::result::Result as DefaultResult;

use async_trait::async_trait;
use sqlx::mysql::MySqlArguments;
use sqlx::{Arguments, Row};

use ecommerce_common::error::AppErrorCode;

use super::{arg_error, fetch_optional_row, run_query_once, MariaDbDStoreTxn};
use crate::error::AppError;
use crate::repository::AbsStockTxnRepo;

struct FetchQtyArg(u32, u64);
struct DeductQtyArg(u32, u64, u32);
struct RestoreQtyArg(u32, u64, u32);

impl TryFrom<FetchQtyArg> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: FetchQtyArg) -> DefaultResult<Self, Self::Error> {
        // row lock is held until the transaction ends
        let patt = "SELECT `quantity` FROM `product_stock` WHERE `store_id`=? \
                    AND `product_id`=? FOR UPDATE";
        let mut args = MySqlArguments::default();
        args.add(value.0).map_err(arg_error)?;
        args.add(value.1).map_err(arg_error)?;
        Ok((patt.to_string(), args))
    }
}

impl TryFrom<DeductQtyArg> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: DeductQtyArg) -> DefaultResult<Self, Self::Error> {
        let patt = "UPDATE `product_stock` SET `quantity` = `quantity` - ? WHERE \
                    `store_id`=? AND `product_id`=? AND `quantity` >= ?";
        let (store_id, product_id, amount) = (value.0, value.1, value.2);
        let mut args = MySqlArguments::default();
        args.add(amount).map_err(arg_error)?;
        args.add(store_id).map_err(arg_error)?;
        args.add(product_id).map_err(arg_error)?;
        args.add(amount).map_err(arg_error)?;
        Ok((patt.to_string(), args))
    }
}

impl TryFrom<RestoreQtyArg> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: RestoreQtyArg) -> DefaultResult<Self, Self::Error> {
        let patt = "INSERT INTO `product_stock`(`store_id`,`product_id`,`quantity`) \
                    VALUES (?,?,?) ON DUPLICATE KEY UPDATE `quantity` = `quantity` + ?";
        let (store_id, product_id, amount) = (value.0, value.1, value.2);
        let mut args = MySqlArguments::default();
        args.add(store_id).map_err(arg_error)?;
        args.add(product_id).map_err(arg_error)?;
        args.add(amount).map_err(arg_error)?;
        args.add(amount).map_err(arg_error)?;
        Ok((patt.to_string(), args))
    }
}

#[async_trait]
impl AbsStockTxnRepo for MariaDbDStoreTxn {
    async fn fetch_stock(&mut self, store_id: u32, product_id: u64) -> DefaultResult<u32, AppError> {
        let (sql_patt, args): (String, MySqlArguments) =
            FetchQtyArg(store_id, product_id).try_into()?;
        let found = fetch_optional_row(&mut self.tx, sql_patt, args).await?;
        if let Some(row) = found {
            let qty = row.try_get::<u32, usize>(0)?;
            Ok(qty)
        } else {
            Ok(0)
        }
    }

    async fn deduct_stock(
        &mut self,
        store_id: u32,
        product_id: u64,
        amount: u32,
    ) -> DefaultResult<(), AppError> {
        let (sql_patt, args): (String, MySqlArguments) =
            DeductQtyArg(store_id, product_id, amount).try_into()?;
        let rs = run_query_once(&mut self.tx, sql_patt, args, None).await?;
        if rs.rows_affected() == 1 {
            Ok(())
        } else {
            let available = self.fetch_stock(store_id, product_id).await?;
            let detail = format!(
                "store:{store_id}, product:{product_id}, required:{amount}, available:{available}"
            );
            Err(AppError {
                code: AppErrorCode::StockShortage,
                detail: Some(detail),
            })
        }
    }

    async fn restore_stock(
        &mut self,
        store_id: u32,
        product_id: u64,
        amount: u32,
    ) -> DefaultResult<(), AppError> {
        let (sql_patt, args): (String, MySqlArguments) =
            RestoreQtyArg(store_id, product_id, amount).try_into()?;
        let _rs = run_query_once(&mut self.tx, sql_patt, args, None).await?;
        Ok(())
    }
}
