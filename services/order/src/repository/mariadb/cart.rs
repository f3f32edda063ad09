use std::result::Result as DefaultResult;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::{Arguments, Row};

use ecommerce_common::error::AppErrorCode;

use super::{arg_error, fetch_all_rows, run_query_once, MariaDbDStoreTxn};
use crate::error::AppError;
use crate::model::{CartLineModel, CartModel};
use crate::repository::AbsCartTxnRepo;

struct FetchCartArg(u32, u32);
struct DiscardCartArg(u32, u32);
struct CartLineRow(MySqlRow);

impl TryFrom<FetchCartArg> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: FetchCartArg) -> DefaultResult<Self, Self::Error> {
        // product price is read at the time of the order, the lines are
        // locked so the cart cannot change while being converted
        let patt = "SELECT `c`.`product_id`,`c`.`quantity`,`p`.`price` FROM `cart_line` AS `c` \
                    LEFT JOIN `product` AS `p` ON `c`.`product_id` = `p`.`id` \
                    WHERE `c`.`usr_id`=? AND `c`.`store_id`=? ORDER BY `c`.`product_id` ASC \
                    FOR UPDATE";
        let mut args = MySqlArguments::default();
        args.add(value.0).map_err(arg_error)?;
        args.add(value.1).map_err(arg_error)?;
        Ok((patt.to_string(), args))
    }
}

impl TryFrom<DiscardCartArg> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: DiscardCartArg) -> DefaultResult<Self, Self::Error> {
        let patt = "DELETE FROM `cart_line` WHERE `usr_id`=? AND `store_id`=?";
        let mut args = MySqlArguments::default();
        args.add(value.0).map_err(arg_error)?;
        args.add(value.1).map_err(arg_error)?;
        Ok((patt.to_string(), args))
    }
}

impl TryFrom<CartLineRow> for CartLineModel {
    type Error = AppError;
    fn try_from(value: CartLineRow) -> DefaultResult<Self, Self::Error> {
        let row = value.0;
        let product_id = row.try_get::<u64, usize>(0)?;
        let quantity = row.try_get::<u32, usize>(1)?;
        let unit_price = row
            .try_get::<Option<Decimal>, usize>(2)?
            .ok_or(AppError {
                code: AppErrorCode::ProductNotExist,
                detail: Some(format!("product-id:{product_id}")),
            })?;
        Ok(CartLineModel {
            product_id,
            quantity,
            unit_price,
        })
    }
}

#[async_trait]
impl AbsCartTxnRepo for MariaDbDStoreTxn {
    async fn fetch_cart(
        &mut self,
        usr_id: u32,
        store_id: u32,
    ) -> DefaultResult<Option<CartModel>, AppError> {
        let (sql_patt, args): (String, MySqlArguments) =
            FetchCartArg(usr_id, store_id).try_into()?;
        let rows = fetch_all_rows(&mut self.tx, sql_patt, args).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        let lines = rows
            .into_iter()
            .map(|r| CartLineModel::try_from(CartLineRow(r)))
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        Ok(Some(CartModel {
            usr_id,
            store_id,
            lines,
        }))
    }

    async fn discard_cart(&mut self, usr_id: u32, store_id: u32) -> DefaultResult<(), AppError> {
        let (sql_patt, args): (String, MySqlArguments) =
            DiscardCartArg(usr_id, store_id).try_into()?;
        let _rs = run_query_once(&mut self.tx, sql_patt, args, None).await?;
        Ok(())
    }
}
