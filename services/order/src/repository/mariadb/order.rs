use std::ops::DerefMut;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlArguments, MySqlConnection, MySqlRow};
use sqlx::{Arguments, Row};

use ecommerce_common::error::AppErrorCode;

use super::{
    arg_error, from_db_time, pick_primary_db, run_query_once, to_db_time, MariaDbDStoreTxn,
    OidBytes,
};
use crate::datastore::AppMariaDbStore;
use crate::error::AppError;
use crate::model::{OrderDiscountRefModel, OrderLineModel, OrderModel, OrderPageModel};
use crate::repository::{AbsCartTxnRepo, AbsOrderReadRepo, AbsOrderTxnRepo, AbsStockTxnRepo};

const TOPLVL_COLUMNS: &str = "`o_id`,`usr_id`,`store_id`,`address_id`,`payment_method_id`,\
    `destination`,`status`,`subtotal`,`shipping_cost`,`discount_amount`,`total_price`,\
    `discount_id`,`discount_code`,`payment_proof`,`created_time`,`last_updated`";

struct InsertTopMetaArg<'a>(&'a OrderModel);
struct InsertOLineArg<'a>(&'a OidBytes, &'a [OrderLineModel]);
struct UpdateTopMetaArg<'a>(&'a OrderModel);
struct FetchTopMetaArg<'a> {
    usr_id: u32,
    oid: &'a OidBytes,
    for_update: bool,
}
struct FetchAllLinesArg<'a>(&'a OidBytes);
struct CountByOwnerArg(u32);
struct FetchPageArg {
    usr_id: u32,
    limit: u32,
    offset: u64,
}

struct TopLvlMetaRow(MySqlRow);
struct OLineRow(MySqlRow);

impl<'a> TryFrom<InsertTopMetaArg<'a>> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: InsertTopMetaArg<'a>) -> DefaultResult<Self, Self::Error> {
        let o = value.0;
        let oid = OidBytes::try_from(o.id.as_str())?;
        let patt = format!(
            "INSERT INTO `order_toplvl_meta`({TOPLVL_COLUMNS}) \
             VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?)"
        );
        let (discount_id, discount_code) = match o.discount.as_ref() {
            Some(d) => (Some(d.discount_id), Some(d.code.clone())),
            None => (None, None),
        };
        let mut args = MySqlArguments::default();
        args.add(oid.as_column()).map_err(arg_error)?;
        args.add(o.usr_id).map_err(arg_error)?;
        args.add(o.store_id).map_err(arg_error)?;
        args.add(o.address_id).map_err(arg_error)?;
        args.add(o.payment_method_id).map_err(arg_error)?;
        args.add(o.destination.clone()).map_err(arg_error)?;
        args.add(o.status.as_str()).map_err(arg_error)?;
        args.add(o.subtotal).map_err(arg_error)?;
        args.add(o.shipping_cost).map_err(arg_error)?;
        args.add(o.discount_amount).map_err(arg_error)?;
        args.add(o.total_price).map_err(arg_error)?;
        args.add(discount_id).map_err(arg_error)?;
        args.add(discount_code).map_err(arg_error)?;
        args.add(o.payment_proof.clone()).map_err(arg_error)?;
        args.add(to_db_time(&o.created_at)).map_err(arg_error)?;
        args.add(to_db_time(&o.updated_at)).map_err(arg_error)?;
        Ok((patt, args))
    }
}

impl<'a> InsertOLineArg<'a> {
    fn sql_pattern(num_batch: usize) -> String {
        let items = (0..num_batch)
            .map(|_| "(?,?,?,?)")
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "INSERT INTO `order_line_detail`(`o_id`,`product_id`,`quantity`,\
             `unit_price`) VALUES {items}"
        )
    }
}
impl<'a> TryFrom<InsertOLineArg<'a>> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: InsertOLineArg<'a>) -> DefaultResult<Self, Self::Error> {
        let (oid, lines) = (value.0, value.1);
        let mut args = MySqlArguments::default();
        for l in lines {
            args.add(oid.as_column()).map_err(arg_error)?;
            args.add(l.product_id).map_err(arg_error)?;
            args.add(l.quantity).map_err(arg_error)?;
            args.add(l.unit_price).map_err(arg_error)?;
        }
        Ok((InsertOLineArg::sql_pattern(lines.len()), args))
    }
}

impl<'a> TryFrom<UpdateTopMetaArg<'a>> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: UpdateTopMetaArg<'a>) -> DefaultResult<Self, Self::Error> {
        let o = value.0;
        let oid = OidBytes::try_from(o.id.as_str())?;
        let patt = "UPDATE `order_toplvl_meta` SET `status`=?,`payment_proof`=?,\
                    `last_updated`=? WHERE `o_id`=? AND `usr_id`=?";
        let mut args = MySqlArguments::default();
        args.add(o.status.as_str()).map_err(arg_error)?;
        args.add(o.payment_proof.clone()).map_err(arg_error)?;
        args.add(to_db_time(&o.updated_at)).map_err(arg_error)?;
        args.add(oid.as_column()).map_err(arg_error)?;
        args.add(o.usr_id).map_err(arg_error)?;
        Ok((patt.to_string(), args))
    }
}

impl<'a> TryFrom<FetchTopMetaArg<'a>> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: FetchTopMetaArg<'a>) -> DefaultResult<Self, Self::Error> {
        let lock = if value.for_update { " FOR UPDATE" } else { "" };
        let patt = format!(
            "SELECT {TOPLVL_COLUMNS} FROM `order_toplvl_meta` WHERE `o_id`=? \
             AND `usr_id`=?{lock}"
        );
        let mut args = MySqlArguments::default();
        args.add(value.oid.as_column()).map_err(arg_error)?;
        args.add(value.usr_id).map_err(arg_error)?;
        Ok((patt, args))
    }
}

impl<'a> TryFrom<FetchAllLinesArg<'a>> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: FetchAllLinesArg<'a>) -> DefaultResult<Self, Self::Error> {
        let patt = "SELECT `product_id`,`quantity`,`unit_price` FROM `order_line_detail` \
                    WHERE `o_id`=? ORDER BY `product_id` ASC";
        let mut args = MySqlArguments::default();
        args.add(value.0.as_column()).map_err(arg_error)?;
        Ok((patt.to_string(), args))
    }
}

impl TryFrom<CountByOwnerArg> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: CountByOwnerArg) -> DefaultResult<Self, Self::Error> {
        let patt = "SELECT COUNT(*) FROM `order_toplvl_meta` WHERE `usr_id`=?";
        let mut args = MySqlArguments::default();
        args.add(value.0).map_err(arg_error)?;
        Ok((patt.to_string(), args))
    }
}

impl TryFrom<FetchPageArg> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: FetchPageArg) -> DefaultResult<Self, Self::Error> {
        let patt = format!(
            "SELECT {TOPLVL_COLUMNS} FROM `order_toplvl_meta` WHERE `usr_id`=? \
             ORDER BY `created_time` DESC, `o_id` DESC LIMIT ? OFFSET ?"
        );
        let mut args = MySqlArguments::default();
        args.add(value.usr_id).map_err(arg_error)?;
        args.add(value.limit).map_err(arg_error)?;
        args.add(value.offset).map_err(arg_error)?;
        Ok((patt, args))
    }
}

impl TryFrom<OLineRow> for OrderLineModel {
    type Error = AppError;
    fn try_from(value: OLineRow) -> DefaultResult<Self, Self::Error> {
        let row = value.0;
        Ok(OrderLineModel {
            product_id: row.try_get::<u64, usize>(0)?,
            quantity: row.try_get::<u32, usize>(1)?,
            unit_price: row.try_get::<Decimal, usize>(2)?,
        })
    }
}

impl TopLvlMetaRow {
    fn into_model(self, lines: Vec<OrderLineModel>) -> DefaultResult<OrderModel, AppError> {
        let row = self.0;
        let discount_id = row.try_get::<Option<u32>, usize>(11)?;
        let discount_code = row.try_get::<Option<String>, usize>(12)?;
        let discount = discount_id.map(|discount_id| OrderDiscountRefModel {
            discount_id,
            code: discount_code.unwrap_or_default(),
        });
        Ok(OrderModel {
            id: OidBytes::to_app_oid(&row, 0)?,
            usr_id: row.try_get::<u32, usize>(1)?,
            store_id: row.try_get::<u32, usize>(2)?,
            address_id: row.try_get::<u64, usize>(3)?,
            payment_method_id: row.try_get::<u32, usize>(4)?,
            destination: row.try_get::<String, usize>(5)?,
            status: row.try_get::<String, usize>(6)?.parse()?,
            lines,
            subtotal: row.try_get::<Decimal, usize>(7)?,
            shipping_cost: row.try_get::<Decimal, usize>(8)?,
            discount_amount: row.try_get::<Decimal, usize>(9)?,
            total_price: row.try_get::<Decimal, usize>(10)?,
            discount,
            payment_proof: row.try_get::<Option<String>, usize>(13)?,
            created_at: from_db_time(&row, 14)?,
            updated_at: from_db_time(&row, 15)?,
        })
    }
}

async fn fetch_lines(
    conn: &mut MySqlConnection,
    oid: &OidBytes,
) -> DefaultResult<Vec<OrderLineModel>, AppError> {
    let (sql_patt, args): (String, MySqlArguments) = FetchAllLinesArg(oid).try_into()?;
    let rows = sqlx::query_with(sql_patt.as_str(), args)
        .fetch_all(&mut *conn)
        .await?;
    rows.into_iter()
        .map(|r| OrderLineModel::try_from(OLineRow(r)))
        .collect()
}

async fn fetch_order_common(
    conn: &mut MySqlConnection,
    usr_id: u32,
    oid: &str,
    for_update: bool,
) -> DefaultResult<Option<OrderModel>, AppError> {
    let oid = match OidBytes::try_from(oid) {
        Ok(v) => v,
        // malformed identifier cannot match any order
        Err(_e) => return Ok(None),
    };
    let arg = FetchTopMetaArg {
        usr_id,
        oid: &oid,
        for_update,
    };
    let (sql_patt, args): (String, MySqlArguments) = arg.try_into()?;
    let found = sqlx::query_with(sql_patt.as_str(), args)
        .fetch_optional(&mut *conn)
        .await?;
    if let Some(row) = found {
        let lines = fetch_lines(conn, &oid).await?;
        TopLvlMetaRow(row).into_model(lines).map(Some)
    } else {
        Ok(None)
    }
}

#[async_trait]
impl AbsOrderTxnRepo for MariaDbDStoreTxn {
    async fn create_order(&mut self, order: &OrderModel) -> DefaultResult<(), AppError> {
        if order.lines.is_empty() {
            return Err(AppError {
                code: AppErrorCode::EmptyInputData,
                detail: Some("order-line".to_string()),
            });
        }
        let oid = OidBytes::try_from(order.id.as_str())?;
        let (sql_patt, args): (String, MySqlArguments) = InsertTopMetaArg(order).try_into()?;
        let _rs = run_query_once(&mut self.tx, sql_patt, args, Some(1)).await?;
        let num_lines = order.lines.len();
        let (sql_patt, args): (String, MySqlArguments) =
            InsertOLineArg(&oid, order.lines.as_slice()).try_into()?;
        let _rs = run_query_once(&mut self.tx, sql_patt, args, Some(num_lines)).await?;
        for line in order.lines.iter() {
            self.deduct_stock(order.store_id, line.product_id, line.quantity)
                .await?;
        }
        self.discard_cart(order.usr_id, order.store_id).await
    }

    async fn fetch_order(
        &mut self,
        usr_id: u32,
        oid: &str,
    ) -> DefaultResult<Option<OrderModel>, AppError> {
        fetch_order_common(self.tx.deref_mut(), usr_id, oid, true).await
    }

    async fn update_order(&mut self, order: &OrderModel) -> DefaultResult<(), AppError> {
        let (sql_patt, args): (String, MySqlArguments) = UpdateTopMetaArg(order).try_into()?;
        let rs = run_query_once(&mut self.tx, sql_patt, args, None).await?;
        if rs.rows_affected() == 1 {
            Ok(())
        } else {
            Err(AppError {
                code: AppErrorCode::OrderNotExist,
                detail: Some(order.id.clone()),
            })
        }
    }
} // end of impl AbsOrderTxnRepo

pub(crate) struct MariaDbOrderReadRepo {
    db: Arc<AppMariaDbStore>,
}

impl MariaDbOrderReadRepo {
    pub(crate) fn try_build(dbs: &[Arc<AppMariaDbStore>]) -> DefaultResult<Self, AppError> {
        let db = pick_primary_db(dbs)?;
        Ok(Self { db })
    }
}

#[async_trait]
impl AbsOrderReadRepo for MariaDbOrderReadRepo {
    async fn fetch_detail(
        &self,
        usr_id: u32,
        oid: &str,
    ) -> DefaultResult<Option<OrderModel>, AppError> {
        let mut conn = self.db.acquire().await?;
        fetch_order_common(conn.deref_mut(), usr_id, oid, false).await
    }

    async fn fetch_page(
        &self,
        usr_id: u32,
        page: u32,
        page_size: u32,
    ) -> DefaultResult<OrderPageModel, AppError> {
        let mut conn = self.db.acquire().await?;
        let exec = conn.deref_mut();
        let (sql_patt, args): (String, MySqlArguments) = CountByOwnerArg(usr_id).try_into()?;
        let row = sqlx::query_with(sql_patt.as_str(), args)
            .fetch_one(&mut *exec)
            .await?;
        let total = row.try_get::<i64, usize>(0)?.max(0) as u64;
        let arg = FetchPageArg {
            usr_id,
            limit: page_size,
            offset: (page.max(1) as u64 - 1) * page_size as u64,
        };
        let (sql_patt, args): (String, MySqlArguments) = arg.try_into()?;
        let rows = sqlx::query_with(sql_patt.as_str(), args)
            .fetch_all(&mut *exec)
            .await?;
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let oid = OidBytes::try_from(OidBytes::to_app_oid(&row, 0)?.as_str())?;
            let lines = fetch_lines(exec, &oid).await?;
            orders.push(TopLvlMetaRow(row).into_model(lines)?);
        }
        Ok(OrderPageModel {
            total,
            page,
            page_size,
            orders,
        })
    }
} // end of impl MariaDbOrderReadRepo
