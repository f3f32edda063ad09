pub(crate) mod in_mem;

use std::sync::Arc;

use chrono::Duration;

use order_placement::datastore::AppInMemoryDStore;
use order_placement::model::{
    DiscountKind, DiscountModel, DiscountValueType, ProductModel, ProductStockModel,
};
use order_placement::repository::InMemUnitOfWork;

use crate::model::{ut_address, ut_cart, ut_dec, ut_discount, ut_now};
use crate::ut_inmem_dstore;

pub(crate) const UT_STORE_ID: u32 = 7;
pub(crate) const UT_USR_ID: u32 = 55;
pub(crate) const UT_ADDR_ID: u64 = 301;

fn ut_default_discounts() -> Vec<DiscountModel> {
    let now = ut_now();
    let mut min_purchase = ut_discount(1, "BELANJA50", DiscountKind::MinPurchase);
    min_purchase.amount = Some(ut_dec("20000"));
    min_purchase.min_purchase = Some(ut_dec("50000"));
    let free_ship = ut_discount(2, "ONGKIR", DiscountKind::FreeShipping);
    let mut b1g1 = ut_discount(3, "B1G1TEH", DiscountKind::BuyOneGetOne);
    b1g1.product_id = Some(1002);
    let mut manual = ut_discount(4, "HEMAT10", DiscountKind::Manual);
    manual.value_type = DiscountValueType::Percentage;
    manual.amount = Some(ut_dec("10"));
    manual.product_id = Some(1003);
    let mut other_store = ut_discount(5, "TOKO8", DiscountKind::Manual);
    other_store.amount = Some(ut_dec("5000"));
    other_store.store_id = Some(8);
    let mut expired = ut_discount(6, "LAMA", DiscountKind::Manual);
    expired.amount = Some(ut_dec("5000"));
    expired.start = now - Duration::days(30);
    expired.end = now - Duration::days(2);
    let mut high_min = ut_discount(7, "BELANJA200", DiscountKind::MinPurchase);
    high_min.amount = Some(ut_dec("20000"));
    high_min.min_purchase = Some(ut_dec("200000"));
    // same code in other letter case, lower ID wins
    let mut dup_code = ut_discount(8, "ongkir", DiscountKind::Manual);
    dup_code.amount = Some(ut_dec("1"));
    let mut deleted = ut_discount(9, "HAPUS", DiscountKind::FreeShipping);
    deleted.is_deleted = true;
    vec![
        min_purchase,
        free_ship,
        b1g1,
        manual,
        other_store,
        expired,
        high_min,
        dup_code,
        deleted,
    ]
}

/// Products 1001 (35000), 1002 (30000), 1003 (12500). Store stock holds
/// 10, 5 and 4 items of them respectively. User 55 has cart of 2 x 1001
/// and 1 x 1002 in store 7, which gives subtotal 100000.
pub(crate) async fn ut_setup_uow(ds: Arc<AppInMemoryDStore>) -> InMemUnitOfWork {
    let uow = InMemUnitOfWork::build(ds).await.unwrap();
    let products = [
        (1001u64, "Kopi Arabika", "35000"),
        (1002, "Teh Hijau", "30000"),
        (1003, "Gula Aren", "12500"),
    ]
    .into_iter()
    .map(|(id, name, price)| ProductModel {
        id,
        name: name.to_string(),
        price: ut_dec(price),
    })
    .collect();
    uow.seed_products(products).await.unwrap();
    let stock = [(1001u64, 10u32), (1002, 5), (1003, 4)]
        .into_iter()
        .map(|(product_id, quantity)| ProductStockModel {
            store_id: UT_STORE_ID,
            product_id,
            quantity,
        })
        .collect();
    uow.seed_stock(stock).await.unwrap();
    uow.seed_discounts(ut_default_discounts()).await.unwrap();
    let addrs = vec![ut_address(UT_ADDR_ID, UT_USR_ID), ut_address(302, 56)];
    uow.seed_addresses(addrs).await.unwrap();
    let cart = ut_cart(
        UT_USR_ID,
        UT_STORE_ID,
        &[(1001, 2, "0"), (1002, 1, "0")],
    );
    uow.seed_cart(cart).await.unwrap();
    uow
}

pub(crate) async fn ut_default_uow() -> (Arc<AppInMemoryDStore>, InMemUnitOfWork) {
    let ds = ut_inmem_dstore(200);
    let uow = ut_setup_uow(ds.clone()).await;
    (ds, uow)
}
