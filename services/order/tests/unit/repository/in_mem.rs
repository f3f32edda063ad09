use chrono::Duration;

use ecommerce_common::error::AppErrorCode;

use order_placement::model::{
    DiscountKind, OrderDiscountRefModel, OrderLineModel, OrderModel, OrderStatus,
};
use order_placement::repository::{
    AbsAddressTxnRepo, AbsCartTxnRepo, AbsDiscountTxnRepo, AbsOrderReadRepo, AbsOrderTxnRepo,
    AbsStockTxnRepo, AbsUnitOfWork, InMemOrderReadRepo,
};

use super::{ut_default_uow, UT_ADDR_ID, UT_STORE_ID, UT_USR_ID};
use crate::model::{ut_dec, ut_now};

pub(crate) fn ut_saved_order(oid: &str, usr_id: u32, mins_ago: i64) -> OrderModel {
    let created = ut_now() - Duration::minutes(mins_ago);
    OrderModel {
        id: oid.to_string(),
        usr_id,
        store_id: UT_STORE_ID,
        address_id: UT_ADDR_ID,
        payment_method_id: 2,
        destination: "Dewi Lestari, Bandung".to_string(),
        status: OrderStatus::PendingPayment,
        lines: vec![
            OrderLineModel {
                product_id: 1001,
                quantity: 2,
                unit_price: ut_dec("35000"),
            },
            OrderLineModel {
                product_id: 1003,
                quantity: 1,
                unit_price: ut_dec("12500"),
            },
        ],
        subtotal: ut_dec("82500"),
        shipping_cost: ut_dec("9000"),
        discount_amount: ut_dec("9000"),
        total_price: ut_dec("82500"),
        discount: Some(OrderDiscountRefModel {
            discount_id: 2,
            code: "ONGKIR".to_string(),
        }),
        payment_proof: None,
        created_at: created,
        updated_at: created,
    }
}

#[tokio::test]
async fn fetch_cart_with_current_price() {
    let (_ds, uow) = ut_default_uow().await;
    let mut txn = uow.begin().await.unwrap();
    let cart = txn.fetch_cart(UT_USR_ID, UT_STORE_ID).await.unwrap().unwrap();
    assert_eq!(cart.lines.len(), 2);
    assert_eq!(cart.lines[0].product_id, 1001);
    assert_eq!(cart.lines[0].quantity, 2);
    assert_eq!(cart.lines[0].unit_price, ut_dec("35000"));
    assert_eq!(cart.lines[1].unit_price, ut_dec("30000"));
    assert_eq!(cart.subtotal(), ut_dec("100000"));
    let other = txn.fetch_cart(UT_USR_ID, 8).await.unwrap();
    assert!(other.is_none());
    let other = txn.fetch_cart(56, UT_STORE_ID).await.unwrap();
    assert!(other.is_none());
}

#[tokio::test]
async fn discard_cart_after_commit() {
    let (_ds, uow) = ut_default_uow().await;
    let mut txn = uow.begin().await.unwrap();
    txn.discard_cart(UT_USR_ID, UT_STORE_ID).await.unwrap();
    txn.commit().await.unwrap();
    assert_eq!(uow.cart_size(UT_USR_ID, UT_STORE_ID).await.unwrap(), 0);
}

#[tokio::test]
async fn stock_read_deduct_restore() {
    let (_ds, uow) = ut_default_uow().await;
    let mut txn = uow.begin().await.unwrap();
    assert_eq!(txn.fetch_stock(UT_STORE_ID, 1002).await.unwrap(), 5);
    // missing record means nothing available
    assert_eq!(txn.fetch_stock(UT_STORE_ID, 4004).await.unwrap(), 0);
    assert_eq!(txn.fetch_stock(8, 1002).await.unwrap(), 0);
    txn.deduct_stock(UT_STORE_ID, 1002, 5).await.unwrap();
    let e = txn.deduct_stock(UT_STORE_ID, 1002, 1).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::StockShortage);
    txn.restore_stock(UT_STORE_ID, 1002, 2).await.unwrap();
    txn.restore_stock(UT_STORE_ID, 4004, 3).await.unwrap();
    txn.commit().await.unwrap();
    let qty = uow.stock_quantity(UT_STORE_ID, 1002).await.unwrap();
    assert_eq!(qty, Some(2));
    let qty = uow.stock_quantity(UT_STORE_ID, 4004).await.unwrap();
    assert_eq!(qty, Some(3));
}

#[tokio::test]
async fn stock_rollback_discard() {
    let (_ds, uow) = ut_default_uow().await;
    let mut txn = uow.begin().await.unwrap();
    txn.deduct_stock(UT_STORE_ID, 1001, 4).await.unwrap();
    txn.rollback().await.unwrap();
    {
        let mut txn = uow.begin().await.unwrap();
        txn.deduct_stock(UT_STORE_ID, 1001, 3).await.unwrap();
    } // dropped without commit
    let qty = uow.stock_quantity(UT_STORE_ID, 1001).await.unwrap();
    assert_eq!(qty, Some(10));
}

#[tokio::test]
async fn discount_lookup_rules() {
    let (_ds, uow) = ut_default_uow().await;
    let mut txn = uow.begin().await.unwrap();
    let now = ut_now();
    let d = txn
        .find_applicable_discount("ongkir", UT_STORE_ID, now)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(d.id, 2);
    assert_eq!(d.kind, DiscountKind::FreeShipping);
    let d = txn
        .find_applicable_discount(" belanja50 ", UT_STORE_ID, now)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(d.id, 1);
    assert_eq!(d.amount, Some(ut_dec("20000")));
    assert_eq!(d.min_purchase, Some(ut_dec("50000")));
    let d = txn
        .find_applicable_discount("B1G1TEH", UT_STORE_ID, now)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(d.product_id, Some(1002));
    for code in ["TOKO8", "LAMA", "HAPUS", "TIDAKADA"] {
        let found = txn
            .find_applicable_discount(code, UT_STORE_ID, now)
            .await
            .unwrap();
        assert!(found.is_none(), "code: {code}");
    }
    let found = txn.find_applicable_discount("toko8", 8, now).await.unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn address_owner_only() {
    let (_ds, uow) = ut_default_uow().await;
    let mut txn = uow.begin().await.unwrap();
    let addr = txn
        .find_user_address(UT_ADDR_ID, UT_USR_ID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(addr.city.as_str(), "Bandung");
    assert_eq!(addr.detail.as_str(), "");
    let found = txn.find_user_address(302, UT_USR_ID).await.unwrap();
    assert!(found.is_none());
    let found = txn.find_user_address(999, UT_USR_ID).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn create_order_deduct_and_clear_cart() {
    let (_ds, uow) = ut_default_uow().await;
    let order = ut_saved_order("9a01", UT_USR_ID, 0);
    let mut txn = uow.begin().await.unwrap();
    txn.create_order(&order).await.unwrap();
    // duplicate ID rejected
    let e = txn.create_order(&order).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::InvalidInput);
    txn.commit().await.unwrap();
    assert_eq!(uow.num_orders(UT_USR_ID).await.unwrap(), 1);
    assert_eq!(uow.cart_size(UT_USR_ID, UT_STORE_ID).await.unwrap(), 0);
    let qty = uow.stock_quantity(UT_STORE_ID, 1001).await.unwrap();
    assert_eq!(qty, Some(8));
    let qty = uow.stock_quantity(UT_STORE_ID, 1003).await.unwrap();
    assert_eq!(qty, Some(3));

    let mut txn = uow.begin().await.unwrap();
    let saved = txn.fetch_order(UT_USR_ID, "9a01").await.unwrap().unwrap();
    assert_eq!(saved.status, OrderStatus::PendingPayment);
    assert_eq!(saved.lines, order.lines);
    assert_eq!(saved.total_price, ut_dec("82500"));
    assert_eq!(saved.discount, order.discount);
    assert_eq!(saved.created_at, order.created_at);
    assert!(saved.payment_proof.is_none());
    // not owned by other users
    let found = txn.fetch_order(56, "9a01").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn create_order_stock_shortage() {
    let (_ds, uow) = ut_default_uow().await;
    let mut order = ut_saved_order("9a02", UT_USR_ID, 0);
    order.lines[1].quantity = 5;
    let mut txn = uow.begin().await.unwrap();
    let e = txn.create_order(&order).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::StockShortage);
    txn.rollback().await.unwrap();
    assert_eq!(uow.num_orders(UT_USR_ID).await.unwrap(), 0);
    assert_eq!(uow.cart_size(UT_USR_ID, UT_STORE_ID).await.unwrap(), 2);
    let qty = uow.stock_quantity(UT_STORE_ID, 1001).await.unwrap();
    assert_eq!(qty, Some(10));
}

#[tokio::test]
async fn update_order_status_proof() {
    let (_ds, uow) = ut_default_uow().await;
    let order = ut_saved_order("9a03", UT_USR_ID, 5);
    uow.seed_orders(vec![order]).await.unwrap();
    let mut txn = uow.begin().await.unwrap();
    let mut saved = txn.fetch_order(UT_USR_ID, "9a03").await.unwrap().unwrap();
    let url = "http://localhost:8012/files/payment_proofs/ab12".to_string();
    saved.attach_payment_proof(url.clone(), ut_now()).unwrap();
    txn.update_order(&saved).await.unwrap();
    txn.commit().await.unwrap();

    let mut txn = uow.begin().await.unwrap();
    let saved = txn.fetch_order(UT_USR_ID, "9a03").await.unwrap().unwrap();
    assert_eq!(saved.status, OrderStatus::PaymentProofUploaded);
    assert_eq!(saved.payment_proof, Some(url));
    let mut missing = saved.clone();
    missing.id = "9a04".to_string();
    let e = txn.update_order(&missing).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::OrderNotExist);
}

#[tokio::test]
async fn read_page_newest_first() {
    let (ds, uow) = ut_default_uow().await;
    let orders = vec![
        ut_saved_order("9b01", UT_USR_ID, 50),
        ut_saved_order("9b02", UT_USR_ID, 40),
        ut_saved_order("9b03", UT_USR_ID, 30),
        ut_saved_order("9b04", 56, 20),
        ut_saved_order("9b05", UT_USR_ID, 10),
    ];
    uow.seed_orders(orders).await.unwrap();
    let repo = InMemOrderReadRepo::build(ds).await.unwrap();
    let page = repo.fetch_page(UT_USR_ID, 1, 3).await.unwrap();
    assert_eq!(page.total, 4);
    let ids = page.orders.iter().map(|o| o.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["9b05", "9b03", "9b02"]);
    let page = repo.fetch_page(UT_USR_ID, 2, 3).await.unwrap();
    let ids = page.orders.iter().map(|o| o.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["9b01"]);
    assert_eq!(page.orders[0].lines.len(), 2);
    let page = repo.fetch_page(UT_USR_ID, 3, 3).await.unwrap();
    assert!(page.orders.is_empty());
    assert_eq!(page.total, 4);

    let detail = repo.fetch_detail(56, "9b04").await.unwrap();
    assert!(detail.is_some());
    let detail = repo.fetch_detail(UT_USR_ID, "9b04").await.unwrap();
    assert!(detail.is_none());
}
