use std::sync::Arc;

use order_placement::api::dto::{
    DiscountVerifyItemDto, DiscountVerifyKindDto, DiscountVerifyReqDto, DiscountVerifyRespDto,
};
use order_placement::datastore::AppInMemoryDStore;
use order_placement::usecase::{
    DiscountRejectReason, VerifyDiscountUcError, VerifyDiscountUseCase,
};

use super::ut_uow_obj;
use crate::model::ut_dec;
use crate::repository::{ut_default_uow, UT_STORE_ID};
use crate::ut_log_context;

fn ut_verify_req(code: &str, subtotal: &str, items: &[(u64, u32)]) -> DiscountVerifyReqDto {
    let items = items
        .iter()
        .map(|(product_id, quantity)| DiscountVerifyItemDto {
            product_id: *product_id,
            quantity: *quantity,
        })
        .collect();
    DiscountVerifyReqDto {
        code: code.to_string(),
        subtotal: ut_dec(subtotal),
        items,
        store_id: UT_STORE_ID,
    }
}

async fn ut_verify(
    ds: &Arc<AppInMemoryDStore>,
    req: DiscountVerifyReqDto,
) -> Result<DiscountVerifyRespDto, VerifyDiscountUcError> {
    let uc = VerifyDiscountUseCase {
        uow: ut_uow_obj(ds).await,
        logctx: ut_log_context(),
    };
    uc.execute(req).await
}

fn ut_assert_rejected(
    result: Result<DiscountVerifyRespDto, VerifyDiscountUcError>,
    expect: DiscountRejectReason,
) {
    match result {
        Err(VerifyDiscountUcError::DiscountNotApplicable(reason)) => assert_eq!(reason, expect),
        Err(VerifyDiscountUcError::DataStore(e)) => panic!("datastore error: {e}"),
        Ok(resp) => panic!("unexpected accepted: {}", resp.code),
    }
}

#[tokio::test]
async fn free_shipping_ok() {
    let (ds, _uow) = ut_default_uow().await;
    let req = ut_verify_req("ongkir", "100000", &[(1001, 2)]);
    let resp = ut_verify(&ds, req).await.unwrap();
    assert_eq!(resp.code.as_str(), "ONGKIR");
    assert_eq!(resp.kind, DiscountVerifyKindDto::FreeShipping);
    assert_eq!(resp.value, ut_dec("0"));
    assert!(resp.product_id.is_none());
}

#[tokio::test]
async fn min_purchase_threshold() {
    let (ds, _uow) = ut_default_uow().await;
    let req = ut_verify_req("BELANJA50", "100000", &[(1001, 2)]);
    let resp = ut_verify(&ds, req).await.unwrap();
    assert_eq!(resp.kind, DiscountVerifyKindDto::Fixed);
    assert_eq!(resp.value, ut_dec("20000"));
    let req = ut_verify_req("BELANJA50", "40000", &[(1001, 1)]);
    let result = ut_verify(&ds, req).await;
    let expect = DiscountRejectReason::MinPurchaseNotMet {
        min_purchase: ut_dec("50000"),
    };
    ut_assert_rejected(result, expect);
}

#[tokio::test]
async fn b1g1_product_and_stock() {
    let (ds, uow) = ut_default_uow().await;
    let req = ut_verify_req("B1G1TEH", "60000", &[(1002, 2)]);
    let resp = ut_verify(&ds, req).await.unwrap();
    assert_eq!(resp.kind, DiscountVerifyKindDto::BuyOneGetOne);
    assert_eq!(resp.value, ut_dec("0"));
    assert_eq!(resp.product_id, Some(1002));

    let req = ut_verify_req("B1G1TEH", "90000", &[(1002, 3)]);
    let result = ut_verify(&ds, req).await;
    let expect = DiscountRejectReason::BonusStockShortage {
        required: 6,
        available: 5,
    };
    ut_assert_rejected(result, expect);

    let req = ut_verify_req("B1G1TEH", "70000", &[(1001, 2)]);
    let result = ut_verify(&ds, req).await;
    let expect = DiscountRejectReason::RequiredProductAbsent { product_id: 1002 };
    ut_assert_rejected(result, expect);
    // nothing is written by verification
    let qty = uow.stock_quantity(UT_STORE_ID, 1002).await.unwrap();
    assert_eq!(qty, Some(5));
}

#[tokio::test]
async fn manual_bound_product() {
    let (ds, _uow) = ut_default_uow().await;
    let req = ut_verify_req("HEMAT10", "25000", &[(1003, 2)]);
    let resp = ut_verify(&ds, req).await.unwrap();
    assert_eq!(resp.kind, DiscountVerifyKindDto::Percentage);
    assert_eq!(resp.value, ut_dec("10"));
    assert_eq!(resp.product_id, Some(1003));
    let req = ut_verify_req("HEMAT10", "70000", &[(1001, 2)]);
    let result = ut_verify(&ds, req).await;
    let expect = DiscountRejectReason::RequiredProductAbsent { product_id: 1003 };
    ut_assert_rejected(result, expect);
}

#[tokio::test]
async fn code_not_found() {
    let (ds, _uow) = ut_default_uow().await;
    // other store, expired, deleted, unknown, blank
    for code in ["TOKO8", "LAMA", "HAPUS", "TIDAKADA", " "] {
        let req = ut_verify_req(code, "100000", &[(1001, 2)]);
        let result = ut_verify(&ds, req).await;
        ut_assert_rejected(result, DiscountRejectReason::NotFound);
    }
}
