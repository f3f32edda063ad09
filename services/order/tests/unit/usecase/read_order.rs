use std::boxed::Box;
use std::sync::Arc;

use order_placement::datastore::AppInMemoryDStore;
use order_placement::repository::InMemOrderReadRepo;
use order_placement::usecase::{FetchOrderDetailUseCase, FetchOrderPageUseCase, FetchOrderUcError};

use crate::model::ut_dec;
use crate::repository::in_mem::ut_saved_order;
use crate::repository::{ut_default_uow, UT_USR_ID};

async fn ut_page_uc(ds: &Arc<AppInMemoryDStore>, max_page_size: u16) -> FetchOrderPageUseCase {
    let repo = InMemOrderReadRepo::build(ds.clone()).await.unwrap();
    FetchOrderPageUseCase {
        repo: Box::new(repo),
        max_page_size,
    }
}

async fn ut_detail_uc(ds: &Arc<AppInMemoryDStore>) -> FetchOrderDetailUseCase {
    let repo = InMemOrderReadRepo::build(ds.clone()).await.unwrap();
    FetchOrderDetailUseCase {
        repo: Box::new(repo),
    }
}

#[tokio::test]
async fn detail_owned_order() {
    let (ds, uow) = ut_default_uow().await;
    uow.seed_orders(vec![ut_saved_order("e1f1", UT_USR_ID, 5)])
        .await
        .unwrap();
    let uc = ut_detail_uc(&ds).await;
    let dto = uc.execute(UT_USR_ID, "e1f1".to_string()).await.unwrap();
    assert_eq!(dto.order_id.as_str(), "e1f1");
    assert_eq!(dto.status.as_str(), "PENDING_PAYMENT");
    assert_eq!(dto.promo_code.as_deref(), Some("ONGKIR"));
    assert_eq!(dto.lines.len(), 2);
    assert_eq!(dto.total_price, ut_dec("82500"));
    let uc = ut_detail_uc(&ds).await;
    let result = uc.execute(56, "e1f1".to_string()).await;
    assert!(matches!(result, Err(FetchOrderUcError::OrderNotFound)));
}

#[tokio::test]
async fn page_clamped() {
    let (ds, uow) = ut_default_uow().await;
    let orders = (1..=7)
        .map(|n| ut_saved_order(format!("e2a{n}").as_str(), UT_USR_ID, n * 10))
        .collect();
    uow.seed_orders(orders).await.unwrap();

    // page zero treated as the first one, size limited to maximum
    let uc = ut_page_uc(&ds, 5).await;
    let dto = uc.execute(UT_USR_ID, 0, 100).await.unwrap();
    assert_eq!(dto.total, 7);
    assert_eq!(dto.page, 1);
    assert_eq!(dto.page_size, 5);
    let ids = dto.orders.iter().map(|o| o.order_id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["e2a1", "e2a2", "e2a3", "e2a4", "e2a5"]);

    let uc = ut_page_uc(&ds, 5).await;
    let dto = uc.execute(UT_USR_ID, 2, 5).await.unwrap();
    assert_eq!(dto.orders.len(), 2);
    assert_eq!(dto.orders[1].order_id.as_str(), "e2a7");

    let uc = ut_page_uc(&ds, 5).await;
    let dto = uc.execute(UT_USR_ID, 1, 0).await.unwrap();
    assert_eq!(dto.page_size, 1);
    assert_eq!(dto.orders.len(), 1);

    let uc = ut_page_uc(&ds, 5).await;
    let dto = uc.execute(56, 1, 5).await.unwrap();
    assert_eq!(dto.total, 0);
    assert!(dto.orders.is_empty());
}
