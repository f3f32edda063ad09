use std::collections::HashMap;
use std::time::Duration;

use ecommerce_common::error::AppErrorCode;

use crate::ut_inmem_dstore;

const UT_TABLE: &str = "ut_table";

fn ut_rows(items: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
        .collect()
}

#[tokio::test]
async fn session_commit_visible() {
    let ds = ut_inmem_dstore(10);
    ds.create_table(UT_TABLE).await.unwrap();
    let mut txn = ds.begin().await;
    let num = txn
        .save(UT_TABLE, ut_rows(&[("a", "11"), ("b", "22")]))
        .unwrap();
    assert_eq!(num, 2);
    txn.commit();
    let txn = ds.begin().await;
    let row = txn.fetch_one(UT_TABLE, "b").unwrap().unwrap();
    assert_eq!(row[0].as_str(), "22");
    let found = txn.filter(UT_TABLE, |_k, v| v[0] == "11").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].0.as_str(), "a");
}

#[tokio::test]
async fn session_drop_discard() {
    let ds = ut_inmem_dstore(10);
    ds.create_table(UT_TABLE).await.unwrap();
    {
        let mut txn = ds.begin().await;
        txn.save(UT_TABLE, ut_rows(&[("a", "11")])).unwrap();
        txn.commit();
    }
    {
        let mut txn = ds.begin().await;
        txn.save(UT_TABLE, ut_rows(&[("a", "99"), ("c", "33")]))
            .unwrap();
        let num = txn.delete(UT_TABLE, &["a".to_string()]).unwrap();
        assert_eq!(num, 1);
        // dropped without commit
    }
    let txn = ds.begin().await;
    let row = txn.fetch_one(UT_TABLE, "a").unwrap().unwrap();
    assert_eq!(row[0].as_str(), "11");
    assert!(txn.fetch_one(UT_TABLE, "c").unwrap().is_none());
}

#[tokio::test]
async fn session_exceed_max_items() {
    let ds = ut_inmem_dstore(2);
    ds.create_table(UT_TABLE).await.unwrap();
    let mut txn = ds.begin().await;
    let result = txn.save(UT_TABLE, ut_rows(&[("a", "1"), ("b", "2"), ("c", "3")]));
    let e = result.unwrap_err();
    assert_eq!(e.code, AppErrorCode::ExceedingMaxLimit);
}

#[tokio::test]
async fn session_table_not_exist() {
    let ds = ut_inmem_dstore(10);
    let txn = ds.begin().await;
    let e = txn.fetch_one("no_such_table", "a").unwrap_err();
    assert_eq!(e.code, AppErrorCode::DataTableNotExist);
}

#[tokio::test]
async fn sessions_serialized() {
    let ds = ut_inmem_dstore(10);
    ds.create_table(UT_TABLE).await.unwrap();
    let txn = ds.begin().await;
    let ds2 = ds.clone();
    let handle = tokio::spawn(async move {
        let mut txn2 = ds2.begin().await;
        txn2.save(UT_TABLE, ut_rows(&[("z", "26")])).unwrap();
        txn2.commit();
    });
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!handle.is_finished());
    assert!(txn.fetch_one(UT_TABLE, "z").unwrap().is_none());
    drop(txn);
    handle.await.unwrap();
    let txn = ds.begin().await;
    assert!(txn.fetch_one(UT_TABLE, "z").unwrap().is_some());
}
