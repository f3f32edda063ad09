use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use ecommerce_common::config::AppNotificationCfg;
use ecommerce_common::error::AppErrorCode;

use order_placement::error::AppError;
use order_placement::notification::{build_context, AbsOrderNotifySender, OrderNotifyEvent};

use crate::ut_log_context;

#[derive(Clone)]
pub(crate) struct MockNotifySender {
    pub(crate) received: Arc<Mutex<Vec<OrderNotifyEvent>>>,
    pub(crate) fail: bool,
}

impl MockNotifySender {
    pub(crate) fn new(fail: bool) -> Self {
        Self {
            received: Arc::new(Mutex::new(Vec::new())),
            fail,
        }
    }
    pub(crate) fn events(&self) -> Vec<OrderNotifyEvent> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl AbsOrderNotifySender for MockNotifySender {
    async fn send(&self, event: &OrderNotifyEvent) -> DefaultResult<(), AppError> {
        self.received.lock().unwrap().push(event.clone());
        if self.fail {
            Err(AppError {
                code: AppErrorCode::Unknown,
                detail: Some("unit-test".to_string()),
            })
        } else {
            Ok(())
        }
    }
}

fn ut_event(oid: &str) -> OrderNotifyEvent {
    OrderNotifyEvent::OrderCancelled {
        usr_id: 55,
        store_id: 7,
        oid: oid.to_string(),
    }
}

#[tokio::test]
async fn enqueue_delivered() {
    let sender = MockNotifySender::new(false);
    let cfg = AppNotificationCfg { queue_capacity: 4 };
    let queue = build_context(&cfg, ut_log_context(), Box::new(sender.clone())).unwrap();
    queue.enqueue(ut_event("c001"));
    queue.enqueue(ut_event("c002"));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(sender.events(), vec![ut_event("c001"), ut_event("c002")]);
}

#[tokio::test]
async fn enqueue_full_dropped() {
    let sender = MockNotifySender::new(false);
    let cfg = AppNotificationCfg { queue_capacity: 1 };
    let queue = build_context(&cfg, ut_log_context(), Box::new(sender.clone())).unwrap();
    // consumer does not run until this task yields
    queue.enqueue(ut_event("c003"));
    queue.enqueue(ut_event("c004"));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(sender.events(), vec![ut_event("c003")]);
}

#[tokio::test]
async fn delivery_failure_not_stop_consumer() {
    let sender = MockNotifySender::new(true);
    let cfg = AppNotificationCfg { queue_capacity: 4 };
    let queue = build_context(&cfg, ut_log_context(), Box::new(sender.clone())).unwrap();
    queue.enqueue(ut_event("c005"));
    tokio::time::sleep(Duration::from_millis(20)).await;
    queue.enqueue(ut_event("c006"));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(sender.events().len(), 2);
}

#[test]
fn build_outside_runtime() {
    let sender = MockNotifySender::new(false);
    let cfg = AppNotificationCfg { queue_capacity: 4 };
    let result = build_context(&cfg, ut_log_context(), Box::new(sender));
    assert!(result.is_err());
}
