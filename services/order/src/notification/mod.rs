use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle as RuntimeHandle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use ecommerce_common::config::AppNotificationCfg;
use ecommerce_common::error::AppErrorCode;
use ecommerce_common::logging::{app_log_event, AppLogContext, AppLogLevel};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub enum OrderNotifyEvent {
    OrderCancelled {
        usr_id: u32,
        store_id: u32,
        oid: String,
    },
}

#[async_trait]
pub trait AbsOrderNotifySender: Sync + Send {
    async fn send(&self, event: &OrderNotifyEvent) -> DefaultResult<(), AppError>;
}

/// default sender, only writes the event to log
pub struct LogOnlyNotifySender {
    logctx: Arc<AppLogContext>,
}

/// Producer side of the post-commit notification queue. Enqueue never
/// fails the caller, a full or closed queue is only logged.
#[derive(Clone)]
pub struct AppOrderNotifyQueue {
    sender: mpsc::Sender<OrderNotifyEvent>,
    logctx: Arc<AppLogContext>,
}

impl LogOnlyNotifySender {
    pub fn new(logctx: Arc<AppLogContext>) -> Self {
        Self { logctx }
    }
}

#[async_trait]
impl AbsOrderNotifySender for LogOnlyNotifySender {
    async fn send(&self, event: &OrderNotifyEvent) -> DefaultResult<(), AppError> {
        let logctx = &self.logctx;
        match event {
            OrderNotifyEvent::OrderCancelled {
                usr_id,
                store_id,
                oid,
            } => app_log_event!(
                logctx,
                AppLogLevel::INFO,
                "order-cancelled, usr:{}, store:{}, oid:{}",
                usr_id,
                store_id,
                oid
            ),
        }
        Ok(())
    }
}

impl AppOrderNotifyQueue {
    pub fn enqueue(&self, event: OrderNotifyEvent) {
        let logctx = &self.logctx;
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(evt)) => {
                app_log_event!(logctx, AppLogLevel::WARNING, "queue-full, dropped:{:?}", evt);
            }
            Err(TrySendError::Closed(evt)) => {
                app_log_event!(logctx, AppLogLevel::ERROR, "queue-closed, dropped:{:?}", evt);
            }
        }
    }
}

async fn consume_events(
    mut receiver: mpsc::Receiver<OrderNotifyEvent>,
    sender: Box<dyn AbsOrderNotifySender>,
    logctx: Arc<AppLogContext>,
) {
    while let Some(evt) = receiver.recv().await {
        if let Err(e) = sender.send(&evt).await {
            app_log_event!(
                logctx,
                AppLogLevel::ERROR,
                "delivery-failure, event:{:?}, error:{}",
                evt,
                e
            );
        }
    }
    app_log_event!(logctx, AppLogLevel::DEBUG, "notify-consumer-terminated");
}

/// spawn the consumer task on current tokio runtime, the task ends once
/// all queue handles are dropped
pub fn build_context(
    cfg: &AppNotificationCfg,
    logctx: Arc<AppLogContext>,
    sender: Box<dyn AbsOrderNotifySender>,
) -> DefaultResult<AppOrderNotifyQueue, AppError> {
    let rt = RuntimeHandle::try_current().map_err(|e| AppError {
        code: AppErrorCode::Unknown,
        detail: Some(e.to_string() + ", source: notification-consumer"),
    })?;
    let (tx, rx) = mpsc::channel(cfg.queue_capacity as usize);
    let _handle = rt.spawn(consume_events(rx, sender, logctx.clone()));
    Ok(AppOrderNotifyQueue { sender: tx, logctx })
}
