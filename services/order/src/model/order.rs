use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset};
use rust_decimal::Decimal;

use ecommerce_common::error::AppErrorCode;

use super::{AppliedDiscountModel, CartLineModel, PriceBreakdownModel};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    PendingPayment,
    PaymentProofUploaded,
    Processing,
    Shipped,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineModel {
    pub product_id: u64,
    pub quantity: u32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderDiscountRefModel {
    pub discount_id: u32,
    pub code: String,
}

/// everything the order writer needs to persist a new order
pub struct OrderCreateReqModel {
    pub usr_id: u32,
    pub store_id: u32,
    pub address_id: u64,
    pub payment_method_id: u32,
    pub destination: String,
    pub lines: Vec<CartLineModel>,
    pub price: PriceBreakdownModel,
    pub discount: Option<AppliedDiscountModel>,
}

#[derive(Debug, Clone)]
pub struct OrderModel {
    pub id: String,
    pub usr_id: u32,
    pub store_id: u32,
    pub address_id: u64,
    pub payment_method_id: u32,
    pub destination: String,
    pub status: OrderStatus,
    pub lines: Vec<OrderLineModel>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub discount_amount: Decimal,
    pub total_price: Decimal,
    pub discount: Option<OrderDiscountRefModel>,
    pub payment_proof: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

pub struct OrderPageModel {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub orders: Vec<OrderModel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTransitionError {
    pub current: OrderStatus,
    pub expect: OrderStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RepayRejectReason {
    InvalidStatus(OrderStatus),
    Expired { deadline: DateTime<FixedOffset> },
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "PENDING_PAYMENT",
            Self::PaymentProofUploaded => "PAYMENT_PROOF_UPLOADED",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let out = match s {
            "PENDING_PAYMENT" => Self::PendingPayment,
            "PAYMENT_PROOF_UPLOADED" => Self::PaymentProofUploaded,
            "PROCESSING" => Self::Processing,
            "SHIPPED" => Self::Shipped,
            "CONFIRMED" => Self::Confirmed,
            "CANCELLED" => Self::Cancelled,
            _others => {
                return Err(AppError {
                    code: AppErrorCode::DataCorruption,
                    detail: Some(format!("order-status:{s}")),
                })
            }
        };
        Ok(out)
    }
}

impl OrderModel {
    pub fn new(oid: String, req: OrderCreateReqModel, now: DateTime<FixedOffset>) -> Self {
        let lines = req
            .lines
            .into_iter()
            .map(|l| OrderLineModel {
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect();
        let discount = req.discount.map(|d| OrderDiscountRefModel {
            discount_id: d.discount_id,
            code: d.code,
        });
        Self {
            id: oid,
            usr_id: req.usr_id,
            store_id: req.store_id,
            address_id: req.address_id,
            payment_method_id: req.payment_method_id,
            destination: req.destination,
            status: OrderStatus::PendingPayment,
            lines,
            subtotal: req.price.subtotal,
            shipping_cost: req.price.shipping_cost,
            discount_amount: req.price.discount_amount,
            total_price: req.price.total_price,
            discount,
            payment_proof: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn transit(
        &mut self,
        allowed: &[OrderStatus],
        next: OrderStatus,
        now: DateTime<FixedOffset>,
    ) -> Result<(), OrderTransitionError> {
        if allowed.contains(&self.status) {
            self.status = next;
            self.updated_at = now;
            Ok(())
        } else {
            Err(OrderTransitionError {
                current: self.status,
                expect: next,
            })
        }
    }

    pub fn attach_payment_proof(
        &mut self,
        url: String,
        now: DateTime<FixedOffset>,
    ) -> Result<(), OrderTransitionError> {
        let allowed = [OrderStatus::PendingPayment];
        self.transit(&allowed, OrderStatus::PaymentProofUploaded, now)?;
        self.payment_proof = Some(url);
        Ok(())
    }

    /// reserved stock of cancelled order has to be returned by caller
    pub fn cancel(&mut self, now: DateTime<FixedOffset>) -> Result<(), OrderTransitionError> {
        let allowed = [OrderStatus::PendingPayment, OrderStatus::PaymentProofUploaded];
        self.transit(&allowed, OrderStatus::Cancelled, now)
    }

    pub fn confirm_receipt(
        &mut self,
        now: DateTime<FixedOffset>,
    ) -> Result<(), OrderTransitionError> {
        self.transit(&[OrderStatus::Shipped], OrderStatus::Confirmed, now)
    }

    pub fn payment_deadline(&self, window_mins: u32) -> DateTime<FixedOffset> {
        self.created_at + Duration::minutes(window_mins as i64)
    }

    pub fn validate_repay(
        &self,
        now: DateTime<FixedOffset>,
        window_mins: u32,
    ) -> Result<(), RepayRejectReason> {
        if self.status != OrderStatus::PendingPayment {
            return Err(RepayRejectReason::InvalidStatus(self.status));
        }
        let deadline = self.payment_deadline(window_mins);
        if now > deadline {
            Err(RepayRejectReason::Expired { deadline })
        } else {
            Ok(())
        }
    }
} // end of impl OrderModel
