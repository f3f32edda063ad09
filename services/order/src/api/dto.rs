use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{OrderLineModel, OrderModel, OrderPageModel};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OrderCreateReqDto {
    pub address_id: u64,
    pub store_id: u32,
    // monetary amount in text form, validated by the use case
    pub shipping_cost: String,
    pub payment_method_id: u32,
    pub promo_code: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DiscountVerifyItemDto {
    pub product_id: u64,
    pub quantity: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DiscountVerifyReqDto {
    pub code: String,
    pub subtotal: Decimal,
    pub items: Vec<DiscountVerifyItemDto>,
    pub store_id: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub enum DiscountVerifyKindDto {
    #[serde(rename = "free_shipping")]
    FreeShipping,
    #[serde(rename = "b1g1")]
    BuyOneGetOne,
    #[serde(rename = "percentage")]
    Percentage,
    #[serde(rename = "fixed")]
    Fixed,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DiscountVerifyRespDto {
    pub code: String,
    pub description: String,
    pub kind: DiscountVerifyKindDto,
    // zero for free shipping and buy-one-get-one
    pub value: Decimal,
    pub product_id: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OrderLineDto {
    pub product_id: u64,
    pub quantity: u32,
    pub unit_price: Decimal,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OrderDetailDto {
    pub order_id: String,
    pub usr_id: u32,
    pub store_id: u32,
    pub status: String,
    pub destination: String,
    pub payment_method_id: u32,
    pub lines: Vec<OrderLineDto>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub discount_amount: Decimal,
    pub total_price: Decimal,
    pub promo_code: Option<String>,
    pub payment_proof: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OrderPageDto {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub orders: Vec<OrderDetailDto>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OrderRepayRespDto {
    pub order_id: String,
    pub total_price: Decimal,
    pub payment_deadline: DateTime<FixedOffset>,
}

impl From<OrderLineModel> for OrderLineDto {
    fn from(value: OrderLineModel) -> Self {
        Self {
            product_id: value.product_id,
            quantity: value.quantity,
            unit_price: value.unit_price,
        }
    }
}

impl From<OrderModel> for OrderDetailDto {
    fn from(value: OrderModel) -> Self {
        Self {
            order_id: value.id,
            usr_id: value.usr_id,
            store_id: value.store_id,
            status: value.status.as_str().to_string(),
            destination: value.destination,
            payment_method_id: value.payment_method_id,
            lines: value.lines.into_iter().map(OrderLineDto::from).collect(),
            subtotal: value.subtotal,
            shipping_cost: value.shipping_cost,
            discount_amount: value.discount_amount,
            total_price: value.total_price,
            promo_code: value.discount.map(|d| d.code),
            payment_proof: value.payment_proof,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<OrderPageModel> for OrderPageDto {
    fn from(value: OrderPageModel) -> Self {
        Self {
            total: value.total,
            page: value.page,
            page_size: value.page_size,
            orders: value.orders.into_iter().map(OrderDetailDto::from).collect(),
        }
    }
}
