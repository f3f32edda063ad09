use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use ecommerce_common::error::AppErrorCode;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    FreeShipping,
    BuyOneGetOne,
    Manual,
    MinPurchase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountValueType {
    Percentage,
    Fixed,
}

/// promotional rule, never modified by order placement
#[derive(Debug, Clone)]
pub struct DiscountModel {
    pub id: u32,
    pub code: String,
    pub description: String,
    pub kind: DiscountKind,
    pub value_type: DiscountValueType,
    pub amount: Option<Decimal>,
    pub min_purchase: Option<Decimal>,
    pub product_id: Option<u64>,
    // `None` means the discount applies to all stores
    pub store_id: Option<u32>,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PriceCutModel {
    Percentage(Decimal),
    Fixed(Decimal),
}

/// Outcome of a resolved discount. Each variant affects exactly one of
/// shipping cost, subtotal or required quantity.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountEffectModel {
    FreeShipping,
    BuyOneGetOne { product_id: u64 },
    PriceCut(PriceCutModel),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppliedDiscountModel {
    pub discount_id: u32,
    pub code: String,
    pub effect: DiscountEffectModel,
}

impl DiscountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FreeShipping => "FREE_ONGKIR",
            Self::BuyOneGetOne => "B1G1",
            Self::Manual => "MANUAL",
            Self::MinPurchase => "MIN_PURCHASE",
        }
    }
}

impl FromStr for DiscountKind {
    type Err = AppError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FREE_ONGKIR" => Ok(Self::FreeShipping),
            "B1G1" => Ok(Self::BuyOneGetOne),
            "MANUAL" => Ok(Self::Manual),
            "MIN_PURCHASE" => Ok(Self::MinPurchase),
            _others => Err(AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(format!("discount-kind:{s}")),
            }),
        }
    }
}

impl DiscountValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "PERCENTAGE",
            Self::Fixed => "FIXED",
        }
    }
}

impl FromStr for DiscountValueType {
    type Err = AppError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERCENTAGE" => Ok(Self::Percentage),
            "FIXED" => Ok(Self::Fixed),
            _others => Err(AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(format!("discount-value-type:{s}")),
            }),
        }
    }
}

impl DiscountModel {
    pub fn code_matches(&self, code: &str) -> bool {
        self.code.to_lowercase() == code.trim().to_lowercase()
    }

    pub fn is_applicable(&self, store_id: u32, now: DateTime<FixedOffset>) -> bool {
        let in_window = self.start <= now && now <= self.end;
        let store_ok = self.store_id.map_or(true, |s| s == store_id);
        !self.is_deleted && in_window && store_ok
    }

    pub fn meets_min_purchase(&self, subtotal: Decimal) -> bool {
        self.min_purchase.map_or(true, |m| subtotal >= m)
    }

    pub fn price_cut(&self) -> Option<PriceCutModel> {
        self.amount.map(|a| match self.value_type {
            DiscountValueType::Percentage => PriceCutModel::Percentage(a),
            DiscountValueType::Fixed => PriceCutModel::Fixed(a),
        })
    }

    /// Classify the discount for an order with the given subtotal. The
    /// closure reports whether a product is present in the order. `None`
    /// means the order proceeds without discount.
    pub fn resolve_effect<F>(&self, subtotal: Decimal, has_product: F) -> Option<DiscountEffectModel>
    where
        F: Fn(u64) -> bool,
    {
        if !self.meets_min_purchase(subtotal) {
            return None;
        }
        match self.kind {
            DiscountKind::FreeShipping => Some(DiscountEffectModel::FreeShipping),
            DiscountKind::BuyOneGetOne => self
                .product_id
                .filter(|pid| has_product(*pid))
                .map(|product_id| DiscountEffectModel::BuyOneGetOne { product_id }),
            DiscountKind::Manual => {
                if let Some(pid) = self.product_id {
                    if !has_product(pid) {
                        return None;
                    }
                }
                self.price_cut().map(DiscountEffectModel::PriceCut)
            }
            DiscountKind::MinPurchase => self.price_cut().map(DiscountEffectModel::PriceCut),
        }
    }
} // end of impl DiscountModel

impl PriceCutModel {
    pub fn amount(&self, subtotal: Decimal) -> Decimal {
        match self {
            Self::Percentage(pct) => subtotal * *pct / Decimal::ONE_HUNDRED,
            Self::Fixed(v) => *v,
        }
    }
}

impl DiscountEffectModel {
    pub fn bonus_product(&self) -> Option<u64> {
        match self {
            Self::BuyOneGetOne { product_id } => Some(*product_id),
            Self::FreeShipping | Self::PriceCut(_) => None,
        }
    }

    pub fn product_discount(&self, subtotal: Decimal) -> Decimal {
        match self {
            Self::PriceCut(c) => c.amount(subtotal),
            Self::FreeShipping | Self::BuyOneGetOne { .. } => Decimal::ZERO,
        }
    }

    pub fn shipping_discount(&self, shipping_cost: Decimal) -> Decimal {
        match self {
            Self::FreeShipping => shipping_cost,
            Self::BuyOneGetOne { .. } | Self::PriceCut(_) => Decimal::ZERO,
        }
    }
}
