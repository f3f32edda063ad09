use rust_decimal::Decimal;

use super::DiscountEffectModel;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdownModel {
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub discount_amount: Decimal,
    pub total_price: Decimal,
}

pub struct PricingCalculator;

impl PricingCalculator {
    /// product discount is clamped to `[0, subtotal]`, shipping discount
    /// to `[0, shipping_cost]`, the total never goes below zero.
    pub fn compute(
        subtotal: Decimal,
        shipping_cost: Decimal,
        product_discount: Decimal,
        shipping_discount: Decimal,
    ) -> PriceBreakdownModel {
        let upper_prod = subtotal.max(Decimal::ZERO);
        let upper_ship = shipping_cost.max(Decimal::ZERO);
        let product_discount = product_discount.max(Decimal::ZERO).min(upper_prod);
        let shipping_discount = shipping_discount.max(Decimal::ZERO).min(upper_ship);
        let discount_amount = product_discount + shipping_discount;
        let total_price = (subtotal + shipping_cost - discount_amount).max(Decimal::ZERO);
        PriceBreakdownModel {
            subtotal,
            shipping_cost,
            discount_amount,
            total_price,
        }
    }

    pub fn compute_with_effect(
        subtotal: Decimal,
        shipping_cost: Decimal,
        effect: Option<&DiscountEffectModel>,
    ) -> PriceBreakdownModel {
        let (prod_d, ship_d) = effect
            .map(|e| (e.product_discount(subtotal), e.shipping_discount(shipping_cost)))
            .unwrap_or((Decimal::ZERO, Decimal::ZERO));
        Self::compute(subtotal, shipping_cost, prod_d, ship_d)
    }
}
