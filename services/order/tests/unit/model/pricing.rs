use order_placement::model::{DiscountEffectModel, PriceCutModel, PricingCalculator};

use super::ut_dec;

#[test]
fn compute_no_discount() {
    let p = PricingCalculator::compute_with_effect(ut_dec("100000"), ut_dec("10000"), None);
    assert_eq!(p.subtotal, ut_dec("100000"));
    assert_eq!(p.shipping_cost, ut_dec("10000"));
    assert_eq!(p.discount_amount, ut_dec("0"));
    assert_eq!(p.total_price, ut_dec("110000"));
}

#[test]
fn compute_min_purchase_fixed() {
    let effect = DiscountEffectModel::PriceCut(PriceCutModel::Fixed(ut_dec("20000")));
    let p =
        PricingCalculator::compute_with_effect(ut_dec("100000"), ut_dec("10000"), Some(&effect));
    assert_eq!(p.discount_amount, ut_dec("20000"));
    assert_eq!(p.total_price, ut_dec("90000"));
}

#[test]
fn compute_free_shipping() {
    let effect = DiscountEffectModel::FreeShipping;
    let p =
        PricingCalculator::compute_with_effect(ut_dec("100000"), ut_dec("10000"), Some(&effect));
    assert_eq!(p.discount_amount, ut_dec("10000"));
    assert_eq!(p.total_price, ut_dec("100000"));
}

#[test]
fn compute_clamp_discount() {
    // product discount larger than subtotal
    let p = PricingCalculator::compute(
        ut_dec("30000"),
        ut_dec("8000"),
        ut_dec("50000"),
        ut_dec("0"),
    );
    assert_eq!(p.discount_amount, ut_dec("30000"));
    assert_eq!(p.total_price, ut_dec("8000"));
    // negative discounts are ignored, shipping discount capped
    let p = PricingCalculator::compute(
        ut_dec("30000"),
        ut_dec("8000"),
        ut_dec("-500"),
        ut_dec("9000"),
    );
    assert_eq!(p.discount_amount, ut_dec("8000"));
    assert_eq!(p.total_price, ut_dec("30000"));
    // percentage above one hundred
    let effect = DiscountEffectModel::PriceCut(PriceCutModel::Percentage(ut_dec("150")));
    let p = PricingCalculator::compute_with_effect(ut_dec("40000"), ut_dec("0"), Some(&effect));
    assert_eq!(p.discount_amount, ut_dec("40000"));
    assert_eq!(p.total_price, ut_dec("0"));
}

#[test]
fn compute_never_negative_total() {
    let subtotals = ["0", "1", "999.50", "100000"];
    let shippings = ["0", "7000"];
    let discounts = ["-10", "0", "500", "1000000"];
    for s in subtotals {
        for sh in shippings {
            for d in discounts {
                let (s, sh, d) = (ut_dec(s), ut_dec(sh), ut_dec(d));
                let p = PricingCalculator::compute(s, sh, d, d);
                assert!(p.total_price >= ut_dec("0"));
                assert!(p.discount_amount <= s + sh);
                let again = PricingCalculator::compute(s, sh, d, d);
                assert_eq!(p, again);
            }
        }
    }
}
