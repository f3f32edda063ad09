mod address;
mod cart;
mod order;
mod pricing;

use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, Local as LocalTime};
use rust_decimal::Decimal;

use order_placement::model::{
    CartLineModel, CartModel, DiscountKind, DiscountModel, DiscountValueType, UserAddressModel,
};

pub(crate) fn ut_dec(v: &str) -> Decimal {
    Decimal::from_str(v).unwrap()
}

pub(crate) fn ut_now() -> DateTime<FixedOffset> {
    LocalTime::now().fixed_offset()
}

/// active global discount without amount, product or threshold, callers
/// adjust the fields they need
pub(crate) fn ut_discount(id: u32, code: &str, kind: DiscountKind) -> DiscountModel {
    let now = ut_now();
    DiscountModel {
        id,
        code: code.to_string(),
        description: format!("unit-test {}", kind.as_str()),
        kind,
        value_type: DiscountValueType::Fixed,
        amount: None,
        min_purchase: None,
        product_id: None,
        store_id: None,
        start: now - Duration::days(1),
        end: now + Duration::days(1),
        is_deleted: false,
    }
}

pub(crate) fn ut_cart(usr_id: u32, store_id: u32, lines: &[(u64, u32, &str)]) -> CartModel {
    let lines = lines
        .iter()
        .map(|(product_id, quantity, price)| CartLineModel {
            product_id: *product_id,
            quantity: *quantity,
            unit_price: ut_dec(price),
        })
        .collect();
    CartModel {
        usr_id,
        store_id,
        lines,
    }
}

pub(crate) fn ut_address(id: u64, usr_id: u32) -> UserAddressModel {
    UserAddressModel {
        id,
        usr_id,
        recipient: "Dewi Lestari".to_string(),
        phone: "0812-3456-789".to_string(),
        street: "Jl. Merdeka No. 12".to_string(),
        detail: "".to_string(),
        subdistrict: "Sukajadi".to_string(),
        district: "Cicendo".to_string(),
        city: "Bandung".to_string(),
        province: "Jawa Barat".to_string(),
        postal_code: "40162".to_string(),
    }
}
