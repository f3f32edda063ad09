use std::result::Result as DefaultResult;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use crate::error::AppError;
use crate::model::{AppliedDiscountModel, CartModel};
use crate::repository::AbsDiscountTxnRepo;

/// Look up the promo code and classify the matched discount against the
/// cart. `None` means the order goes on without discount, which covers
/// unknown code, unmet minimum purchase and bonus product absent from cart.
pub async fn resolve_discount<R>(
    repo: &mut R,
    code: Option<&str>,
    store_id: u32,
    subtotal: Decimal,
    cart: &CartModel,
    now: DateTime<FixedOffset>,
) -> DefaultResult<Option<AppliedDiscountModel>, AppError>
where
    R: AbsDiscountTxnRepo + ?Sized,
{
    let code = match code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => c,
        None => return Ok(None),
    };
    let found = repo.find_applicable_discount(code, store_id, now).await?;
    let applied = found.and_then(|d| {
        let effect = d.resolve_effect(subtotal, |pid| cart.find_line(pid).is_some())?;
        Some(AppliedDiscountModel {
            discount_id: d.id,
            code: d.code,
            effect,
        })
    });
    Ok(applied)
}
