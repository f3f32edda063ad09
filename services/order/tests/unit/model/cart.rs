use order_placement::model::ProductStockModel;

use super::{ut_cart, ut_dec};

#[test]
fn subtotal_sum_of_lines() {
    let cart = ut_cart(55, 7, &[(1001, 2, "35000"), (1002, 1, "30000")]);
    assert!(!cart.is_empty());
    assert_eq!(cart.subtotal(), ut_dec("100000"));
    let empty = ut_cart(55, 7, &[]);
    assert!(empty.is_empty());
    assert_eq!(empty.subtotal(), ut_dec("0"));
}

#[test]
fn adjusted_lines_double_bonus_only() {
    let cart = ut_cart(55, 7, &[(1001, 3, "20000"), (1002, 1, "40000")]);
    let lines = cart.adjusted_lines(Some(1001));
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].quantity, 6);
    assert_eq!(lines[1].quantity, 1);
    assert_eq!(lines[0].unit_price, ut_dec("20000"));
    // original cart untouched
    assert_eq!(cart.lines[0].quantity, 3);
    let lines = cart.adjusted_lines(Some(9999));
    assert_eq!(lines[0].quantity, 3);
    let lines = cart.adjusted_lines(None);
    assert_eq!(lines, cart.lines);
}

#[test]
fn stock_cover_deduct_restore() {
    let mut stock = ProductStockModel {
        store_id: 7,
        product_id: 1001,
        quantity: 5,
    };
    assert!(stock.check_cover(5).is_ok());
    let e = stock.check_cover(6).unwrap_err();
    assert_eq!(e.product_id, 1001);
    assert_eq!(e.required, 6);
    assert_eq!(e.available, 5);
    assert!(stock.try_deduct(6).is_err());
    assert_eq!(stock.quantity, 5);
    assert!(stock.try_deduct(4).is_ok());
    assert_eq!(stock.quantity, 1);
    stock.restore(4);
    assert_eq!(stock.quantity, 5);
}
