use chrono::Duration;

use order_placement::model::{
    AppliedDiscountModel, DiscountEffectModel, OrderCreateReqModel, OrderModel, OrderStatus,
    PricingCalculator, RepayRejectReason,
};

use super::{ut_cart, ut_dec, ut_now};

fn ut_order(oid: &str) -> OrderModel {
    let cart = ut_cart(55, 7, &[(1001, 2, "50000")]);
    let price =
        PricingCalculator::compute_with_effect(cart.subtotal(), ut_dec("10000"), None);
    let req = OrderCreateReqModel {
        usr_id: 55,
        store_id: 7,
        address_id: 301,
        payment_method_id: 2,
        destination: "Bandung".to_string(),
        lines: cart.adjusted_lines(None),
        price,
        discount: Some(AppliedDiscountModel {
            discount_id: 9,
            code: "FREESHIP".to_string(),
            effect: DiscountEffectModel::FreeShipping,
        }),
    };
    OrderModel::new(oid.to_string(), req, ut_now())
}

#[test]
fn new_order_pending_payment() {
    let order = ut_order("0a1b2c");
    assert_eq!(order.status, OrderStatus::PendingPayment);
    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.lines[0].quantity, 2);
    assert_eq!(order.total_price, ut_dec("110000"));
    let d = order.discount.as_ref().unwrap();
    assert_eq!(d.discount_id, 9);
    assert_eq!(d.code.as_str(), "FREESHIP");
    assert!(order.payment_proof.is_none());
    assert_eq!(order.created_at, order.updated_at);
}

#[test]
fn attach_proof_then_cancel() {
    let mut order = ut_order("0a1b2d");
    let later = order.created_at + Duration::minutes(3);
    let url = "http://localhost/files/payment_proofs/abc".to_string();
    order.attach_payment_proof(url.clone(), later).unwrap();
    assert_eq!(order.status, OrderStatus::PaymentProofUploaded);
    assert_eq!(order.payment_proof.as_ref(), Some(&url));
    assert_eq!(order.updated_at, later);
    // second upload not allowed
    let e = order.attach_payment_proof(url, later).unwrap_err();
    assert_eq!(e.current, OrderStatus::PaymentProofUploaded);
    assert!(order.cancel(later).is_ok());
    assert_eq!(order.status, OrderStatus::Cancelled);
    let e = order.cancel(later).unwrap_err();
    assert_eq!(e.current, OrderStatus::Cancelled);
    assert_eq!(e.expect, OrderStatus::Cancelled);
}

#[test]
fn confirm_only_when_shipped() {
    let mut order = ut_order("0a1b2e");
    let now = ut_now();
    let e = order.confirm_receipt(now).unwrap_err();
    assert_eq!(e.current, OrderStatus::PendingPayment);
    order.status = OrderStatus::Processing;
    assert!(order.cancel(now).is_err());
    assert!(order.confirm_receipt(now).is_err());
    order.status = OrderStatus::Shipped;
    assert!(order.confirm_receipt(now).is_ok());
    assert_eq!(order.status, OrderStatus::Confirmed);
}

#[test]
fn repay_within_window() {
    let mut order = ut_order("0a1b2f");
    let created = order.created_at;
    assert!(order.validate_repay(created + Duration::minutes(59), 60).is_ok());
    let result = order.validate_repay(created + Duration::minutes(61), 60);
    let expect_deadline = created + Duration::minutes(60);
    assert_eq!(
        result,
        Err(RepayRejectReason::Expired {
            deadline: expect_deadline
        })
    );
    order.status = OrderStatus::Cancelled;
    let result = order.validate_repay(created, 60);
    assert_eq!(
        result,
        Err(RepayRejectReason::InvalidStatus(OrderStatus::Cancelled))
    );
}

#[test]
fn status_text_conversion() {
    let all = [
        OrderStatus::PendingPayment,
        OrderStatus::PaymentProofUploaded,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Confirmed,
        OrderStatus::Cancelled,
    ];
    for s in all {
        assert_eq!(s.as_str().parse::<OrderStatus>().unwrap(), s);
    }
    assert!("REFUNDED".parse::<OrderStatus>().is_err());
}
