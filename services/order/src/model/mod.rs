mod address;
mod cart;
mod discount;
mod order;
mod pricing;
mod stock_level;

pub use address::UserAddressModel;
pub use cart::{CartLineModel, CartModel, ProductModel};
pub use discount::{
    AppliedDiscountModel, DiscountEffectModel, DiscountKind, DiscountModel, DiscountValueType,
    PriceCutModel,
};
pub use order::{
    OrderCreateReqModel, OrderDiscountRefModel, OrderLineModel, OrderModel, OrderPageModel,
    OrderStatus, OrderTransitionError, RepayRejectReason,
};
pub use pricing::{PriceBreakdownModel, PricingCalculator};
pub use stock_level::{ProductStockModel, StockShortageModel};
