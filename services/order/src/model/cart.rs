use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductModel {
    pub id: u64,
    pub name: String,
    pub price: Decimal,
}

/// line item of a cart, the price comes from the product record at the
/// time the cart is loaded, not from any price previously frozen in cart
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineModel {
    pub product_id: u64,
    pub quantity: u32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct CartModel {
    pub usr_id: u32,
    pub store_id: u32,
    pub lines: Vec<CartLineModel>,
}

impl CartLineModel {
    pub fn amount(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// quantity the stock has to cover, doubled for the product
    /// receiving buy-one-get-one bonus
    pub fn required_quantity(&self, bonus_product: Option<u64>) -> u32 {
        match bonus_product {
            Some(pid) if pid == self.product_id => self.quantity.saturating_mul(2),
            _others => self.quantity,
        }
    }
}

impl CartModel {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLineModel::amount).sum()
    }

    pub fn find_line(&self, product_id: u64) -> Option<&CartLineModel> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// copy of the lines with quantity of the bonus product doubled,
    /// the cart itself is left untouched
    pub fn adjusted_lines(&self, bonus_product: Option<u64>) -> Vec<CartLineModel> {
        self.lines
            .iter()
            .map(|l| CartLineModel {
                product_id: l.product_id,
                quantity: l.required_quantity(bonus_product),
                unit_price: l.unit_price,
            })
            .collect()
    }
}
