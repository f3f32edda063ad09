#[derive(Debug, Clone, PartialEq)]
pub struct ProductStockModel {
    pub store_id: u32,
    pub product_id: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockShortageModel {
    pub product_id: u64,
    pub required: u32,
    pub available: u32,
}

impl ProductStockModel {
    pub fn check_cover(&self, required: u32) -> Result<(), StockShortageModel> {
        if self.quantity >= required {
            Ok(())
        } else {
            Err(StockShortageModel {
                product_id: self.product_id,
                required,
                available: self.quantity,
            })
        }
    }

    pub fn try_deduct(&mut self, amount: u32) -> Result<(), StockShortageModel> {
        self.check_cover(amount)?;
        self.quantity -= amount;
        Ok(())
    }

    pub fn restore(&mut self, amount: u32) {
        self.quantity = self.quantity.saturating_add(amount);
    }
}
