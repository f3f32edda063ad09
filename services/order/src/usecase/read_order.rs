use std::boxed::Box;
use std::result::Result as DefaultResult;

use crate::api::dto::{OrderDetailDto, OrderPageDto};
use crate::error::AppError;
use crate::repository::AbsOrderReadRepo;

#[derive(Debug)]
pub enum FetchOrderUcError {
    OrderNotFound,
    DataStore(AppError),
}

impl From<AppError> for FetchOrderUcError {
    fn from(value: AppError) -> Self {
        Self::DataStore(value)
    }
}

pub struct FetchOrderDetailUseCase {
    pub repo: Box<dyn AbsOrderReadRepo>,
}

pub struct FetchOrderPageUseCase {
    pub repo: Box<dyn AbsOrderReadRepo>,
    pub max_page_size: u16,
}

impl FetchOrderDetailUseCase {
    pub async fn execute(
        self,
        usr_id: u32,
        oid: String,
    ) -> DefaultResult<OrderDetailDto, FetchOrderUcError> {
        let order = self
            .repo
            .fetch_detail(usr_id, oid.as_str())
            .await?
            .ok_or(FetchOrderUcError::OrderNotFound)?;
        Ok(OrderDetailDto::from(order))
    }
}

impl FetchOrderPageUseCase {
    /// page number starts from 1, zero is treated as the first page. Page
    /// size is limited to the configured maximum.
    pub async fn execute(
        self,
        usr_id: u32,
        page: u32,
        page_size: u32,
    ) -> DefaultResult<OrderPageDto, FetchOrderUcError> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, self.max_page_size.max(1) as u32);
        let saved = self.repo.fetch_page(usr_id, page, page_size).await?;
        Ok(OrderPageDto::from(saved))
    }
}
