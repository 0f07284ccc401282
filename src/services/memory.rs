use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    dto::products::{
        CreateProductRequest, ListingFilter, ListingOptions, SortField, UpdateProductRequest,
    },
    error::{ManagerError, ManagerResult, StoreError},
    models::Product,
    pagination::PageResult,
    services::{
        manager::{ProductManager, parse_id},
        store::ProductStore,
    },
};

/// Process-local catalogue kept in insertion order.
#[derive(Default)]
pub struct MemoryProducts {
    items: RwLock<Vec<Product>>,
}

impl MemoryProducts {
    pub fn new() -> Self {
        Self::default()
    }
}

fn code_taken(items: &[Product], code: &str, except: Option<Uuid>) -> bool {
    items
        .iter()
        .any(|p| p.code == code && Some(p.id) != except)
}

#[async_trait]
impl ProductStore for MemoryProducts {
    async fn paginate(
        &self,
        filter: &ListingFilter,
        options: &ListingOptions,
    ) -> Result<PageResult<Product>, StoreError> {
        let items = self.items.read().await;
        let mut matching: Vec<&Product> = items
            .iter()
            .filter(|p| filter.category.as_ref().is_none_or(|c| &p.category == c))
            .filter(|p| {
                filter
                    .stock_greater_than
                    .is_none_or(|threshold| f64::from(p.stock) > threshold)
            })
            .collect();

        match options.sort {
            Some(SortField::PriceAscending) => matching.sort_by_key(|p| p.price),
            Some(SortField::PriceDescending) => matching.sort_by_key(|p| std::cmp::Reverse(p.price)),
            None => {}
        }

        let total = matching.len() as u64;
        let docs = matching
            .into_iter()
            .skip(options.offset() as usize)
            .take(options.limit as usize)
            .cloned()
            .collect();

        Ok(PageResult::new(docs, total, options.page, options.limit))
    }
}

#[async_trait]
impl ProductManager for MemoryProducts {
    async fn get_by_id(&self, id: &str) -> ManagerResult<Product> {
        let uuid = parse_id(id)?;
        self.items
            .read()
            .await
            .iter()
            .find(|p| p.id == uuid)
            .cloned()
            .ok_or_else(|| ManagerError::NotFound(id.to_string()))
    }

    async fn add(&self, data: CreateProductRequest) -> ManagerResult<Product> {
        data.validate().map_err(ManagerError::InvalidPayload)?;
        let mut items = self.items.write().await;
        if code_taken(&items, &data.code, None) {
            return Err(ManagerError::DuplicateCode(data.code));
        }

        let product = Product {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            code: data.code,
            price: data.price,
            status: data.status.unwrap_or(true),
            stock: data.stock,
            category: data.category,
            thumbnail: data.thumbnail,
            created_at: Utc::now(),
        };
        items.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: &str, data: UpdateProductRequest) -> ManagerResult<Product> {
        data.validate().map_err(ManagerError::InvalidPayload)?;
        let uuid = parse_id(id)?;
        let mut items = self.items.write().await;
        if let Some(code) = data.code.as_deref().filter(|c| code_taken(&items, c, Some(uuid))) {
            return Err(ManagerError::DuplicateCode(code.to_string()));
        }
        let product = items
            .iter_mut()
            .find(|p| p.id == uuid)
            .ok_or_else(|| ManagerError::NotFound(id.to_string()))?;

        if let Some(title) = data.title {
            product.title = title;
        }
        if let Some(description) = data.description {
            product.description = Some(description);
        }
        if let Some(code) = data.code {
            product.code = code;
        }
        if let Some(price) = data.price {
            product.price = price;
        }
        if let Some(status) = data.status {
            product.status = status;
        }
        if let Some(stock) = data.stock {
            product.stock = stock;
        }
        if let Some(category) = data.category {
            product.category = category;
        }
        if let Some(thumbnail) = data.thumbnail {
            product.thumbnail = Some(thumbnail);
        }
        Ok(product.clone())
    }

    async fn delete(&self, id: &str) -> ManagerResult<Product> {
        let uuid = parse_id(id)?;
        let mut items = self.items.write().await;
        let index = items
            .iter()
            .position(|p| p.id == uuid)
            .ok_or_else(|| ManagerError::NotFound(id.to_string()))?;
        Ok(items.remove(index))
    }
}
