use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use crate::{
    dto::products::{
        CreateProductRequest, ListingFilter, ListingOptions, SortField, UpdateProductRequest,
    },
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{ManagerError, ManagerResult, StoreError},
    models::Product,
    pagination::PageResult,
    services::{
        manager::{ProductManager, parse_id},
        store::ProductStore,
    },
};

/// Postgres-backed store and manager.
pub struct OrmProducts {
    orm: DatabaseConnection,
}

impl OrmProducts {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }

    async fn find(&self, id: &str) -> ManagerResult<ProductModel> {
        let uuid = parse_id(id)?;
        Products::find_by_id(uuid)
            .one(&self.orm)
            .await?
            .ok_or_else(|| ManagerError::NotFound(id.to_string()))
    }

    async fn ensure_code_free(&self, code: &str, except: Option<Uuid>) -> ManagerResult<()> {
        let mut finder = Products::find().filter(Column::Code.eq(code));
        if let Some(id) = except {
            finder = finder.filter(Column::Id.ne(id));
        }
        if finder.one(&self.orm).await?.is_some() {
            return Err(ManagerError::DuplicateCode(code.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductStore for OrmProducts {
    async fn paginate(
        &self,
        filter: &ListingFilter,
        options: &ListingOptions,
    ) -> Result<PageResult<Product>, StoreError> {
        let mut condition = Condition::all();
        if let Some(category) = &filter.category {
            condition = condition.add(Column::Category.eq(category.clone()));
        }
        if let Some(threshold) = filter.stock_greater_than {
            // The column is INTEGER; an infinite threshold matches nothing either way.
            condition = condition.add(Column::Stock.gt(threshold.min(f64::from(i32::MAX))));
        }

        let finder = Products::find().filter(condition);
        let finder = match options.sort {
            Some(SortField::PriceAscending) => finder.order_by_asc(Column::Price),
            Some(SortField::PriceDescending) => finder.order_by_desc(Column::Price),
            None => finder.order_by_asc(Column::CreatedAt),
        };

        let total = finder.clone().count(&self.orm).await?;
        let docs = finder
            .limit(options.limit)
            .offset(options.offset())
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();

        Ok(PageResult::new(docs, total, options.page, options.limit))
    }
}

#[async_trait]
impl ProductManager for OrmProducts {
    async fn get_by_id(&self, id: &str) -> ManagerResult<Product> {
        self.find(id).await.map(product_from_entity)
    }

    async fn add(&self, data: CreateProductRequest) -> ManagerResult<Product> {
        data.validate().map_err(ManagerError::InvalidPayload)?;
        self.ensure_code_free(&data.code, None).await?;

        let code = data.code.clone();
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(data.title),
            description: Set(data.description),
            code: Set(data.code),
            price: Set(data.price),
            status: Set(data.status.unwrap_or(true)),
            stock: Set(data.stock),
            category: Set(data.category),
            thumbnail: Set(data.thumbnail),
            created_at: NotSet,
        };
        let product = active
            .insert(&self.orm)
            .await
            .map_err(|err| write_error(err, &code))?;
        Ok(product_from_entity(product))
    }

    async fn update(&self, id: &str, data: UpdateProductRequest) -> ManagerResult<Product> {
        data.validate().map_err(ManagerError::InvalidPayload)?;
        let existing = self.find(id).await?;
        if let Some(code) = &data.code {
            self.ensure_code_free(code, Some(existing.id)).await?;
        }

        let code = data.code.clone().unwrap_or_else(|| existing.code.clone());
        let mut active: ActiveModel = existing.into();
        if let Some(title) = data.title {
            active.title = Set(title);
        }
        if let Some(description) = data.description {
            active.description = Set(Some(description));
        }
        if let Some(code) = data.code {
            active.code = Set(code);
        }
        if let Some(price) = data.price {
            active.price = Set(price);
        }
        if let Some(status) = data.status {
            active.status = Set(status);
        }
        if let Some(stock) = data.stock {
            active.stock = Set(stock);
        }
        if let Some(category) = data.category {
            active.category = Set(category);
        }
        if let Some(thumbnail) = data.thumbnail {
            active.thumbnail = Set(Some(thumbnail));
        }

        let product = active
            .update(&self.orm)
            .await
            .map_err(|err| write_error(err, &code))?;
        Ok(product_from_entity(product))
    }

    async fn delete(&self, id: &str) -> ManagerResult<Product> {
        let existing = self.find(id).await?;
        let result = Products::delete_by_id(existing.id).exec(&self.orm).await?;
        if result.rows_affected == 0 {
            return Err(ManagerError::NotFound(id.to_string()));
        }
        Ok(product_from_entity(existing))
    }
}

/// The only unique column besides the key is `code`, so a unique violation
/// on write means another product took the code after the pre-check.
fn write_error(err: DbErr, code: &str) -> ManagerError {
    classify_write_error(err.sql_err(), err, code)
}

fn classify_write_error(sql_err: Option<SqlErr>, err: DbErr, code: &str) -> ManagerError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => ManagerError::DuplicateCode(code.to_string()),
        _ => ManagerError::Storage(err),
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        title: model.title,
        description: model.description,
        code: model.code,
        price: model.price,
        status: model.status,
        stock: model.stock,
        category: model.category,
        thumbnail: model.thumbnail,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
