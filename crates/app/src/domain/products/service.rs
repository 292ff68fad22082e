//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, ProductScope, ProductUpdate},
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if product.title.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
        scope: ProductScope,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if update.title.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update, &scope)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(
        &self,
        product: ProductUuid,
        scope: ProductScope,
    ) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .delete_product(&mut tx, product, &scope)
            .await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products that have not been deleted.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Replaces a product's details. Products outside `scope` are reported as not found.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
        scope: ProductScope,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft-deletes a product. Products outside `scope` are reported as not found.
    async fn delete_product(
        &self,
        product: ProductUuid,
        scope: ProductScope,
    ) -> Result<(), ProductsServiceError>;
}
