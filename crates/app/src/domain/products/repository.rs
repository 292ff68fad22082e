//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{bind_amount, try_get_amount},
    domain::products::{
        data::{NewProduct, ProductScope, ProductUpdate},
        records::{ProductRecord, ProductUuid},
    },
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const LIST_LIVE_PRODUCT_UUIDS_SQL: &str = include_str!("sql/list_live_product_uuids.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.title)
            .bind(&product.description)
            .bind(bind_amount(product.price)?)
            .bind(bind_amount(product.stock)?)
            .bind(&product.owner)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: &ProductUpdate,
        scope: &ProductScope,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(&update.title)
            .bind(&update.description)
            .bind(bind_amount(update.price)?)
            .bind(bind_amount(update.stock)?)
            .bind(scope.owner())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        scope: &ProductScope,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(scope.owner())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// The subset of `products` that exist and are not soft deleted.
    pub(crate) async fn list_live_product_uuids(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductUuid>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|product| product.into_uuid()).collect();

        let live: Vec<Uuid> = query_scalar::<Postgres, Uuid>(LIST_LIVE_PRODUCT_UUIDS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        Ok(live.into_iter().map(ProductUuid::from_uuid).collect())
    }

    /// Atomically take `quantity` units out of stock.
    ///
    /// Returns `None` when the product is gone or its stock no longer covers the quantity.
    pub(crate) async fn try_decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            price: try_get_amount(row, "price")?,
            stock: try_get_amount(row, "stock")?,
            owner: row.try_get("owner")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
