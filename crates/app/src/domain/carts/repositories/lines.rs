//! Cart Lines Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::try_get_quantity,
    domain::{
        carts::records::{CartLineRecord, CartUuid, ResolvedCartLine},
        products::records::{ProductRecord, ProductUuid},
    },
};

const GET_CART_LINES_SQL: &str = include_str!("../sql/get_cart_lines.sql");
const LIST_CART_LINES_SQL: &str = include_str!("../sql/list_cart_lines.sql");
const GET_RESOLVED_CART_LINES_SQL: &str = include_str!("../sql/get_resolved_cart_lines.sql");
const DELETE_CART_LINES_SQL: &str = include_str!("../sql/delete_cart_lines.sql");
const INSERT_CART_LINES_SQL: &str = include_str!("../sql/insert_cart_lines.sql");

/// A line together with the cart it belongs to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OwnedCartLine {
    pub(crate) cart_uuid: CartUuid,
    pub(crate) line: CartLineRecord,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartLineRecord>, sqlx::Error> {
        let lines = query_as::<Postgres, OwnedCartLine>(GET_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(lines.into_iter().map(|owned| owned.line).collect())
    }

    pub(crate) async fn list_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        carts: &[CartUuid],
    ) -> Result<Vec<OwnedCartLine>, sqlx::Error> {
        let uuids: Vec<Uuid> = carts.iter().map(|cart| cart.into_uuid()).collect();

        query_as::<Postgres, OwnedCartLine>(LIST_CART_LINES_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_resolved_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<ResolvedCartLine>, sqlx::Error> {
        query_as::<Postgres, ResolvedCartLine>(GET_RESOLVED_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Replace every line of `cart` with `lines`, keeping their order.
    pub(crate) async fn replace_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        lines: &[CartLineRecord],
    ) -> Result<(), sqlx::Error> {
        query(DELETE_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?;

        if lines.is_empty() {
            return Ok(());
        }

        let (products, quantities): (Vec<Uuid>, Vec<i64>) = lines
            .iter()
            .map(|line| (line.product_uuid.into_uuid(), i64::from(line.quantity)))
            .unzip();

        query(INSERT_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .bind(products)
            .bind(quantities)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for OwnedCartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            line: CartLineRecord {
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                quantity: try_get_quantity(row, "quantity")?,
            },
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ResolvedCartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        // Product columns are all NULL when the LEFT JOIN found no live product.
        let product = match row.try_get::<Option<Uuid>, _>("uuid")? {
            Some(_) => Some(ProductRecord::from_row(row)?),
            None => None,
        };

        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("line_product_uuid")?),
            quantity: try_get_quantity(row, "line_quantity")?,
            product,
        })
    }
}
