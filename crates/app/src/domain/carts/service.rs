//! Carts service.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    auth::Identity,
    database::Db,
    domain::{
        carts::{
            data::NewCart,
            errors::CartsServiceError,
            lines,
            records::{CartLineRecord, CartRecord, CartUuid, ResolvedCart},
            repositories::{PgCartLinesRepository, PgCartsRepository},
        },
        products::{
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    lines_repository: PgCartLinesRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            lines_repository: PgCartLinesRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    /// Lock `cart`, rewrite its lines with `apply` and bump its update time.
    async fn mutate_lines<F>(&self, cart: CartUuid, apply: F) -> Result<CartRecord, CartsServiceError>
    where
        F: FnOnce(&mut Vec<CartLineRecord>) -> Result<(), CartsServiceError> + Send,
    {
        let mut tx = self.db.begin().await?;

        let updated = self.mutate_lines_in(&mut tx, cart, apply).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn mutate_lines_in<F>(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        apply: F,
    ) -> Result<CartRecord, CartsServiceError>
    where
        F: FnOnce(&mut Vec<CartLineRecord>) -> Result<(), CartsServiceError> + Send,
    {
        self.carts_repository.lock_cart(tx, cart).await?;

        let mut current = self.lines_repository.get_lines(tx, cart).await?;

        apply(&mut current)?;

        self.lines_repository
            .replace_lines(tx, cart, &current)
            .await?;

        let mut updated = self.carts_repository.touch_cart(tx, cart).await?;

        updated.lines = current;

        Ok(updated)
    }

    async fn find_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, CartsServiceError> {
        self.products_repository
            .get_product(tx, product)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => CartsServiceError::ProductNotFound,
                error => CartsServiceError::from(error),
            })
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn list_carts(&self) -> Result<Vec<CartRecord>, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut carts = self.carts_repository.list_carts(&mut tx).await?;

        let uuids: Vec<CartUuid> = carts.iter().map(|cart| cart.uuid).collect();

        let owned_lines = self.lines_repository.list_lines(&mut tx, &uuids).await?;

        tx.commit().await?;

        let mut by_cart: HashMap<CartUuid, Vec<CartLineRecord>> = HashMap::new();

        for owned in owned_lines {
            by_cart.entry(owned.cart_uuid).or_default().push(owned.line);
        }

        for cart in &mut carts {
            if let Some(lines) = by_cart.remove(&cart.uuid) {
                cart.lines = lines;
            }
        }

        Ok(carts)
    }

    async fn get_cart(&self, cart: CartUuid) -> Result<ResolvedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.carts_repository.get_cart(&mut tx, cart).await?;

        let lines = self
            .lines_repository
            .get_resolved_lines(&mut tx, cart)
            .await?;

        tx.commit().await?;

        Ok(ResolvedCart {
            uuid: record.uuid,
            lines,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    async fn create_cart(&self, cart: NewCart) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.carts_repository.create_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn add_product(
        &self,
        actor: &Identity,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.find_product(&mut tx, product).await?;

        lines::ensure_may_add(actor, &found)?;

        let updated = self
            .mutate_lines_in(&mut tx, cart, |current| lines::add_one(current, product))
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn replace_lines(
        &self,
        cart: CartUuid,
        replacement: Vec<CartLineRecord>,
    ) -> Result<CartRecord, CartsServiceError> {
        lines::validate(&replacement)?;

        let mut tx = self.db.begin().await?;

        let requested: Vec<ProductUuid> =
            replacement.iter().map(|line| line.product_uuid).collect();

        let live: HashSet<ProductUuid> = self
            .products_repository
            .list_live_product_uuids(&mut tx, &requested)
            .await?
            .into_iter()
            .collect();

        lines::ensure_all_live(&replacement, &live)?;

        let updated = self
            .mutate_lines_in(&mut tx, cart, move |current| {
                *current = replacement;

                Ok(())
            })
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn set_quantity(
        &self,
        cart: CartUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError> {
        self.mutate_lines(cart, |current| {
            lines::set_quantity(current, product, quantity)
        })
        .await
    }

    async fn remove_product(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        self.mutate_lines(cart, |current| {
            lines::remove(current, product);

            Ok(())
        })
        .await
    }

    async fn clear_cart(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError> {
        self.mutate_lines(cart, |current| {
            current.clear();

            Ok(())
        })
        .await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve every cart with its raw lines.
    async fn list_carts(&self) -> Result<Vec<CartRecord>, CartsServiceError>;

    /// Retrieve a single cart, resolving each line against the live catalog.
    async fn get_cart(&self, cart: CartUuid) -> Result<ResolvedCart, CartsServiceError>;

    /// Creates a new, empty cart.
    async fn create_cart(&self, cart: NewCart) -> Result<CartRecord, CartsServiceError>;

    /// Add one unit of `product` to `cart` on behalf of `actor`.
    async fn add_product(
        &self,
        actor: &Identity,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Replace every line of the cart.
    ///
    /// Every line must name a product that exists and is not deleted.
    async fn replace_lines(
        &self,
        cart: CartUuid,
        replacement: Vec<CartLineRecord>,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Set the quantity of an existing line.
    async fn set_quantity(
        &self,
        cart: CartUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove the line for `product`, if any.
    async fn remove_product(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Empty the cart.
    async fn clear_cart(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{products::ProductsService, users::records::Role},
        test::{
            TestContext,
            helpers::{identity, new_product},
        },
    };

    use super::*;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn create_cart_returns_empty_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = CartUuid::new();

        let cart = ctx.carts.create_cart(NewCart { uuid }).await?;

        assert_eq!(cart.uuid, uuid);
        assert!(cart.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn create_cart_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = CartUuid::new();

        ctx.carts.create_cart(NewCart { uuid }).await?;

        let result = ctx.carts.create_cart(NewCart { uuid }).await;

        assert!(
            matches!(result, Err(CartsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn get_cart_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.carts.get_cart(CartUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn adding_same_product_twice_increments_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = identity("buyer@example.com", Role::Regular);

        let product = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 1_000, 5))
            .await?;

        let cart = ctx.carts.create_cart(NewCart { uuid: CartUuid::new() }).await?;

        ctx.carts.add_product(&buyer, cart.uuid, product.uuid).await?;
        let updated = ctx.carts.add_product(&buyer, cart.uuid, product.uuid).await?;

        assert_eq!(
            updated.lines,
            vec![CartLineRecord {
                product_uuid: product.uuid,
                quantity: 2,
            }]
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn adding_unknown_product_returns_product_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = identity("buyer@example.com", Role::Regular);

        let cart = ctx.carts.create_cart(NewCart { uuid: CartUuid::new() }).await?;

        let result = ctx
            .carts
            .add_product(&buyer, cart.uuid, ProductUuid::new())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn premium_owner_cannot_add_own_product() -> TestResult {
        let ctx = TestContext::new().await;
        let seller = identity("seller@example.com", Role::Premium);

        let product = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "seller@example.com", 1_000, 5))
            .await?;

        let cart = ctx.carts.create_cart(NewCart { uuid: CartUuid::new() }).await?;

        let result = ctx.carts.add_product(&seller, cart.uuid, product.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::SelfPurchase)),
            "expected SelfPurchase, got {result:?}"
        );

        let cart = ctx.carts.get_cart(cart.uuid).await?;

        assert!(cart.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn replace_lines_keeps_order_and_resolves_products() -> TestResult {
        let ctx = TestContext::new().await;

        let first = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 100, 5))
            .await?;

        let second = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 200, 5))
            .await?;

        let cart = ctx.carts.create_cart(NewCart { uuid: CartUuid::new() }).await?;

        let replacement = vec![
            CartLineRecord {
                product_uuid: second.uuid,
                quantity: 3,
            },
            CartLineRecord {
                product_uuid: first.uuid,
                quantity: 1,
            },
        ];

        let updated = ctx
            .carts
            .replace_lines(cart.uuid, replacement.clone())
            .await?;

        assert_eq!(updated.lines, replacement);

        let resolved = ctx.carts.get_cart(cart.uuid).await?;
        let products: Vec<Option<ProductUuid>> = resolved
            .lines
            .iter()
            .map(|line| line.product.as_ref().map(|product| product.uuid))
            .collect();

        assert_eq!(products, vec![Some(second.uuid), Some(first.uuid)]);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn replace_lines_with_unknown_product_is_invalid_reference() -> TestResult {
        let ctx = TestContext::new().await;

        let cart = ctx.carts.create_cart(NewCart { uuid: CartUuid::new() }).await?;

        let result = ctx
            .carts
            .replace_lines(
                cart.uuid,
                vec![CartLineRecord {
                    product_uuid: ProductUuid::new(),
                    quantity: 1,
                }],
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn replace_lines_with_deleted_product_is_invalid_reference() -> TestResult {
        let ctx = TestContext::new().await;

        let kept = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 100, 5))
            .await?;

        let withdrawn = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 100, 5))
            .await?;

        ctx.products
            .delete_product(withdrawn.uuid, crate::domain::products::data::ProductScope::Any)
            .await?;

        let cart = ctx.carts.create_cart(NewCart { uuid: CartUuid::new() }).await?;

        let result = ctx
            .carts
            .replace_lines(
                cart.uuid,
                vec![
                    CartLineRecord {
                        product_uuid: kept.uuid,
                        quantity: 1,
                    },
                    CartLineRecord {
                        product_uuid: withdrawn.uuid,
                        quantity: 1,
                    },
                ],
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        assert!(ctx.carts.get_cart(cart.uuid).await?.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn deleted_product_resolves_to_none() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = identity("buyer@example.com", Role::Regular);

        let product = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 100, 5))
            .await?;

        let cart = ctx.carts.create_cart(NewCart { uuid: CartUuid::new() }).await?;

        ctx.carts.add_product(&buyer, cart.uuid, product.uuid).await?;

        ctx.products
            .delete_product(product.uuid, crate::domain::products::data::ProductScope::Any)
            .await?;

        let resolved = ctx.carts.get_cart(cart.uuid).await?;

        assert_eq!(resolved.lines.len(), 1);
        assert!(resolved.lines[0].product.is_none());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn set_quantity_remove_and_clear() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = identity("buyer@example.com", Role::Regular);

        let kept = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 100, 5))
            .await?;

        let removed = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 100, 5))
            .await?;

        let cart = ctx.carts.create_cart(NewCart { uuid: CartUuid::new() }).await?;

        ctx.carts.add_product(&buyer, cart.uuid, kept.uuid).await?;
        ctx.carts.add_product(&buyer, cart.uuid, removed.uuid).await?;

        let updated = ctx.carts.set_quantity(cart.uuid, kept.uuid, 4).await?;

        assert_eq!(updated.lines[0].quantity, 4);

        let missing = ctx.carts.set_quantity(cart.uuid, ProductUuid::new(), 4).await;

        assert!(
            matches!(missing, Err(CartsServiceError::LineNotFound)),
            "expected LineNotFound, got {missing:?}"
        );

        let updated = ctx.carts.remove_product(cart.uuid, removed.uuid).await?;

        assert_eq!(
            updated.lines,
            vec![CartLineRecord {
                product_uuid: kept.uuid,
                quantity: 4,
            }]
        );

        let cleared = ctx.carts.clear_cart(cart.uuid).await?;

        assert!(cleared.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn mutating_unknown_cart_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.carts.clear_cart(CartUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
