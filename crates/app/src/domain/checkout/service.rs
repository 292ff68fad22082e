//! Checkout service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::Identity,
    database::Db,
    domain::{
        carts::{
            records::{CartLineRecord, CartUuid},
            repositories::{PgCartLinesRepository, PgCartsRepository},
        },
        checkout::{
            errors::CheckoutServiceError,
            reconcile::{Settlement, partition, restore_order, total_amount},
            records::PurchaseOutcome,
        },
        products::repository::PgProductsRepository,
        tickets::{records::TicketUuid, repository::PgTicketsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCheckoutService {
    db: Db,
    carts_repository: PgCartsRepository,
    lines_repository: PgCartLinesRepository,
    products_repository: PgProductsRepository,
    tickets_repository: PgTicketsRepository,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            lines_repository: PgCartLinesRepository::new(),
            products_repository: PgProductsRepository::new(),
            tickets_repository: PgTicketsRepository::new(),
        }
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    async fn purchase(
        &self,
        cart: CartUuid,
        purchaser: &Identity,
    ) -> Result<PurchaseOutcome, CheckoutServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository.lock_cart(&mut tx, cart).await?;

        let lines = self
            .lines_repository
            .get_resolved_lines(&mut tx, cart)
            .await?;

        let order = lines.clone();
        let candidates = partition(lines);

        let mut settlement = Settlement::new(candidates.unfulfillable);

        for line in candidates.fulfillable {
            let decremented = self
                .products_repository
                .try_decrement_stock(&mut tx, line.product_uuid, line.quantity)
                .await?;

            settlement.record(line, decremented);
        }

        let Settlement {
            purchased,
            unprocessed,
        } = settlement;

        if purchased.is_empty() {
            return Err(CheckoutServiceError::NoItemsProcessable);
        }

        let unprocessed = restore_order(&order, unprocessed);
        let amount = total_amount(&purchased)?;

        let ticket = self
            .tickets_repository
            .create_ticket(&mut tx, TicketUuid::new(), amount, &purchaser.email)
            .await?;

        let residue: Vec<CartLineRecord> = unprocessed.iter().map(|line| line.line()).collect();

        self.lines_repository
            .replace_lines(&mut tx, cart, &residue)
            .await?;

        self.carts_repository.touch_cart(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(PurchaseOutcome {
            purchased,
            unprocessed,
            ticket,
        })
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Purchase every line of `cart` that current stock covers.
    ///
    /// Purchased lines leave the cart and their stock is decremented; the rest stay in the cart
    /// untouched. Nothing changes when no line can be purchased.
    async fn purchase(
        &self,
        cart: CartUuid,
        purchaser: &Identity,
    ) -> Result<PurchaseOutcome, CheckoutServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::{CartsService, data::NewCart},
            products::{ProductsService, records::ProductUuid},
            tickets::TicketsService,
            users::records::Role,
        },
        test::{
            TestContext,
            helpers::{identity, new_product},
        },
    };

    use super::*;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn purchase_fulfils_covered_lines_and_keeps_the_rest() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = identity("buyer@example.com", Role::Regular);

        let a = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 1_000, 5))
            .await?;

        let b = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 700, 1))
            .await?;

        let cart = ctx.carts.create_cart(NewCart { uuid: CartUuid::new() }).await?;

        let line_a = CartLineRecord {
            product_uuid: a.uuid,
            quantity: 3,
        };
        let line_b = CartLineRecord {
            product_uuid: b.uuid,
            quantity: 2,
        };

        ctx.carts
            .replace_lines(cart.uuid, vec![line_a, line_b])
            .await?;

        let outcome = ctx.checkout.purchase(cart.uuid, &buyer).await?;

        let purchased: Vec<CartLineRecord> = outcome.purchased.iter().map(|l| l.line()).collect();
        let unprocessed: Vec<CartLineRecord> =
            outcome.unprocessed.iter().map(|l| l.line()).collect();

        assert_eq!(purchased, vec![line_a]);
        assert_eq!(unprocessed, vec![line_b]);
        assert_eq!(outcome.ticket.amount, 3_000);
        assert_eq!(outcome.ticket.purchaser, "buyer@example.com");

        assert_eq!(ctx.products.get_product(a.uuid).await?.stock, 2);
        assert_eq!(ctx.products.get_product(b.uuid).await?.stock, 1);

        let residue: Vec<CartLineRecord> = ctx
            .carts
            .get_cart(cart.uuid)
            .await?
            .lines
            .iter()
            .map(|l| l.line())
            .collect();

        assert_eq!(residue, vec![line_b]);

        let stored = ctx.tickets.get_ticket(outcome.ticket.uuid).await?;

        assert_eq!(stored, outcome.ticket);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn second_purchase_has_nothing_to_process() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = identity("buyer@example.com", Role::Regular);

        let product = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 1_000, 5))
            .await?;

        let cart = ctx.carts.create_cart(NewCart { uuid: CartUuid::new() }).await?;

        ctx.carts.add_product(&buyer, cart.uuid, product.uuid).await?;

        ctx.checkout.purchase(cart.uuid, &buyer).await?;

        let result = ctx.checkout.purchase(cart.uuid, &buyer).await;

        assert!(
            matches!(result, Err(CheckoutServiceError::NoItemsProcessable)),
            "expected NoItemsProcessable, got {result:?}"
        );

        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 4);
        assert_eq!(ctx.tickets.list_tickets("buyer@example.com").await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn nothing_processable_leaves_everything_unchanged() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = identity("buyer@example.com", Role::Regular);

        let product = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 1_000, 1))
            .await?;

        let cart = ctx.carts.create_cart(NewCart { uuid: CartUuid::new() }).await?;

        let line = CartLineRecord {
            product_uuid: product.uuid,
            quantity: 2,
        };

        ctx.carts.replace_lines(cart.uuid, vec![line]).await?;

        let result = ctx.checkout.purchase(cart.uuid, &buyer).await;

        assert!(
            matches!(result, Err(CheckoutServiceError::NoItemsProcessable)),
            "expected NoItemsProcessable, got {result:?}"
        );

        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 1);
        assert!(ctx.tickets.list_tickets("buyer@example.com").await?.is_empty());

        let lines: Vec<CartLineRecord> = ctx
            .carts
            .get_cart(cart.uuid)
            .await?
            .lines
            .iter()
            .map(|l| l.line())
            .collect();

        assert_eq!(lines, vec![line]);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn purchasing_unknown_cart_returns_not_found() {
        let ctx = TestContext::new().await;
        let buyer = identity("buyer@example.com", Role::Regular);

        let result = ctx.checkout.purchase(CartUuid::new(), &buyer).await;

        assert!(
            matches!(result, Err(CheckoutServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn deleted_products_stay_in_the_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = identity("buyer@example.com", Role::Regular);

        let kept = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 100, 5))
            .await?;

        let deleted = ctx
            .products
            .create_product(new_product(ProductUuid::new(), "admin", 100, 5))
            .await?;

        let cart = ctx.carts.create_cart(NewCart { uuid: CartUuid::new() }).await?;

        ctx.carts.add_product(&buyer, cart.uuid, deleted.uuid).await?;
        ctx.carts.add_product(&buyer, cart.uuid, kept.uuid).await?;

        ctx.products
            .delete_product(deleted.uuid, crate::domain::products::data::ProductScope::Any)
            .await?;

        let outcome = ctx.checkout.purchase(cart.uuid, &buyer).await?;

        assert_eq!(outcome.purchased.len(), 1);
        assert_eq!(outcome.unprocessed.len(), 1);
        assert_eq!(outcome.unprocessed[0].product_uuid, deleted.uuid);
        assert!(outcome.unprocessed[0].product.is_none());
        assert_eq!(outcome.ticket.amount, 100);

        Ok(())
    }
}
