//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use storefront_app::{
    auth::{Identity, MockAuthService},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            records::{CartLineRecord, CartRecord, CartUuid, ResolvedCartLine},
        },
        checkout::MockCheckoutService,
        products::{
            MockProductsService,
            records::{ADMIN_OWNER, ProductRecord, ProductUuid},
        },
        tickets::{
            MockTicketsService,
            records::{TicketRecord, TicketUuid},
        },
        users::{
            MockUsersService,
            records::{Role, UserRecord, UserStatus, UserUuid},
            sweep::MockAccountSweeper,
        },
    },
    notifications::MockNotifier,
};

use crate::{errors, state::State};

/// Service mocks; any call without a matching expectation fails the test.
#[derive(Default)]
pub(crate) struct TestApp {
    pub(crate) products: MockProductsService,
    pub(crate) carts: MockCartsService,
    pub(crate) checkout: MockCheckoutService,
    pub(crate) tickets: MockTicketsService,
    pub(crate) users: MockUsersService,
    pub(crate) auth: MockAuthService,
    pub(crate) notifier: MockNotifier,
    pub(crate) sweeper: MockAccountSweeper,
}

impl TestApp {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            checkout: Arc::new(self.checkout),
            tickets: Arc::new(self.tickets),
            users: Arc::new(self.users),
            auth: Arc::new(self.auth),
            notifier: Arc::new(self.notifier),
            sweeper: Arc::new(self.sweeper),
        })
    }

    /// Serve `route` with these mocks, authenticated as `caller` when given.
    pub(crate) fn service(self, caller: Option<Identity>, route: Router) -> Service {
        let mut router = Router::new().hoop(inject(self.into_state()));

        if let Some(caller) = caller {
            router = router.hoop(inject(caller));
        }

        errors::service(router.push(route))
    }
}

pub(crate) fn identity(email: &str, role: Role) -> Identity {
    Identity {
        user_uuid: UserUuid::new(),
        email: email.to_string(),
        role,
        cart_uuid: Some(CartUuid::new()),
    }
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        title: "Yerba mate".to_string(),
        description: "1kg bag".to_string(),
        price: 1_500,
        stock: 10,
        owner: ADMIN_OWNER.to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_cart(uuid: CartUuid, lines: Vec<CartLineRecord>) -> CartRecord {
    CartRecord {
        uuid,
        lines,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn resolved_line(product: ProductRecord, quantity: u32) -> ResolvedCartLine {
    ResolvedCartLine {
        product_uuid: product.uuid,
        quantity,
        product: Some(product),
    }
}

pub(crate) fn make_ticket(purchaser: &str, amount: u64) -> TicketRecord {
    TicketRecord {
        uuid: TicketUuid::new(),
        amount,
        purchaser: purchaser.to_string(),
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_user(email: &str, role: Role, status: UserStatus) -> UserRecord {
    UserRecord {
        uuid: UserUuid::new(),
        first_name: "Ana".to_string(),
        last_name: "Diaz".to_string(),
        email: email.to_string(),
        age: 30,
        role,
        status,
        cart_uuid: Some(CartUuid::new()),
        documents: Vec::new(),
        last_connection: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
