//! Purchase Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::warn;
use uuid::Uuid;

use storefront_app::{
    domain::{
        carts::records::CartUuid,
        checkout::{CheckoutServiceError, records::PurchaseOutcome},
    },
    notifications::{PurchaseReceipt, ReceiptLine},
};

use crate::{
    carts::{errors::checkout_status_error, models::PurchaseResponse},
    extensions::*,
    observability::{CheckoutOutcome, observe_purchase},
    state::State,
};

fn receipt(outcome: &PurchaseOutcome) -> PurchaseReceipt {
    PurchaseReceipt {
        ticket: outcome.ticket.uuid.to_string(),
        amount: outcome.ticket.amount,
        lines: outcome
            .purchased
            .iter()
            .filter_map(|line| {
                line.product.as_ref().map(|product| ReceiptLine {
                    title: product.title.clone(),
                    quantity: line.quantity,
                    unit_price: product.price,
                })
            })
            .collect(),
    }
}

/// Purchase Cart Handler
///
/// Buys every line the current stock covers and issues a ticket for them. Lines that could not
/// be bought stay in the cart and are listed as unprocessed.
#[endpoint(
    tags("carts"),
    summary = "Purchase Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Purchase completed, possibly partially"),
        (status_code = StatusCode::BAD_REQUEST, description = "No items in the cart could be processed"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.purchase",
    skip(cart, depot),
    fields(
        cart_uuid = tracing::field::Empty,
        ticket_uuid = tracing::field::Empty,
        unprocessed = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PurchaseResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.identity_or_401()?;

    let cart = CartUuid::from_uuid(cart.into_inner());
    let span = tracing::Span::current();

    span.record("cart_uuid", tracing::field::display(cart));

    let outcome = match state.app.checkout.purchase(cart, caller).await {
        Ok(outcome) => outcome,
        Err(error) => {
            if matches!(error, CheckoutServiceError::NoItemsProcessable) {
                observe_purchase(CheckoutOutcome::Rejected);
            }

            return Err(checkout_status_error(error));
        }
    };

    span.record("ticket_uuid", tracing::field::display(outcome.ticket.uuid));
    span.record("unprocessed", outcome.unprocessed.len());

    observe_purchase(if outcome.unprocessed.is_empty() {
        CheckoutOutcome::Complete
    } else {
        CheckoutOutcome::Partial
    });

    if let Err(error) = state
        .app
        .notifier
        .send_purchase_receipt(&caller.email, &receipt(&outcome))
        .await
    {
        warn!(ticket = %outcome.ticket.uuid, "failed to send purchase receipt: {error}");
    }

    Ok(Json(outcome.into()))
}
