//! App Router

use salvo::Router;

use crate::{auth, carts, products, sessions, tickets, users};

/// Routes mounted under `/api`.
///
/// Registration and login are public; everything else requires a bearer token.
pub(crate) fn app_router() -> Router {
    Router::with_path("api")
        .push(
            Router::with_path("sessions")
                .push(Router::with_path("register").post(sessions::register::handler))
                .push(Router::with_path("login").post(sessions::login::handler)),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(
                    Router::with_path("sessions")
                        .push(Router::with_path("logout").post(sessions::logout::handler))
                        .push(Router::with_path("current").get(sessions::current::handler)),
                )
                .push(
                    Router::with_path("products")
                        .get(products::index::handler)
                        .post(products::create::handler)
                        .push(
                            Router::with_path("{product}")
                                .get(products::get::handler)
                                .put(products::update::handler)
                                .delete(products::delete::handler),
                        ),
                )
                .push(
                    Router::with_path("carts")
                        .get(carts::index::handler)
                        .post(carts::create::handler)
                        .push(
                            Router::with_path("{cart}")
                                .get(carts::get::handler)
                                .put(carts::replace::handler)
                                .delete(carts::clear::handler)
                                .push(Router::with_path("purchase").post(carts::purchase::handler))
                                .push(
                                    Router::with_path("products/{product}")
                                        .post(carts::add_product::handler)
                                        .put(carts::set_quantity::handler)
                                        .delete(carts::remove_product::handler),
                                ),
                        ),
                )
                .push(
                    Router::with_path("tickets")
                        .get(tickets::index::handler)
                        .push(Router::with_path("{ticket}").get(tickets::get::handler)),
                )
                .push(
                    Router::with_path("users")
                        .get(users::index::handler)
                        .delete(users::sweep::handler)
                        .push(
                            Router::with_path("premium/{user}").put(users::change_role::handler),
                        )
                        .push(
                            Router::with_path("{user}/documents")
                                .post(users::add_documents::handler),
                        ),
                ),
        )
}
