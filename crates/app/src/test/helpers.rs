//! Test Helpers

use zeroize::Zeroizing;

use crate::{
    auth::Identity,
    domain::{
        carts::records::CartUuid,
        products::{data::NewProduct, records::ProductUuid},
        users::{
            data::NewUser,
            records::{Role, UserUuid},
        },
    },
};

pub(crate) fn new_product(uuid: ProductUuid, owner: &str, price: u64, stock: u64) -> NewProduct {
    NewProduct {
        uuid,
        title: format!("Product {uuid}"),
        description: String::new(),
        price,
        stock,
        owner: owner.to_string(),
    }
}

pub(crate) fn new_user(email: &str, password: &str) -> NewUser {
    NewUser {
        uuid: UserUuid::new(),
        first_name: "Ana".to_string(),
        last_name: "Diaz".to_string(),
        email: email.to_string(),
        age: 30,
        password: Zeroizing::new(password.to_string()),
    }
}

/// An identity that was never persisted; enough for rules that only read its fields.
pub(crate) fn identity(email: &str, role: Role) -> Identity {
    Identity {
        user_uuid: UserUuid::new(),
        email: email.to_string(),
        role,
        cart_uuid: Some(CartUuid::new()),
    }
}
