//! Pure transformations over a cart's line list.
//!
//! Every cart mutation reads the full list, applies one of these functions and writes the
//! whole list back, so the rules live here rather than in SQL.

use std::collections::HashSet;

use crate::{
    auth::Identity,
    domain::{
        carts::{errors::CartsServiceError, records::CartLineRecord},
        products::records::{ProductRecord, ProductUuid},
        users::records::Role,
    },
};

/// Premium sellers may not put their own products in a cart.
pub(crate) fn ensure_may_add(
    actor: &Identity,
    product: &ProductRecord,
) -> Result<(), CartsServiceError> {
    if actor.role == Role::Premium && product.owner == actor.email {
        return Err(CartsServiceError::SelfPurchase);
    }

    Ok(())
}

/// Add one unit of `product`, appending a new line when none exists.
pub(crate) fn add_one(
    lines: &mut Vec<CartLineRecord>,
    product: ProductUuid,
) -> Result<(), CartsServiceError> {
    if let Some(line) = lines.iter_mut().find(|line| line.product_uuid == product) {
        line.quantity = line
            .quantity
            .checked_add(1)
            .ok_or(CartsServiceError::InvalidQuantity)?;

        return Ok(());
    }

    lines.push(CartLineRecord {
        product_uuid: product,
        quantity: 1,
    });

    Ok(())
}

pub(crate) fn set_quantity(
    lines: &mut [CartLineRecord],
    product: ProductUuid,
    quantity: u32,
) -> Result<(), CartsServiceError> {
    if quantity == 0 {
        return Err(CartsServiceError::InvalidQuantity);
    }

    let line = lines
        .iter_mut()
        .find(|line| line.product_uuid == product)
        .ok_or(CartsServiceError::LineNotFound)?;

    line.quantity = quantity;

    Ok(())
}

/// Drop the line for `product`. Removing an absent line leaves the list as it was.
pub(crate) fn remove(lines: &mut Vec<CartLineRecord>, product: ProductUuid) {
    lines.retain(|line| line.product_uuid != product);
}

/// Check a full replacement list before it is written.
pub(crate) fn validate(lines: &[CartLineRecord]) -> Result<(), CartsServiceError> {
    let mut seen = HashSet::with_capacity(lines.len());

    for line in lines {
        if line.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        if !seen.insert(line.product_uuid) {
            return Err(CartsServiceError::DuplicateLine);
        }
    }

    Ok(())
}

/// Every line must point at a product that is still listed.
pub(crate) fn ensure_all_live(
    lines: &[CartLineRecord],
    live: &HashSet<ProductUuid>,
) -> Result<(), CartsServiceError> {
    if lines.iter().all(|line| live.contains(&line.product_uuid)) {
        Ok(())
    } else {
        Err(CartsServiceError::InvalidReference)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use crate::domain::{carts::records::CartUuid, users::records::UserUuid};

    use super::*;

    fn line(product_uuid: ProductUuid, quantity: u32) -> CartLineRecord {
        CartLineRecord {
            product_uuid,
            quantity,
        }
    }

    fn identity(email: &str, role: Role) -> Identity {
        Identity {
            user_uuid: UserUuid::new(),
            email: email.to_string(),
            role,
            cart_uuid: Some(CartUuid::new()),
        }
    }

    fn product_owned_by(owner: &str) -> ProductRecord {
        ProductRecord {
            uuid: ProductUuid::new(),
            title: "Yerba".to_string(),
            description: String::new(),
            price: 2_000,
            stock: 10,
            owner: owner.to_string(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }

    #[test]
    fn adding_a_new_product_appends_a_single_unit() -> Result<(), CartsServiceError> {
        let existing = ProductUuid::new();
        let added = ProductUuid::new();
        let mut lines = vec![line(existing, 2)];

        add_one(&mut lines, added)?;

        assert_eq!(lines, vec![line(existing, 2), line(added, 1)]);

        Ok(())
    }

    #[test]
    fn adding_the_same_product_twice_increments_its_line() -> Result<(), CartsServiceError> {
        let product = ProductUuid::new();
        let mut lines = Vec::new();

        add_one(&mut lines, product)?;
        add_one(&mut lines, product)?;

        assert_eq!(lines, vec![line(product, 2)]);

        Ok(())
    }

    #[test]
    fn adding_past_the_quantity_limit_is_rejected() {
        let product = ProductUuid::new();
        let mut lines = vec![line(product, u32::MAX)];

        let result = add_one(&mut lines, product);

        assert!(matches!(result, Err(CartsServiceError::InvalidQuantity)));
        assert_eq!(lines, vec![line(product, u32::MAX)]);
    }

    #[test]
    fn set_quantity_replaces_the_existing_value() -> Result<(), CartsServiceError> {
        let product = ProductUuid::new();
        let mut lines = vec![line(product, 1)];

        set_quantity(&mut lines, product, 7)?;

        assert_eq!(lines, vec![line(product, 7)]);

        Ok(())
    }

    #[test]
    fn set_quantity_on_absent_line_is_not_found() {
        let mut lines = vec![line(ProductUuid::new(), 1)];

        let result = set_quantity(&mut lines, ProductUuid::new(), 3);

        assert!(matches!(result, Err(CartsServiceError::LineNotFound)));
    }

    #[test]
    fn set_quantity_to_zero_is_rejected() {
        let product = ProductUuid::new();
        let mut lines = vec![line(product, 4)];

        let result = set_quantity(&mut lines, product, 0);

        assert!(matches!(result, Err(CartsServiceError::InvalidQuantity)));
        assert_eq!(lines, vec![line(product, 4)]);
    }

    #[test]
    fn remove_filters_only_the_matching_line() {
        let kept = ProductUuid::new();
        let removed = ProductUuid::new();
        let mut lines = vec![line(removed, 1), line(kept, 3)];

        remove(&mut lines, removed);
        remove(&mut lines, ProductUuid::new());

        assert_eq!(lines, vec![line(kept, 3)]);
    }

    #[test]
    fn validate_rejects_zero_quantities_and_duplicates() {
        let product = ProductUuid::new();

        assert!(validate(&[line(product, 1), line(ProductUuid::new(), 5)]).is_ok());
        assert!(validate(&[]).is_ok());
        assert!(matches!(
            validate(&[line(product, 0)]),
            Err(CartsServiceError::InvalidQuantity)
        ));
        assert!(matches!(
            validate(&[line(product, 1), line(product, 2)]),
            Err(CartsServiceError::DuplicateLine)
        ));
    }

    #[test]
    fn premium_owner_cannot_add_own_product() {
        let seller = identity("seller@example.com", Role::Premium);

        let result = ensure_may_add(&seller, &product_owned_by("seller@example.com"));

        assert!(matches!(result, Err(CartsServiceError::SelfPurchase)));
    }

    #[test]
    fn other_combinations_may_add() {
        let own = product_owned_by("seller@example.com");

        assert!(ensure_may_add(&identity("seller@example.com", Role::Regular), &own).is_ok());
        assert!(ensure_may_add(&identity("seller@example.com", Role::Admin), &own).is_ok());
        assert!(ensure_may_add(&identity("buyer@example.com", Role::Premium), &own).is_ok());
    }

    #[test]
    fn replacement_naming_an_unlisted_product_is_invalid_reference() {
        let listed = ProductUuid::new();
        let withdrawn = ProductUuid::new();
        let live = HashSet::from([listed]);

        assert!(ensure_all_live(&[line(listed, 2)], &live).is_ok());
        assert!(ensure_all_live(&[], &live).is_ok());
        assert!(matches!(
            ensure_all_live(&[line(listed, 2), line(withdrawn, 1)], &live),
            Err(CartsServiceError::InvalidReference)
        ));
    }
}
