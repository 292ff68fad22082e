//! Cart reconciliation against current stock.

use tracing::debug;

use crate::domain::{
    carts::records::ResolvedCartLine, checkout::errors::CheckoutServiceError,
    products::records::ProductRecord,
};

/// Cart lines split by whether current stock covers them.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Partition {
    pub(crate) fulfillable: Vec<ResolvedCartLine>,
    pub(crate) unfulfillable: Vec<ResolvedCartLine>,
}

/// Split `lines` into fulfillable and unfulfillable sets, each keeping cart order.
///
/// A line is all-or-nothing: it is fulfillable only when its product still resolves and the
/// stock covers the full quantity.
pub(crate) fn partition(lines: Vec<ResolvedCartLine>) -> Partition {
    let (fulfillable, unfulfillable) = lines.into_iter().partition(|line| {
        line.product
            .as_ref()
            .is_some_and(|product| product.covers(line.quantity))
    });

    Partition {
        fulfillable,
        unfulfillable,
    }
}

/// Lines sorted by the outcome of their conditional stock decrement.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Settlement {
    pub(crate) purchased: Vec<ResolvedCartLine>,
    pub(crate) unprocessed: Vec<ResolvedCartLine>,
}

impl Settlement {
    /// Start from the lines that never reached the decrement.
    pub(crate) fn new(unfulfillable: Vec<ResolvedCartLine>) -> Self {
        Self {
            purchased: Vec::new(),
            unprocessed: unfulfillable,
        }
    }

    /// File `line` as purchased when the decrement returned the updated product.
    ///
    /// `None` means a concurrent purchase took the stock after partitioning; the line stays in
    /// the cart.
    pub(crate) fn record(
        &mut self,
        mut line: ResolvedCartLine,
        decremented: Option<ProductRecord>,
    ) {
        match decremented {
            Some(product) => {
                line.product = Some(product);
                self.purchased.push(line);
            }
            None => {
                debug!(
                    product = %line.product_uuid,
                    quantity = line.quantity,
                    "stock no longer covers line"
                );

                self.unprocessed.push(line);
            }
        }
    }
}

/// Sum of unit price times quantity over `lines`.
///
/// Lines without a resolved product contribute nothing.
pub(crate) fn total_amount(lines: &[ResolvedCartLine]) -> Result<u64, CheckoutServiceError> {
    lines.iter().try_fold(0_u64, |total, line| {
        let Some(product) = &line.product else {
            return Ok(total);
        };

        product
            .price
            .checked_mul(u64::from(line.quantity))
            .and_then(|subtotal| total.checked_add(subtotal))
            .filter(|total| i64::try_from(*total).is_ok())
            .ok_or(CheckoutServiceError::AmountOverflow)
    })
}

/// Merge `rejected` back into `unfulfillable` so the result follows the cart's `order`.
pub(crate) fn restore_order(
    order: &[ResolvedCartLine],
    mut unfulfillable: Vec<ResolvedCartLine>,
) -> Vec<ResolvedCartLine> {
    unfulfillable.sort_by_key(|line| {
        order
            .iter()
            .position(|ordered| ordered.product_uuid == line.product_uuid)
            .unwrap_or(usize::MAX)
    });

    unfulfillable
}
