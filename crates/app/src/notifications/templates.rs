//! HTML bodies for outbound mail.

use crate::notifications::PurchaseReceipt;

pub const PURCHASE_SUBJECT: &str = "Your purchase";
pub const ACCOUNT_DELETED_SUBJECT: &str = "Your account was deleted";

/// Escape text for inclusion in HTML element content or attribute values.
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }

    escaped
}

/// Format cents as a decimal amount, e.g. `1234` as `12.34`.
#[must_use]
pub fn format_amount(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

#[must_use]
pub fn purchase_receipt(receipt: &PurchaseReceipt) -> String {
    let mut rows = String::new();

    for line in &receipt.lines {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&line.title),
            line.quantity,
            format_amount(line.unit_price),
        ));
    }

    format!(
        "<!DOCTYPE html>\
         <html><body>\
         <h1>Thank you for your purchase</h1>\
         <p>Ticket {}</p>\
         <table>\
         <thead><tr><th>Product</th><th>Quantity</th><th>Unit price</th></tr></thead>\
         <tbody>{rows}</tbody>\
         </table>\
         <p>Total: {}</p>\
         </body></html>",
        escape_html(&receipt.ticket),
        format_amount(receipt.amount),
    )
}

#[must_use]
pub fn account_deleted() -> String {
    "<!DOCTYPE html>\
     <html><body>\
     <h1>Your account was deleted</h1>\
     <p>Your account was removed after a period of inactivity.</p>\
     </body></html>"
        .to_string()
}
