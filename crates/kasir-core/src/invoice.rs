//! # Invoice Numbers
//!
//! Format: `INV-<unix millis>-<nonce>` with the nonce in `1..=10000`.
//!
//! The clock and the random source belong to the caller (kasir-db), so
//! composition here stays deterministic. Uniqueness is not guaranteed by the
//! format; the `transactions.invoice` UNIQUE index enforces it and checkout
//! retries with a fresh nonce on collision.

/// Prefix shared by every invoice.
pub const INVOICE_PREFIX: &str = "INV";

/// Largest nonce value (inclusive).
pub const INVOICE_NONCE_MAX: u32 = 10_000;

/// Builds an invoice number.
///
/// ```rust
/// use kasir_core::invoice::compose_invoice;
///
/// assert_eq!(compose_invoice(1_700_000_000_123, 42), "INV-1700000000123-42");
/// ```
pub fn compose_invoice(unix_millis: i64, nonce: u32) -> String {
    format!("{INVOICE_PREFIX}-{unix_millis}-{nonce}")
}

/// Checks that a string has the invoice shape. Used to reject obviously bad
/// lookups before touching the database.
pub fn looks_like_invoice(value: &str) -> bool {
    let mut parts = value.split('-');
    let (Some(prefix), Some(millis), Some(nonce), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    prefix == INVOICE_PREFIX
        && !millis.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && nonce
            .parse::<u32>()
            .is_ok_and(|n| (1..=INVOICE_NONCE_MAX).contains(&n))
}
