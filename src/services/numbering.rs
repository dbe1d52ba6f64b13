//! Sequential document numbering.
//!
//! Numbers take the form `{PREFIX}-{YEAR}-{SEQ:03}` with a per-type,
//! per-year sequence starting at 1. The sequence widens past 999 instead
//! of overflowing. Assignment scans the greatest existing number for the
//! `(type, year)` pair; the unique index on the number column rejects the
//! read-then-write race and callers retry on that conflict.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entities::{delivery_note, invoice, proforma};
use crate::errors::ServiceError;

/// The three numbered document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Invoice,
    Proforma,
    DeliveryNote,
}

impl DocumentKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "FAC",
            DocumentKind::Proforma => "PRO",
            DocumentKind::DeliveryNote => "BL",
        }
    }
}

/// Format a number from its parts, zero-padded to three digits.
pub fn format_number(kind: DocumentKind, year: i32, seq: u32) -> String {
    format!("{}-{}-{:03}", kind.prefix(), year, seq)
}

/// Parse the trailing sequence of an existing number. Returns `None` for
/// numbers that do not follow the scheme (imported/pre-assigned ones).
pub fn parse_sequence(number: &str) -> Option<u32> {
    number.rsplit('-').next()?.parse().ok()
}

/// Produce the next number for `(kind, year)`.
pub async fn next_number<C: ConnectionTrait>(
    conn: &C,
    kind: DocumentKind,
    year: i32,
) -> Result<String, ServiceError> {
    let prefix = format!("{}-{}-", kind.prefix(), year);

    // Zero-padding makes the lexicographic max the numeric max until the
    // sequence widens, at which point the longer string still sorts last
    // among same-width suffixes; compare numerically to be safe.
    let existing: Vec<String> = match kind {
        DocumentKind::Invoice => {
            invoice::Entity::find()
                .select_only()
                .column(invoice::Column::Number)
                .filter(invoice::Column::Number.starts_with(&prefix))
                .order_by_desc(invoice::Column::Number)
                .into_tuple()
                .all(conn)
                .await?
        }
        DocumentKind::Proforma => {
            proforma::Entity::find()
                .select_only()
                .column(proforma::Column::Number)
                .filter(proforma::Column::Number.starts_with(&prefix))
                .order_by_desc(proforma::Column::Number)
                .into_tuple()
                .all(conn)
                .await?
        }
        DocumentKind::DeliveryNote => {
            delivery_note::Entity::find()
                .select_only()
                .column(delivery_note::Column::Number)
                .filter(delivery_note::Column::Number.starts_with(&prefix))
                .order_by_desc(delivery_note::Column::Number)
                .into_tuple()
                .all(conn)
                .await?
        }
    };

    let last_seq = existing
        .iter()
        .filter_map(|n| parse_sequence(n))
        .max()
        .unwrap_or(0);

    Ok(format_number(kind, year, last_seq + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_match_document_kinds() {
        assert_eq!(DocumentKind::Invoice.prefix(), "FAC");
        assert_eq!(DocumentKind::Proforma.prefix(), "PRO");
        assert_eq!(DocumentKind::DeliveryNote.prefix(), "BL");
    }

    #[test]
    fn numbers_are_zero_padded_to_three_digits() {
        assert_eq!(
            format_number(DocumentKind::Invoice, 2025, 1),
            "FAC-2025-001"
        );
        assert_eq!(
            format_number(DocumentKind::Proforma, 2025, 42),
            "PRO-2025-042"
        );
        assert_eq!(
            format_number(DocumentKind::DeliveryNote, 2025, 999),
            "BL-2025-999"
        );
    }

    #[test]
    fn sequences_widen_past_three_digits() {
        assert_eq!(
            format_number(DocumentKind::Invoice, 2025, 1000),
            "FAC-2025-1000"
        );
    }

    #[test]
    fn trailing_sequence_parses() {
        assert_eq!(parse_sequence("FAC-2025-007"), Some(7));
        assert_eq!(parse_sequence("FAC-2025-1234"), Some(1234));
        assert_eq!(parse_sequence("LEGACY/0001"), None);
    }
}
