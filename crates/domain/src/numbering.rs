//! Human-readable document numbers: `QT-YYYYMMDD-NNNN` and `ORD-YYYYMMDD-NNNN`.
//!
//! The counter resets every day and is zero-padded to four digits. Past 9999
//! the number simply widens (`QT-20250101-10000`).

use chrono::NaiveDate;
use event_store::NumberSequence;
use serde::{Deserialize, Serialize};

/// Which sequence a number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Quotation,
    Order,
}

impl DocumentKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Quotation => "QT",
            DocumentKind::Order => "ORD",
        }
    }

    /// Sequence scope for `date`, e.g. `QT-20250101`.
    pub fn scope(&self, date: NaiveDate) -> String {
        format!("{}-{}", self.prefix(), date.format("%Y%m%d"))
    }
}

/// A quotation or order number as shown to customers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentNumber(String);

impl DocumentNumber {
    pub fn new(kind: DocumentKind, date: NaiveDate, value: u32) -> Self {
        Self(format!("{}-{value:04}", kind.scope(date)))
    }

    /// Canonical form of user input: trimmed and uppercased.
    ///
    /// No format check is made; a malformed identifier simply never matches.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// The kind implied by the prefix, if it has a known one.
    pub fn kind(&self) -> Option<DocumentKind> {
        if self.0.starts_with("QT-") {
            Some(DocumentKind::Quotation)
        } else if self.0.starts_with("ORD-") {
            Some(DocumentKind::Order)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Draws the next number of `kind` for `date` from the shared sequence.
pub async fn next_document_number<N>(
    sequence: &N,
    kind: DocumentKind,
    date: NaiveDate,
) -> event_store::Result<DocumentNumber>
where
    N: NumberSequence + ?Sized,
{
    let value = sequence.next_value(&kind.scope(date)).await?;
    Ok(DocumentNumber::new(kind, date, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_store::InMemoryNumberSequence;

    fn jan_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn formats_with_four_digit_padding() {
        assert_eq!(
            DocumentNumber::new(DocumentKind::Quotation, jan_first(), 7).as_str(),
            "QT-20250101-0007"
        );
        assert_eq!(
            DocumentNumber::new(DocumentKind::Order, jan_first(), 42).as_str(),
            "ORD-20250101-0042"
        );
    }

    #[test]
    fn widens_past_9999() {
        assert_eq!(
            DocumentNumber::new(DocumentKind::Quotation, jan_first(), 10_000).as_str(),
            "QT-20250101-10000"
        );
    }

    #[test]
    fn normalize_trims_and_uppercases() {
        let n = DocumentNumber::normalize("  qt-20250101-0007 ");
        assert_eq!(n.as_str(), "QT-20250101-0007");
        assert_eq!(n.kind(), Some(DocumentKind::Quotation));
        assert_eq!(DocumentNumber::normalize("ord-1").kind(), Some(DocumentKind::Order));
        assert_eq!(DocumentNumber::normalize("20250101").kind(), None);
    }

    #[tokio::test]
    async fn quotation_and_order_sequences_are_separate() {
        let seq = InMemoryNumberSequence::new();
        let day = jan_first();

        let q1 = next_document_number(&seq, DocumentKind::Quotation, day).await.unwrap();
        let q2 = next_document_number(&seq, DocumentKind::Quotation, day).await.unwrap();
        let o1 = next_document_number(&seq, DocumentKind::Order, day).await.unwrap();

        assert_eq!(q1.as_str(), "QT-20250101-0001");
        assert_eq!(q2.as_str(), "QT-20250101-0002");
        assert_eq!(o1.as_str(), "ORD-20250101-0001");
    }

    #[tokio::test]
    async fn counter_resets_on_a_new_day() {
        let seq = InMemoryNumberSequence::new();
        next_document_number(&seq, DocumentKind::Quotation, jan_first()).await.unwrap();

        let next_day = jan_first().succ_opt().unwrap();
        let n = next_document_number(&seq, DocumentKind::Quotation, next_day).await.unwrap();
        assert_eq!(n.as_str(), "QT-20250102-0001");
    }
}
