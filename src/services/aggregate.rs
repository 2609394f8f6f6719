//! Numeric comparison data derived from a retrieved document set.
//!
//! Pure functions over the exact list the narrative was generated from: no
//! I/O, no input mutation, identical output for identical input.

use serde::Serialize;

use crate::index::IndexedDocument;

/// Label for the seller's own entry in the comparison series.
pub const USER_PRICE_LABEL: &str = "Your price";

/// Fallback label when a document carries no name metadata.
const UNKNOWN_LABEL: &str = "Unknown";

/// One (label, price) bar of the comparison data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub name: String,
    pub price: f64,
}

/// The seller's proposed price first, then one entry per document with a
/// present numeric price, in retrieval order.
pub fn comparison_series(user_price: f64, documents: &[IndexedDocument]) -> Vec<PricePoint> {
    let mut series = Vec::with_capacity(documents.len() + 1);
    series.push(PricePoint {
        name: USER_PRICE_LABEL.to_string(),
        price: user_price,
    });

    for doc in documents {
        let Some(price) = doc.metadata.price else {
            continue;
        };
        let name = doc
            .metadata
            .name
            .clone()
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
        series.push(PricePoint { name, price });
    }

    series
}

/// Arithmetic mean of the strictly positive document prices; `None` when no
/// entry qualifies, never a defaulted zero.
pub fn average_market_price(documents: &[IndexedDocument]) -> Option<f64> {
    let prices: Vec<f64> = documents
        .iter()
        .filter_map(|doc| doc.metadata.price)
        .filter(|price| *price > 0.0)
        .collect();

    if prices.is_empty() {
        None
    } else {
        Some(prices.iter().sum::<f64>() / prices.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::index::DocumentMetadata;

    fn doc(id: &str, name: Option<&str>, price: Option<f64>) -> IndexedDocument {
        IndexedDocument {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes()),
            text: format!("Name: {}", name.unwrap_or("?")),
            metadata: DocumentMetadata {
                id: id.to_string(),
                name: name.map(str::to_string),
                price,
                category: None,
            },
        }
    }

    #[test]
    fn average_counts_only_positive_prices() {
        let docs = vec![
            doc("a", Some("A"), Some(10.0)),
            doc("b", Some("B"), Some(20.0)),
            doc("c", Some("C"), None),
            doc("d", Some("D"), Some(0.0)),
            doc("e", Some("E"), Some(30.0)),
        ];
        assert_eq!(average_market_price(&docs), Some(20.0));
    }

    #[test]
    fn average_is_absent_without_qualifying_prices() {
        let docs = vec![doc("a", Some("A"), None), doc("b", Some("B"), Some(0.0))];
        assert_eq!(average_market_price(&docs), None);
        assert_eq!(average_market_price(&[]), None);
    }

    #[test]
    fn series_puts_the_user_price_first_in_retrieval_order() {
        let docs = vec![
            doc("a", Some("A"), Some(50.0)),
            doc("b", Some("B"), Some(70.0)),
        ];
        let series = comparison_series(99.0, &docs);
        assert_eq!(
            series,
            vec![
                PricePoint {
                    name: USER_PRICE_LABEL.to_string(),
                    price: 99.0
                },
                PricePoint {
                    name: "A".to_string(),
                    price: 50.0
                },
                PricePoint {
                    name: "B".to_string(),
                    price: 70.0
                },
            ]
        );
    }

    #[test]
    fn series_keeps_zero_priced_entries_but_skips_missing_prices() {
        let docs = vec![
            doc("a", Some("A"), Some(0.0)),
            doc("b", Some("B"), None),
            doc("c", Some("C"), Some(5.0)),
        ];
        let series = comparison_series(1.0, &docs);
        let names: Vec<&str> = series.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec![USER_PRICE_LABEL, "A", "C"]);
    }

    #[test]
    fn nameless_documents_fall_back_to_the_unknown_label() {
        let docs = vec![doc("a", None, Some(5.0))];
        let series = comparison_series(1.0, &docs);
        assert_eq!(series[1].name, "Unknown");
    }

    #[test]
    fn aggregation_is_deterministic() {
        let docs = vec![
            doc("a", Some("A"), Some(50.0)),
            doc("b", None, Some(70.0)),
            doc("c", Some("C"), None),
        ];
        assert_eq!(comparison_series(99.0, &docs), comparison_series(99.0, &docs));
        assert_eq!(average_market_price(&docs), average_market_price(&docs));
    }
}
