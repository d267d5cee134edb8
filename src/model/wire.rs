//! JSON shapes exchanged with the outside world.
//!
//! These are the only serialized forms of an order. [`OrderView`] carries exactly the
//! order id and items, so the acknowledgment token can never leak into a response or a
//! notification.

use crate::model::{Item, Order, OrderId};
use serde::{Deserialize, Serialize};

/// Body of an ingestion event: `{"items": ["Taco", ...]}`.
///
/// A missing or null `items` decodes as an empty order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    #[serde(default)]
    pub items: Option<Vec<String>>,
}

impl NewOrder {
    pub fn new(items: Vec<String>) -> Self {
        Self { items: Some(items) }
    }

    pub fn into_items(self) -> Vec<String> {
        self.items.unwrap_or_default()
    }
}

/// A readiness event: `{"orderId": "...", "item": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyEvent {
    pub order_id: OrderId,
    pub item: String,
}

/// Public view of an order, used by the query endpoint and completion notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: OrderId,
    pub items: Vec<Item>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            items: order.items.clone(),
        }
    }
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            items: order.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AckToken;

    #[test]
    fn test_new_order_accepts_missing_or_null_items() {
        let missing: NewOrder = serde_json::from_str("{}").unwrap();
        assert!(missing.into_items().is_empty());

        let null: NewOrder = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(null.into_items().is_empty());

        let full: NewOrder = serde_json::from_str(r#"{"items": ["Taco", "Taco"]}"#).unwrap();
        assert_eq!(full.into_items(), vec!["Taco", "Taco"]);
    }

    #[test]
    fn test_new_order_rejects_wrong_shapes() {
        assert!(serde_json::from_str::<NewOrder>(r#"{"items": "Taco"}"#).is_err());
        assert!(serde_json::from_str::<NewOrder>("not json").is_err());
    }

    #[test]
    fn test_ready_event_uses_camel_case() {
        let event: ReadyEvent =
            serde_json::from_str(r#"{"orderId": "A1", "item": "Taco Supreme"}"#).unwrap();
        assert_eq!(event.order_id, OrderId::from("A1"));
        assert_eq!(event.item, "Taco Supreme");

        assert!(serde_json::from_str::<ReadyEvent>(r#"{"orderId": "A1"}"#).is_err());
    }

    #[test]
    fn test_order_view_omits_ack_token() {
        let mut order = Order::new(
            "A1".into(),
            vec!["Taco".into(), "Burrito".into()],
            Some(AckToken::new("receipt-handle-123")),
        );
        order.items[0].ready = true;

        let json = serde_json::to_value(OrderView::from(&order)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "orderId": "A1",
                "items": [
                    {"name": "Taco", "ready": true},
                    {"name": "Burrito", "ready": false}
                ]
            })
        );
        assert!(!json.to_string().contains("receipt-handle-123"));
    }
}
