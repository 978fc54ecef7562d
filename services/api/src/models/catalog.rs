//! Product categories and products

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{ListQuery, nullable};

/// Product category
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFields {
    pub name: String,
    pub description: String,
}

/// A product listed by a vendor
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub discount: Option<Decimal>,
    pub price_after_discount: Option<Decimal>,
    pub stock: i32,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for the product listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Only products of the category with this slug
    pub category: Option<String>,
    /// Only products of this vendor
    pub vendor_id: Option<Uuid>,
}

impl ProductQuery {
    pub fn pagination(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRequest {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "nullable")]
    pub discount: Option<Option<Decimal>>,
    pub stock: Option<i32>,
}

/// A product that passed validation, with its derived price
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub discount: Option<Decimal>,
    pub price_after_discount: Option<Decimal>,
    pub stock: i32,
}

/// `price * (1 - discount / 100)` rounded to cents; no discount, no value.
pub fn price_after_discount(price: Decimal, discount: Option<Decimal>) -> Option<Decimal> {
    discount.map(|discount| {
        let factor = Decimal::ONE - discount / Decimal::ONE_HUNDRED;
        (price * factor).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn discount_is_applied_and_rounded_to_cents() {
        assert_eq!(
            price_after_discount(dec("100.00"), Some(dec("15"))),
            Some(dec("85.00"))
        );
        assert_eq!(
            price_after_discount(dec("19.99"), Some(dec("10"))),
            Some(dec("17.99"))
        );
        // 33.33 * 0.665 = 22.16445
        assert_eq!(
            price_after_discount(dec("33.33"), Some(dec("33.5"))),
            Some(dec("22.16"))
        );
        // 0.05 * 0.5 = 0.025
        assert_eq!(
            price_after_discount(dec("0.05"), Some(dec("50"))),
            Some(dec("0.03"))
        );
    }

    #[test]
    fn no_discount_leaves_the_price_unset() {
        assert_eq!(price_after_discount(dec("10.00"), None), None);
    }

    #[test]
    fn prices_serialize_as_strings() {
        let request: ProductRequest =
            serde_json::from_str(r#"{"price": "12.50", "discount": null}"#).unwrap();
        assert_eq!(request.price, Some(dec("12.50")));
        assert_eq!(request.discount, Some(None));

        let json = serde_json::to_value(dec("12.50")).unwrap();
        assert_eq!(json, "12.50");
    }
}
