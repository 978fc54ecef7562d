//! Product repository

use common::{error::DatabaseResult, slug};
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

use crate::models::catalog::{Product, ProductFields, ProductQuery};

const PRODUCT_COLUMNS: &str = "p.id, p.vendor_id, p.category_id, p.name, p.description, p.price, \
                               p.discount, p.price_after_discount, p.stock, p.slug, \
                               p.created_at, p.updated_at";

/// Slug base of a product: the vendor's username followed by the product name
pub fn product_slug_base(vendor_username: &str, name: &str) -> String {
    let base = slug::truncate(
        &slug::slugify(&format!("{} {}", vendor_username, name)),
        slug::MAX_SLUG_LENGTH,
    );
    if base.is_empty() {
        "product".to_string()
    } else {
        base
    }
}

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn derive_slug(&self, vendor_username: &str, name: &str) -> DatabaseResult<String> {
        let base = product_slug_base(vendor_username, name);

        let taken: HashSet<String> =
            sqlx::query_scalar("SELECT slug FROM products WHERE slug = $1 OR slug LIKE $1 || '-%'")
                .bind(&base)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .collect();

        Ok(slug::first_available(&base, "-", &taken))
    }

    /// Page through products, newest first, optionally narrowed by category slug or vendor
    pub async fn list(&self, query: &ProductQuery) -> DatabaseResult<(Vec<Product>, i64)> {
        let pagination = query.pagination();

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            JOIN product_categories c ON c.id = p.category_id
            WHERE ($1::TEXT IS NULL OR c.slug = $1)
              AND ($2::UUID IS NULL OR p.vendor_id = $2)
            ORDER BY p.created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(query.category.as_deref())
        .bind(query.vendor_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM products p
            JOIN product_categories c ON c.id = p.category_id
            WHERE ($1::TEXT IS NULL OR c.slug = $1)
              AND ($2::UUID IS NULL OR p.vendor_id = $2)
            "#,
        )
        .bind(query.category.as_deref())
        .bind(query.vendor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((products, total))
    }

    pub async fn find_by_slug(&self, slug: &str) -> DatabaseResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Create a product owned by `vendor_id`, deriving its slug once
    pub async fn create(
        &self,
        vendor_id: Uuid,
        vendor_username: &str,
        fields: &ProductFields,
    ) -> DatabaseResult<Product> {
        let slug = self.derive_slug(vendor_username, &fields.name).await?;
        info!("Creating product: {}", slug);

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products AS p
                (vendor_id, category_id, name, description, price, discount,
                 price_after_discount, stock, slug)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(vendor_id)
        .bind(fields.category_id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(fields.discount)
        .bind(fields.price_after_discount)
        .bind(fields.stock)
        .bind(&slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    /// Save a product; the derived price is stored along with the fields it comes from
    pub async fn update(&self, id: Uuid, fields: &ProductFields) -> DatabaseResult<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products AS p
            SET category_id = $2, name = $3, description = $4, price = $5, discount = $6,
                price_after_discount = $7, stock = $8, updated_at = NOW()
            WHERE p.id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(fields.category_id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(fields.discount)
        .bind(fields.price_after_discount)
        .bind(fields.stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting product: {}", id);

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_base_joins_vendor_and_name() {
        assert_eq!(product_slug_base("acme", "Desk Lamp"), "acme-desk-lamp");
        assert_eq!(product_slug_base("jane.doe", "USB-C  Cable"), "janedoe-usb-c-cable");
        assert_eq!(product_slug_base("+", "!!!"), "product");
    }

    #[test]
    fn slug_base_fits_the_column_for_the_longest_names() {
        let username = "v".repeat(150);
        let name = ["Lamp"; 51].join(" ");
        assert_eq!(name.chars().count(), 254);

        let base = product_slug_base(&username, &name);
        assert!(base.len() < slug::MAX_SLUG_LENGTH);
        assert!(base.starts_with(&username));
        assert!(!base.ends_with('-'));

        let taken: HashSet<String> = [base.clone()].into_iter().collect();
        assert!(slug::first_available(&base, "-", &taken).len() <= slug::MAX_SLUG_LENGTH);
    }
}
