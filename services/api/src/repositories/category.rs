//! Product category repository

use common::{error::DatabaseResult, slug};
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

use crate::models::{
    ListQuery,
    catalog::{CategoryFields, ProductCategory},
};

const CATEGORY_COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pick a free slug for a category called `name`
    async fn derive_slug(&self, name: &str) -> DatabaseResult<String> {
        let base = slug::truncate(&slug::slugify(name), slug::MAX_SLUG_LENGTH);

        let taken: HashSet<String> = sqlx::query_scalar(
            "SELECT slug FROM product_categories WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(&base)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .collect();

        Ok(slug::first_available(&base, "-", &taken))
    }

    pub async fn list(&self, query: &ListQuery) -> DatabaseResult<(Vec<ProductCategory>, i64)> {
        let categories = sqlx::query_as::<_, ProductCategory>(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS}
            FROM product_categories
            ORDER BY name
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(query.limit() as i64)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_categories")
            .fetch_one(&self.pool)
            .await?;

        Ok((categories, total))
    }

    pub async fn find_by_slug(&self, slug: &str) -> DatabaseResult<Option<ProductCategory>> {
        let category = sqlx::query_as::<_, ProductCategory>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM product_categories WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn exists(&self, id: Uuid) -> DatabaseResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM product_categories WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Create a category; its slug is derived from the name once, here
    pub async fn create(&self, fields: &CategoryFields) -> DatabaseResult<ProductCategory> {
        let slug = self.derive_slug(&fields.name).await?;
        info!("Creating category: {}", slug);

        let category = sqlx::query_as::<_, ProductCategory>(&format!(
            r#"
            INSERT INTO product_categories (name, slug, description)
            VALUES ($1, $2, $3)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&fields.name)
        .bind(&slug)
        .bind(&fields.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Update name and description; the slug never changes
    pub async fn update(
        &self,
        id: Uuid,
        fields: &CategoryFields,
    ) -> DatabaseResult<ProductCategory> {
        let category = sqlx::query_as::<_, ProductCategory>(&format!(
            r#"
            UPDATE product_categories
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Delete a category together with its products
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting category: {}", id);

        let result = sqlx::query("DELETE FROM product_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
