//! User address repository

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{
    ListQuery,
    address::{UserAddress, UserAddressFields},
};

const ADDRESS_COLUMNS: &str =
    "user_id, street_address, city, state, postal_code, country, created_at, updated_at";

#[derive(Clone)]
pub struct AddressRepository {
    pool: PgPool,
}

impl AddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &ListQuery) -> DatabaseResult<(Vec<UserAddress>, i64)> {
        let addresses = sqlx::query_as::<_, UserAddress>(&format!(
            r#"
            SELECT {ADDRESS_COLUMNS}
            FROM user_addresses
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(query.limit() as i64)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_addresses")
            .fetch_one(&self.pool)
            .await?;

        Ok((addresses, total))
    }

    pub async fn find(&self, user_id: Uuid) -> DatabaseResult<Option<UserAddress>> {
        let address = sqlx::query_as::<_, UserAddress>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM user_addresses WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        fields: &UserAddressFields,
    ) -> DatabaseResult<UserAddress> {
        info!("Creating address of user: {}", user_id);

        let address = sqlx::query_as::<_, UserAddress>(&format!(
            r#"
            INSERT INTO user_addresses (user_id, street_address, city, state, postal_code, country)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ADDRESS_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&fields.street_address)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.postal_code)
        .bind(&fields.country)
        .fetch_one(&self.pool)
        .await?;

        Ok(address)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        fields: &UserAddressFields,
    ) -> DatabaseResult<UserAddress> {
        let address = sqlx::query_as::<_, UserAddress>(&format!(
            r#"
            UPDATE user_addresses
            SET street_address = $2, city = $3, state = $4, postal_code = $5, country = $6,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {ADDRESS_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&fields.street_address)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.postal_code)
        .bind(&fields.country)
        .fetch_one(&self.pool)
        .await?;

        Ok(address)
    }

    pub async fn delete(&self, user_id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting address of user: {}", user_id);

        let result = sqlx::query("DELETE FROM user_addresses WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
