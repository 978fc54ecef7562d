//! Vendor and customer profile repositories

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{
    ListQuery,
    profile::{CustomerProfile, CustomerProfileFields, VendorProfile, VendorProfileFields},
};

const VENDOR_COLUMNS: &str = "user_id, company_name, business_registration_number, gst_id, \
                              phone_number, website, is_verified, created_at, updated_at";

const CUSTOMER_COLUMNS: &str =
    "user_id, phone_number, date_of_birth, gender, created_at, updated_at";

/// Vendor profile repository
#[derive(Clone)]
pub struct VendorProfileRepository {
    pool: PgPool,
}

impl VendorProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &ListQuery) -> DatabaseResult<(Vec<VendorProfile>, i64)> {
        let profiles = sqlx::query_as::<_, VendorProfile>(&format!(
            r#"
            SELECT {VENDOR_COLUMNS}
            FROM vendor_profiles
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(query.limit() as i64)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vendor_profiles")
            .fetch_one(&self.pool)
            .await?;

        Ok((profiles, total))
    }

    pub async fn find(&self, user_id: Uuid) -> DatabaseResult<Option<VendorProfile>> {
        let profile = sqlx::query_as::<_, VendorProfile>(&format!(
            "SELECT {VENDOR_COLUMNS} FROM vendor_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Create the profile of `user_id`; `is_verified` starts out false
    pub async fn create(
        &self,
        user_id: Uuid,
        fields: &VendorProfileFields,
    ) -> DatabaseResult<VendorProfile> {
        info!("Creating vendor profile of user: {}", user_id);

        let profile = sqlx::query_as::<_, VendorProfile>(&format!(
            r#"
            INSERT INTO vendor_profiles
                (user_id, company_name, business_registration_number, gst_id, phone_number, website)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {VENDOR_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&fields.company_name)
        .bind(&fields.business_registration_number)
        .bind(&fields.gst_id)
        .bind(&fields.phone_number)
        .bind(&fields.website)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        fields: &VendorProfileFields,
    ) -> DatabaseResult<VendorProfile> {
        let profile = sqlx::query_as::<_, VendorProfile>(&format!(
            r#"
            UPDATE vendor_profiles
            SET company_name = $2, business_registration_number = $3, gst_id = $4,
                phone_number = $5, website = $6, updated_at = NOW()
            WHERE user_id = $1
            RETURNING {VENDOR_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&fields.company_name)
        .bind(&fields.business_registration_number)
        .bind(&fields.gst_id)
        .bind(&fields.phone_number)
        .bind(&fields.website)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn delete(&self, user_id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting vendor profile of user: {}", user_id);

        let result = sqlx::query("DELETE FROM vendor_profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Customer profile repository
#[derive(Clone)]
pub struct CustomerProfileRepository {
    pool: PgPool,
}

impl CustomerProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &ListQuery) -> DatabaseResult<(Vec<CustomerProfile>, i64)> {
        let profiles = sqlx::query_as::<_, CustomerProfile>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customer_profiles
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(query.limit() as i64)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer_profiles")
            .fetch_one(&self.pool)
            .await?;

        Ok((profiles, total))
    }

    pub async fn find(&self, user_id: Uuid) -> DatabaseResult<Option<CustomerProfile>> {
        let profile = sqlx::query_as::<_, CustomerProfile>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        fields: &CustomerProfileFields,
    ) -> DatabaseResult<CustomerProfile> {
        info!("Creating customer profile of user: {}", user_id);

        let profile = sqlx::query_as::<_, CustomerProfile>(&format!(
            r#"
            INSERT INTO customer_profiles (user_id, phone_number, date_of_birth, gender)
            VALUES ($1, $2, $3, $4)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&fields.phone_number)
        .bind(fields.date_of_birth)
        .bind(fields.gender)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        fields: &CustomerProfileFields,
    ) -> DatabaseResult<CustomerProfile> {
        let profile = sqlx::query_as::<_, CustomerProfile>(&format!(
            r#"
            UPDATE customer_profiles
            SET phone_number = $2, date_of_birth = $3, gender = $4, updated_at = NOW()
            WHERE user_id = $1
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&fields.phone_number)
        .bind(fields.date_of_birth)
        .bind(fields.gender)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn delete(&self, user_id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting customer profile of user: {}", user_id);

        let result = sqlx::query("DELETE FROM customer_profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
