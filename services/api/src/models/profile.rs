//! Vendor and customer profile models

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::nullable;

/// Gender of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "customer_gender", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            other => Err(format!("\"{}\" is not a valid choice.", other)),
        }
    }
}

/// Business details of a vendor account
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VendorProfile {
    pub user_id: Uuid,
    pub company_name: String,
    pub business_registration_number: String,
    pub gst_id: String,
    pub phone_number: String,
    pub website: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of vendor profile create/update requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorProfileRequest {
    pub company_name: Option<String>,
    pub business_registration_number: Option<String>,
    pub gst_id: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub website: Option<Option<String>>,
}

/// A vendor profile that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct VendorProfileFields {
    pub company_name: String,
    pub business_registration_number: String,
    pub gst_id: String,
    pub phone_number: String,
    pub website: String,
}

/// Personal details of a customer account
#[derive(Debug, Clone, FromRow)]
pub struct CustomerProfile {
    pub user_id: Uuid,
    pub phone_number: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerProfile {
    /// Age in whole years on `today`, if the date of birth is known.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.date_of_birth.map(|dob| age_on(dob, today))
    }
}

/// Whole years between `date_of_birth` and `today`.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Customer profile as returned to clients, with the derived age
#[derive(Debug, Clone, Serialize)]
pub struct CustomerProfileResponse {
    pub user_id: Uuid,
    pub phone_number: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerProfileResponse {
    pub fn new(profile: CustomerProfile, today: NaiveDate) -> Self {
        Self {
            age: profile.age_on(today),
            user_id: profile.user_id,
            phone_number: profile.phone_number,
            date_of_birth: profile.date_of_birth,
            gender: profile.gender,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Body of customer profile create/update requests
///
/// Date and gender arrive as text so that bad values become field errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerProfileRequest {
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub date_of_birth: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub gender: Option<Option<String>>,
}

/// A customer profile that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProfileFields {
    pub phone_number: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
}
