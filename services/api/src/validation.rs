//! Input validation for profiles, addresses and the catalog
//!
//! Every validator takes the request body and, for updates, the stored
//! record. Fields missing from the body fall back to the stored values, and
//! the merged record is checked as a whole.

use chrono::NaiveDate;
use common::{FieldErrors, slug};
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

use crate::models::{
    address::{UserAddress, UserAddressFields, UserAddressRequest},
    catalog::{
        CategoryFields, CategoryRequest, Product, ProductCategory, ProductFields, ProductRequest,
        price_after_discount,
    },
    profile::{
        CustomerProfile, CustomerProfileFields, CustomerProfileRequest, Gender, VendorProfile,
        VendorProfileFields, VendorProfileRequest,
    },
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate a phone number in E.164 form, e.g. `+14155550100`
pub fn validate_phone(phone: &str) -> Result<(), String> {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX
        .get_or_init(|| Regex::new(r"^\+[1-9]\d{7,14}$").expect("Failed to compile phone regex"));

    if !regex.is_match(phone) {
        return Err("Enter a valid phone number.".to_string());
    }

    Ok(())
}

/// Validate an optional website; the empty string means "none"
pub fn validate_website(website: &str) -> Result<(), String> {
    if website.is_empty() {
        return Ok(());
    }

    if website.len() > 200 {
        return Err(max_length_message(200));
    }

    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = URL_REGEX.get_or_init(|| {
        Regex::new(r"^https?://[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}(:\d+)?(/\S*)?$")
            .expect("Failed to compile URL regex")
    });

    if !regex.is_match(website) {
        return Err("Enter a valid URL.".to_string());
    }

    Ok(())
}

/// Parse an ISO date (`YYYY-MM-DD`)
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.".to_string()
    })
}

fn max_length_message(max: usize) -> String {
    format!("Ensure this field has no more than {} characters.", max)
}

fn check_max_length(errors: &mut FieldErrors, field: &str, value: Option<&str>, max: usize) {
    if let Some(value) = value {
        if value.chars().count() > max {
            errors.add(field, max_length_message(max));
        }
    }
}

/// Check a non-negative decimal against a `NUMERIC(precision, 2)` column
fn check_money(errors: &mut FieldErrors, field: &str, value: Decimal, precision: u32) {
    let value = value.normalize();
    if value.scale() > 2 {
        errors.add(field, "Ensure that there are no more than 2 decimal places.");
    }
    if value.trunc().abs() >= Decimal::from(10_i64.pow(precision - 2)) {
        errors.add(
            field,
            format!(
                "Ensure that there are no more than {} digits in total.",
                precision
            ),
        );
    }
}

pub fn validate_vendor_profile(
    payload: &VendorProfileRequest,
    current: Option<&VendorProfile>,
) -> Result<VendorProfileFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let company_name = errors.required(
        "company_name",
        payload
            .company_name
            .as_deref()
            .or(current.map(|c| c.company_name.as_str())),
    );
    check_max_length(&mut errors, "company_name", company_name, 255);

    let registration_number = errors.required(
        "business_registration_number",
        payload
            .business_registration_number
            .as_deref()
            .or(current.map(|c| c.business_registration_number.as_str())),
    );
    check_max_length(
        &mut errors,
        "business_registration_number",
        registration_number,
        255,
    );

    let gst_id = errors.required(
        "gst_id",
        payload
            .gst_id
            .as_deref()
            .or(current.map(|c| c.gst_id.as_str())),
    );
    check_max_length(&mut errors, "gst_id", gst_id, 255);

    let phone_number = errors.required(
        "phone_number",
        payload
            .phone_number
            .as_deref()
            .or(current.map(|c| c.phone_number.as_str())),
    );
    if let Some(phone_number) = phone_number {
        errors.check("phone_number", validate_phone(phone_number));
    }

    let website = match &payload.website {
        Some(website) => website.as_deref().unwrap_or_default(),
        None => current.map(|c| c.website.as_str()).unwrap_or_default(),
    };
    errors.check("website", validate_website(website));

    match (company_name, registration_number, gst_id, phone_number) {
        (Some(company_name), Some(registration_number), Some(gst_id), Some(phone_number)) => errors
            .finish(VendorProfileFields {
                company_name: company_name.to_string(),
                business_registration_number: registration_number.to_string(),
                gst_id: gst_id.to_string(),
                phone_number: phone_number.to_string(),
                website: website.to_string(),
            }),
        _ => Err(errors),
    }
}

pub fn validate_customer_profile(
    payload: &CustomerProfileRequest,
    current: Option<&CustomerProfile>,
    today: NaiveDate,
) -> Result<CustomerProfileFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let phone_number = errors.required(
        "phone_number",
        payload
            .phone_number
            .as_deref()
            .or(current.map(|c| c.phone_number.as_str())),
    );
    if let Some(phone_number) = phone_number {
        errors.check("phone_number", validate_phone(phone_number));
    }

    let date_of_birth = match &payload.date_of_birth {
        Some(Some(raw)) => match parse_date(raw) {
            Ok(date) => Some(date),
            Err(message) => {
                errors.add("date_of_birth", message);
                None
            }
        },
        Some(None) => None,
        None => current.and_then(|c| c.date_of_birth),
    };
    if let Some(date_of_birth) = date_of_birth {
        if date_of_birth > today {
            errors.add("date_of_birth", "Date of birth cannot be in the future.");
        }
    }

    let gender = match &payload.gender {
        Some(Some(raw)) => match raw.parse::<Gender>() {
            Ok(gender) => Some(gender),
            Err(message) => {
                errors.add("gender", message);
                None
            }
        },
        Some(None) => None,
        None => current.and_then(|c| c.gender),
    };

    match phone_number {
        Some(phone_number) => errors.finish(CustomerProfileFields {
            phone_number: phone_number.to_string(),
            date_of_birth,
            gender,
        }),
        None => Err(errors),
    }
}

pub fn validate_address(
    payload: &UserAddressRequest,
    current: Option<&UserAddress>,
) -> Result<UserAddressFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let mut field = |name: &str, value: Option<&String>, stored: Option<&String>, max: usize| {
        let value = errors.required(name, value.or(stored).map(String::as_str));
        check_max_length(&mut errors, name, value, max);
        value.map(str::to_string)
    };

    let street_address = field(
        "street_address",
        payload.street_address.as_ref(),
        current.map(|c| &c.street_address),
        255,
    );
    let city = field(
        "city",
        payload.city.as_ref(),
        current.map(|c| &c.city),
        100,
    );
    let state = field(
        "state",
        payload.state.as_ref(),
        current.map(|c| &c.state),
        100,
    );
    let postal_code = field(
        "postal_code",
        payload.postal_code.as_ref(),
        current.map(|c| &c.postal_code),
        20,
    );
    let country = field(
        "country",
        payload.country.as_ref(),
        current.map(|c| &c.country),
        100,
    );

    match (street_address, city, state, postal_code, country) {
        (Some(street_address), Some(city), Some(state), Some(postal_code), Some(country)) => {
            errors.finish(UserAddressFields {
                street_address,
                city,
                state,
                postal_code,
                country,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_category(
    payload: &CategoryRequest,
    current: Option<&ProductCategory>,
) -> Result<CategoryFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = errors.required(
        "name",
        payload.name.as_deref().or(current.map(|c| c.name.as_str())),
    );
    check_max_length(&mut errors, "name", name, 255);
    if let Some(name) = name {
        if slug::slugify(name).is_empty() {
            errors.add("name", "Name must contain at least one letter or digit.");
        }
    }

    let description = payload
        .description
        .as_deref()
        .or(current.map(|c| c.description.as_str()))
        .unwrap_or_default();

    match name {
        Some(name) => errors.finish(CategoryFields {
            name: name.trim().to_string(),
            description: description.to_string(),
        }),
        None => Err(errors),
    }
}

/// Validate a product and derive its discounted price.
///
/// Whether `category_id` points at an existing category is checked by the caller.
pub fn validate_product(
    payload: &ProductRequest,
    current: Option<&Product>,
) -> Result<ProductFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let category_id = payload.category_id.or(current.map(|c| c.category_id));
    if category_id.is_none() {
        errors.add("category_id", common::validation::REQUIRED);
    }

    let name = errors.required(
        "name",
        payload.name.as_deref().or(current.map(|c| c.name.as_str())),
    );
    check_max_length(&mut errors, "name", name, 255);

    let description = payload
        .description
        .as_deref()
        .or(current.map(|c| c.description.as_str()))
        .unwrap_or_default();

    let price = payload.price.or(current.map(|c| c.price));
    match price {
        None => errors.add("price", common::validation::REQUIRED),
        Some(price) if price <= Decimal::ZERO => {
            errors.add("price", "Ensure this value is greater than 0.")
        }
        Some(price) => check_money(&mut errors, "price", price, 12),
    }

    let discount = match payload.discount {
        Some(discount) => discount,
        None => current.and_then(|c| c.discount),
    };
    if let Some(discount) = discount {
        if discount <= Decimal::ZERO || discount >= Decimal::ONE_HUNDRED {
            errors.add("discount", "Discount must be between 0 and 100.");
        } else {
            check_money(&mut errors, "discount", discount, 5);
        }
    }

    let stock = payload.stock.or(current.map(|c| c.stock)).unwrap_or(0);
    if stock < 0 {
        errors.add("stock", "Ensure this value is greater than or equal to 0.");
    }

    match (category_id, name, price) {
        (Some(category_id), Some(name), Some(price)) => errors.finish(ProductFields {
            category_id,
            name: name.trim().to_string(),
            description: description.to_string(),
            price,
            discount,
            price_after_discount: price_after_discount(price, discount),
            stock,
        }),
        _ => Err(errors),
    }
}
