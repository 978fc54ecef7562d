//! Application state shared across handlers

use common::{cache::RedisPool, token::TokenVerifier};
use sqlx::PgPool;

use crate::repositories::{
    AddressRepository, CategoryRepository, CustomerProfileRepository, ProductRepository,
    UserRepository, VendorProfileRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub redis_pool: RedisPool,
    pub token_verifier: TokenVerifier,
    pub user_repository: UserRepository,
    pub vendor_profile_repository: VendorProfileRepository,
    pub customer_profile_repository: CustomerProfileRepository,
    pub address_repository: AddressRepository,
    pub category_repository: CategoryRepository,
    pub product_repository: ProductRepository,
}

impl AppState {
    pub fn new(db_pool: PgPool, redis_pool: RedisPool, token_verifier: TokenVerifier) -> Self {
        Self {
            user_repository: UserRepository::new(db_pool.clone()),
            vendor_profile_repository: VendorProfileRepository::new(db_pool.clone()),
            customer_profile_repository: CustomerProfileRepository::new(db_pool.clone()),
            address_repository: AddressRepository::new(db_pool.clone()),
            category_repository: CategoryRepository::new(db_pool.clone()),
            product_repository: ProductRepository::new(db_pool),
            redis_pool,
            token_verifier,
        }
    }
}
