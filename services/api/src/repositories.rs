//! Repositories for database operations

pub mod address;
pub mod category;
pub mod product;
pub mod profile;
pub mod user;

pub use address::AddressRepository;
pub use category::CategoryRepository;
pub use product::ProductRepository;
pub use profile::{CustomerProfileRepository, VendorProfileRepository};
pub use user::UserRepository;
