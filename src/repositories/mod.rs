pub mod customer_repository;
pub mod opportunity_repository;
pub mod product_repository;
pub mod sheet_repository;
pub mod user_repository;

pub use customer_repository::CustomerRepository;
pub use opportunity_repository::OpportunityRepository;
pub use product_repository::ProductRepository;
pub use sheet_repository::{Page, SheetRepository, Table};
pub use user_repository::UserRepository;
