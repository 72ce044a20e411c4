pub mod store;
pub use store::SupplierStore;
pub mod supplier_repo;
pub use supplier_repo::SupplierRepository;
