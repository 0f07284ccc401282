pub mod listing;
pub mod manager;
pub mod memory;
pub mod orm;
pub mod store;

pub use manager::ProductManager;
pub use memory::MemoryProducts;
pub use orm::OrmProducts;
pub use store::ProductStore;
