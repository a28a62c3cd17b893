pub mod memory;
pub mod postgres;
pub mod seed;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use seed::DISEASE_CATALOG;
pub use store::{ClinicStore, DbError, DbResult};
