pub mod storage;
pub mod session;
pub mod catalog;
pub mod orders;
pub mod auth_client;

pub use storage::{MemoryStorage, RedisStorage, SharedStorage, Storage};
pub use session::SessionAccessor;
pub use catalog::{DeleteOutcome, ServiceCatalog};
pub use orders::OrderList;
pub use auth_client::AuthClient;
