pub mod backend;
pub use backend::{BackendKind, BackendSession, SalesBackend};
pub mod mock;
pub use mock::MockBackend;
pub mod mssql;
pub use mssql::MssqlBackend;
pub mod procedures;
pub mod value;
