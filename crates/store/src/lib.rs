//! Data store contract and backends for the storefront.
//!
//! Exposes create/find/update operations on users, addresses, products,
//! and orders, with atomic order+items insertion and an atomic conditional
//! paid transition. Two implementations: in-memory (tests/dev) and
//! PostgreSQL (sqlx).

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use store::{NewAddress, NewProduct, NewUser, OrderStream, Store};
