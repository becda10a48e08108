//! CRUD and query operations over the redb-backed tables in `crate::tables`.

pub mod links;
pub mod memories;
pub mod search;
pub mod tags;
