//! SQL for each table, operating on a borrowed connection.

pub mod cluster_records;
pub mod memory_crud;
pub mod oblivion;
pub mod profile;
