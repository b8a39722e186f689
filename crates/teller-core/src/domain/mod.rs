//! Domain model (line ids, customers).

pub mod customer;
pub mod ids;

pub use customer::Customer;
pub use ids::{CustomerId, LineId};
