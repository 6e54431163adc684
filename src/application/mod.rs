pub mod catalog;
pub mod deliveries;
pub mod orders;
