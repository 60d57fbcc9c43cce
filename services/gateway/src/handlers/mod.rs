pub mod page;
pub mod pets;
