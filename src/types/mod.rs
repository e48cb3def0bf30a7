pub mod customer;
pub mod pagination;
