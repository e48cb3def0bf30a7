pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod middleware;
pub mod router;
pub mod types;

pub use db::{Customer, CustomerStorage};
pub use error::CrmError;
pub use lifecycle::{Bootstrap, Lifecycle, Phase, Ready};
