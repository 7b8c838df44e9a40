//! API Routes

pub mod health;
pub mod intake;
pub mod products;
