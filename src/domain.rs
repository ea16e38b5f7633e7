pub mod error;
pub mod gateway;
pub mod health;
pub mod health_store;
pub mod ledger;
pub mod payment;
pub mod payment_gateway;
pub mod queue;
