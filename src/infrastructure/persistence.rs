pub mod postgres_health_store;
pub mod postgres_payment_store;
pub mod redis_health_store;
