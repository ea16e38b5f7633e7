pub mod health_cache;
