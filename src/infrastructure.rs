pub mod gateway;
pub mod health;
pub mod persistence;
pub mod routing;
pub mod workers;
