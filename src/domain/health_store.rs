use async_trait::async_trait;

use crate::domain::error::StoreError;
use crate::domain::gateway::GatewayType;
use crate::domain::health::GatewayHealth;

/// Persisted copy of the gateway health snapshots. Survives process restart;
/// the in-memory cache is rebuilt lazily from it on a read miss. Two
/// interchangeable backends exist (Postgres and Redis), selected at startup.
#[async_trait]
pub trait HealthStore: Send + Sync + 'static {
	async fn get(
		&self,
		gateway: GatewayType,
	) -> Result<Option<GatewayHealth>, StoreError>;

	async fn save(
		&self,
		gateway: GatewayType,
		health: &GatewayHealth,
	) -> Result<(), StoreError>;
}
