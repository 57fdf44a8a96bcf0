use std::sync::Arc;
use std::time::Duration;

use adapter::repository::availability::AvailabilityRepositoryImpl;
use adapter::repository::space::SpaceRepositoryImpl;
use adapter::{database::ConnectionPool, repository::health::HealthCheckRepositoryImpl};
use kernel::repository::availability::AvailabilityRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::space::SpaceRepository;
use kernel::service::availability::AvailabilityResolver;
use kernel::service::reassignment::SlotReassignmentCoordinator;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    space_repository: Arc<dyn SpaceRepository>,
    availability_repository: Arc<dyn AvailabilityRepository>,
    availability_resolver: Arc<AvailabilityResolver>,
    slot_reassignment_coordinator: Arc<SlotReassignmentCoordinator>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let space_repository = Arc::new(SpaceRepositoryImpl::new(pool.clone()));
        let availability_repository: Arc<dyn AvailabilityRepository> =
            Arc::new(AvailabilityRepositoryImpl::new(pool.clone()));
        let availability_resolver = Arc::new(AvailabilityResolver::new(
            availability_repository.clone(),
            Duration::from_millis(app_config.availability.store_timeout_ms),
        ));
        let slot_reassignment_coordinator = Arc::new(SlotReassignmentCoordinator::new(
            availability_repository.clone(),
        ));
        Self {
            health_check_repository,
            space_repository,
            availability_repository,
            availability_resolver,
            slot_reassignment_coordinator,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn space_repository(&self) -> Arc<dyn SpaceRepository> {
        self.space_repository.clone()
    }

    pub fn availability_repository(&self) -> Arc<dyn AvailabilityRepository> {
        self.availability_repository.clone()
    }

    pub fn availability_resolver(&self) -> Arc<AvailabilityResolver> {
        self.availability_resolver.clone()
    }

    pub fn slot_reassignment_coordinator(&self) -> Arc<SlotReassignmentCoordinator> {
        self.slot_reassignment_coordinator.clone()
    }
}
