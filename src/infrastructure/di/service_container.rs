//! Service container for dependency injection
//!
//! Wires settings, the course store and the id generator into the services.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::AuthoringService;
use crate::config::Settings;
use crate::domain::{IdGenerator, UuidGenerator};
use crate::infrastructure::traits::{CourseStore, InMemoryCourseStore, RequestQueue};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Course store, serialized through a request queue
    pub store: Arc<dyn CourseStore>,

    /// Id source for new nodes
    pub ids: Arc<dyn IdGenerator>,

    pub authoring: AuthoringService,
}

impl ServiceContainer {
    /// Create a container with the fixture store (seeded from `fixtures_dir`
    /// when configured) and UUID ids.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let store = match &settings.fixtures_dir {
            Some(dir) => {
                debug!("serving fixtures from {}", dir.display());
                InMemoryCourseStore::from_dir(dir)?
            }
            None => InMemoryCourseStore::default(),
        };
        Ok(Self::with_deps(
            settings,
            Arc::new(RequestQueue::new(store)),
            Arc::new(UuidGenerator),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        store: Arc<dyn CourseStore>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let settings = Arc::new(settings);
        let authoring =
            AuthoringService::new(Arc::clone(&store), Arc::clone(&ids), Arc::clone(&settings));

        Self {
            settings,
            store,
            ids,
            authoring,
        }
    }
}
