//! Collaborator boundary for testability
//!
//! Persistence belongs to a hosted backend. `CourseStore` is the port the
//! application talks to; `InMemoryCourseStore` is the fixture implementation used
//! by tests and by the CLI when a fixtures directory is configured.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::application::document::{DocumentFormat, DraftDocument};
use crate::application::payload::{CoursePayload, CourseStatus};
use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{IdGenerator, NodeId, SequentialIds};

/// A generic error type for all collaborator calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("course not found: {0}")]
    NotFound(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

pub type PortResult<T> = Result<T, PortError>;

/// Listing entry for courses available for duplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseSummary {
    pub id: NodeId,
    pub title: String,
    pub owner_id: Option<String>,
    pub status: CourseStatus,
    pub module_count: usize,
}

/// Store acknowledgement of a created course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedCourse {
    pub id: NodeId,
    pub status: CourseStatus,
}

/// Persistence collaborator.
///
/// Calls are opaque and may fail; the core never retries them.
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn fetch_course(&self, id: &NodeId) -> PortResult<DraftDocument>;

    async fn list_courses_by_owner(&self, owner_id: &str) -> PortResult<Vec<CourseSummary>>;

    async fn create_course(&self, payload: &CoursePayload) -> PortResult<CreatedCourse>;

    async fn delete_course(&self, id: &NodeId) -> PortResult<()>;
}

// ============================================================
// IN-MEMORY IMPLEMENTATION
// ============================================================

#[derive(Debug, Clone)]
struct StoredCourse {
    /// `None` for shared fixtures, listed for every owner
    owner_id: Option<String>,
    status: CourseStatus,
    document: DraftDocument,
}

#[derive(Debug, Default)]
struct StoreState {
    courses: BTreeMap<NodeId, StoredCourse>,
    created: Vec<CoursePayload>,
}

/// Course store kept in memory, seeded from documents.
#[derive(Debug)]
pub struct InMemoryCourseStore {
    state: Mutex<StoreState>,
    ids: Arc<dyn IdGenerator>,
}

impl Default for InMemoryCourseStore {
    fn default() -> Self {
        Self::new(Arc::new(SequentialIds::new("course")))
    }
}

impl InMemoryCourseStore {
    /// Empty store; `ids` names courses created through [`CourseStore::create_course`].
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            ids,
        }
    }

    /// Seed an approved course, keyed by the document id.
    pub fn with_course(mut self, owner_id: Option<&str>, document: DraftDocument) -> Self {
        let id = document.id.clone();
        let stored = StoredCourse {
            owner_id: owner_id.map(str::to_string),
            status: CourseStatus::Approved,
            document,
        };
        if self.state.get_mut().courses.insert(id.clone(), stored).is_some() {
            warn!("fixture {} replaced an earlier course", id);
        }
        self
    }

    /// Load every `.toml`/`.json` document in `dir` as a shared fixture keyed by
    /// file stem.
    #[instrument(level = "debug")]
    pub fn from_dir(dir: &Path) -> ApplicationResult<Self> {
        let mut store = Self::default();
        let mut entries: Vec<_> = fs::read_dir(dir)
            .with_path_context("read fixtures directory", dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| DocumentFormat::from_path(p).is_ok())
            .collect();
        entries.sort();

        for path in entries {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let mut document = DraftDocument::load(&path)?;
            document.id = NodeId::from(stem);
            debug!("loaded fixture {}", stem);
            store = store.with_course(None, document);
        }
        Ok(store)
    }

    /// Payloads received so far, oldest first.
    pub async fn created(&self) -> Vec<CoursePayload> {
        self.state.lock().await.created.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.courses.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CourseStore for InMemoryCourseStore {
    async fn fetch_course(&self, id: &NodeId) -> PortResult<DraftDocument> {
        let state = self.state.lock().await;
        state
            .courses
            .get(id)
            .map(|c| c.document.clone())
            .ok_or_else(|| PortError::NotFound(id.to_string()))
    }

    async fn list_courses_by_owner(&self, owner_id: &str) -> PortResult<Vec<CourseSummary>> {
        let state = self.state.lock().await;
        Ok(state
            .courses
            .values()
            .filter(|c| c.owner_id.as_deref().map_or(true, |o| o == owner_id))
            .map(|c| CourseSummary {
                id: c.document.id.clone(),
                title: c.document.title.clone(),
                owner_id: c.owner_id.clone(),
                status: c.status,
                module_count: c.document.modules.len(),
            })
            .collect())
    }

    async fn create_course(&self, payload: &CoursePayload) -> PortResult<CreatedCourse> {
        let id = self.ids.next_id();
        let mut state = self.state.lock().await;
        if state.courses.contains_key(&id) {
            return Err(PortError::Unexpected(format!("course id {} already taken", id)));
        }
        state.courses.insert(
            id.clone(),
            StoredCourse {
                owner_id: Some(payload.owner_id.clone()),
                status: payload.status,
                document: DraftDocument::from_payload(id.clone(), payload),
            },
        );
        state.created.push(payload.clone());
        Ok(CreatedCourse {
            id,
            status: payload.status,
        })
    }

    async fn delete_course(&self, id: &NodeId) -> PortResult<()> {
        let mut state = self.state.lock().await;
        state
            .courses
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(id.to_string()))
    }
}

// ============================================================
// REQUEST QUEUE
// ============================================================

/// Wraps a store so that at most one call is in flight.
///
/// Waiting callers are served in arrival order (`tokio::sync::Mutex` is fair).
#[derive(Debug)]
pub struct RequestQueue<S> {
    inner: S,
    gate: Mutex<()>,
}

impl<S: CourseStore> RequestQueue<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            gate: Mutex::new(()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: CourseStore> CourseStore for RequestQueue<S> {
    async fn fetch_course(&self, id: &NodeId) -> PortResult<DraftDocument> {
        let _turn = self.gate.lock().await;
        self.inner.fetch_course(id).await
    }

    async fn list_courses_by_owner(&self, owner_id: &str) -> PortResult<Vec<CourseSummary>> {
        let _turn = self.gate.lock().await;
        self.inner.list_courses_by_owner(owner_id).await
    }

    async fn create_course(&self, payload: &CoursePayload) -> PortResult<CreatedCourse> {
        let _turn = self.gate.lock().await;
        self.inner.create_course(payload).await
    }

    async fn delete_course(&self, id: &NodeId) -> PortResult<()> {
        let _turn = self.gate.lock().await;
        self.inner.delete_course(id).await
    }
}
