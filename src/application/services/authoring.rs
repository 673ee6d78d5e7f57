//! Authoring service: new, duplicate and submit orchestration
//!
//! The service never owns a draft. Callers keep the tree, pass it by reference
//! on submission and keep it intact when the store fails, so a retry needs no
//! re-entry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::application::document::DraftDocument;
use crate::application::payload::{Submission, Submitter};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{validate_at, CourseDraftTree, IdGenerator, NodeId};
use crate::infrastructure::traits::{CourseStore, CourseSummary, CreatedCourse};

/// Accepted submission: the store's acknowledgement plus the binaries to upload.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub created: CreatedCourse,
    pub submission: Submission,
}

pub struct AuthoringService {
    store: Arc<dyn CourseStore>,
    ids: Arc<dyn IdGenerator>,
    settings: Arc<Settings>,
}

impl AuthoringService {
    pub fn new(
        store: Arc<dyn CourseStore>,
        ids: Arc<dyn IdGenerator>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            store,
            ids,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ids(&self) -> Arc<dyn IdGenerator> {
        Arc::clone(&self.ids)
    }

    /// Empty draft carrying the configured upload policy and passing score.
    pub fn new_draft(&self) -> CourseDraftTree {
        self.configure(CourseDraftTree::new(self.ids()))
    }

    /// Rebuild a stored document as a draft with the configured policies.
    pub fn open_document(&self, document: DraftDocument) -> ApplicationResult<CourseDraftTree> {
        let tree = document.into_tree(self.ids())?;
        Ok(self.configure(tree))
    }

    fn configure(&self, tree: CourseDraftTree) -> CourseDraftTree {
        let policy = match self.settings.uploads.file_policy() {
            Ok(policy) => policy,
            Err(e) => {
                warn!("{}; falling back to default upload policy", e);
                Default::default()
            }
        };
        tree.with_file_policy(policy)
            .with_default_passing_score(self.settings.draft.default_passing_score)
    }

    /// Courses the owner may use as a duplication source.
    #[instrument(level = "debug", skip(self))]
    pub async fn available_for_duplication(
        &self,
        owner_id: &str,
    ) -> ApplicationResult<Vec<CourseSummary>> {
        Ok(self.store.list_courses_by_owner(owner_id).await?)
    }

    /// Fetch a stored course and seed a new draft from it.
    #[instrument(level = "debug", skip(self))]
    pub async fn duplicate(&self, course_id: &NodeId) -> ApplicationResult<CourseDraftTree> {
        let document = self.store.fetch_course(course_id).await?;
        self.duplicate_document(document)
    }

    /// Seed a new draft from an already fetched document.
    pub fn duplicate_document(&self, document: DraftDocument) -> ApplicationResult<CourseDraftTree> {
        let source = self.open_document(document)?;
        let copy = CourseDraftTree::duplicate_from(
            &source,
            self.ids(),
            self.settings.draft.duplicate_ids,
            &self.settings.draft.copy_marker,
        )?;
        info!("duplicated course {} as {}", source.id(), copy.id());
        Ok(copy)
    }

    /// Validate, flatten and hand the draft to the store in a single call.
    pub async fn submit(
        &self,
        tree: &CourseDraftTree,
        submitter: &Submitter,
    ) -> ApplicationResult<SubmitOutcome> {
        self.submit_at(tree, submitter, Utc::now()).await
    }

    /// [`Self::submit`] with an explicit submission time for the expiry check.
    #[instrument(level = "debug", skip(self, tree), fields(course = %tree.id()))]
    pub async fn submit_at(
        &self,
        tree: &CourseDraftTree,
        submitter: &Submitter,
        now: DateTime<Utc>,
    ) -> ApplicationResult<SubmitOutcome> {
        let violations = validate_at(tree, now);
        if !violations.is_empty() {
            debug!("submission blocked by {} violation(s)", violations.len());
            return Err(ApplicationError::Validation(violations));
        }

        let submission = Submission::build(tree, submitter, &self.settings.payload);
        let created = self
            .store
            .create_course(&submission.payload)
            .await
            .map_err(|e| {
                warn!("course store rejected submission: {}", e);
                ApplicationError::from(e)
            })?;
        info!(
            "submitted course {} as {} ({:?})",
            tree.id(),
            created.id,
            created.status
        );
        Ok(SubmitOutcome {
            created,
            submission,
        })
    }
}
