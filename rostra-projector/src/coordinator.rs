use std::sync::Arc;

use tracing::debug;

use rostra_data::{
    Datastore, ProjectionTarget, Projector, ProjectorElement, SlideRegistry,
};

use crate::client::{ProjectRequest, ProjectorApi};
use crate::error::{ProjectionError, Result};
use crate::plan;

/// Decides which elements belong on which projector and persists every
/// intent with exactly one request.
///
/// The stored projector record is fully mutated before the persistence
/// call is awaited, so overlapping intents observe the already-mutated
/// local state. The server's reply arrives later through the datastore's
/// change stream and is the authoritative reconciliation.
pub struct ProjectorCoordinator {
    store: Arc<Datastore>,
    api: ProjectorApi,
    registry: SlideRegistry,
}

impl ProjectorCoordinator {
    pub fn new(store: Arc<Datastore>, api: ProjectorApi, registry: SlideRegistry) -> Self {
        Self {
            store,
            api,
            registry,
        }
    }

    /// True iff the target is live on any known projector.
    pub fn is_projected(&self, target: &ProjectionTarget) -> bool {
        let element = target.to_element();
        self.store
            .get_projectors()
            .iter()
            .any(|projector| projector.is_element_shown(&element))
    }

    /// True iff the target is live on the given projector.
    pub fn is_projected_on(&self, target: &ProjectionTarget, projector_id: u64) -> bool {
        let element = target.to_element();
        self.store
            .get_projector(projector_id)
            .is_some_and(|projector| projector.is_element_shown(&element))
    }

    /// All projectors the target is currently live on.
    pub fn projectors_showing(&self, target: &ProjectionTarget) -> Vec<Projector> {
        let element = target.to_element();
        self.store
            .get_projectors()
            .into_iter()
            .filter(|projector| projector.is_element_shown(&element))
            .collect()
    }

    /// The projector bound to a named projection default.
    pub fn projector_for_default(&self, name: &str) -> Option<Projector> {
        self.store
            .get_projectors()
            .into_iter()
            .find(|projector| projector.has_projection_default(name))
    }

    /// Resolve the domain record behind an element, for slide rendering.
    pub fn model_for_element(&self, element: &ProjectorElement) -> Result<serde_json::Value> {
        if !self.registry.contains(&element.name) {
            return Err(ProjectionError::UnknownSlide(element.name.clone()));
        }
        let collection = self
            .registry
            .collection_for(&element.name)
            .ok_or_else(|| ProjectionError::SlideNotMappable(element.name.clone()))?;
        let id = element
            .id
            .ok_or_else(|| ProjectionError::MissingElementId(element.name.clone()))?;
        self.store
            .get_model(collection, id)
            .ok_or_else(|| ProjectionError::ModelNotFound {
                collection: collection.to_string(),
                id,
            })
    }

    /// Put the target on the given projector.
    pub async fn project_on(&self, projector_id: u64, target: &ProjectionTarget) -> Result<()> {
        let element = target.to_element();
        let request = self
            .store
            .with_projector_mut(projector_id, |projector| {
                plan::plan_project(projector, element)
            })?;
        self.persist(projector_id, request).await
    }

    /// Take the target off the given projector.
    pub async fn remove_from(&self, projector_id: u64, target: &ProjectionTarget) -> Result<()> {
        let element = target.to_element();
        let request = self
            .store
            .with_projector_mut(projector_id, |projector| {
                plan::plan_remove(projector, &element)
            })?;
        self.persist(projector_id, request).await
    }

    /// Show the target on every allow-listed projector and take it off
    /// every other projector it is currently live on.
    pub async fn project_on_multiple(
        &self,
        allowed: &[u64],
        target: &ProjectionTarget,
    ) -> Result<()> {
        let element = target.to_element();
        for projector in self.store.get_projectors() {
            if allowed.contains(&projector.id) {
                self.project_on(projector.id, target).await?;
            } else if projector.is_element_shown(&element) {
                self.remove_from(projector.id, target).await?;
            }
        }
        Ok(())
    }

    /// Advance to the first queued preview slide.
    pub async fn project_next_slide(&self, projector_id: u64) -> Result<()> {
        self.project_preview_slide(projector_id, 0).await
    }

    /// Project the preview element at the given queue position.
    pub async fn project_preview_slide(&self, projector_id: u64, index: usize) -> Result<()> {
        let request = self
            .store
            .with_projector_mut(projector_id, |projector| {
                plan::plan_preview_slide(projector, index)
            })?;
        self.persist(projector_id, request).await
    }

    /// Recall the most recently shown slide from the history.
    pub async fn project_previous_slide(&self, projector_id: u64) -> Result<()> {
        let request = self
            .store
            .with_projector_mut(projector_id, plan::plan_previous_slide)?;
        self.persist(projector_id, request).await
    }

    /// Persist the preview queue after local reordering.
    pub async fn save_preview(&self, projector_id: u64) -> Result<()> {
        let projector = self
            .store
            .get_projector(projector_id)
            .ok_or(rostra_data::UnknownProjector(projector_id))?;
        let request = plan::plan_save_preview(&projector);
        self.api.project(projector_id, &request).await
    }

    /// Append an element to the preview queue and persist it.
    pub async fn add_element_to_preview(
        &self,
        projector_id: u64,
        element: ProjectorElement,
    ) -> Result<()> {
        let request = self
            .store
            .with_projector_mut(projector_id, |projector| {
                Some(plan::plan_queue_element(projector, element))
            })?;
        self.persist(projector_id, request).await
    }

    async fn persist(&self, projector_id: u64, request: Option<ProjectRequest>) -> Result<()> {
        match request {
            Some(request) => self.api.project(projector_id, &request).await,
            None => {
                debug!(projector = projector_id, "projection unchanged, nothing to persist");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The query side of the coordinator never touches the transport, so a
    // client pointed at an unreachable address is fine here.
    fn coordinator_over(store: Arc<Datastore>) -> ProjectorCoordinator {
        ProjectorCoordinator::new(
            store,
            ProjectorApi::new("http://127.0.0.1:0"),
            SlideRegistry::default(),
        )
    }

    fn motion_element(id: u64) -> ProjectorElement {
        ProjectorElement::slide("motions/motion", id)
    }

    fn store_with_projectors() -> Arc<Datastore> {
        let store = Datastore::new();
        let mut main = Projector::new(1, "main");
        main.elements = vec![motion_element(4)];
        main.projection_defaults = vec![rostra_data::ProjectionDefault {
            id: 1,
            name: "motions".into(),
            display_name: "Motions".into(),
        }];
        store.apply_projector(main);
        store.apply_projector(Projector::new(2, "side"));
        store
    }

    #[test]
    fn is_projected_checks_every_projector() {
        let coordinator = coordinator_over(store_with_projectors());
        let shown = ProjectionTarget::Element(motion_element(4));
        let absent = ProjectionTarget::Element(motion_element(5));

        assert!(coordinator.is_projected(&shown));
        assert!(!coordinator.is_projected(&absent));
        assert!(coordinator.is_projected_on(&shown, 1));
        assert!(!coordinator.is_projected_on(&shown, 2));
        assert!(!coordinator.is_projected_on(&shown, 9));
    }

    #[test]
    fn projectors_showing_returns_only_matching_projectors() {
        let coordinator = coordinator_over(store_with_projectors());
        let target = ProjectionTarget::Element(motion_element(4));

        let showing = coordinator.projectors_showing(&target);
        assert_eq!(showing.len(), 1);
        assert_eq!(showing[0].id, 1);
    }

    #[test]
    fn projector_for_default_resolves_by_name() {
        let coordinator = coordinator_over(store_with_projectors());
        assert_eq!(coordinator.projector_for_default("motions").unwrap().id, 1);
        assert!(coordinator.projector_for_default("agenda").is_none());
    }

    #[test]
    fn model_for_element_fetches_the_backing_record() {
        let store = store_with_projectors();
        store.apply_model(
            "motions/motion",
            4,
            serde_json::json!({"id": 4, "title": "Budget"}),
        );
        let coordinator = coordinator_over(store);

        let record = coordinator.model_for_element(&motion_element(4)).unwrap();
        assert_eq!(record["title"], "Budget");
    }

    #[test]
    fn model_for_element_rejects_unregistered_slides() {
        let coordinator = coordinator_over(store_with_projectors());
        let element = ProjectorElement::slide("assignments/assignment", 1);

        assert!(matches!(
            coordinator.model_for_element(&element),
            Err(ProjectionError::UnknownSlide(_))
        ));
    }

    #[test]
    fn model_for_element_rejects_slides_without_a_collection() {
        let coordinator = coordinator_over(store_with_projectors());
        let element = ProjectorElement::stable("core/clock");

        assert!(matches!(
            coordinator.model_for_element(&element),
            Err(ProjectionError::SlideNotMappable(_))
        ));
    }

    #[test]
    fn model_for_element_requires_an_id() {
        let coordinator = coordinator_over(store_with_projectors());
        let element = ProjectorElement {
            name: "motions/motion".into(),
            id: None,
            stable: false,
        };

        assert!(matches!(
            coordinator.model_for_element(&element),
            Err(ProjectionError::MissingElementId(_))
        ));
    }

    #[test]
    fn model_for_element_reports_missing_records() {
        let coordinator = coordinator_over(store_with_projectors());

        assert!(matches!(
            coordinator.model_for_element(&motion_element(4)),
            Err(ProjectionError::ModelNotFound { id: 4, .. })
        ));
    }
}
