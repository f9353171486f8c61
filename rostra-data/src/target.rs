use crate::projector::ProjectorElement;

/// How a slide wants to be projected by default.
///
/// Built by the code that owns a displayable domain object: which slide
/// renders it, which record it points at, whether it survives navigation
/// and which projection default it prefers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideDescriptor {
    pub name: String,
    pub id: Option<u64>,
    pub stable: bool,
    /// Named projection default (e.g. "agenda") the slide belongs on.
    pub projection_default: Option<String>,
}

impl SlideDescriptor {
    pub fn new(name: impl Into<String>, id: u64) -> Self {
        Self {
            name: name.into(),
            id: Some(id),
            stable: false,
            projection_default: None,
        }
    }

    pub fn stable(mut self) -> Self {
        self.stable = true;
        self
    }

    pub fn with_projection_default(mut self, name: impl Into<String>) -> Self {
        self.projection_default = Some(name.into());
        self
    }
}

/// What a caller asks to project: either a domain object's default slide
/// choice or an element it already holds.
///
/// The variant is discriminated at the call boundary; the coordinator only
/// ever sees the resolved element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionTarget {
    Descriptor(SlideDescriptor),
    Element(ProjectorElement),
}

impl ProjectionTarget {
    /// Resolve the target to the element that would be put on a projector.
    pub fn to_element(&self) -> ProjectorElement {
        match self {
            ProjectionTarget::Descriptor(descriptor) => ProjectorElement {
                name: descriptor.name.clone(),
                id: descriptor.id,
                stable: descriptor.stable,
            },
            ProjectionTarget::Element(element) => element.clone(),
        }
    }

    /// The projection default the target prefers, if it names one.
    pub fn projection_default(&self) -> Option<&str> {
        match self {
            ProjectionTarget::Descriptor(descriptor) => {
                descriptor.projection_default.as_deref()
            }
            ProjectionTarget::Element(_) => None,
        }
    }
}

impl From<ProjectorElement> for ProjectionTarget {
    fn from(element: ProjectorElement) -> Self {
        ProjectionTarget::Element(element)
    }
}

impl From<SlideDescriptor> for ProjectionTarget {
    fn from(descriptor: SlideDescriptor) -> Self {
        ProjectionTarget::Descriptor(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_resolves_to_element() {
        let target: ProjectionTarget = SlideDescriptor::new("motions/motion", 7)
            .with_projection_default("motions")
            .into();
        let element = target.to_element();
        assert_eq!(element.name, "motions/motion");
        assert_eq!(element.id, Some(7));
        assert!(!element.stable);
        assert_eq!(target.projection_default(), Some("motions"));
    }

    #[test]
    fn stable_descriptor_keeps_flag() {
        let target: ProjectionTarget =
            SlideDescriptor::new("agenda/item-list", 1).stable().into();
        assert!(target.to_element().stable);
    }

    #[test]
    fn element_target_resolves_verbatim() {
        let element = ProjectorElement::slide("users/user", 3);
        let target = ProjectionTarget::from(element.clone());
        assert_eq!(target.to_element(), element);
        assert_eq!(target.projection_default(), None);
    }
}
