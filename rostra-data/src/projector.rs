use serde::{Deserialize, Serialize};

/// A single displayable unit on a projector.
///
/// The `name` tags the slide kind (e.g. `"motions/motion"`), the optional
/// `id` points at the domain record behind it, and `stable` marks elements
/// that survive slide navigation (banners, countdowns) as opposed to the
/// current slide, which is swapped out on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectorElement {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub stable: bool,
}

impl ProjectorElement {
    /// A non-stable element for the given slide kind and record.
    pub fn slide(name: impl Into<String>, id: u64) -> Self {
        Self {
            name: name.into(),
            id: Some(id),
            stable: false,
        }
    }

    /// A stable element without a backing record (e.g. `"core/clock"`).
    pub fn stable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            stable: true,
        }
    }

    /// Elements are identified by `(name, id)`; the `stable` flag and any
    /// display options do not participate in identity.
    pub fn same_identity(&self, other: &ProjectorElement) -> bool {
        self.name == other.name && self.id == other.id
    }
}

/// A named default binding ("agenda", "motions", ...) resolving which
/// projector is responsible for a slide category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionDefault {
    pub id: u64,
    pub name: String,
    pub display_name: String,
}

/// A projector record as the server serializes it.
///
/// `elements` is the live projection, `elements_preview` the queue of
/// upcoming slides and `elements_history` a stack of frames of previously
/// shown elements, most recent last. The server is the system of record;
/// clients mutate a local copy and persist the new element lists, and the
/// server's change stream overwrites local state on the next sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projector {
    pub id: u64,
    pub name: String,

    #[serde(default)]
    pub elements: Vec<ProjectorElement>,
    #[serde(default)]
    pub elements_preview: Vec<ProjectorElement>,
    #[serde(default)]
    pub elements_history: Vec<Vec<ProjectorElement>>,

    #[serde(rename = "projectiondefaults", default)]
    pub projection_defaults: Vec<ProjectionDefault>,

    #[serde(default)]
    pub scale: i32,
    #[serde(default)]
    pub scroll: i32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    1024
}

fn default_height() -> u32 {
    768
}

impl Projector {
    /// A projector with empty element lists and default dimensions.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            elements: Vec::new(),
            elements_preview: Vec::new(),
            elements_history: Vec::new(),
            projection_defaults: Vec::new(),
            scale: 0,
            scroll: 0,
            width: default_width(),
            height: default_height(),
        }
    }

    /// True if an element with the same identity is currently live.
    pub fn is_element_shown(&self, element: &ProjectorElement) -> bool {
        self.elements.iter().any(|e| e.same_identity(element))
    }

    /// True if this projector serves the given projection default.
    pub fn has_projection_default(&self, name: &str) -> bool {
        self.projection_defaults.iter().any(|pd| pd.name == name)
    }

    /// Add an element to the live projection.
    ///
    /// Idempotent: an element whose identity is already shown is not
    /// re-added.
    pub fn add_element(&mut self, element: ProjectorElement) {
        if !self.is_element_shown(&element) {
            self.elements.push(element);
        }
    }

    /// Remove every live element with the same identity, returning the
    /// removed elements in order.
    pub fn remove_matching(&mut self, element: &ProjectorElement) -> Vec<ProjectorElement> {
        let (kept, removed) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|e| !e.same_identity(element));
        self.elements = kept;
        removed
    }

    /// Remove every non-stable live element, returning the removed
    /// elements in order.
    pub fn remove_non_stable(&mut self) -> Vec<ProjectorElement> {
        let (kept, removed) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|e| e.stable);
        self.elements = kept;
        removed
    }
}
