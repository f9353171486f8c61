use std::collections::HashMap;

/// Registry of known slide kinds.
///
/// Maps a slide name to the datastore collection its records live in.
/// Slides without a collection ("core/clock", list slides) render purely
/// from projector state and cannot be mapped back to a domain record.
#[derive(Debug, Clone)]
pub struct SlideRegistry {
    slides: HashMap<String, Option<String>>,
}

impl SlideRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            slides: HashMap::new(),
        }
    }

    /// Register a slide kind, optionally backed by a datastore collection.
    pub fn register(&mut self, name: impl Into<String>, collection: Option<&str>) {
        self.slides
            .insert(name.into(), collection.map(str::to_string));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slides.contains_key(name)
    }

    /// The collection backing a slide, if the slide is registered and
    /// record-backed.
    pub fn collection_for(&self, name: &str) -> Option<&str> {
        self.slides.get(name).and_then(|c| c.as_deref())
    }
}

impl Default for SlideRegistry {
    /// The slide set served by the assembly server.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("agenda/item-list", None);
        registry.register("core/clock", None);
        registry.register("core/countdown", Some("core/countdown"));
        registry.register("core/projector-message", Some("core/projector-message"));
        registry.register("motions/motion", Some("motions/motion"));
        registry.register("motions/motion-block", Some("motions/motion-block"));
        registry.register("topics/topic", Some("topics/topic"));
        registry.register("users/user", Some("users/user"));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_knows_record_backed_slides() {
        let registry = SlideRegistry::default();
        assert_eq!(
            registry.collection_for("motions/motion"),
            Some("motions/motion")
        );
        assert!(registry.contains("core/clock"));
        assert_eq!(registry.collection_for("core/clock"), None);
    }

    #[test]
    fn unknown_slide_is_neither_contained_nor_mappable() {
        let registry = SlideRegistry::default();
        assert!(!registry.contains("assignments/assignment"));
        assert_eq!(registry.collection_for("assignments/assignment"), None);
    }

    #[test]
    fn register_extends_the_set() {
        let mut registry = SlideRegistry::default();
        registry.register("assignments/assignment", Some("assignments/assignment"));
        assert_eq!(
            registry.collection_for("assignments/assignment"),
            Some("assignments/assignment")
        );
    }
}
