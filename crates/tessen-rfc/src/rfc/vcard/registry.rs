//! Scribe lookup by property name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::rfc::vcard::scribe::{
    AddressScribe, BinaryScribe, ClientPidMapScribe, DateOrTimeScribe, ExtendedScribe,
    GenderScribe, GeoScribe, KindScribe, LanguageScribe, OrganizationScribe, StructuredNameScribe,
    TelephoneScribe, TextListScribe, TextOrUriScribe, TextScribe, TimestampScribe, TimezoneScribe,
    UidScribe, UriScribe, VCardPropertyScribe,
};

/// Maps uppercase property names to scribes.
///
/// Registering a scribe under an existing name replaces the built-in for both
/// reading and writing. Names with no scribe resolve to an [`ExtendedScribe`].
#[derive(Debug, Clone)]
pub struct ScribeRegistry {
    scribes: HashMap<String, Arc<dyn VCardPropertyScribe>>,
}

impl ScribeRegistry {
    /// Creates a registry holding every built-in scribe.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for scribe in TextScribe::builtins() {
            registry.register(scribe);
        }
        for scribe in UriScribe::builtins() {
            registry.register(scribe);
        }
        registry.register(UidScribe);
        registry.register(TextListScribe::nickname());
        registry.register(TextListScribe::categories());
        registry.register(LanguageScribe);
        registry.register(KindScribe);
        registry.register(StructuredNameScribe);
        registry.register(AddressScribe);
        registry.register(OrganizationScribe);
        registry.register(GenderScribe);
        registry.register(ClientPidMapScribe);
        registry.register(TelephoneScribe);
        registry.register(GeoScribe);
        registry.register(TimezoneScribe);
        registry.register(DateOrTimeScribe::birthday());
        registry.register(DateOrTimeScribe::anniversary());
        registry.register(DateOrTimeScribe::deathdate());
        registry.register(TimestampScribe);
        registry.register(BinaryScribe::photo());
        registry.register(BinaryScribe::logo());
        registry.register(BinaryScribe::sound());
        registry.register(BinaryScribe::key());
        registry.register(TextOrUriScribe::related());
        registry.register(TextOrUriScribe::birthplace());
        registry.register(TextOrUriScribe::deathplace());
        registry
    }

    /// Creates a registry with no scribes; every property is extended.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            scribes: HashMap::new(),
        }
    }

    /// Adds a scribe, replacing any registered under the same name.
    pub fn register(&mut self, scribe: impl VCardPropertyScribe + 'static) {
        self.register_arc(Arc::new(scribe));
    }

    pub fn register_arc(&mut self, scribe: Arc<dyn VCardPropertyScribe>) {
        let name = scribe.property_name().to_ascii_uppercase();
        tracing::trace!(property = %name, "Registering scribe");
        self.scribes.insert(name, scribe);
    }

    /// Removes the scribe for `name`, returning it.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn VCardPropertyScribe>> {
        self.scribes.remove(&name.to_ascii_uppercase())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn VCardPropertyScribe>> {
        self.scribes.get(&name.to_ascii_uppercase()).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.scribes.contains_key(&name.to_ascii_uppercase())
    }

    /// Returns the scribe for `name`, or a passthrough scribe when none is
    /// registered.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Arc<dyn VCardPropertyScribe> {
        self.get(name)
            .unwrap_or_else(|| Arc::new(ExtendedScribe::new(name)))
    }

    /// Returns the scribe for an xCard element local name (`fn`, `x-salary`).
    #[must_use]
    pub fn resolve_xml(&self, local_name: &str) -> Arc<dyn VCardPropertyScribe> {
        self.resolve(local_name)
    }

    /// Number of registered scribes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scribes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scribes.is_empty()
    }
}

impl Default for ScribeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
