//! Write-once source registration table.
//!
//! The table is filled during setup through [`HubBuilder`](super::HubBuilder)
//! and frozen when the hub is built, so lookups on the dispatch path need no
//! locking.

use super::error::HubError;
use crate::detection::SourceIndex;

/// Number of slots in the registration table.
///
/// Valid indices are `0..MAX_SOURCES`.
pub const MAX_SOURCES: usize = 64;

/// Binding of a detection source to its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistration {
    /// Index carried by every batch from this source.
    pub index: SourceIndex,
    /// Source name, for logs and status output.
    pub name: String,
}

/// Table of registered sources, in registration order.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    entries: Vec<SourceRegistration>,
    slots: [bool; MAX_SOURCES],
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            slots: [false; MAX_SOURCES],
        }
    }

    /// Bind `name` to `index`.
    ///
    /// # Errors
    ///
    /// - [`HubError::IndexOutOfRange`] if `index >= MAX_SOURCES`
    /// - [`HubError::DuplicateSource`] if the index is already bound
    pub(crate) fn register(
        &mut self,
        index: SourceIndex,
        name: impl Into<String>,
    ) -> Result<(), HubError> {
        let slot = index.get();
        if slot >= MAX_SOURCES {
            return Err(HubError::IndexOutOfRange {
                index,
                max: MAX_SOURCES,
            });
        }
        if self.slots[slot] {
            let existing = self
                .get(index)
                .map(|entry| entry.name.clone())
                .unwrap_or_default();
            return Err(HubError::DuplicateSource { index, existing });
        }

        self.slots[slot] = true;
        self.entries.push(SourceRegistration {
            index,
            name: name.into(),
        });
        Ok(())
    }

    /// Whether `index` is bound to a source.
    pub fn contains(&self, index: SourceIndex) -> bool {
        self.slots.get(index.get()).copied().unwrap_or(false)
    }

    /// Registration for `index`, if any.
    pub fn get(&self, index: SourceIndex) -> Option<&SourceRegistration> {
        self.entries.iter().find(|entry| entry.index == index)
    }

    /// Registrations in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, SourceRegistration> {
        self.entries.iter()
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no source is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = SourceRegistry::new();
        registry.register(SourceIndex(0), "left").unwrap();
        registry.register(SourceIndex(5), "right").unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(SourceIndex(0)));
        assert!(registry.contains(SourceIndex(5)));
        assert!(!registry.contains(SourceIndex(1)));
        assert_eq!(registry.get(SourceIndex(5)).unwrap().name, "right");
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let mut registry = SourceRegistry::new();
        registry.register(SourceIndex(1), "first").unwrap();
        let err = registry.register(SourceIndex(1), "second").unwrap_err();

        assert_eq!(
            err,
            HubError::DuplicateSource {
                index: SourceIndex(1),
                existing: "first".to_string(),
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut registry = SourceRegistry::new();
        let err = registry
            .register(SourceIndex(MAX_SOURCES), "too-far")
            .unwrap_err();
        assert!(matches!(err, HubError::IndexOutOfRange { .. }));
        assert!(registry.is_empty());
        assert!(!registry.contains(SourceIndex(MAX_SOURCES + 10)));
    }

    #[test]
    fn test_iter_keeps_registration_order() {
        let mut registry = SourceRegistry::new();
        registry.register(SourceIndex(3), "c").unwrap();
        registry.register(SourceIndex(0), "a").unwrap();
        let names: Vec<&str> = registry.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a"]);
    }
}
