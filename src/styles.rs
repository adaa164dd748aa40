//! Registry of page-global `<style>` blocks.
//!
//! Views that need global CSS (the map popup skin) acquire a [`StyleGuard`]
//! when their page session mounts. The layout renders every registered style
//! into the page head. Registration is reference counted per style id and
//! the last guard to drop removes the style, so repeated or overlapping
//! mounts never leave duplicates behind.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

// ---

#[derive(Debug)]
struct Entry {
    css: &'static str,
    refs: usize,
}

/// Shared, cloneable registry of active global styles.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    inner: Arc<Mutex<BTreeMap<&'static str, Entry>>>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<&'static str, Entry>> {
        // ---
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register `css` under `id` for as long as the returned guard lives.
    pub fn acquire(&self, id: &'static str, css: &'static str) -> StyleGuard {
        // ---
        let mut styles = self.lock();
        let entry = styles.entry(id).or_insert(Entry { css, refs: 0 });
        entry.refs += 1;
        tracing::debug!(style = id, refs = entry.refs, "style acquired");

        StyleGuard {
            registry: self.clone(),
            id,
        }
    }

    fn release(&self, id: &'static str) {
        // ---
        let mut styles = self.lock();
        let Some(entry) = styles.get_mut(id) else {
            return;
        };
        entry.refs -= 1;
        tracing::debug!(style = id, refs = entry.refs, "style released");
        if entry.refs == 0 {
            styles.remove(id);
        }
    }

    /// Number of distinct style blocks currently injected.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// `(id, css)` for every active style, ordered by id.
    pub fn active(&self) -> Vec<(&'static str, &'static str)> {
        self.lock().iter().map(|(id, e)| (*id, e.css)).collect()
    }
}

/// Keeps a style registered until dropped.
#[derive(Debug)]
pub struct StyleGuard {
    registry: StyleRegistry,
    id: &'static str,
}

impl StyleGuard {
    pub fn id(&self) -> &'static str {
        self.id
    }
}

impl Drop for StyleGuard {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    const CSS: &str = ".popup { border-radius: 8px; }";

    #[test]
    fn test_guard_removes_style_on_drop() {
        // ---
        let registry = StyleRegistry::new();
        {
            let guard = registry.acquire("popup", CSS);
            assert_eq!(guard.id(), "popup");
            assert_eq!(registry.count(), 1);
            assert_eq!(registry.active(), vec![("popup", CSS)]);
        }
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_overlapping_guards_inject_once() {
        // ---
        let registry = StyleRegistry::new();
        let a = registry.acquire("popup", CSS);
        let b = registry.acquire("popup", CSS);
        assert_eq!(registry.count(), 1);

        drop(a);
        assert_eq!(registry.count(), 1);
        drop(b);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_mount_unmount_twice_leaves_no_duplicates() {
        // ---
        let registry = StyleRegistry::new();
        let _unrelated = registry.acquire("base", "body { margin: 0; }");
        let before = registry.count();

        for _ in 0..2 {
            let guard = registry.acquire("popup", CSS);
            assert_eq!(registry.count(), before + 1);
            drop(guard);
        }

        assert_eq!(registry.count(), before);
    }
}
