use std::collections::BTreeSet;

use crate::types::SurfaceId;

/// Surfaces currently inside (or within the margin of) the viewport.
///
/// Maintained from host intersection callbacks between ticks; the render tick
/// only reads it.
#[derive(Debug, Clone, Default)]
pub struct VisibilitySet {
    visible: BTreeSet<SurfaceId>,
}

impl VisibilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one intersection change. Returns whether membership changed.
    pub fn set_visible(&mut self, id: SurfaceId, visible: bool) -> bool {
        if visible {
            self.visible.insert(id)
        } else {
            self.visible.remove(&id)
        }
    }

    pub fn is_visible(&self, id: SurfaceId) -> bool {
        self.visible.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn clear(&mut self) {
        self.visible.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_membership_changes() {
        let mut set = VisibilitySet::new();
        assert!(set.is_empty());
        assert!(set.set_visible(SurfaceId(1), true));
        assert!(!set.set_visible(SurfaceId(1), true));
        assert!(set.set_visible(SurfaceId(2), true));
        assert!(set.set_visible(SurfaceId(1), false));
        assert!(!set.is_visible(SurfaceId(1)));
        assert!(set.is_visible(SurfaceId(2)));
        set.clear();
        assert!(set.is_empty());
    }
}
