use std::sync::Arc;

use parking_lot::RwLock;

use crate::model::Specification;

/// Lazily built specs, one per inclusion flag.
///
/// The response validator always reads the complete spec while documentation
/// may be written from the public one, so the two are cached independently.
/// Building is idempotent: two threads racing on an empty slot both build
/// and the last write stays.
#[derive(Debug, Default)]
pub struct SpecSnapshots {
    everything: RwLock<Option<Arc<Specification>>>,
    public: RwLock<Option<Arc<Specification>>>,
}

impl SpecSnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, include_excluded: bool) -> &RwLock<Option<Arc<Specification>>> {
        if include_excluded {
            &self.everything
        } else {
            &self.public
        }
    }

    /// The cached spec for `include_excluded`, built with `build` on a miss.
    ///
    /// The lock is not held while building.
    pub fn get_or_build(
        &self,
        include_excluded: bool,
        build: impl FnOnce() -> Specification,
    ) -> Arc<Specification> {
        let slot = self.slot(include_excluded);
        if let Some(spec) = slot.read().as_ref() {
            return Arc::clone(spec);
        }

        let spec = Arc::new(build());
        *slot.write() = Some(Arc::clone(&spec));
        spec
    }

    /// The cached spec, if one has been built.
    pub fn cached(&self, include_excluded: bool) -> Option<Arc<Specification>> {
        self.slot(include_excluded).read().clone()
    }

    /// Drop both cached specs; the next read rebuilds.
    pub fn invalidate(&self) {
        *self.everything.write() = None;
        *self.public.write() = None;
    }
}
