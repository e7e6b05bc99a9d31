use tracing::{debug, trace, warn};

use super::{ObjectId, Scene};

/// Outcome of one [`Scene::update_objects`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Objects moved from Dirty to Clean, in handle order.
    pub committed: Vec<ObjectId>,
    /// Objects whose commit failed; they stay Dirty.
    pub failed: Vec<ObjectId>,
}

impl UpdateReport {
    /// Whether the pass changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty() && self.failed.is_empty()
    }
}

impl Scene {
    /// Commits every Dirty object: surfaces are re-tessellated and their
    /// patch hierarchies rebuilt, bounds are refreshed, and the object
    /// becomes Clean.
    ///
    /// Run once per frame after edits. Only queued handles are visited, so
    /// a second call without intervening edits does nothing. A failed commit
    /// is logged, the object stays Dirty and is retried next pass.
    pub fn update_objects(&mut self) -> UpdateReport {
        let mut report = UpdateReport::default();
        let params = self.params;

        for id in std::mem::take(&mut self.pending) {
            let Some(object) = self
                .handles
                .get(&id)
                .and_then(|key| self.objects.get_mut(*key))
            else {
                continue;
            };
            if !object.is_dirty() {
                continue;
            }

            match object.commit(&params) {
                Ok(()) => {
                    trace!(%id, kind = object.primitive().kind_name(), "object committed");
                    report.committed.push(id);
                }
                Err(err) => {
                    warn!(%id, error = %err, "commit failed, object stays dirty");
                    report.failed.push(id);
                }
            }
        }
        self.pending.extend(report.failed.iter().copied());

        if !report.is_empty() {
            debug!(
                committed = report.committed.len(),
                failed = report.failed.len(),
                "scene updated"
            );
        }
        report
    }
}
