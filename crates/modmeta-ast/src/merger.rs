//! Merge anchor manifests with inferred routes
//!
//! Inferred routes are appended after a module's explicit routes. Modules that
//! only appear on controllers get a synthesized minimal manifest.

use ahash::AHashMap;
use modmeta_manifest::{module_key, Manifest};
use tracing::debug;

use crate::discovery_types::{DiscardReason, Discards};
use crate::route_inference::InferredRoutes;

/// Anchor manifests paired with the label of the type that declared them
pub type AnchorManifest = (String, Manifest);

/// Produce the final manifest list
///
/// Anchors keep their scan order; synthesized manifests follow in the order
/// their module was first seen on a controller. A later anchor with an
/// already-used name is discarded.
pub fn merge(
    anchors: Vec<AnchorManifest>,
    inferred: InferredRoutes,
    discards: &mut Discards,
) -> Vec<Manifest> {
    let mut manifests: Vec<Manifest> = Vec::with_capacity(anchors.len() + inferred.len());
    let mut by_key: AHashMap<String, usize> = AHashMap::new();

    for (owner, manifest) in anchors {
        let key = module_key(&manifest.name);
        if by_key.contains_key(&key) {
            discards.record(&owner, DiscardReason::DuplicateModule(manifest.name));
            continue;
        }
        by_key.insert(key, manifests.len());
        manifests.push(manifest);
    }

    let mut synthesized = 0usize;
    for module in inferred.into_modules() {
        match by_key.get(&module_key(&module.name)) {
            Some(&idx) => manifests[idx].routes.extend(module.routes),
            None => {
                manifests.push(Manifest::synthesized(&module.name, module.routes));
                synthesized += 1;
            }
        }
    }

    debug!(
        "Merged {} manifests ({} synthesized)",
        manifests.len(),
        synthesized
    );
    manifests
}
