//! AST-based module metadata discovery using ast-grep
//!
//! Discovery runs in four phases over an ordered set of Rust source files:
//! 1. Scan declared types, their attributes, fields and impl members
//! 2. Extract a manifest from every `#[module]` anchor type
//! 3. Infer routes from `#[belongs_to_module]` controllers
//! 4. Merge both, synthesizing manifests for modules without an anchor
//!
//! Nothing here executes consumer code; everything is read from source text.
pub mod attr_args;
pub mod discovery_types;
pub mod extractor;
pub mod merger;
pub mod naming;
pub mod route_inference;
pub mod symbol_scanner;
pub mod vocabulary;

use modmeta_config::NameConflictPolicy;
use modmeta_logger as logger;
use modmeta_manifest::Manifest;

pub use discovery_types::{DeclaredType, Discard, DiscardReason, Discards, TypeRole};
pub use extractor::ManifestExtractor;
pub use naming::sanitize_identifier;
pub use route_inference::InferredRoutes;
pub use symbol_scanner::{classify, link_declared_types, ScannedFile, SymbolScanner};

/// Output of one discovery pass
#[derive(Debug, Default)]
pub struct DiscoveryResult {
    /// Final manifests: anchors in scan order, then synthesized ones
    pub manifests: Vec<Manifest>,
    pub discards: Vec<Discard>,
    pub types_scanned: usize,
}

/// Discovery orchestrator
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestDiscovery {
    pub policy: NameConflictPolicy,
}

impl ManifestDiscovery {
    pub fn new(policy: NameConflictPolicy) -> Self {
        ManifestDiscovery { policy }
    }

    /// Run discovery over already scanned files, in scan order
    pub fn discover(&self, files: Vec<ScannedFile>) -> DiscoveryResult {
        let types = link_declared_types(files);
        self.discover_types(&types)
    }

    /// Scan `(label, content)` pairs and run discovery
    pub fn discover_sources(&self, sources: &[(String, String)]) -> DiscoveryResult {
        let files = sources
            .iter()
            .map(|(label, content)| SymbolScanner::scan_source(label, content))
            .collect();
        self.discover(files)
    }

    /// Run discovery over linked declared types
    pub fn discover_types(&self, types: &[DeclaredType]) -> DiscoveryResult {
        let start_time = std::time::Instant::now();

        let roles: Vec<TypeRole> = types.iter().map(classify).collect();
        let anchors = roles.iter().filter(|role| role.is_anchor()).count();
        let controllers = roles.iter().filter(|role| role.is_controller()).count();
        if anchors == 0 && controllers == 0 {
            logger::debug(&format!(
                "No module anchors or controllers among {} types",
                types.len()
            ));
            return DiscoveryResult {
                types_scanned: types.len(),
                ..Default::default()
            };
        }
        logger::info(&format!(
            "Found {} module anchors and {} controllers among {} types",
            anchors,
            controllers,
            types.len()
        ));

        let mut discards = Discards::default();

        // Phase 2: anchors
        let extractor = ManifestExtractor::new(self.policy);
        let anchor_manifests: Vec<merger::AnchorManifest> = types
            .iter()
            .zip(&roles)
            .filter(|(_, role)| role.is_anchor())
            .filter_map(|(declared, _)| {
                extractor
                    .extract(declared, &mut discards)
                    .map(|manifest| (declared.label(), manifest))
            })
            .collect();

        // Phase 3: controllers
        let inferred = InferredRoutes::infer(types, &mut discards);

        // Phase 4: merge
        let manifests = merger::merge(anchor_manifests, inferred, &mut discards);

        if !discards.is_empty() {
            logger::debug(&format!("{} annotations discarded", discards.len()));
        }
        logger::info(&format!(
            "Discovery produced {} manifests in {:.2}ms",
            manifests.len(),
            start_time.elapsed().as_secs_f64() * 1000.0
        ));

        DiscoveryResult {
            manifests,
            discards: discards.into_vec(),
            types_scanned: types.len(),
        }
    }
}
