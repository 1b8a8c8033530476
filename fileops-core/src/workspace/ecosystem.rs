use std::path::{Path, PathBuf};

use fileops_config::WorkspaceType;
use fileops_config::constants::manifests;

/// Manifest an ecosystem writes after its files are in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestStep {
    None,
    PackageJson,
    GoModule,
}

/// Layout conventions of one ecosystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcosystemProfile {
    pub tag: WorkspaceType,
    pub label: &'static str,
    /// Where bindings land, relative to the root. `None` copies into the root.
    pub bindings_subdir: Option<&'static str>,
    pub manifest: ManifestStep,
}

impl EcosystemProfile {
    pub fn bindings_destination(&self, root: &Path) -> PathBuf {
        match self.bindings_subdir {
            Some(subdir) => root.join(subdir),
            None => root.to_path_buf(),
        }
    }
}

const GENERIC: EcosystemProfile = EcosystemProfile {
    tag: WorkspaceType::Generic,
    label: "Generic",
    bindings_subdir: None,
    manifest: ManifestStep::None,
};

const PROFILES: [EcosystemProfile; 5] = [
    EcosystemProfile {
        tag: WorkspaceType::Rust,
        label: "Rust",
        bindings_subdir: None,
        manifest: ManifestStep::None,
    },
    EcosystemProfile {
        tag: WorkspaceType::Go,
        label: "Go",
        bindings_subdir: None,
        manifest: ManifestStep::GoModule,
    },
    EcosystemProfile {
        tag: WorkspaceType::Cpp,
        label: "C++",
        bindings_subdir: Some(manifests::BINDINGS_DIR),
        manifest: ManifestStep::None,
    },
    EcosystemProfile {
        tag: WorkspaceType::JavaScript,
        label: "JavaScript",
        bindings_subdir: None,
        manifest: ManifestStep::PackageJson,
    },
    GENERIC,
];

pub fn profile_for(tag: WorkspaceType) -> EcosystemProfile {
    PROFILES
        .iter()
        .copied()
        .find(|profile| profile.tag == tag)
        .unwrap_or(GENERIC)
}
