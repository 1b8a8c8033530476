//! Ecosystem-aware workspace preparation.
//!
//! Descriptors are expanded into a [`BatchRequest`] up front, so workspace
//! preparation runs through exactly the same validation and execution path
//! as a batch document.

mod ecosystem;
mod manifest;

use std::path::{Component, Path, PathBuf};

use fileops_commons::{FileOpsError, Result};
use fileops_config::constants::manifests;
use fileops_config::{
    CppWorkspaceConfig, FileSpec, GoModuleConfig, PackageConfig, WorkspaceDescriptor,
};

use crate::batch::{BatchRequest, Operation};
use crate::security::RequestPolicy;

pub use ecosystem::{EcosystemProfile, ManifestStep, profile_for};
pub use manifest::{render_go_mod, render_package_json};

/// Relative destination of a file spec: the explicit destination, else the
/// last two path segments when structure is preserved, else the file name.
pub fn destination_name(spec: &FileSpec) -> Result<PathBuf> {
    if let Some(destination) = spec.destination.as_deref().filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(destination));
    }

    let segments: Vec<&std::ffi::OsStr> = Path::new(&spec.source)
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment),
            _ => None,
        })
        .collect();
    let keep = if spec.preserve_structure { 2 } else { 1 };
    let tail = segments
        .len()
        .checked_sub(keep)
        .and_then(|start| segments.get(start..))
        .unwrap_or(&segments);
    if tail.is_empty() {
        return Err(FileOpsError::schema(format!(
            "cannot derive a file name from source {:?}",
            spec.source
        )));
    }
    Ok(tail.iter().collect())
}

fn require_absolute_source(raw: &str, role: &str) -> Result<PathBuf> {
    let path = PathBuf::from(raw);
    if raw.is_empty() || !path.is_absolute() {
        return Err(FileOpsError::schema(format!(
            "{role} must be an absolute path: {raw:?}"
        )));
    }
    Ok(path)
}

fn file_spec_operation(spec: &FileSpec, root: &Path) -> Result<Operation> {
    let source = require_absolute_source(&spec.source, "file source")?;
    Ok(Operation::CopyFile {
        source,
        destination: root.join(destination_name(spec)?),
        preserve_permissions: spec.preserve_permissions,
    })
}

fn push_file_specs(request: &mut BatchRequest, specs: &[FileSpec]) -> Result<()> {
    for spec in specs {
        let operation = file_spec_operation(spec, &request.workspace_root)?;
        request.push(operation);
    }
    Ok(())
}

fn push_go_module(request: &mut BatchRequest, config: &GoModuleConfig) -> Result<()> {
    push_file_specs(request, &config.sources)?;
    let go_mod = request.workspace_root.join(manifests::GO_MOD);
    match config.go_mod_file.as_deref() {
        Some(existing) => request.push(Operation::copy_file(
            require_absolute_source(existing, "go_mod_file")?,
            go_mod,
        )),
        None => request.push(Operation::write_file(go_mod, render_go_mod(config))),
    }
    if let Some(wit) = config.wit_file.as_deref() {
        request.push(Operation::copy_file(
            require_absolute_source(wit, "wit_file")?,
            request.workspace_root.join(manifests::COMPONENT_WIT),
        ));
    }
    Ok(())
}

fn push_package_json(request: &mut BatchRequest, config: &PackageConfig) -> Result<()> {
    let rendered = render_package_json(config)?;
    request.push(Operation::write_file(
        request.workspace_root.join(manifests::PACKAGE_JSON),
        rendered,
    ));
    Ok(())
}

/// Expand a descriptor: sources, headers, dependencies, optional bindings,
/// then the ecosystem's manifest step. A missing bindings directory is
/// skipped at run time rather than failing the workspace.
pub fn expand_workspace(descriptor: &WorkspaceDescriptor) -> Result<BatchRequest> {
    let profile = profile_for(descriptor.workspace_type);
    let mut request = BatchRequest::new(&descriptor.work_dir);
    if let Some(security) = &descriptor.security_config {
        request = request.with_policy(RequestPolicy::from_security_config(security));
    }

    push_file_specs(&mut request, &descriptor.sources)?;
    push_file_specs(&mut request, &descriptor.headers)?;
    push_file_specs(&mut request, &descriptor.dependencies)?;

    if let Some(bindings) = descriptor.bindings_dir.as_deref().filter(|dir| !dir.is_empty()) {
        let destination = profile.bindings_destination(&request.workspace_root);
        request.push(Operation::CopyDirectory {
            source: require_absolute_source(bindings, "bindings_dir")?,
            destination,
            optional: true,
        });
    }

    match profile.manifest {
        ManifestStep::None => {}
        ManifestStep::PackageJson => {
            if let Some(package) = &descriptor.package {
                push_package_json(&mut request, package)?;
            }
        }
        ManifestStep::GoModule => {
            if let Some(module) = &descriptor.go_module {
                push_go_module(&mut request, module)?;
            }
        }
    }
    Ok(request)
}

pub fn copy_files_request(specs: &[FileSpec], dest_dir: &str) -> Result<BatchRequest> {
    let mut request = BatchRequest::new(dest_dir);
    push_file_specs(&mut request, specs)?;
    Ok(request)
}

pub fn copy_bindings_request(bindings_dir: &str, dest_dir: &str) -> Result<BatchRequest> {
    let source = require_absolute_source(bindings_dir, "bindings_dir")?;
    Ok(BatchRequest::new(dest_dir).with_operation(Operation::CopyDirectory {
        source,
        destination: PathBuf::from(dest_dir),
        optional: false,
    }))
}

pub fn package_json_request(config: &PackageConfig, work_dir: &str) -> Result<BatchRequest> {
    let mut request = BatchRequest::new(work_dir);
    push_package_json(&mut request, config)?;
    Ok(request)
}

pub fn go_module_request(config: &GoModuleConfig, work_dir: &str) -> Result<BatchRequest> {
    let mut request = BatchRequest::new(work_dir);
    push_go_module(&mut request, config)?;
    Ok(request)
}

/// Sources, headers and dependency headers, then bindings under
/// `bindings/`. Unlike descriptor expansion, a missing bindings directory is
/// an error here.
pub fn cpp_workspace_request(config: &CppWorkspaceConfig, work_dir: &str) -> Result<BatchRequest> {
    let mut request = BatchRequest::new(work_dir);
    push_file_specs(&mut request, &config.sources)?;
    push_file_specs(&mut request, &config.headers)?;
    push_file_specs(&mut request, &config.dependency_headers)?;
    if let Some(bindings) = config.bindings_dir.as_deref().filter(|dir| !dir.is_empty()) {
        request.push(Operation::CopyDirectory {
            source: require_absolute_source(bindings, "bindings_dir")?,
            destination: request.workspace_root.join(manifests::BINDINGS_DIR),
            optional: false,
        });
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fileops_commons::ErrorKind;
    use fileops_config::WorkspaceType;
    use pretty_assertions::assert_eq;

    #[test]
    fn destination_override_wins_over_preserved_structure() {
        let spec = FileSpec::new("/src/include/foundation/types.h")
            .with_destination("api/public.h")
            .preserving_structure();
        assert_eq!(destination_name(&spec).unwrap(), PathBuf::from("api/public.h"));

        let flat = FileSpec::new("/src/include/foundation/types.h")
            .preserving_structure()
            .with_destination("renamed.h");
        assert_eq!(destination_name(&flat).unwrap(), PathBuf::from("renamed.h"));

        let descriptor = WorkspaceDescriptor {
            work_dir: "/abs/ws".to_string(),
            headers: vec![spec],
            ..WorkspaceDescriptor::default()
        };
        let request = expand_workspace(&descriptor).unwrap();
        assert_eq!(
            request.operations,
            vec![Operation::copy_file(
                "/src/include/foundation/types.h",
                "/abs/ws/api/public.h"
            )]
        );
    }

    #[test]
    fn destination_naming_rules() {
        assert_eq!(
            destination_name(&FileSpec::new("/src/include/foundation/types.h")).unwrap(),
            PathBuf::from("types.h")
        );
        assert_eq!(
            destination_name(&FileSpec::new("/src/include/foundation/types.h").preserving_structure())
                .unwrap(),
            PathBuf::from("foundation/types.h")
        );
        assert_eq!(
            destination_name(&FileSpec::new("/types.h").preserving_structure()).unwrap(),
            PathBuf::from("types.h")
        );
        assert_eq!(
            destination_name(
                &FileSpec::new("/src/include/foundation/types.h")
                    .preserving_structure()
                    .with_destination("api/types.h")
            )
            .unwrap(),
            PathBuf::from("api/types.h")
        );
        assert_eq!(
            destination_name(&FileSpec::new("/")).unwrap_err().kind(),
            ErrorKind::SchemaError
        );
    }

    #[test]
    fn cpp_descriptor_expands_in_order() {
        let descriptor = WorkspaceDescriptor {
            work_dir: "/abs/ws".to_string(),
            sources: vec![FileSpec::new("/src/main.cpp")],
            headers: vec![FileSpec::new("/src/include/util/a.h").preserving_structure()],
            bindings_dir: Some("/gen/bindings".to_string()),
            workspace_type: WorkspaceType::Cpp,
            ..WorkspaceDescriptor::default()
        };

        let request = expand_workspace(&descriptor).unwrap();
        assert_eq!(
            request.operations,
            vec![
                Operation::copy_file("/src/main.cpp", "/abs/ws/main.cpp"),
                Operation::copy_file("/src/include/util/a.h", "/abs/ws/util/a.h"),
                Operation::CopyDirectory {
                    source: PathBuf::from("/gen/bindings"),
                    destination: PathBuf::from("/abs/ws/bindings"),
                    optional: true,
                },
            ]
        );
        assert!(request.validate_shape().is_ok());
    }

    #[test]
    fn go_descriptor_renders_go_mod_and_copies_wit() {
        let descriptor = WorkspaceDescriptor {
            work_dir: "/abs/ws".to_string(),
            workspace_type: WorkspaceType::Go,
            go_module: Some(GoModuleConfig {
                module_name: "example.com/demo".to_string(),
                go_version: "1.22".to_string(),
                sources: vec![FileSpec::new("/src/main.go")],
                go_mod_file: None,
                wit_file: Some("/wit/world.wit".to_string()),
            }),
            ..WorkspaceDescriptor::default()
        };

        let request = expand_workspace(&descriptor).unwrap();
        assert_eq!(
            request.operations,
            vec![
                Operation::copy_file("/src/main.go", "/abs/ws/main.go"),
                Operation::write_file("/abs/ws/go.mod", "module example.com/demo\n\ngo 1.22\n"),
                Operation::copy_file("/wit/world.wit", "/abs/ws/component.wit"),
            ]
        );
    }

    #[test]
    fn relative_sources_are_rejected() {
        let error = copy_files_request(&[FileSpec::new("src/main.c")], "/abs/ws").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SchemaError);
    }

    #[test]
    fn escaping_destination_override_fails_shape_check() {
        let request = copy_files_request(
            &[FileSpec::new("/src/a.h").with_destination("../../etc/a.h")],
            "/abs/ws",
        )
        .unwrap();
        // Traversal is reported by the security validator, not the shape check.
        assert!(request.validate_shape().is_ok());
        assert!(
            crate::security::SecurityContext::default()
                .validate_operation(
                    crate::security::OperationClass::CopyFile,
                    &request.operations[0].security_paths(),
                )
                .unwrap_err()
                .is_denied()
        );
    }
}
