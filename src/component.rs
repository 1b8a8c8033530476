use std::path::{Path, PathBuf};

use fileops_commons::{
    FileOpsError, Result, basename, dirname, display_path, join_paths, resolve_absolute,
};
use fileops_config::{
    CppWorkspaceConfig, FileSpec, GoModuleConfig, PackageConfig, PreopenDirConfig,
    SecurityContextInfo, SecurityLevel, WorkspaceDescriptor, WorkspaceInfo, batch_config_schema,
};
use fileops_core::{FileOpsEngine, FileOperations, PathKind, RequestPolicy};
use tracing::debug;

/// Per-instance state behind the exported entry points.
///
/// Every method takes already-decoded arguments, so hosts embedding the crate
/// as an `rlib` can call it without going through the buffer protocol.
#[derive(Debug, Default)]
pub struct FileOpsComponent {
    engine: FileOpsEngine,
}

impl FileOpsComponent {
    pub fn new() -> Self {
        Self::default()
    }

    fn ops(&self) -> FileOperations<'_> {
        self.engine.file_ops()
    }

    // file-operations

    pub fn copy_file(&self, source: &Path, destination: &Path) -> Result<()> {
        self.ops().copy_file(source, destination).map(|_| ())
    }

    pub fn copy_directory(&self, source: &Path, destination: &Path) -> Result<()> {
        self.ops().copy_directory(source, destination)
    }

    pub fn create_directory(&self, path: &Path) -> Result<()> {
        self.ops().create_directory(path)
    }

    pub fn remove_path(&self, path: &Path) -> Result<()> {
        self.ops().remove_path(path)
    }

    pub fn move_path(&self, source: &Path, destination: &Path) -> Result<()> {
        self.ops().move_path(source, destination)
    }

    pub fn path_exists(&self, path: &Path) -> PathKind {
        self.ops().path_exists(path)
    }

    pub fn resolve_absolute_path(&self, path: &Path) -> Result<String> {
        resolve_absolute(path)
            .map(|resolved| display_path(&resolved))
            .map_err(|error| FileOpsError::io("resolving", path, error))
    }

    pub fn join_paths(&self, segments: &[String]) -> String {
        join_paths(segments)
    }

    pub fn dirname(&self, path: &str) -> String {
        dirname(path)
    }

    pub fn basename(&self, path: &str) -> String {
        basename(path)
    }

    pub fn list_directory(&self, path: &Path, pattern: Option<&str>) -> Result<Vec<String>> {
        self.ops().list_directory(path, pattern)
    }

    /// Validate `path` against `allowed`, or against the configured preopened
    /// directories when `allowed` is empty.
    pub fn validate_path(&self, path: &Path, allowed: &[String]) -> Result<()> {
        let context = self.engine.context();
        if allowed.is_empty() {
            return context.validate_path_with(path, RequestPolicy::unrestricted());
        }
        let allowed: Vec<PathBuf> = allowed.iter().map(PathBuf::from).collect();
        context.validate_path(path, &allowed)
    }

    pub fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.ops().read_file(path)
    }

    pub fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.ops().write_file(path, contents)
    }

    pub fn append_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.ops().append_file(path, contents)
    }

    pub fn concatenate_files(&self, sources: &[String], destination: &Path) -> Result<()> {
        let sources: Vec<PathBuf> = sources.iter().map(PathBuf::from).collect();
        self.ops().concatenate_files(&sources, destination).map(|_| ())
    }

    // json-batch-operations

    pub fn process_json_config(&self, text: &str) -> Result<WorkspaceInfo> {
        self.engine.process_json_config(text)
    }

    pub fn validate_json_config(&self, text: &str) -> Result<()> {
        self.engine.validate_json_config(text)
    }

    pub fn json_schema(&self) -> Result<String> {
        batch_config_schema()
    }

    // workspace-management

    pub fn prepare_workspace(&mut self, descriptor: &WorkspaceDescriptor) -> Result<WorkspaceInfo> {
        self.engine.prepare_workspace(descriptor)
    }

    pub fn copy_sources(&self, sources: &[FileSpec], dest_dir: &str) -> Result<WorkspaceInfo> {
        self.engine.copy_sources(sources, dest_dir)
    }

    pub fn copy_headers(&self, headers: &[FileSpec], dest_dir: &str) -> Result<WorkspaceInfo> {
        self.engine.copy_headers(headers, dest_dir)
    }

    pub fn copy_bindings(&self, bindings_dir: &str, dest_dir: &str) -> Result<WorkspaceInfo> {
        self.engine.copy_bindings(bindings_dir, dest_dir)
    }

    pub fn setup_package_json(&self, config: &PackageConfig, work_dir: &str) -> Result<WorkspaceInfo> {
        self.engine.setup_package_json(config, work_dir)
    }

    pub fn setup_go_module(&self, config: &GoModuleConfig, work_dir: &str) -> Result<WorkspaceInfo> {
        self.engine.setup_go_module(config, work_dir)
    }

    pub fn setup_cpp_workspace(
        &self,
        config: &CppWorkspaceConfig,
        work_dir: &str,
    ) -> Result<WorkspaceInfo> {
        self.engine.setup_cpp_workspace(config, work_dir)
    }

    // security-operations

    pub fn configure_preopen_dirs(&mut self, configs: &[PreopenDirConfig]) -> Result<()> {
        self.engine.configure_preopen_dirs(configs)
    }

    pub fn validate_operation(&self, name: &str, paths: &[String]) -> Result<()> {
        let paths: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
        self.engine.context().validate_named_operation(name, &paths)
    }

    pub fn security_context(&self) -> SecurityContextInfo {
        self.engine.security_context()
    }

    /// Tighten the level. Loosening an already configured level is denied.
    pub fn set_security_level(&mut self, level: &str) -> Result<()> {
        let level: SecurityLevel = level.parse()?;
        self.engine.set_security_level(level)
    }

    /// Replace the level unconditionally.
    pub fn reconfigure_security_level(&mut self, level: &str) -> Result<()> {
        let level: SecurityLevel = level.parse()?;
        debug!(%level, "security level reconfigured");
        self.engine.reconfigure_security(level);
        Ok(())
    }
}
