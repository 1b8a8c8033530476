use fileops_commons::Result;
use fileops_config::{
    BatchConfig, CppWorkspaceConfig, FileSpec, GoModuleConfig, PackageConfig, PreopenDirConfig,
    SecurityContextInfo, SecurityLevel, WorkspaceDescriptor, WorkspaceInfo,
};
use tracing::{debug, info};

use crate::batch::{BatchExecutor, BatchRequest};
use crate::command::{CommandRunner, ProcessCommandRunner};
use crate::ops::FileOperations;
use crate::security::SecurityContext;
use crate::workspace;

/// Everything one component instance needs: its security context and the
/// runner used for `run_command`.
pub struct FileOpsEngine {
    context: SecurityContext,
    runner: Box<dyn CommandRunner>,
}

impl Default for FileOpsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FileOpsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileOpsEngine")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl FileOpsEngine {
    pub fn new() -> Self {
        Self::with_runner(Box::new(ProcessCommandRunner::new()))
    }

    pub fn with_runner(runner: Box<dyn CommandRunner>) -> Self {
        Self {
            context: SecurityContext::default(),
            runner,
        }
    }

    pub fn context(&self) -> &SecurityContext {
        &self.context
    }

    pub fn file_ops(&self) -> FileOperations<'_> {
        FileOperations::new(&self.context)
    }

    pub fn set_security_level(&mut self, level: SecurityLevel) -> Result<()> {
        self.context.set_level(level)
    }

    pub fn reconfigure_security(&mut self, level: SecurityLevel) {
        self.context.reconfigure(level);
    }

    pub fn configure_preopen_dirs(&mut self, configs: &[PreopenDirConfig]) -> Result<()> {
        self.context.configure_preopen_dirs(configs)
    }

    pub fn security_context(&self) -> SecurityContextInfo {
        self.context.snapshot()
    }

    fn executor(&self) -> BatchExecutor<'_> {
        BatchExecutor::new(&self.context, self.runner.as_ref())
    }

    fn run(&self, request: &BatchRequest, message: impl FnOnce(usize) -> String) -> Result<WorkspaceInfo> {
        let result = self.executor().execute_batch(request)?;
        let produced = result.prepared_files().len();
        result.into_workspace_info(message(produced))
    }

    /// Execute a decoded batch document.
    pub fn process_config(&self, config: &BatchConfig) -> Result<WorkspaceInfo> {
        let request = BatchRequest::from_config(config)?;
        let total = request.operations.len();
        info!(workspace = %request.workspace_root.display(), operations = total, "processing batch document");
        self.run(&request, |_| {
            format!("Successfully processed {total} operations")
        })
    }

    pub fn process_json_config(&self, text: &str) -> Result<WorkspaceInfo> {
        let config = BatchConfig::from_json_str(text)?;
        self.process_config(&config)
    }

    /// Decode, translate and security-check a batch document without
    /// executing anything.
    pub fn validate_json_config(&self, text: &str) -> Result<()> {
        let config = BatchConfig::from_json_str(text)?;
        let request = BatchRequest::from_config(&config)?;
        self.executor().validate(&request)?;
        debug!(operations = request.operations.len(), "batch document is valid");
        Ok(())
    }

    /// Prepare a full workspace. A descriptor that carries an enforcing
    /// security config first applies its level, which may only tighten the
    /// current one.
    pub fn prepare_workspace(&mut self, descriptor: &WorkspaceDescriptor) -> Result<WorkspaceInfo> {
        let profile = workspace::profile_for(descriptor.workspace_type);
        let request = workspace::expand_workspace(descriptor)?;

        // A descriptor that fails to expand leaves the level as it was.
        if let Some(security) = descriptor
            .security_config
            .as_ref()
            .filter(|security| security.enforce_validation)
        {
            self.context.set_level(security.level)?;
        }

        info!(
            workspace = %request.workspace_root.display(),
            ecosystem = profile.label,
            operations = request.operations.len(),
            "preparing workspace"
        );
        self.run(&request, |files| {
            format!(
                "Successfully prepared {} workspace with {files} files",
                profile.label
            )
        })
    }

    pub fn copy_sources(&self, sources: &[FileSpec], dest_dir: &str) -> Result<WorkspaceInfo> {
        let request = workspace::copy_files_request(sources, dest_dir)?;
        self.run(&request, |files| format!("Copied {files} source files"))
    }

    pub fn copy_headers(&self, headers: &[FileSpec], dest_dir: &str) -> Result<WorkspaceInfo> {
        let request = workspace::copy_files_request(headers, dest_dir)?;
        self.run(&request, |files| format!("Copied {files} header files"))
    }

    pub fn copy_bindings(&self, bindings_dir: &str, dest_dir: &str) -> Result<WorkspaceInfo> {
        let request = workspace::copy_bindings_request(bindings_dir, dest_dir)?;
        self.run(&request, |files| format!("Copied bindings ({files} entries)"))
    }

    pub fn setup_package_json(&self, config: &PackageConfig, work_dir: &str) -> Result<WorkspaceInfo> {
        let request = workspace::package_json_request(config, work_dir)?;
        self.run(&request, |_| format!("Created package.json for {}", config.name))
    }

    pub fn setup_go_module(&self, config: &GoModuleConfig, work_dir: &str) -> Result<WorkspaceInfo> {
        let request = workspace::go_module_request(config, work_dir)?;
        self.run(&request, |_| {
            format!("Prepared Go module {}", config.module_name)
        })
    }

    pub fn setup_cpp_workspace(
        &self,
        config: &CppWorkspaceConfig,
        work_dir: &str,
    ) -> Result<WorkspaceInfo> {
        let request = workspace::cpp_workspace_request(config, work_dir)?;
        self.run(&request, |files| {
            format!("Prepared C++ workspace with {files} files")
        })
    }
}
