/// Security policy tables consulted by the validator.
pub mod security {
    /// Case-insensitive substrings that make a path sensitive under strict mode.
    pub const SENSITIVE_PATH_PATTERNS: &[&str] = &["secret", "private", ".ssh"];

    /// Restriction descriptors reported for each level, cumulative.
    pub const STANDARD_RESTRICTIONS: &[&str] = &["basic path traversal protection"];
    pub const HIGH_RESTRICTIONS: &[&str] = &[
        "directory access restrictions",
        "preopen directory enforcement",
        "command execution disabled",
    ];
    pub const STRICT_RESTRICTIONS: &[&str] = &[
        "explicit allow-listing required",
        "sensitive path detection",
        "directory root removal blocked",
    ];
}

/// Names of the batch document operation types.
pub mod operations {
    pub const COPY_FILE: &str = "copy_file";
    pub const MKDIR: &str = "mkdir";
    pub const COPY_DIRECTORY_CONTENTS: &str = "copy_directory_contents";
    pub const RUN_COMMAND: &str = "run_command";

    pub const ALL: &[&str] = &[COPY_FILE, MKDIR, COPY_DIRECTORY_CONTENTS, RUN_COMMAND];
}

/// File names materialized by ecosystem-aware workspace preparation.
pub mod manifests {
    pub const PACKAGE_JSON: &str = "package.json";
    pub const GO_MOD: &str = "go.mod";
    pub const COMPONENT_WIT: &str = "component.wit";
    pub const BINDINGS_DIR: &str = "bindings";
    pub const DEFAULT_GO_VERSION: &str = "1.21";
    pub const DEFAULT_PACKAGE_VERSION: &str = "0.1.0";
    pub const DEFAULT_MODULE_TYPE: &str = "module";
}

/// Logging bootstrap defaults.
pub mod logging {
    pub const ENV_FILTER_VAR: &str = "FILEOPS_LOG";
    pub const DEFAULT_FILTER: &str = "warn";
}
