use fileops_commons::{FileOpsError, Result};

use crate::batch::BatchConfig;

/// JSON schema of the batch document, generated from [`BatchConfig`].
pub fn batch_config_schema() -> Result<String> {
    let schema = schemars::schema_for!(BatchConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|error| FileOpsError::schema(format!("failed to render JSON schema: {error}")))
}
