use fileops_commons::{FileOpsError, Result};
use fileops_config::{GoModuleConfig, PackageConfig};
use serde_json::{Map, Value};

/// Render `package.json` with sorted keys. Additional field values that
/// parse as JSON are embedded as JSON; anything else becomes a string.
pub fn render_package_json(config: &PackageConfig) -> Result<String> {
    let mut document = Map::new();
    document.insert("name".to_string(), Value::String(config.name.clone()));
    document.insert("version".to_string(), Value::String(config.version.clone()));
    document.insert("type".to_string(), Value::String(config.module_type.clone()));

    if !config.dependencies.is_empty() {
        let dependencies: Map<String, Value> = config
            .dependencies
            .iter()
            .map(|dependency| {
                (
                    dependency.name.clone(),
                    Value::String(dependency.version.clone()),
                )
            })
            .collect();
        document.insert("dependencies".to_string(), Value::Object(dependencies));
    }

    for field in &config.additional_fields {
        let value = serde_json::from_str::<Value>(&field.value)
            .unwrap_or_else(|_| Value::String(field.value.clone()));
        document.insert(field.key.clone(), value);
    }

    let mut rendered = serde_json::to_string_pretty(&Value::Object(document))
        .map_err(|err| FileOpsError::schema(format!("failed to render package.json: {err}")))?;
    rendered.push('\n');
    Ok(rendered)
}

pub fn render_go_mod(config: &GoModuleConfig) -> String {
    format!("module {}\n\ngo {}\n", config.module_name, config.go_version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fileops_config::{Dependency, JsonField};
    use pretty_assertions::assert_eq;

    fn package() -> PackageConfig {
        PackageConfig {
            name: "demo".to_string(),
            version: "1.0.0".to_string(),
            module_type: "module".to_string(),
            dependencies: Vec::new(),
            additional_fields: Vec::new(),
        }
    }

    #[test]
    fn package_json_omits_empty_dependencies() {
        let rendered = render_package_json(&package()).unwrap();
        assert_eq!(
            rendered,
            "{\n  \"name\": \"demo\",\n  \"type\": \"module\",\n  \"version\": \"1.0.0\"\n}\n"
        );
    }

    #[test]
    fn additional_fields_keep_json_values() {
        let mut config = package();
        config.dependencies.push(Dependency {
            name: "lodash".to_string(),
            version: "^4.17.0".to_string(),
        });
        config.additional_fields = vec![
            JsonField {
                key: "private".to_string(),
                value: "true".to_string(),
            },
            JsonField {
                key: "description".to_string(),
                value: "plain text".to_string(),
            },
        ];

        let value: Value = serde_json::from_str(&render_package_json(&config).unwrap()).unwrap();
        assert_eq!(value["private"], Value::Bool(true));
        assert_eq!(value["description"], Value::String("plain text".to_string()));
        assert_eq!(value["dependencies"]["lodash"], "^4.17.0");
    }

    #[test]
    fn go_mod_has_module_and_version() {
        let config = GoModuleConfig {
            module_name: "example.com/demo".to_string(),
            go_version: "1.21".to_string(),
            sources: Vec::new(),
            go_mod_file: None,
            wit_file: None,
        };
        assert_eq!(render_go_mod(&config), "module example.com/demo\n\ngo 1.21\n");
    }
}
