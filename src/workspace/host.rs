use super::conversion::IntoWorkspace;
use super::definition::{BlockInstance, FieldValue, WorkspaceDefinition};
use crate::error::WorkspaceConversionError;
use ahash::AHashMap;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;

/// Workspace document as produced by the host editor's JSON serializer
#[derive(Debug, Deserialize, Default)]
pub struct HostWorkspace {
    #[serde(default)]
    pub blocks: HostBlockList,
    #[serde(default)]
    pub variables: Vec<HostVariable>,
}

/// Top-level block list
#[derive(Debug, Deserialize, Default)]
pub struct HostBlockList {
    #[serde(default, alias = "languageVersion")]
    pub language_version: u32,
    #[serde(default)]
    pub blocks: Vec<HostBlock>,
}

/// Workspace variable referenced by id from variable fields
#[derive(Debug, Deserialize, Clone)]
pub struct HostVariable {
    pub name: String,
    pub id: String,
    #[serde(default, rename = "type")]
    pub var_type: Option<String>,
}

/// One serialized block with its fields, inputs and next block
#[derive(Debug, Deserialize)]
pub struct HostBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub id: Option<String>,
    pub enabled: Option<bool>,
    #[serde(default, alias = "disabledReasons")]
    pub disabled_reasons: Vec<String>,
    #[serde(default)]
    pub fields: AHashMap<String, Value>,
    #[serde(default)]
    pub inputs: AHashMap<String, HostConnection>,
    pub next: Option<Box<HostConnection>>,
}

/// The occupant of an input or next connection
#[derive(Debug, Deserialize)]
pub struct HostConnection {
    pub block: Option<Box<HostBlock>>,
    pub shadow: Option<Box<HostBlock>>,
}

impl HostWorkspace {
    pub fn from_json(json: &str) -> Result<Self, WorkspaceConversionError> {
        serde_json::from_str(json).map_err(|e| WorkspaceConversionError::JsonParseError(e.to_string()))
    }
}

impl IntoWorkspace for HostWorkspace {
    fn into_workspace(self) -> Result<WorkspaceDefinition, WorkspaceConversionError> {
        let mut converter = BlockConverter {
            variables: self
                .variables
                .into_iter()
                .map(|v| (v.id, v.name))
                .collect(),
            anonymous: 0,
        };

        let blocks = self
            .blocks
            .blocks
            .into_iter()
            .map(|block| converter.convert(block))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WorkspaceDefinition { blocks })
    }
}

struct BlockConverter {
    variables: AHashMap<String, String>,
    anonymous: usize,
}

impl BlockConverter {
    fn convert(&mut self, block: HostBlock) -> Result<BlockInstance, WorkspaceConversionError> {
        let id = match block.id {
            Some(id) => id,
            None => {
                self.anonymous += 1;
                format!("{}#{}", block.block_type, self.anonymous)
            }
        };

        let mut instance = BlockInstance::new(&id, &block.block_type);
        instance.enabled = block.enabled.unwrap_or(true) && block.disabled_reasons.is_empty();

        for (name, value) in block.fields {
            let field = self.convert_field(&id, &name, value)?;
            instance.fields.insert(name, field);
        }

        // Sorted so anonymous ids are stable between runs.
        for (name, connection) in block.inputs.into_iter().sorted_by(|a, b| a.0.cmp(&b.0)) {
            if let Some(child) = connection.block.or(connection.shadow) {
                let child = self.convert(*child)?;
                instance.inputs.insert(name, child);
            }
        }

        if let Some(next) = block.next.and_then(|c| c.block) {
            instance.next = Some(Box::new(self.convert(*next)?));
        }

        Ok(instance)
    }

    fn convert_field(
        &self,
        block_id: &str,
        name: &str,
        value: Value,
    ) -> Result<FieldValue, WorkspaceConversionError> {
        match value {
            Value::String(s) => Ok(FieldValue::Text(s)),
            Value::Number(n) => n.as_f64().map(FieldValue::Number).ok_or_else(|| {
                WorkspaceConversionError::ValidationError(format!(
                    "field '{}' on block '{}' is not a representable number",
                    name, block_id
                ))
            }),
            Value::Bool(b) => Ok(FieldValue::Text(if b { "TRUE" } else { "FALSE" }.to_string())),
            // Variable fields reference the workspace variable list by id.
            Value::Object(map) => {
                let resolved = map
                    .get("id")
                    .and_then(Value::as_str)
                    .and_then(|id| self.variables.get(id).cloned())
                    .or_else(|| map.get("name").and_then(Value::as_str).map(str::to_string));
                resolved.map(FieldValue::Text).ok_or_else(|| {
                    WorkspaceConversionError::ValidationError(format!(
                        "field '{}' on block '{}' references an unknown variable",
                        name, block_id
                    ))
                })
            }
            other => Err(WorkspaceConversionError::ValidationError(format!(
                "field '{}' on block '{}' has unsupported value {}",
                name, block_id, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_fills_an_input_without_a_real_block() {
        let json = r#"{
            "blocks": { "languageVersion": 0, "blocks": [
                { "type": "modbus_pull_data", "id": "pull",
                  "inputs": { "CONFIG": { "shadow": { "type": "TCP_config", "id": "cfg" } } } }
            ] }
        }"#;
        let workspace = HostWorkspace::from_json(json)
            .unwrap()
            .into_workspace()
            .unwrap();
        let pull = &workspace.blocks[0];
        assert_eq!(pull.input("CONFIG").unwrap().id, "cfg");
    }

    #[test]
    fn variable_fields_resolve_to_names() {
        let json = r#"{
            "blocks": { "blocks": [
                { "type": "variables_get", "id": "v", "fields": { "VAR": { "id": "abc" } } }
            ] },
            "variables": [ { "name": "reading", "id": "abc" } ]
        }"#;
        let workspace = HostWorkspace::from_json(json)
            .unwrap()
            .into_workspace()
            .unwrap();
        assert_eq!(
            workspace.blocks[0].field("VAR"),
            Some(&FieldValue::Text("reading".to_string()))
        );
    }

    #[test]
    fn unknown_variable_is_rejected() {
        let json = r#"{ "blocks": { "blocks": [
            { "type": "variables_get", "fields": { "VAR": { "id": "missing" } } }
        ] } }"#;
        let result = HostWorkspace::from_json(json).unwrap().into_workspace();
        assert!(matches!(
            result,
            Err(WorkspaceConversionError::ValidationError(_))
        ));
    }
}
