//! JSON command protocol for scripted and agent-driven generation.

use serde::{Deserialize, Serialize};
use shared::SignRequest;

use crate::harness::TestHarness;

/// A command an agent can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Run "Create Text" with the given request fields.
    CreateText {
        #[serde(flatten)]
        request: SignRequest,
    },
    /// Inspect the scene: list all objects.
    Inspect,
    /// Export the scene as GLB, optionally writing it to a file.
    ExportGlb {
        #[serde(default)]
        path: Option<String>,
    },
    /// Clear the entire scene.
    Clear,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::CreateText { request } => match harness.create_text(&request) {
            Ok(summary) => match serde_json::to_value(summary) {
                Ok(data) => CommandResponse::ok_with_data(data),
                Err(e) => CommandResponse::err(e.to_string()),
            },
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::Inspect => {
            let objects: Vec<serde_json::Value> = harness
                .scene
                .objects()
                .iter()
                .map(|obj| {
                    serde_json::json!({
                        "id": obj.id,
                        "name": obj.name,
                        "kind": obj.kind.kind(),
                        "location": obj.location.to_array(),
                        "materials": harness.scene.slot_names(obj),
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "object_count": objects.len(),
                "material_count": harness.scene.materials().len(),
                "mode": harness.scene.mode(),
                "objects": objects,
            }))
        }

        AgentCommand::ExportGlb { path } => {
            let glb = match harness.export_glb() {
                Ok(glb) => glb,
                Err(e) => return CommandResponse::err(e.to_string()),
            };
            if let Some(path) = &path {
                if let Err(e) = std::fs::write(path, &glb) {
                    return CommandResponse::err(format!("Failed to write {path}: {e}"));
                }
            }
            CommandResponse::ok_with_data(serde_json::json!({
                "bytes": glb.len(),
                "path": path,
            }))
        }

        AgentCommand::Clear => {
            harness.clear();
            CommandResponse::ok()
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
