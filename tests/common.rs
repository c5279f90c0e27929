//! Common test utilities for building block graphs.
use modbus_blocks::prelude::*;

/// A `text` literal block.
#[allow(dead_code)]
pub fn text(id: &str, value: &str) -> BlockInstance {
    BlockInstance::new(id, "text").with_field("TEXT", value)
}

/// A `math_number` literal block.
#[allow(dead_code)]
pub fn number(id: &str, value: f64) -> BlockInstance {
    BlockInstance::new(id, "math_number").with_field("NUM", value)
}

/// A task definition with an optional body chain.
#[allow(dead_code)]
pub fn task(task_id: &str, interval: f64, body: Option<BlockInstance>) -> BlockInstance {
    let block = BlockInstance::new(&format!("task_{}", task_id), "modbus_task_definition")
        .with_field("TASK_ID", task_id)
        .with_field("INTERVAL", interval);
    match body {
        Some(body) => block.with_input("DO", body),
        None => block,
    }
}

/// A log block printing a text literal.
#[allow(dead_code)]
pub fn log_text(id: &str, message: &str) -> BlockInstance {
    BlockInstance::new(id, "modbus_log").with_input("MSG", text(&format!("{}_msg", id), message))
}

/// A poll interval setter with the given milliseconds.
#[allow(dead_code)]
pub fn set_interval(id: &str, ms: f64) -> BlockInstance {
    BlockInstance::new(id, "set_modbus_interval")
        .with_input("INTERVAL_MS", number(&format!("{}_ms", id), ms))
}

/// An RTU config with every socket connected to a literal.
#[allow(dead_code)]
pub fn full_rtu_config() -> BlockInstance {
    BlockInstance::new("rtu", "RTU_config")
        .with_field("BAUDRATE", "19200")
        .with_field("PARITY", "E")
        .with_field("FUNCTION_CODE", "4")
        .with_input("PORT", text("port", "COM3"))
        .with_input("BYTESIZE", number("bytesize", 7.0))
        .with_input("STOPBITS", number("stopbits", 2.0))
        .with_input("TIMEOUT", number("timeout", 1.5))
        .with_input("SLAVE_ID", number("slave", 5.0))
        .with_input("START_ADDRESS", number("start", 100.0))
        .with_input("COUNT", number("count", 3.0))
}

#[allow(dead_code)]
pub fn workspace(blocks: Vec<BlockInstance>) -> WorkspaceDefinition {
    WorkspaceDefinition { blocks }
}

/// Emits a single block with a throwaway context and returns its code.
#[allow(dead_code)]
pub fn emit(generator: &Generator, block: &BlockInstance) -> (CodeFragment, GenerationContext) {
    let mut ctx = GenerationContext::new();
    let fragment = generator
        .emit_block(block, &mut ctx)
        .expect("Failed to emit block");
    (fragment, ctx)
}

/// A saved editor workspace with two tasks.
///
/// Task 01 polls an RTU device into `data`, pushes the alarm level of register 0
/// to the DCP and logs the error field. Task 02 only sets the poll interval.
#[allow(dead_code)]
pub const HOST_WORKSPACE_JSON: &str = r#"{
  "blocks": {
    "languageVersion": 0,
    "blocks": [
      {
        "type": "modbus_task_definition", "id": "task_a", "x": 20, "y": 20,
        "fields": { "TASK_ID": "01", "INTERVAL": 15 },
        "inputs": {
          "DO": { "block": {
            "type": "variables_set", "id": "set_data",
            "fields": { "VAR": { "id": "var_data" } },
            "inputs": { "VALUE": { "block": {
              "type": "modbus_pull_data", "id": "pull",
              "inputs": { "CONFIG": { "block": {
                "type": "RTU_config", "id": "rtu",
                "fields": { "BAUDRATE": "9600", "PARITY": "N", "FUNCTION_CODE": "4" },
                "inputs": {
                  "PORT": { "shadow": { "type": "text", "id": "port", "fields": { "TEXT": "COM4" } } },
                  "COUNT": { "block": { "type": "math_number", "id": "count", "fields": { "NUM": 3 } } }
                }
              } } }
            } } },
            "next": { "block": {
              "type": "modbus_dcp_update", "id": "dcp",
              "fields": { "NAME": "LPS02___X" },
              "inputs": { "VALUE": { "block": {
                "type": "modbus_alarm_evaluator", "id": "alarm",
                "inputs": {
                  "VAL": { "block": {
                    "type": "modbus_get_register", "id": "reg",
                    "inputs": {
                      "INDEX": { "block": { "type": "math_number", "id": "idx", "fields": { "NUM": 0 } } },
                      "DATA": { "block": { "type": "variables_get", "id": "get_data", "fields": { "VAR": { "id": "var_data" } } } }
                    }
                  } },
                  "LV1": { "block": { "type": "modbus_get_limiter", "id": "lv1", "fields": { "LIMITER_NAME": "DP_Limit_LV1" } } },
                  "LV2": { "block": { "type": "modbus_get_limiter", "id": "lv2", "fields": { "LIMITER_NAME": "DP_Limit_LV2" } } },
                  "LV3": { "block": { "type": "modbus_get_limiter", "id": "lv3", "fields": { "LIMITER_NAME": "DP_Limit_LV3" } } }
                }
              } } },
              "next": { "block": {
                "type": "modbus_log", "id": "log",
                "inputs": { "MSG": { "block": {
                  "type": "modbus_get_field", "id": "field",
                  "fields": { "FIELD": "error" },
                  "inputs": { "DATA": { "block": { "type": "variables_get", "id": "get_data2", "fields": { "VAR": { "id": "var_data" } } } } }
                } } }
              } }
            } }
          } }
        }
      },
      {
        "type": "modbus_task_definition", "id": "task_b",
        "fields": { "TASK_ID": "02", "INTERVAL": 5 },
        "inputs": {
          "DO": { "block": {
            "type": "set_modbus_interval", "id": "iv",
            "inputs": { "INTERVAL_MS": { "shadow": { "type": "math_number", "id": "ms", "fields": { "NUM": 500 } } } }
          } }
        }
      }
    ]
  },
  "variables": [ { "name": "data", "id": "var_data" } ]
}"#;
