//! Tests for catalog validation, registration and generator building.
mod common;
use common::*;
use modbus_blocks::prelude::*;
use std::collections::HashSet;

#[test]
fn test_default_catalog_type_names_are_distinct() {
    let catalog = default_catalog();
    let names: HashSet<_> = catalog.iter().map(|s| s.type_name.as_str()).collect();
    assert_eq!(names.len(), catalog.len());
    for spec in &catalog {
        assert!(spec.validate().is_ok(), "{} is invalid", spec.type_name);
    }
}

#[test]
fn test_registering_duplicate_type_fails() {
    let mut registry = BlockRegistry::with_default_catalog().expect("Failed to register catalog");
    let before = registry.len();

    let result = registry.register(vec![
        BlockSpec::new("fresh_block", ""),
        modbus_blocks::catalog::connection::rtu_config(),
    ]);

    assert_eq!(
        result,
        Err(RegistryError::DuplicateBlockType("RTU_config".to_string()))
    );
    // The valid spec in the failing batch is not registered either.
    assert_eq!(registry.len(), before);
    assert!(!registry.contains("fresh_block"));
}

#[test]
fn test_duplicate_within_one_batch_fails() {
    let mut registry = BlockRegistry::new();
    let result = registry.register(vec![BlockSpec::new("a", ""), BlockSpec::new("a", "")]);
    assert_eq!(result, Err(RegistryError::DuplicateBlockType("a".to_string())));
    assert!(registry.is_empty());
}

#[test]
fn test_placeholder_count_must_match_slots() {
    let spec = BlockSpec::new("bad", "%1 and %2").slot(Slot::text("A", ""));
    match spec.validate() {
        Err(RegistryError::PlaceholderMismatch {
            type_name,
            placeholders,
            slots,
        }) => {
            assert_eq!(type_name, "bad");
            assert_eq!(placeholders, 2);
            assert_eq!(slots, 1);
        }
        other => panic!("Expected PlaceholderMismatch, got {:?}", other),
    }
}

#[test]
fn test_duplicate_slot_names_are_rejected() {
    let spec = BlockSpec::new("bad", "%1 %2")
        .slot(Slot::value("X", &[]))
        .slot(Slot::text("X", ""));
    assert_eq!(
        spec.validate(),
        Err(RegistryError::DuplicateSlot {
            type_name: "bad".to_string(),
            slot: "X".to_string()
        })
    );
}

#[test]
fn test_host_json_export() {
    let registry = BlockRegistry::with_default_catalog().expect("Failed to register catalog");
    let json = registry.to_host_json();
    let defs = json.as_array().expect("Export should be an array");
    assert_eq!(defs.len(), registry.len());

    let exported: Vec<_> = defs.iter().map(|d| d["type"].as_str().unwrap()).collect();
    let registered: Vec<_> = registry.type_names().collect();
    assert_eq!(exported, registered);

    let rtu = &defs[0];
    assert_eq!(rtu["type"], "RTU_config");
    assert_eq!(rtu["output"], "ModbusConfig");
    assert_eq!(rtu["colour"], 160);
    assert_eq!(rtu["args0"].as_array().unwrap().len(), 11);
    assert_eq!(rtu["args0"][1]["check"], "String");

    let task = defs
        .iter()
        .find(|d| d["type"] == "modbus_task_definition")
        .unwrap();
    assert!(task.get("output").is_none());
    assert!(task.get("previousStatement").is_none());
    assert_eq!(task["args0"][1]["min"], 1.0);

    let get_field = defs.iter().find(|d| d["type"] == "modbus_get_field").unwrap();
    assert!(get_field["output"].is_null());
    assert_eq!(get_field["args0"][1]["check"], serde_json::json!(["Array", "Object"]));
}

#[test]
fn test_builder_rejects_spec_without_emitter() {
    let result = Generator::builder()
        .with_spec(BlockSpec::new("orphan_spec", ""))
        .build();
    assert!(matches!(result, Err(RegistryError::MissingEmitter(name)) if name == "orphan_spec"));
}

struct ReadCoilsEmitter;

impl BlockEmitter for ReadCoilsEmitter {
    fn block_type(&self) -> &str {
        "read_coils"
    }

    fn emit(
        &self,
        block: &BlockInstance,
        generator: &Generator,
        ctx: &mut GenerationContext,
    ) -> std::result::Result<CodeFragment, GenerateError> {
        ctx.require_import("read_coils", "from poll import read_coils");
        let count = generator.value_to_code(block, "COUNT", Order::None, "8", ctx)?;
        Ok(CodeFragment::expression(
            format!("read_coils({})", count),
            Order::FunctionCall,
        ))
    }
}

#[test]
fn test_builder_rejects_emitter_without_spec() {
    let result = Generator::builder()
        .with_custom_emitter(Box::new(ReadCoilsEmitter))
        .build();
    assert!(matches!(result, Err(RegistryError::MissingSpec(name)) if name == "read_coils"));
}

#[test]
fn test_custom_block_with_spec_and_emitter() {
    let generator = Generator::builder()
        .with_spec(
            BlockSpec::new("read_coils", "Read %1 coils")
                .slot(Slot::value("COUNT", &["Number"]))
                .output(OutputCheck::tag("Array")),
        )
        .with_custom_emitter(Box::new(ReadCoilsEmitter))
        .build()
        .expect("Failed to build generator");

    let block = BlockInstance::new("rc", "read_coils").with_input("COUNT", number("n", 16.0));
    let (fragment, ctx) = emit(&generator, &block);
    assert_eq!(fragment.code(), "read_coils(16)");
    assert_eq!(ctx.imports(), ["from poll import read_coils".to_string()]);
}

#[test]
fn test_type_mapping_reuses_builtin_block() {
    let generator = Generator::builder()
        .with_type_mapping("LegacyTcp", "TCP_config")
        .build()
        .expect("Failed to build generator");

    assert!(generator.registry().contains("LegacyTcp"));
    let (fragment, _) = emit(&generator, &BlockInstance::new("legacy", "LegacyTcp"));
    assert!(fragment.code().starts_with("TCPConfig(\n"));
}

#[test]
fn test_type_mapping_to_unknown_builtin_fails() {
    let result = Generator::builder()
        .with_type_mapping("Mine", "no_such_block")
        .build();
    assert!(matches!(result, Err(RegistryError::MissingSpec(name)) if name == "no_such_block"));
}

#[test]
fn test_empty_builder_builds_empty_generator() {
    let generator = GeneratorBuilder::empty()
        .build()
        .expect("Empty generator should build");
    assert!(generator.registry().is_empty());
}
