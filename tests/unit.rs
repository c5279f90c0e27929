use modbus_blocks::codegen::alarm::helper_definition;
use modbus_blocks::prelude::*;

/// Classifies `val` by walking the emitted helper's `if`/`elif` chain.
fn run_helper(source: &str, val: f64, lv: [f64; 3]) -> String {
    let threshold = |name: &str| match name {
        "lv1" => lv[0],
        "lv2" => lv[1],
        "lv3" => lv[2],
        other => panic!("unexpected operand {}", other),
    };
    let mut lines = source.lines().skip(1).map(str::trim);
    while let Some(line) = lines.next() {
        let ret = lines.next().expect("clause without a return");
        let level = ret.trim_start_matches("return ").trim_matches('"').to_string();
        if line == "else:" {
            return level;
        }
        let cond = line
            .trim_start_matches("elif ")
            .trim_start_matches("if ")
            .trim_end_matches(':');
        let holds = cond.split(" and ").all(|term| {
            match term.split_whitespace().collect::<Vec<_>>()[..] {
                ["val", ">=", t] => val >= threshold(t),
                ["val", "<", t] => val < threshold(t),
                _ => panic!("unexpected condition {}", term),
            }
        });
        if holds {
            return level;
        }
    }
    panic!("helper fell through")
}

#[test]
fn test_alarm_levels() {
    let cases = [
        (50.0, AlarmLevel::Lv2),
        (10.0, AlarmLevel::Lv0),
        (20.0, AlarmLevel::Lv1),
        (39.9, AlarmLevel::Lv1),
        (40.0, AlarmLevel::Lv2),
        (60.0, AlarmLevel::Lv3),
        (70.0, AlarmLevel::Lv3),
    ];
    let helper = helper_definition("    ");
    for (value, expected) in cases {
        assert_eq!(
            AlarmLevel::evaluate(value, 20.0, 40.0, 60.0),
            expected,
            "value {}",
            value
        );
        assert_eq!(
            run_helper(&helper, value, [20.0, 40.0, 60.0]),
            expected.as_str(),
            "emitted helper, value {}",
            value
        );
    }
}

#[test]
fn test_alarm_with_unordered_thresholds_follows_clause_order() {
    // lv2 < lv1: the first band is empty, so anything >= lv3 lands in LV3.
    assert_eq!(AlarmLevel::evaluate(45.0, 50.0, 30.0, 40.0), AlarmLevel::Lv3);
    assert_eq!(AlarmLevel::evaluate(35.0, 50.0, 30.0, 40.0), AlarmLevel::Lv2);

    let helper = helper_definition("  ");
    assert_eq!(run_helper(&helper, 45.0, [50.0, 30.0, 40.0]), "LV3");
    assert_eq!(run_helper(&helper, 35.0, [50.0, 30.0, 40.0]), "LV2");
}

#[test]
fn test_alarm_level_labels() {
    assert_eq!(AlarmLevel::Lv0.to_string(), "LV0");
    assert_eq!(AlarmLevel::Lv3.as_str(), "LV3");
}

#[test]
fn test_alarm_helper_source() {
    let expected = "def evaluate_alarm(val, lv1, lv2, lv3):\n    if val >= lv1 and val < lv2:\n        return \"LV1\"\n    elif val >= lv2 and val < lv3:\n        return \"LV2\"\n    elif val >= lv3:\n        return \"LV3\"\n    else:\n        return \"LV0\"\n";
    assert_eq!(helper_definition("    "), expected);
}

#[test]
fn test_error_messages_name_the_block() {
    let err = GenerateError::UnknownBlockType {
        block_id: "b7".to_string(),
        type_name: "modbus_write".to_string(),
    };
    let message = err.to_string();
    assert!(message.contains("b7"));
    assert!(message.contains("modbus_write"));

    let err = RegistryError::DuplicateBlockType("RTU_config".to_string());
    assert!(err.to_string().contains("RTU_config"));
}

#[test]
fn test_field_value_display() {
    assert_eq!(FieldValue::from("COM4").to_string(), "COM4");
    assert_eq!(FieldValue::from(15.0).to_string(), "15");
    assert_eq!(FieldValue::from(2.5).to_string(), "2.5");
}

#[test]
fn test_block_builder() {
    let block = BlockInstance::new("log", "modbus_log")
        .with_input("MSG", BlockInstance::new("t", "text").with_field("TEXT", "x"))
        .with_next(BlockInstance::new("n", "set_modbus_interval"))
        .disabled();
    assert!(!block.enabled);
    assert_eq!(block.input("MSG").unwrap().field("TEXT"), Some(&FieldValue::from("x")));
    assert_eq!(block.next.as_ref().unwrap().id, "n");
    assert!(block.input("DATA").is_none());
}
