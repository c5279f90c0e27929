use super::connection::MODBUS_CONFIG;
use super::spec::{BlockSpec, OutputCheck, Slot};

pub const ACTION_COLOUR: u16 = 230;

/// Fields of the dictionary returned by `pull_data_async`.
pub const RESULT_FIELD_OPTIONS: &[(&str, &str)] = &[
    ("Raw Hex", "raw"),
    ("Slave ID", "slave_id"),
    ("Registers", "registers"),
    ("Error", "error"),
];

pub fn pull_data() -> BlockSpec {
    BlockSpec::new("modbus_pull_data", "Pull Data Config: %1")
        .slot(Slot::value("CONFIG", &[MODBUS_CONFIG]))
        .output(OutputCheck::tag("Array"))
        .colour(ACTION_COLOUR)
        .tooltip("Executes the Modbus request using the provided configuration.")
}

pub fn set_interval() -> BlockSpec {
    BlockSpec::new("set_modbus_interval", "Set Poll Interval (ms): %1")
        .slot(Slot::value("INTERVAL_MS", &["Number"]))
        .chainable()
        .colour(ACTION_COLOUR)
        .tooltip("Sets the frequency of Modbus polling in milliseconds.")
}

pub fn get_field() -> BlockSpec {
    BlockSpec::new("modbus_get_field", "Get %1 from %2")
        .slot(Slot::dropdown("FIELD", RESULT_FIELD_OPTIONS))
        .slot(Slot::value("DATA", &["Array", "Object"]))
        .output(OutputCheck::Any)
        .colour(ACTION_COLOUR)
        .tooltip("Extracts a specific field from the Modbus result.")
}

pub fn task_definition() -> BlockSpec {
    BlockSpec::new("modbus_task_definition", "Task %1 (Interval %2s) %3 %4")
        .slot(Slot::text("TASK_ID", "01"))
        .slot(Slot::number("INTERVAL", 15.0, Some(1.0), None))
        .slot(Slot::dummy())
        .slot(Slot::statement("DO"))
        .colour(120)
        .tooltip("Defines a periodic task.")
}

pub fn get_register() -> BlockSpec {
    BlockSpec::new("modbus_get_register", "Get Register Index %1 from %2")
        .slot(Slot::value("INDEX", &["Number"]))
        .slot(Slot::value("DATA", &["Array", "Object"]))
        .output(OutputCheck::Any)
        .colour(ACTION_COLOUR)
        .tooltip("Gets a value from the registers list by index.")
}

pub fn get_limiter() -> BlockSpec {
    BlockSpec::new("modbus_get_limiter", "Get Limiter %1")
        .slot(Slot::text("LIMITER_NAME", "DP_Limit_LV1"))
        .output(OutputCheck::tag("Number"))
        .colour(ACTION_COLOUR)
        .tooltip("Retrieves the value of a specific limiter.")
}

pub fn dcp_update() -> BlockSpec {
    BlockSpec::new("modbus_dcp_update", "DCP Update %1 = %2")
        .slot(Slot::text("NAME", "LPS02___X"))
        .slot(Slot::value("VALUE", &[]))
        .chainable()
        .colour(160)
        .tooltip("Updates a value in the DCP system.")
}

pub fn alarm_evaluator() -> BlockSpec {
    BlockSpec::new(
        "modbus_alarm_evaluator",
        "Eval Alarm Val: %1 LV1: %2 LV2: %3 LV3: %4",
    )
    .slot(Slot::value("VAL", &["Number"]))
    .slot(Slot::value("LV1", &["Number"]))
    .slot(Slot::value("LV2", &["Number"]))
    .slot(Slot::value("LV3", &["Number"]))
    .output(OutputCheck::tag("String"))
    .colour(210)
    .tooltip("Returns LV1/LV2/LV3/LV0 based on value thresholds.")
}

pub fn log() -> BlockSpec {
    BlockSpec::new("modbus_log", "Log %1")
        .slot(Slot::value("MSG", &[]))
        .chainable()
        .colour(65)
        .tooltip("Logs a message.")
}
