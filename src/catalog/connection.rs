use super::spec::{BlockSpec, OutputCheck, Slot};

pub const CONNECTION_COLOUR: u16 = 160;
pub const MODBUS_CONFIG: &str = "ModbusConfig";

pub const BAUDRATE_OPTIONS: &[(&str, &str)] =
    &[("9600", "9600"), ("19200", "19200"), ("115200", "115200")];

pub const PARITY_OPTIONS: &[(&str, &str)] =
    &[("None (N)", "N"), ("Even (E)", "E"), ("Odd (O)", "O")];

/// Modbus function codes selectable on every connection block.
pub const FUNCTION_CODE_OPTIONS: &[(&str, &str)] = &[
    ("Coils (1)", "1"),
    ("Discrete Inputs (2)", "2"),
    ("Holding Registers (3)", "3"),
    ("Input Registers (4)", "4"),
];

/// Shared layout of the two serial framings. Only the type and tooltip differ.
fn serial_config(type_name: &str, title: &str, tooltip: &str) -> BlockSpec {
    BlockSpec::new(
        type_name,
        &format!(
            "{} %1 Port: %2 Baudrate: %3 Bytesize: %4 Parity: %5 Stopbits: %6 Timeout: %7 Slave ID: %8 Addr: %9 Count: %10 FC: %11",
            title
        ),
    )
    .slot(Slot::dummy())
    .slot(Slot::value("PORT", &["String"]))
    .slot(Slot::dropdown("BAUDRATE", BAUDRATE_OPTIONS))
    .slot(Slot::value("BYTESIZE", &["Number"]))
    .slot(Slot::dropdown("PARITY", PARITY_OPTIONS))
    .slot(Slot::value("STOPBITS", &["Number"]))
    .slot(Slot::value("TIMEOUT", &["Number"]))
    .slot(Slot::value("SLAVE_ID", &["Number"]))
    .slot(Slot::value("START_ADDRESS", &["Number"]))
    .slot(Slot::value("COUNT", &["Number"]))
    .slot(Slot::dropdown("FUNCTION_CODE", FUNCTION_CODE_OPTIONS))
    .output(OutputCheck::tag(MODBUS_CONFIG))
    .colour(CONNECTION_COLOUR)
    .tooltip(tooltip)
}

pub fn rtu_config() -> BlockSpec {
    serial_config(
        "RTU_config",
        "MODBUS RTU Config",
        "Configures a Modbus RTU serial connection.",
    )
}

pub fn ascii_config() -> BlockSpec {
    serial_config(
        "ASCII_config",
        "MODBUS ASCII Config",
        "Configures a Modbus ASCII serial connection.",
    )
}

pub fn tcp_config() -> BlockSpec {
    BlockSpec::new(
        "TCP_config",
        "MODBUS TCP Config %1 Host: %2 Port: %3 Timeout: %4 Slave ID: %5 Addr: %6 Count: %7 FC: %8",
    )
    .slot(Slot::dummy())
    .slot(Slot::value("HOST", &["String"]))
    .slot(Slot::value("PORT", &["Number"]))
    .slot(Slot::value("TIMEOUT", &["Number"]))
    .slot(Slot::value("SLAVE_ID", &["Number"]))
    .slot(Slot::value("START_ADDRESS", &["Number"]))
    .slot(Slot::value("COUNT", &["Number"]))
    .slot(Slot::dropdown("FUNCTION_CODE", FUNCTION_CODE_OPTIONS))
    .output(OutputCheck::tag(MODBUS_CONFIG))
    .colour(CONNECTION_COLOUR)
    .tooltip("Configures a Modbus TCP/IP connection.")
}
