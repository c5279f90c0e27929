pub mod action;
pub mod builtin;
pub mod connection;
pub mod spec;

pub use spec::*;

/// Every block type the generator ships with, in toolbox order.
pub fn default_catalog() -> Vec<BlockSpec> {
    vec![
        connection::rtu_config(),
        connection::ascii_config(),
        connection::tcp_config(),
        action::pull_data(),
        action::set_interval(),
        action::get_field(),
        action::task_definition(),
        action::get_register(),
        action::get_limiter(),
        action::dcp_update(),
        action::alarm_evaluator(),
        action::log(),
        builtin::text(),
        builtin::math_number(),
        builtin::variables_set(),
        builtin::variables_get(),
    ]
}
