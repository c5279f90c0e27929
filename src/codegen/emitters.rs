use super::alarm;
use super::context::GenerationContext;
use super::fragment::CodeFragment;
use super::literal::{identifier, name_fragment, number, quote};
use super::order::Order;
use super::Generator;
use crate::error::GenerateError;
use crate::workspace::BlockInstance;
use ahash::AHashMap;
use itertools::Itertools;
use tracing::warn;

/// Defines the contract for turning one block type into code.
pub trait BlockEmitter: Send + Sync {
    fn block_type(&self) -> &str;
    fn emit(
        &self,
        block: &BlockInstance,
        generator: &Generator,
        ctx: &mut GenerationContext,
    ) -> Result<CodeFragment, GenerateError>;
}

type EmitResult = Result<CodeFragment, GenerateError>;

pub const DEFAULT_SERIAL_PORT: &str = "\"COM4\"";
pub const DEFAULT_TCP_HOST: &str = "\"127.0.0.1\"";
pub const DEFAULT_TCP_PORT: &str = "502";
pub const DEFAULT_BYTESIZE: &str = "8";
pub const DEFAULT_STOPBITS: &str = "1";
pub const DEFAULT_TIMEOUT: &str = "3.0";
pub const DEFAULT_SLAVE_ID: &str = "1";
pub const DEFAULT_START_ADDRESS: &str = "0";
pub const DEFAULT_COUNT: &str = "2";
pub const DEFAULT_INTERVAL_MS: &str = "1000";
pub const DEFAULT_DATA: &str = "{}";
pub const DEFAULT_NUMBER: &str = "0";
pub const DEFAULT_NONE: &str = "None";
pub const DEFAULT_MESSAGE: &str = "\"\"";

/// Master macro to define all built-in emitters, their registration, and their creation.
macro_rules! define_emitters {
    ( $( ($struct_name:ident, $block_type:literal, $emit_fn:ident) ),* $(,)? ) => {
        $(
            struct $struct_name;
            impl BlockEmitter for $struct_name {
                fn block_type(&self) -> &str { $block_type }
                fn emit(&self, block: &BlockInstance, generator: &Generator, ctx: &mut GenerationContext) -> EmitResult {
                    $emit_fn(block, generator, ctx)
                }
            }
        )*

        pub(super) fn register_default_emitters(registry: &mut AHashMap<String, Box<dyn BlockEmitter>>) {
            $( registry.insert($block_type.to_string(), Box::new($struct_name)); )*
        }

        pub(super) fn create_emitter_by_name(name: &str) -> Option<Box<dyn BlockEmitter>> {
            match name {
                $( $block_type => Some(Box::new($struct_name)), )*
                _ => None,
            }
        }
    };
}

define_emitters! {
    // Connection blocks
    (RtuConfigEmitter, "RTU_config", emit_rtu_config),
    (AsciiConfigEmitter, "ASCII_config", emit_ascii_config),
    (TcpConfigEmitter, "TCP_config", emit_tcp_config),

    // Action blocks
    (PullDataEmitter, "modbus_pull_data", emit_pull_data),
    (SetIntervalEmitter, "set_modbus_interval", emit_set_interval),
    (GetFieldEmitter, "modbus_get_field", emit_get_field),
    (TaskDefinitionEmitter, "modbus_task_definition", emit_task_definition),
    (GetRegisterEmitter, "modbus_get_register", emit_get_register),
    (GetLimiterEmitter, "modbus_get_limiter", emit_get_limiter),
    (DcpUpdateEmitter, "modbus_dcp_update", emit_dcp_update),
    (AlarmEvaluatorEmitter, "modbus_alarm_evaluator", emit_alarm_evaluator),
    (LogEmitter, "modbus_log", emit_log),

    // Host built-ins
    (TextEmitter, "text", emit_text),
    (NumberEmitter, "math_number", emit_number),
    (VariableSetEmitter, "variables_set", emit_variables_set),
    (VariableGetEmitter, "variables_get", emit_variables_get)
}

/// Formats a call with one keyword argument per line.
fn call_with_kwargs(callee: &str, kwargs: &[(&str, String)], indent: &str) -> String {
    let args = kwargs
        .iter()
        .map(|(name, value)| format!("{}{}={}", indent, name, value))
        .join(",\n");
    format!("{}(\n{}\n)", callee, args)
}

fn require_from_import(ctx: &mut GenerationContext, module: &str, name: &str) {
    ctx.require_import(name, &format!("from {} import {}", module, name));
}

// --- Connection blocks ---

fn emit_serial_config(
    class: &str,
    block: &BlockInstance,
    generator: &Generator,
    ctx: &mut GenerationContext,
) -> EmitResult {
    require_from_import(ctx, "connection_type", class);

    let kwargs = [
        ("port", generator.value_to_code(block, "PORT", Order::None, DEFAULT_SERIAL_PORT, ctx)?),
        ("baudrate", generator.field_text(block, "BAUDRATE")?),
        ("bytesize", generator.value_to_code(block, "BYTESIZE", Order::None, DEFAULT_BYTESIZE, ctx)?),
        ("parity", quote(&generator.field_text(block, "PARITY")?)),
        ("stopbits", generator.value_to_code(block, "STOPBITS", Order::None, DEFAULT_STOPBITS, ctx)?),
        ("timeout", generator.value_to_code(block, "TIMEOUT", Order::None, DEFAULT_TIMEOUT, ctx)?),
        ("slave_id", generator.value_to_code(block, "SLAVE_ID", Order::None, DEFAULT_SLAVE_ID, ctx)?),
        ("start_address", generator.value_to_code(block, "START_ADDRESS", Order::None, DEFAULT_START_ADDRESS, ctx)?),
        ("count", generator.value_to_code(block, "COUNT", Order::None, DEFAULT_COUNT, ctx)?),
        ("function_code", generator.field_text(block, "FUNCTION_CODE")?),
    ];

    Ok(CodeFragment::expression(
        call_with_kwargs(class, &kwargs, generator.indent()),
        Order::FunctionCall,
    ))
}

fn emit_rtu_config(block: &BlockInstance, generator: &Generator, ctx: &mut GenerationContext) -> EmitResult {
    emit_serial_config("RTUConfig", block, generator, ctx)
}

fn emit_ascii_config(block: &BlockInstance, generator: &Generator, ctx: &mut GenerationContext) -> EmitResult {
    emit_serial_config("ASCIIConfig", block, generator, ctx)
}

fn emit_tcp_config(block: &BlockInstance, generator: &Generator, ctx: &mut GenerationContext) -> EmitResult {
    require_from_import(ctx, "connection_type", "TCPConfig");

    let kwargs = [
        ("host", generator.value_to_code(block, "HOST", Order::None, DEFAULT_TCP_HOST, ctx)?),
        ("port", generator.value_to_code(block, "PORT", Order::None, DEFAULT_TCP_PORT, ctx)?),
        ("timeout", generator.value_to_code(block, "TIMEOUT", Order::None, DEFAULT_TIMEOUT, ctx)?),
        ("slave_id", generator.value_to_code(block, "SLAVE_ID", Order::None, DEFAULT_SLAVE_ID, ctx)?),
        ("start_address", generator.value_to_code(block, "START_ADDRESS", Order::None, DEFAULT_START_ADDRESS, ctx)?),
        ("count", generator.value_to_code(block, "COUNT", Order::None, DEFAULT_COUNT, ctx)?),
        ("function_code", generator.field_text(block, "FUNCTION_CODE")?),
    ];

    Ok(CodeFragment::expression(
        call_with_kwargs("TCPConfig", &kwargs, generator.indent()),
        Order::FunctionCall,
    ))
}

// --- Action blocks ---

fn emit_pull_data(block: &BlockInstance, generator: &Generator, ctx: &mut GenerationContext) -> EmitResult {
    require_from_import(ctx, "poll", "pull_data_async");
    if !ctx.in_task() {
        warn!(block_id = %block.id, "pull_data_async awaited outside a task, the script will not run");
    }
    let config = generator.value_to_code(block, "CONFIG", Order::None, DEFAULT_NONE, ctx)?;
    Ok(CodeFragment::expression(
        format!("await pull_data_async({})", config),
        Order::Await,
    ))
}

fn emit_set_interval(block: &BlockInstance, generator: &Generator, ctx: &mut GenerationContext) -> EmitResult {
    require_from_import(ctx, "poll", "set_interval_frequency");
    let ms = generator.value_to_code(block, "INTERVAL_MS", Order::None, DEFAULT_INTERVAL_MS, ctx)?;
    Ok(CodeFragment::statement(format!("set_interval_frequency({})\n", ms)))
}

fn emit_get_field(block: &BlockInstance, generator: &Generator, ctx: &mut GenerationContext) -> EmitResult {
    let field = generator.field_text(block, "FIELD")?;
    let data = generator.value_to_code(block, "DATA", Order::Member, DEFAULT_DATA, ctx)?;
    Ok(CodeFragment::expression(
        format!("{}.get({})", data, quote(&field)),
        Order::FunctionCall,
    ))
}

/// Emits a self-rescheduling polling loop and registers it with the runner.
fn emit_task_definition(
    block: &BlockInstance,
    generator: &Generator,
    ctx: &mut GenerationContext,
) -> EmitResult {
    ctx.require_import("asyncio", "import asyncio");
    require_from_import(ctx, "poll", "set_interval_frequency");

    let task_id = name_fragment(&generator.field_text(block, "TASK_ID")?);
    let interval = generator.field_number(block, "INTERVAL")?;

    let mut name = format!("task_{}_loop", task_id);
    let mut suffix = 2;
    while ctx.has_task(&name) {
        name = format!("task_{}_{}_loop", task_id, suffix);
        suffix += 1;
    }
    if suffix > 2 {
        warn!(block_id = %block.id, task = %name, "task id already used in this pass, renamed");
    }
    ctx.register_task(name.clone());

    ctx.enter_task();
    let body = generator.statement_to_code(block, "DO", ctx);
    ctx.leave_task();
    let body = body?;
    let i = generator.indent();
    Ok(CodeFragment::statement(format!(
        "async def {name}():\n\
         {i}while True:\n\
         {i}{i}set_interval_frequency({ms})\n\
         {body}\
         {i}{i}await asyncio.sleep({secs})\n",
        name = name,
        i = i,
        ms = number(interval * 1000.0),
        body = generator.prefix_lines(&body),
        secs = number(interval),
    )))
}

fn emit_get_register(block: &BlockInstance, generator: &Generator, ctx: &mut GenerationContext) -> EmitResult {
    let index = generator.value_to_code(block, "INDEX", Order::None, DEFAULT_NUMBER, ctx)?;
    let data = generator.value_to_code(block, "DATA", Order::Member, DEFAULT_DATA, ctx)?;
    Ok(CodeFragment::expression(
        format!("{}.get(\"registers\", [])[{}]", data, index),
        Order::Member,
    ))
}

fn emit_get_limiter(block: &BlockInstance, generator: &Generator, ctx: &mut GenerationContext) -> EmitResult {
    require_from_import(ctx, "dcp", "get_limiter");
    let name = generator.field_text(block, "LIMITER_NAME")?;
    Ok(CodeFragment::expression(
        format!("get_limiter({})", quote(&name)),
        Order::FunctionCall,
    ))
}

fn emit_dcp_update(block: &BlockInstance, generator: &Generator, ctx: &mut GenerationContext) -> EmitResult {
    require_from_import(ctx, "dcp", "dcp_update");
    let name = generator.field_text(block, "NAME")?;
    let value = generator.value_to_code(block, "VALUE", Order::None, DEFAULT_NONE, ctx)?;
    Ok(CodeFragment::statement(format!(
        "dcp_update({}, {})\n",
        quote(&name),
        value
    )))
}

fn emit_alarm_evaluator(
    block: &BlockInstance,
    generator: &Generator,
    ctx: &mut GenerationContext,
) -> EmitResult {
    ctx.provide_helper(alarm::HELPER_NAME, alarm::helper_definition(generator.indent()));
    let args = ["VAL", "LV1", "LV2", "LV3"]
        .iter()
        .map(|slot| generator.value_to_code(block, slot, Order::None, DEFAULT_NUMBER, ctx))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CodeFragment::expression(
        format!("{}({})", alarm::HELPER_NAME, args.join(", ")),
        Order::FunctionCall,
    ))
}

fn emit_log(block: &BlockInstance, generator: &Generator, ctx: &mut GenerationContext) -> EmitResult {
    ctx.require_import("logging", "import logging");
    ctx.provide_helper(
        "logging_config",
        call_with_kwargs(
            "logging.basicConfig",
            &[
                ("level", "logging.INFO".to_string()),
                ("format", quote("%(asctime)s [%(levelname)s] %(message)s")),
                ("datefmt", quote("%H:%M:%S")),
            ],
            generator.indent(),
        ),
    );
    let msg = generator.value_to_code(block, "MSG", Order::None, DEFAULT_MESSAGE, ctx)?;
    Ok(CodeFragment::statement(format!("logging.info({})\n", msg)))
}

// --- Host built-ins ---

fn emit_text(block: &BlockInstance, generator: &Generator, _ctx: &mut GenerationContext) -> EmitResult {
    let text = generator.field_text(block, "TEXT")?;
    Ok(CodeFragment::expression(quote(&text), Order::Atomic))
}

fn emit_number(block: &BlockInstance, generator: &Generator, _ctx: &mut GenerationContext) -> EmitResult {
    let value = generator.field_number(block, "NUM")?;
    let order = if value < 0.0 {
        Order::UnarySign
    } else {
        Order::Atomic
    };
    Ok(CodeFragment::expression(number(value), order))
}

fn emit_variables_set(
    block: &BlockInstance,
    generator: &Generator,
    ctx: &mut GenerationContext,
) -> EmitResult {
    let name = identifier(&generator.field_text(block, "VAR")?);
    let value = generator.value_to_code(block, "VALUE", Order::None, DEFAULT_NONE, ctx)?;
    Ok(CodeFragment::statement(format!("{} = {}\n", name, value)))
}

fn emit_variables_get(
    block: &BlockInstance,
    generator: &Generator,
    _ctx: &mut GenerationContext,
) -> EmitResult {
    let name = identifier(&generator.field_text(block, "VAR")?);
    Ok(CodeFragment::expression(name, Order::Atomic))
}
