use crate::catalog::{BlockSpec, SlotKind, default_catalog};
use crate::error::{GenerateError, RegistryError};
use crate::registry::BlockRegistry;
use crate::workspace::{BlockInstance, FieldValue, WorkspaceDefinition};
use ahash::AHashMap;
use itertools::Itertools;
use tracing::{debug, info, trace};

pub mod alarm;
pub mod context;
pub mod emitters;
pub mod fragment;
pub mod literal;
pub mod order;

pub use context::{DEFAULT_INDENT, GenerationContext};
pub use emitters::BlockEmitter;
pub use fragment::CodeFragment;
pub use order::Order;

use emitters::{create_emitter_by_name, register_default_emitters};

/// Turns block graphs into Python source.
///
/// A `Generator` is immutable once built. Every [`Generator::generate`] call
/// runs with its own fresh [`GenerationContext`], so a single generator can
/// serve any number of passes, including parallel ones.
pub struct Generator {
    registry: BlockRegistry,
    emitters: AHashMap<String, Box<dyn BlockEmitter>>,
    indent: String,
}

pub struct GeneratorBuilder {
    specs: Vec<BlockSpec>,
    emitters: AHashMap<String, Box<dyn BlockEmitter>>,
    type_mappings: Vec<(String, String)>,
    indent: String,
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorBuilder {
    /// Starts from the built-in catalog and its emitters.
    pub fn new() -> Self {
        let mut emitters: AHashMap<String, Box<dyn BlockEmitter>> = AHashMap::new();
        register_default_emitters(&mut emitters);
        Self {
            specs: default_catalog(),
            emitters,
            type_mappings: Vec::new(),
            indent: DEFAULT_INDENT.to_string(),
        }
    }

    /// Starts with no specs and no emitters.
    pub fn empty() -> Self {
        Self {
            specs: Vec::new(),
            emitters: AHashMap::new(),
            type_mappings: Vec::new(),
            indent: DEFAULT_INDENT.to_string(),
        }
    }

    pub fn with_spec(mut self, spec: BlockSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn with_custom_emitter(mut self, emitter: Box<dyn BlockEmitter>) -> Self {
        self.emitters
            .insert(emitter.block_type().to_string(), emitter);
        self
    }

    /// Makes `user_type_name` behave like the built-in `builtin_type_name`,
    /// sharing its shape and its emitter.
    pub fn with_type_mapping(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        self.type_mappings
            .push((user_type_name.to_string(), builtin_type_name.to_string()));
        self
    }

    /// Indentation unit for generated blocks, in spaces.
    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent = " ".repeat(width.max(1));
        self
    }

    /// Validates the catalog and checks that specs and emitters match one to one.
    pub fn build(mut self) -> Result<Generator, RegistryError> {
        for (user_type, builtin_type) in std::mem::take(&mut self.type_mappings) {
            let spec = self
                .specs
                .iter()
                .find(|s| s.type_name == builtin_type)
                .cloned()
                .ok_or_else(|| RegistryError::MissingSpec(builtin_type.clone()))?;
            let emitter = create_emitter_by_name(&builtin_type)
                .ok_or_else(|| RegistryError::MissingEmitter(builtin_type.clone()))?;
            self.specs.push(BlockSpec {
                type_name: user_type.clone(),
                ..spec
            });
            self.emitters.insert(user_type, emitter);
        }

        let mut registry = BlockRegistry::new();
        registry.register(self.specs)?;

        if let Some(missing) = registry
            .type_names()
            .find(|name| !self.emitters.contains_key(*name))
        {
            return Err(RegistryError::MissingEmitter(missing.to_string()));
        }
        if let Some(orphan) = self
            .emitters
            .keys()
            .filter(|name| !registry.contains(name))
            .sorted()
            .next()
        {
            return Err(RegistryError::MissingSpec(orphan.clone()));
        }

        debug!(block_types = registry.len(), "generator built");
        Ok(Generator {
            registry,
            emitters: self.emitters,
            indent: self.indent,
        })
    }
}

impl Generator {
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::new()
    }

    /// A generator over the built-in catalog with default settings.
    pub fn new() -> Result<Self, RegistryError> {
        Self::builder().build()
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// Runs one complete generation pass over `workspace`.
    pub fn generate(&self, workspace: &WorkspaceDefinition) -> Result<String, GenerateError> {
        let mut ctx = GenerationContext::with_indent(&self.indent);
        self.generate_with(workspace, &mut ctx)
    }

    /// Runs a pass with a caller-owned context. The context is empty again
    /// afterwards, whether the pass succeeds or fails.
    pub fn generate_with(
        &self,
        workspace: &WorkspaceDefinition,
        ctx: &mut GenerationContext,
    ) -> Result<String, GenerateError> {
        let chunks = match self.top_level_chunks(workspace, ctx) {
            Ok(chunks) => chunks,
            Err(e) => {
                ctx.reset();
                return Err(e);
            }
        };

        info!(
            top_level_blocks = workspace.blocks.len(),
            tasks = ctx.tasks().len(),
            imports = ctx.imports().len(),
            "generation pass finished"
        );
        Ok(ctx.finalize(&chunks.join("\n\n\n")))
    }

    /// Emits a single block, without following its `next` chain.
    pub fn emit_block(
        &self,
        block: &BlockInstance,
        ctx: &mut GenerationContext,
    ) -> Result<CodeFragment, GenerateError> {
        let emitter = self.emitters.get(&block.block_type).ok_or_else(|| {
            GenerateError::UnknownBlockType {
                block_id: block.id.clone(),
                type_name: block.block_type.clone(),
            }
        })?;
        trace!(block_id = %block.id, block_type = %block.block_type, "emitting block");
        emitter.emit(block, self, ctx)
    }

    /// Resolves the block connected to value input `slot`.
    ///
    /// Returns `default` verbatim when nothing (or only a disabled block) is
    /// connected. The child's code is parenthesised when its order does not
    /// bind tighter than `outer`.
    pub fn value_to_code(
        &self,
        block: &BlockInstance,
        slot: &str,
        outer: Order,
        default: &str,
        ctx: &mut GenerationContext,
    ) -> Result<String, GenerateError> {
        let check = match self.slot_kind(block, slot)? {
            SlotKind::Value { check } => check.clone(),
            _ => return Err(self.unknown_slot(block, slot)),
        };

        let Some(child) = block.input(slot).filter(|c| c.enabled) else {
            return Ok(default.to_string());
        };

        let child_spec = self.spec_of(child)?;
        let output = child_spec
            .output
            .as_ref()
            .ok_or_else(|| GenerateError::NotAValueBlock {
                block_id: child.id.clone(),
                type_name: child.block_type.clone(),
            })?;
        if !output.is_accepted_by(check.as_deref()) {
            return Err(GenerateError::IncompatibleConnection {
                block_id: block.id.clone(),
                slot: slot.to_string(),
                found: output.as_str().to_string(),
                accepted: check.unwrap_or_default().join(", "),
            });
        }

        match self.emit_block(child, ctx)? {
            CodeFragment::Expression { code, .. } if code.is_empty() => Ok(default.to_string()),
            CodeFragment::Expression { code, order } => {
                if Order::needs_parens(order, outer) {
                    Ok(format!("({})", code))
                } else {
                    Ok(code)
                }
            }
            CodeFragment::Statement(_) => Err(GenerateError::NotAValueBlock {
                block_id: child.id.clone(),
                type_name: child.block_type.clone(),
            }),
        }
    }

    /// Stringifies the statement chain in input `slot`, indented one level.
    pub fn statement_to_code(
        &self,
        block: &BlockInstance,
        slot: &str,
        ctx: &mut GenerationContext,
    ) -> Result<String, GenerateError> {
        if !matches!(self.slot_kind(block, slot)?, SlotKind::Statement) {
            return Err(self.unknown_slot(block, slot));
        }
        match block.input(slot) {
            Some(first) => {
                let code = self.chain_to_code(first, true, ctx)?;
                Ok(self.prefix_lines(&code))
            }
            None => Ok(String::new()),
        }
    }

    /// Reads a text or dropdown field, falling back to the slot's default.
    pub fn field_text(&self, block: &BlockInstance, slot: &str) -> Result<String, GenerateError> {
        let value = block.field(slot);
        match self.slot_kind(block, slot)? {
            SlotKind::Text { default } => Ok(value.map_or_else(|| default.clone(), |v| v.to_string())),
            SlotKind::Dropdown { options } => {
                let Some(value) = value else {
                    return Ok(options.first().map(|(_, v)| v.clone()).unwrap_or_default());
                };
                let value = value.to_string();
                if options.iter().any(|(_, v)| *v == value) {
                    Ok(value)
                } else {
                    Err(GenerateError::InvalidFieldValue {
                        block_id: block.id.clone(),
                        slot: slot.to_string(),
                        message: format!(
                            "'{}' is not one of [{}]",
                            value,
                            options.iter().map(|(_, v)| v).join(", ")
                        ),
                    })
                }
            }
            SlotKind::Number { .. } => self.field_number(block, slot).map(literal::number),
            _ => Err(self.unknown_slot(block, slot)),
        }
    }

    /// Reads a number field, clamped to the slot's bounds.
    pub fn field_number(&self, block: &BlockInstance, slot: &str) -> Result<f64, GenerateError> {
        let SlotKind::Number { default, min, max } = self.slot_kind(block, slot)? else {
            return Err(self.unknown_slot(block, slot));
        };
        let value = match block.field(slot) {
            None => *default,
            Some(FieldValue::Number(n)) => *n,
            Some(FieldValue::Text(text)) => text.trim().parse::<f64>().map_err(|_| {
                GenerateError::InvalidFieldValue {
                    block_id: block.id.clone(),
                    slot: slot.to_string(),
                    message: format!("'{}' is not a number", text),
                }
            })?,
        };
        if !value.is_finite() {
            return Err(GenerateError::InvalidFieldValue {
                block_id: block.id.clone(),
                slot: slot.to_string(),
                message: format!("'{}' is not a finite number", value),
            });
        }
        let value = min.map_or(value, |min| value.max(min));
        Ok(max.map_or(value, |max| value.min(max)))
    }

    /// Prefixes every non-empty line of `code` with one indent level.
    pub fn prefix_lines(&self, code: &str) -> String {
        code.split_inclusive('\n')
            .map(|line| {
                if line.trim().is_empty() {
                    line.to_string()
                } else {
                    format!("{}{}", self.indent, line)
                }
            })
            .collect()
    }

    fn top_level_chunks(
        &self,
        workspace: &WorkspaceDefinition,
        ctx: &mut GenerationContext,
    ) -> Result<Vec<String>, GenerateError> {
        let mut chunks = Vec::new();
        for block in &workspace.blocks {
            let code = self.top_level_to_code(block, ctx)?;
            if !code.trim().is_empty() {
                chunks.push(code);
            }
        }
        Ok(chunks)
    }

    fn top_level_to_code(
        &self,
        block: &BlockInstance,
        ctx: &mut GenerationContext,
    ) -> Result<String, GenerateError> {
        let spec = self.spec_of(block)?;
        if !spec.is_value_block() {
            return self.chain_to_code(block, false, ctx);
        }
        if !block.enabled {
            return Ok(String::new());
        }
        // A loose value block still runs, as a bare expression statement.
        match self.emit_block(block, ctx)? {
            CodeFragment::Expression { code, .. } => Ok(format!("{}\n", code)),
            CodeFragment::Statement(code) => Ok(code),
        }
    }

    /// Concatenates a statement block and its `next` siblings, skipping disabled ones.
    fn chain_to_code(
        &self,
        first: &BlockInstance,
        attached: bool,
        ctx: &mut GenerationContext,
    ) -> Result<String, GenerateError> {
        let mut code = String::new();
        let mut current = Some(first);
        let mut needs_previous = attached;

        while let Some(block) = current {
            let spec = self.spec_of(block)?;
            if spec.is_value_block() {
                return Err(GenerateError::NotAStatementBlock {
                    block_id: block.id.clone(),
                    type_name: block.block_type.clone(),
                });
            }
            if needs_previous && !spec.previous_statement {
                return Err(GenerateError::NoPreviousConnection {
                    block_id: block.id.clone(),
                    type_name: block.block_type.clone(),
                });
            }

            if block.enabled {
                match self.emit_block(block, ctx)? {
                    CodeFragment::Statement(s) => code.push_str(&s),
                    CodeFragment::Expression { .. } => {
                        return Err(GenerateError::NotAStatementBlock {
                            block_id: block.id.clone(),
                            type_name: block.block_type.clone(),
                        });
                    }
                }
            }

            needs_previous = true;
            current = block.next.as_deref();
        }
        Ok(code)
    }

    fn spec_of(&self, block: &BlockInstance) -> Result<&BlockSpec, GenerateError> {
        self.registry
            .get(&block.block_type)
            .ok_or_else(|| GenerateError::UnknownBlockType {
                block_id: block.id.clone(),
                type_name: block.block_type.clone(),
            })
    }

    fn slot_kind(&self, block: &BlockInstance, slot: &str) -> Result<&SlotKind, GenerateError> {
        self.spec_of(block)?
            .find_slot(slot)
            .map(|s| &s.kind)
            .ok_or_else(|| self.unknown_slot(block, slot))
    }

    fn unknown_slot(&self, block: &BlockInstance, slot: &str) -> GenerateError {
        GenerateError::UnknownSlot {
            block_id: block.id.clone(),
            type_name: block.block_type.clone(),
            slot: slot.to_string(),
        }
    }
}
