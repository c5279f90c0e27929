use crate::error::RegistryError;
use ahash::AHashSet;
use serde_json::{Map, Value, json};

/// The shape of one placeable block type.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSpec {
    pub type_name: String,
    /// Label template with `%1..%N` placeholders, one per slot.
    pub message: String,
    pub slots: Vec<Slot>,
    /// `None` marks a statement-only block.
    pub output: Option<OutputCheck>,
    pub previous_statement: bool,
    pub next_statement: bool,
    pub colour: u16,
    pub tooltip: String,
    pub help_url: String,
}

/// A named socket or field on a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub name: String,
    pub kind: SlotKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotKind {
    /// Visual row break. Occupies a placeholder but holds nothing.
    Dummy,
    /// Socket for another block's output. `None` accepts any output.
    Value { check: Option<Vec<String>> },
    /// Closed enumeration of `(label, value)` pairs.
    Dropdown { options: Vec<(String, String)> },
    Text { default: String },
    Number {
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Body accepting a chain of statement blocks.
    Statement,
}

/// The output type tag of a value block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputCheck {
    /// Connects to any value input.
    Any,
    Tag(String),
}

impl OutputCheck {
    pub fn tag(tag: &str) -> Self {
        OutputCheck::Tag(tag.to_string())
    }

    /// Checks whether this output may be plugged into an input with the given check list.
    pub fn is_accepted_by(&self, check: Option<&[String]>) -> bool {
        match (self, check) {
            (OutputCheck::Any, _) | (_, None) => true,
            (OutputCheck::Tag(tag), Some(accepted)) => accepted.iter().any(|a| a == tag),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OutputCheck::Any => "any",
            OutputCheck::Tag(tag) => tag,
        }
    }
}

impl Slot {
    pub fn dummy() -> Self {
        Self {
            name: String::new(),
            kind: SlotKind::Dummy,
        }
    }

    pub fn value(name: &str, check: &[&str]) -> Self {
        let check = if check.is_empty() {
            None
        } else {
            Some(check.iter().map(|c| c.to_string()).collect())
        };
        Self {
            name: name.to_string(),
            kind: SlotKind::Value { check },
        }
    }

    pub fn dropdown(name: &str, options: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            kind: SlotKind::Dropdown {
                options: options
                    .iter()
                    .map(|(label, value)| (label.to_string(), value.to_string()))
                    .collect(),
            },
        }
    }

    pub fn text(name: &str, default: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SlotKind::Text {
                default: default.to_string(),
            },
        }
    }

    pub fn number(name: &str, default: f64, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            kind: SlotKind::Number { default, min, max },
        }
    }

    pub fn statement(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SlotKind::Statement,
        }
    }

    fn is_addressable(&self) -> bool {
        !matches!(self.kind, SlotKind::Dummy)
    }

    fn to_host_json(&self) -> Value {
        match &self.kind {
            SlotKind::Dummy => json!({ "type": "input_dummy" }),
            SlotKind::Value { check } => {
                let mut arg = json!({ "type": "input_value", "name": self.name });
                if let Some(check) = check {
                    arg["check"] = match check.as_slice() {
                        [single] => json!(single),
                        many => json!(many),
                    };
                }
                arg
            }
            SlotKind::Dropdown { options } => json!({
                "type": "field_dropdown",
                "name": self.name,
                "options": options.iter().map(|(l, v)| json!([l, v])).collect::<Vec<_>>(),
            }),
            SlotKind::Text { default } => {
                json!({ "type": "field_input", "name": self.name, "text": default })
            }
            SlotKind::Number { default, min, max } => {
                let mut arg = json!({ "type": "field_number", "name": self.name, "value": default });
                if let Some(min) = min {
                    arg["min"] = json!(min);
                }
                if let Some(max) = max {
                    arg["max"] = json!(max);
                }
                arg
            }
            SlotKind::Statement => json!({ "type": "input_statement", "name": self.name }),
        }
    }
}

impl BlockSpec {
    pub fn new(type_name: &str, message: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            message: message.to_string(),
            slots: Vec::new(),
            output: None,
            previous_statement: false,
            next_statement: false,
            colour: 0,
            tooltip: String::new(),
            help_url: String::new(),
        }
    }

    pub fn slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn output(mut self, output: OutputCheck) -> Self {
        self.output = Some(output);
        self
    }

    /// Gives the block both a previous and a next statement connector.
    pub fn chainable(mut self) -> Self {
        self.previous_statement = true;
        self.next_statement = true;
        self
    }

    pub fn colour(mut self, hue: u16) -> Self {
        self.colour = hue;
        self
    }

    pub fn tooltip(mut self, tooltip: &str) -> Self {
        self.tooltip = tooltip.to_string();
        self
    }

    pub fn is_value_block(&self) -> bool {
        self.output.is_some()
    }

    pub fn find_slot(&self, name: &str) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|s| s.is_addressable() && s.name == name)
    }

    /// Returns the distinct placeholder indices used by the message template.
    pub fn placeholders(&self) -> AHashSet<usize> {
        let mut found = AHashSet::new();
        let mut chars = self.message.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                continue;
            }
            let mut digits = String::new();
            while let Some(&d) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                digits.push(d);
                chars.next();
            }
            if let Ok(index) = digits.parse::<usize>() {
                found.insert(index);
            }
        }
        found
    }

    /// Checks the structural invariants of a single spec.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let placeholders = self.placeholders();
        let expected: AHashSet<usize> = (1..=self.slots.len()).collect();
        if placeholders != expected {
            return Err(RegistryError::PlaceholderMismatch {
                type_name: self.type_name.clone(),
                placeholders: placeholders.len(),
                slots: self.slots.len(),
            });
        }

        let mut seen = AHashSet::new();
        for slot in self.slots.iter().filter(|s| s.is_addressable()) {
            if !seen.insert(slot.name.as_str()) {
                return Err(RegistryError::DuplicateSlot {
                    type_name: self.type_name.clone(),
                    slot: slot.name.clone(),
                });
            }
            match &slot.kind {
                SlotKind::Dropdown { options } if options.is_empty() => {
                    return Err(RegistryError::EmptyDropdown {
                        type_name: self.type_name.clone(),
                        slot: slot.name.clone(),
                    });
                }
                SlotKind::Number {
                    min: Some(min),
                    max: Some(max),
                    ..
                } if min > max => {
                    return Err(RegistryError::InvalidBounds {
                        type_name: self.type_name.clone(),
                        slot: slot.name.clone(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Serializes the spec in the host editor's JSON block-definition format.
    pub fn to_host_json(&self) -> Value {
        let mut def = Map::new();
        def.insert("type".into(), json!(self.type_name));
        def.insert("message0".into(), json!(self.message));
        def.insert(
            "args0".into(),
            Value::Array(self.slots.iter().map(Slot::to_host_json).collect()),
        );
        match &self.output {
            Some(OutputCheck::Any) => {
                def.insert("output".into(), Value::Null);
            }
            Some(OutputCheck::Tag(tag)) => {
                def.insert("output".into(), json!(tag));
            }
            None => {}
        }
        if self.previous_statement {
            def.insert("previousStatement".into(), Value::Null);
        }
        if self.next_statement {
            def.insert("nextStatement".into(), Value::Null);
        }
        def.insert("colour".into(), json!(self.colour));
        def.insert("tooltip".into(), json!(self.tooltip));
        def.insert("helpUrl".into(), json!(self.help_url));
        Value::Object(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_handle_multi_digit_indices() {
        let spec = BlockSpec::new("t", "a %1 b %10 c %2");
        let found = spec.placeholders();
        assert_eq!(found.len(), 3);
        assert!(found.contains(&10));
    }

    #[test]
    fn untyped_output_is_accepted_everywhere() {
        let check = vec!["Number".to_string()];
        assert!(OutputCheck::Any.is_accepted_by(Some(check.as_slice())));
        assert!(OutputCheck::tag("Number").is_accepted_by(Some(check.as_slice())));
        assert!(!OutputCheck::tag("String").is_accepted_by(Some(check.as_slice())));
        assert!(OutputCheck::tag("String").is_accepted_by(None));
    }
}
