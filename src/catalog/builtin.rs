//! Blocks that the host editor ships in its default toolbox.
//!
//! The connection blocks take their port, host and numeric settings through
//! value sockets, so the literal blocks are what users plug into them. The
//! variable blocks let a task keep a polled result around instead of
//! re-polling for every field it reads.

use super::spec::{BlockSpec, OutputCheck, Slot};

pub const VARIABLE_COLOUR: u16 = 330;

pub fn text() -> BlockSpec {
    BlockSpec::new("text", "%1")
        .slot(Slot::text("TEXT", ""))
        .output(OutputCheck::tag("String"))
        .colour(160)
        .tooltip("A letter, word, or line of text.")
}

pub fn math_number() -> BlockSpec {
    BlockSpec::new("math_number", "%1")
        .slot(Slot::number("NUM", 0.0, None, None))
        .output(OutputCheck::tag("Number"))
        .colour(230)
        .tooltip("A number.")
}

pub fn variables_set() -> BlockSpec {
    BlockSpec::new("variables_set", "set %1 to %2")
        .slot(Slot::text("VAR", "item"))
        .slot(Slot::value("VALUE", &[]))
        .chainable()
        .colour(VARIABLE_COLOUR)
        .tooltip("Sets this variable to be equal to the input.")
}

pub fn variables_get() -> BlockSpec {
    BlockSpec::new("variables_get", "%1")
        .slot(Slot::text("VAR", "item"))
        .output(OutputCheck::Any)
        .colour(VARIABLE_COLOUR)
        .tooltip("Returns the value of this variable.")
}
