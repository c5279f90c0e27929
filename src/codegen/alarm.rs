use std::fmt;

/// Name of the module-level helper the alarm evaluator block calls.
pub const HELPER_NAME: &str = "evaluate_alarm";

/// Result of comparing a reading against three alarm thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmLevel {
    Lv0,
    Lv1,
    Lv2,
    Lv3,
}

/// One of the three threshold parameters of the helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Lv1,
    Lv2,
    Lv3,
}

impl Threshold {
    pub fn param(self) -> &'static str {
        match self {
            Threshold::Lv1 => "lv1",
            Threshold::Lv2 => "lv2",
            Threshold::Lv3 => "lv3",
        }
    }

    fn pick(self, thresholds: [f64; 3]) -> f64 {
        match self {
            Threshold::Lv1 => thresholds[0],
            Threshold::Lv2 => thresholds[1],
            Threshold::Lv3 => thresholds[2],
        }
    }
}

/// A level returned when `lower <= val` and, if present, `val < upper`.
#[derive(Debug, Clone, Copy)]
pub struct Clause {
    pub level: AlarmLevel,
    pub lower: Threshold,
    pub upper: Option<Threshold>,
}

/// Tested top to bottom. Anything unmatched is [`AlarmLevel::Lv0`].
pub const CLAUSES: [Clause; 3] = [
    Clause {
        level: AlarmLevel::Lv1,
        lower: Threshold::Lv1,
        upper: Some(Threshold::Lv2),
    },
    Clause {
        level: AlarmLevel::Lv2,
        lower: Threshold::Lv2,
        upper: Some(Threshold::Lv3),
    },
    Clause {
        level: AlarmLevel::Lv3,
        lower: Threshold::Lv3,
        upper: None,
    },
];

impl Clause {
    fn matches(&self, value: f64, thresholds: [f64; 3]) -> bool {
        value >= self.lower.pick(thresholds)
            && self.upper.is_none_or(|upper| value < upper.pick(thresholds))
    }

    fn condition(&self) -> String {
        match self.upper {
            Some(upper) => format!("val >= {} and val < {}", self.lower.param(), upper.param()),
            None => format!("val >= {}", self.lower.param()),
        }
    }
}

impl AlarmLevel {
    /// Classifies `value` against `lv1..lv3`. The first matching clause wins.
    ///
    /// The thresholds are expected to be non-decreasing. They are not checked,
    /// so out-of-order thresholds give whatever the clause order yields.
    pub fn evaluate(value: f64, lv1: f64, lv2: f64, lv3: f64) -> Self {
        CLAUSES
            .iter()
            .find(|clause| clause.matches(value, [lv1, lv2, lv3]))
            .map_or(AlarmLevel::Lv0, |clause| clause.level)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlarmLevel::Lv0 => "LV0",
            AlarmLevel::Lv1 => "LV1",
            AlarmLevel::Lv2 => "LV2",
            AlarmLevel::Lv3 => "LV3",
        }
    }
}

impl fmt::Display for AlarmLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Python source of the helper, rendered from [`CLAUSES`].
pub fn helper_definition(indent: &str) -> String {
    let i = indent;
    let mut code = format!("def {}(val, lv1, lv2, lv3):\n", HELPER_NAME);
    for (n, clause) in CLAUSES.iter().enumerate() {
        let keyword = if n == 0 { "if" } else { "elif" };
        code.push_str(&format!(
            "{i}{keyword} {cond}:\n{i}{i}return \"{level}\"\n",
            cond = clause.condition(),
            level = clause.level,
        ));
    }
    code.push_str(&format!(
        "{i}else:\n{i}{i}return \"{}\"\n",
        AlarmLevel::Lv0
    ));
    code
}
