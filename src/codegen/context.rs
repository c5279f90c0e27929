use ahash::AHashSet;
use itertools::Itertools;

pub const DEFAULT_INDENT: &str = "    ";

/// Key-deduplicated definitions kept in first-request order.
#[derive(Debug, Default, Clone)]
struct OrderedDefinitions {
    keys: AHashSet<String>,
    entries: Vec<String>,
}

impl OrderedDefinitions {
    fn insert(&mut self, key: &str, text: String) -> bool {
        if !self.keys.insert(key.to_string()) {
            return false;
        }
        self.entries.push(text);
        true
    }

    fn take(&mut self) -> Vec<String> {
        self.keys.clear();
        std::mem::take(&mut self.entries)
    }
}

/// State threaded through every emitter call of one generation pass.
///
/// Holds the imports and helper definitions the emitted code needs, plus the
/// task functions the runner has to launch. Never share one across passes.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    indent: String,
    imports: OrderedDefinitions,
    helpers: OrderedDefinitions,
    tasks: Vec<String>,
    task_depth: usize,
}

impl Default for GenerationContext {
    fn default() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(indent: &str) -> Self {
        Self {
            indent: indent.to_string(),
            imports: OrderedDefinitions::default(),
            helpers: OrderedDefinitions::default(),
            tasks: Vec::new(),
            task_depth: 0,
        }
    }

    /// Requests an import line. Returns `false` if `key` was already requested.
    pub fn require_import(&mut self, key: &str, statement: &str) -> bool {
        self.imports.insert(key, statement.to_string())
    }

    /// Requests a module-level helper definition, emitted once per file.
    pub fn provide_helper(&mut self, key: &str, code: String) -> bool {
        self.helpers.insert(key, code)
    }

    pub fn register_task(&mut self, name: String) {
        self.tasks.push(name);
    }

    pub fn has_task(&self, name: &str) -> bool {
        self.tasks.iter().any(|t| t == name)
    }

    /// Marks the start of a task body. Paired with [`GenerationContext::leave_task`].
    pub fn enter_task(&mut self) {
        self.task_depth += 1;
    }

    pub fn leave_task(&mut self) {
        self.task_depth = self.task_depth.saturating_sub(1);
    }

    /// Whether code emitted now ends up inside an async task function.
    pub fn in_task(&self) -> bool {
        self.task_depth > 0
    }

    /// Drops everything recorded so far.
    pub fn reset(&mut self) {
        self.imports.take();
        self.helpers.take();
        self.tasks.clear();
        self.task_depth = 0;
    }

    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    pub fn imports(&self) -> &[String] {
        &self.imports.entries
    }

    pub fn helpers(&self) -> &[String] {
        &self.helpers.entries
    }

    /// Wraps the assembled body with the import header, helper definitions and,
    /// when tasks were registered, the concurrent runner.
    ///
    /// The context is emptied afterwards, so it can start another pass clean.
    pub fn finalize(&mut self, code: &str) -> String {
        let tasks = std::mem::take(&mut self.tasks);
        self.task_depth = 0;
        if !tasks.is_empty() {
            self.require_import("asyncio", "import asyncio");
        }

        let mut sections: Vec<String> = Vec::new();
        let imports = self.imports.take();
        if !imports.is_empty() {
            sections.push(imports.join("\n"));
        }
        sections.extend(self.helpers.take());
        sections.push(code.to_string());
        if !tasks.is_empty() {
            sections.push(self.runner(&tasks));
        }

        let joined = sections
            .iter()
            .map(|s| s.trim_matches('\n'))
            .filter(|s| !s.trim().is_empty())
            .join("\n\n\n");
        normalize_whitespace(&joined)
    }

    fn runner(&self, tasks: &[String]) -> String {
        let i = &self.indent;
        let calls = tasks.iter().map(|t| format!("{}()", t)).join(", ");
        format!(
            "async def main():\n\
             {i}await asyncio.gather({calls})\n\
             \n\
             \n\
             if __name__ == \"__main__\":\n\
             {i}try:\n\
             {i}{i}asyncio.run(main())\n\
             {i}except KeyboardInterrupt:\n\
             {i}{i}pass\n",
            i = i,
            calls = calls,
        )
    }
}

/// Strips trailing whitespace from every line and leaves exactly one final newline.
fn normalize_whitespace(code: &str) -> String {
    let body = code.lines().map(str::trim_end).join("\n");
    let body = body.trim_matches('\n');
    if body.is_empty() {
        String::new()
    } else {
        format!("{}\n", body)
    }
}
