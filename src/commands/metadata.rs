//! Declared option schema of a command.
//!
//! Schemas are plain data: each command type lists its options as a constant
//! slice of [`OptionMetadata`], built with the `const fn` builders below.

use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use super::Command;

/// Target type of an option value. Closed set; structured kinds dispatch to a
/// parser registered on the [`CommandRegistry`](super::CommandRegistry) by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
    /// Member names, matched case-insensitively.
    Enum(&'static [&'static str]),
    Structured(&'static str),
}

impl ValueKind {
    /// Placeholder shown in usage text.
    pub fn placeholder(&self) -> String {
        match self {
            ValueKind::Bool => String::new(),
            ValueKind::Int => "<int>".into(),
            ValueKind::Float => "<number>".into(),
            ValueKind::String => "<text>".into(),
            ValueKind::Enum(members) => format!("<{}>", members.join("|")),
            ValueKind::Structured(name) => format!("<{name}>"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionMetadata {
    pub long_name: &'static str,
    pub short_name: Option<char>,
    pub required: bool,
    pub description: &'static str,
    /// Element type for list options.
    pub kind: ValueKind,
    /// Accumulates every occurrence instead of keeping the last.
    pub list: bool,
}

impl OptionMetadata {
    pub const fn new(long_name: &'static str, kind: ValueKind) -> Self {
        Self {
            long_name,
            short_name: None,
            required: false,
            description: "",
            kind,
            list: false,
        }
    }

    /// A boolean switch: present means true.
    pub const fn flag(long_name: &'static str) -> Self {
        Self::new(long_name, ValueKind::Bool)
    }

    pub const fn short(mut self, short_name: char) -> Self {
        self.short_name = Some(short_name);
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn list(mut self) -> Self {
        self.list = true;
        self
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn is_bool_flag(&self) -> bool {
        self.kind == ValueKind::Bool
    }

    pub fn is_list_type(&self) -> bool {
        self.list
    }

    pub fn element_type(&self) -> ValueKind {
        self.kind
    }

    /// Long names match case-insensitively.
    pub fn matches_long(&self, name: &str) -> bool {
        self.long_name.eq_ignore_ascii_case(name)
    }

    /// Short names are case-sensitive: `-a` and `-A` differ.
    pub fn matches_short(&self, name: &str) -> bool {
        let mut chars = name.chars();
        match (chars.next(), chars.next(), self.short_name) {
            (Some(c), None, Some(short)) => c == short,
            _ => false,
        }
    }

    /// `-s, --long <kind>` as shown in usage text.
    pub fn signature(&self) -> String {
        let mut sig = match self.short_name {
            Some(c) => format!("-{c}, --{}", self.long_name),
            None => format!("    --{}", self.long_name),
        };
        let placeholder = self.kind.placeholder();
        if !placeholder.is_empty() {
            sig.push(' ');
            sig.push_str(&placeholder);
        }
        if self.list {
            sig.push_str("...");
        }
        sig
    }
}

/// Produces a fresh command instance per invocation.
pub type CommandFactory = Arc<dyn Fn() -> Box<dyn Command> + Send + Sync>;

/// Registry entry: a command's name, description, option schema and factory.
#[derive(Clone)]
pub struct CommandMetadata {
    pub name: String,
    pub description: String,
    pub options: Vec<OptionMetadata>,
    factory: CommandFactory,
}

impl CommandMetadata {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        options: Vec<OptionMetadata>,
        factory: CommandFactory,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options,
            factory,
        }
    }

    pub fn create(&self) -> Box<dyn Command> {
        (self.factory)()
    }

    pub fn find_long(&self, name: &str) -> Option<&OptionMetadata> {
        self.options.iter().find(|o| o.matches_long(name))
    }

    pub fn find_short(&self, name: &str) -> Option<&OptionMetadata> {
        self.options.iter().find(|o| o.matches_short(name))
    }

    /// Help text: description, then one aligned line per option.
    pub fn usage(&self) -> String {
        let mut text = format!("{} - {}\n", self.name, self.description);
        if self.options.is_empty() {
            return text;
        }
        text.push_str("\nOptions:\n");
        let signatures: Vec<String> = self.options.iter().map(|o| o.signature()).collect();
        let width = signatures.iter().map(|s| s.len()).max().unwrap_or(0);
        for (option, sig) in self.options.iter().zip(&signatures) {
            let _ = write!(text, "  {sig:<width$}  {}", option.description);
            if option.required {
                text.push_str(" (required)");
            }
            text.push('\n');
        }
        text
    }
}

impl fmt::Debug for CommandMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandMetadata")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
