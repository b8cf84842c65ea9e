use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::{CommandMetadata, CommandType};
use crate::bind::StructuredValue;
use crate::config::Config;

/// Host-registered parser for a [`ValueKind::Structured`](super::ValueKind::Structured) option.
pub type ValueParser = Arc<dyn Fn(&str) -> Result<StructuredValue, String> + Send + Sync>;

/// Registry of all commands, keyed by lower-cased command name.
///
/// Populated once at startup and read-only afterwards; lookups are safe from
/// any number of threads.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandMetadata>,
    parsers: HashMap<String, ValueParser>,
    disabled: Vec<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry that refuses the commands disabled in configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            disabled: config
                .commands
                .disabled
                .iter()
                .map(|name| name.to_lowercase())
                .collect(),
            ..Self::default()
        }
    }

    /// Register a command from its static declaration.
    pub fn register<T: CommandType + 'static>(&mut self) -> &mut Self {
        self.register_metadata(CommandMetadata::new(
            T::NAME,
            T::DESCRIPTION,
            T::OPTIONS.to_vec(),
            Arc::new(T::create),
        ))
    }

    /// Register prebuilt metadata. A later registration under the same name
    /// (case-insensitively) replaces the earlier one.
    pub fn register_metadata(&mut self, metadata: CommandMetadata) -> &mut Self {
        let key = metadata.name.to_lowercase();
        if self.disabled.contains(&key) {
            log::debug!("command '{}' disabled by configuration", metadata.name);
            return self;
        }

        for (i, option) in metadata.options.iter().enumerate() {
            let clash = metadata.options[..i].iter().any(|other| {
                other.matches_long(option.long_name)
                    || (option.short_name.is_some() && other.short_name == option.short_name)
            });
            if clash {
                log::warn!(
                    "command '{}' declares option '--{}' more than once; the first declaration wins",
                    metadata.name,
                    option.long_name
                );
            }
        }

        if let Some(previous) = self.commands.insert(key, metadata) {
            log::warn!(
                "command '{}' registered more than once; the latest registration wins",
                previous.name
            );
        }
        self
    }

    /// Register the parser used for options declared as `Structured(name)`.
    pub fn register_value_parser<F>(&mut self, name: impl Into<String>, parser: F) -> &mut Self
    where
        F: Fn(&str) -> Result<StructuredValue, String> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.parsers.insert(name.clone(), Arc::new(parser)).is_some() {
            log::warn!("value parser '{name}' registered more than once; the latest registration wins");
        }
        self
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<&CommandMetadata> {
        self.commands.get(&name.to_lowercase())
    }

    pub fn value_parser(&self, name: &str) -> Option<&ValueParser> {
        self.parsers.get(name)
    }

    /// Registered command names, ordered case-insensitively.
    pub fn list_names(&self) -> impl Iterator<Item = &str> {
        self.commands.values().map(|m| m.name.as_str())
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandMetadata> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
