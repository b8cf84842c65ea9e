//! Binder: parsed commands → command instances with typed option values.
//!
//! Each option occurrence is matched against the command's schema (long names
//! case-insensitively, short names exactly), converted to its declared kind and
//! recorded. Scalars keep the last occurrence; list options keep all of them in
//! source order. Binding fails fast on the first mismatch.

/// Typed values and conversion.
pub mod value;

pub use value::{OptionValues, StructuredValue, Value};

use std::fmt;

use crate::commands::{Command, CommandMetadata, CommandRegistry, OptionMetadata};
use crate::error::{BindError, BindErrorKind};
use crate::parse::{ParsedCommand, ParsedOptionOccurrence, ParsedPipeline, ParsedRedirections};

/// A command instance whose options have been populated and checked.
pub struct BoundCommand {
    /// Registered (canonical) command name.
    pub name: String,
    pub command: Box<dyn Command>,
    pub arguments: Vec<String>,
    pub options: OptionValues,
    pub redirections: ParsedRedirections,
}

impl fmt::Debug for BoundCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundCommand")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .field("options", &self.options)
            .field("redirections", &self.redirections)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct BoundPipeline {
    pub commands: Vec<BoundCommand>,
}

/// Resolves parsed commands against the registry.
pub struct Binder<'r> {
    registry: &'r CommandRegistry,
}

impl<'r> Binder<'r> {
    pub fn new(registry: &'r CommandRegistry) -> Self {
        Self { registry }
    }

    /// Bind every stage; the first failure aborts the whole pipeline.
    pub fn bind_pipeline(&self, pipeline: ParsedPipeline) -> Result<BoundPipeline, BindError> {
        let commands = pipeline
            .commands
            .into_iter()
            .map(|parsed| self.bind_command(parsed))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BoundPipeline { commands })
    }

    /// Look the command up by name and bind it.
    pub fn bind_command(&self, parsed: ParsedCommand) -> Result<BoundCommand, BindError> {
        let metadata = self
            .registry
            .lookup(&parsed.name)
            .ok_or_else(|| BindError::new(parsed.name.clone(), BindErrorKind::UnknownCommand))?;
        self.bind(parsed, metadata)
    }

    pub fn bind(
        &self,
        parsed: ParsedCommand,
        metadata: &CommandMetadata,
    ) -> Result<BoundCommand, BindError> {
        let fail = |kind| BindError::new(metadata.name.clone(), kind);

        let mut values = OptionValues::new();
        // Words the parser took as values of options that turned out boolean
        let mut returned: Vec<(usize, String)> = Vec::new();

        for occurrence in &parsed.options {
            let option = resolve(metadata, occurrence)
                .ok_or_else(|| fail(BindErrorKind::UnknownOption(occurrence.flag())))?;

            if option.is_bool_flag() {
                match &occurrence.raw_value {
                    Some(value) if occurrence.is_value_space_separated => {
                        returned.push((occurrence.position, value.clone()));
                    }
                    Some(_) => return Err(fail(BindErrorKind::UnexpectedValue(occurrence.flag()))),
                    None => {}
                }
                values.record(option, Value::Bool(true));
                continue;
            }

            let raw = occurrence
                .raw_value
                .as_deref()
                .ok_or_else(|| fail(BindErrorKind::MissingValue(occurrence.flag())))?;
            let value = value::convert(option, &occurrence.flag(), raw, self.registry).map_err(fail)?;
            values.record(option, value);
        }

        if let Some(missing) = metadata
            .options
            .iter()
            .find(|o| o.required && !values.contains(o.long_name))
        {
            return Err(fail(BindErrorKind::MissingRequired(format!("--{}", missing.long_name))));
        }

        let mut arguments = parsed.arguments;
        for (inserted, (position, value)) in returned.into_iter().enumerate() {
            let at = (position + inserted).min(arguments.len());
            arguments.insert(at, value);
        }

        let mut command = metadata.create();
        command
            .configure(&values)
            .map_err(|reason| fail(BindErrorKind::Rejected(reason)))?;

        Ok(BoundCommand {
            name: metadata.name.clone(),
            command,
            arguments,
            options: values,
            redirections: parsed.redirections,
        })
    }
}

fn resolve<'m>(
    metadata: &'m CommandMetadata,
    occurrence: &ParsedOptionOccurrence,
) -> Option<&'m OptionMetadata> {
    if occurrence.is_long {
        metadata.find_long(&occurrence.name)
    } else {
        metadata.find_short(&occurrence.name)
    }
}
