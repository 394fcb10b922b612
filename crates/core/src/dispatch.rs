//! Operation selection, preparation and help.
//!
//! A [`Dispatcher`] holds every registered operation. For one invocation it picks the
//! operation named in the tokens, validates it, binds its options from configuration and
//! arguments and reports whether it is ready to run:
//!
//! ```text
//! Unselected -> Selected -> Validated -> Bound -> Ready | NotReady
//! ```
//!
//! Not selecting anything is a normal outcome; the caller shows general help.

use indexmap::IndexSet;
use itertools::Itertools;
use log::{debug, warn};

use crate::binder::{bind, BindReport};
use crate::config::{ConfigSection, Configuration};
use crate::error::Error::{NoOperationSelected, NonUniqueOperationName, NonUniqueOptionName};
use crate::error::Result;
use crate::help::{general_help, operation_help, HelpDocument};
use crate::operation::{validate_operation, Operation, OptionField, OptionInfo};

/// Result of preparing an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preparation {
    /// No operation matched; show general help.
    Unselected,
    /// The selected operation is bound and its readiness check passed.
    Ready,
    /// The selected operation is bound but its readiness check failed; show its help.
    NotReady,
}

/// Invocation-wide requests handled before any operation is prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralRequest {
    Help,
    Version,
}

/// Looks for `--help`/`--h` or `--version`/`--v` among the tokens. Help wins when both
/// are present.
pub fn detect_general_request<S: AsRef<str>>(args: &[S]) -> Option<GeneralRequest> {
    let has = |long: &str, short: &str| {
        args.iter()
            .any(|arg| arg.as_ref() == long || arg.as_ref() == short)
    };

    if has("--help", "--h") {
        Some(GeneralRequest::Help)
    } else if has("--version", "--v") {
        Some(GeneralRequest::Version)
    } else {
        None
    }
}

/// A registered operation with its option field table.
trait Registration {
    fn operation(&self) -> &dyn Operation;
    fn operation_mut(&mut self) -> &mut dyn Operation;
    fn options(&self) -> Vec<OptionInfo>;
    fn reset(&mut self);
    fn bind(&mut self, section: Option<&ConfigSection<'_>>, args: &[String]) -> BindReport;
}

struct Registered<T> {
    operation: T,
    fields: Vec<OptionField<T>>,
}

impl<T: Operation + Default> Registration for Registered<T> {
    fn operation(&self) -> &dyn Operation {
        &self.operation
    }

    fn operation_mut(&mut self) -> &mut dyn Operation {
        &mut self.operation
    }

    fn options(&self) -> Vec<OptionInfo> {
        self.fields.iter().map(OptionField::info).collect()
    }

    fn reset(&mut self) {
        self.operation = T::default();
    }

    fn bind(&mut self, section: Option<&ConfigSection<'_>>, args: &[String]) -> BindReport {
        let name = self.operation.name().to_string();
        bind(&mut self.operation, &name, &self.fields, section, args)
    }
}

#[derive(Default)]
pub struct Dispatcher {
    operations: Vec<Box<dyn Registration>>,
    selected: Option<usize>,
    last_report: Option<BindReport>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an operation type and builds its option field table.
    ///
    /// Every [`Dispatcher::prepare`] binds onto a new `T::default()`, so no value
    /// carries over from an earlier invocation.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an option descriptor is invalid, if two options
    /// share a name or short name, or if an operation with the same name (ignoring case)
    /// is already registered.
    pub fn register<T: Operation + Default + 'static>(&mut self) -> Result<()> {
        let operation = T::default();
        let name = operation.name().to_string();

        if self
            .operations
            .iter()
            .any(|registered| registered.operation().name().eq_ignore_ascii_case(&name))
        {
            return Err(NonUniqueOperationName(name).logged());
        }

        let fields = T::option_fields()?;
        if let Some(duplicate) = fields
            .iter()
            .flat_map(|field| {
                std::iter::once(field.descriptor.name()).chain(field.descriptor.short_name())
            })
            .duplicates()
            .next()
        {
            return Err(NonUniqueOptionName(name, duplicate.to_string()).logged());
        }

        debug!(
            "Registered operation \"{}\" with {} option(s)",
            name,
            fields.len()
        );
        self.operations
            .push(Box::new(Registered { operation, fields }));

        Ok(())
    }

    /// Names of all registered operations, in registration order.
    #[must_use]
    pub fn operation_names(&self) -> IndexSet<String> {
        self.operations
            .iter()
            .map(|registered| registered.operation().name().to_string())
            .collect()
    }

    /// Finds the operation named in `args`.
    ///
    /// A token matches an operation when it equals the operation name, ignoring case.
    /// With a single registered operation and no name given, that operation is selected.
    /// Naming several different operations selects nothing.
    ///
    /// # Returns
    ///
    /// The registration index of the selected operation.
    pub fn select_operation<S: AsRef<str>>(&self, args: &[S]) -> Option<usize> {
        let named: Vec<usize> = self
            .operations
            .iter()
            .enumerate()
            .filter(|(_, registered)| {
                let name = registered.operation().name();
                args.iter().any(|arg| arg.as_ref().eq_ignore_ascii_case(name))
            })
            .map(|(index, _)| index)
            .collect();

        match named.as_slice() {
            [] if self.operations.len() == 1 => {
                debug!("Only one operation is registered, it is selected implicitly");
                Some(0)
            }
            [] => None,
            [index] => Some(*index),
            several => {
                warn!(
                    "Several operations are named in arguments ({}), none is selected",
                    several
                        .iter()
                        .map(|index| self.operations[*index].operation().name())
                        .join(", ")
                );
                None
            }
        }
    }

    /// Selects, validates and binds the operation for this invocation.
    ///
    /// # Arguments
    ///
    /// * `args` - The raw command-line tokens
    /// * `config` - Loaded configuration, if any
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the selected operation's name or help text is
    /// invalid. Values that cannot be bound are not errors; they are listed in
    /// [`Dispatcher::last_report`].
    pub fn prepare<S: AsRef<str>>(
        &mut self,
        args: &[S],
        config: Option<&Configuration>,
    ) -> Result<Preparation> {
        self.last_report = None;
        self.selected = self.select_operation(args);

        let Some(index) = self.selected else {
            debug!("No operation is selected");
            return Ok(Preparation::Unselected);
        };

        let registration = &mut self.operations[index];
        registration.reset();
        let name = registration.operation().name().to_string();
        debug!("Parsing operation \"{}\"", name);

        validate_operation(registration.operation())?;

        let args: Vec<String> = args.iter().map(|arg| arg.as_ref().to_string()).collect();
        let section = config.and_then(|config| config.section(&name));
        let report = registration.bind(section.as_ref(), &args);
        let ready = registration.operation().is_ready();
        self.last_report = Some(report);

        if ready {
            Ok(Preparation::Ready)
        } else {
            debug!("Operation \"{}\" is not ready", name);
            Ok(Preparation::NotReady)
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<&dyn Operation> {
        let index = self.selected?;
        Some(self.operations[index].operation())
    }

    pub fn selected_mut(&mut self) -> Option<&mut dyn Operation> {
        let index = self.selected?;
        Some(self.operations[index].operation_mut())
    }

    /// The bind report from the latest [`Dispatcher::prepare`], if an operation was bound.
    #[must_use]
    pub fn last_report(&self) -> Option<&BindReport> {
        self.last_report.as_ref()
    }

    /// Runs the selected operation's work function.
    ///
    /// # Errors
    ///
    /// Returns [`NoOperationSelected`] if nothing is selected, otherwise whatever the
    /// operation returns.
    pub fn run_selected(&mut self) -> Result<i32> {
        let operation = self.selected_mut().ok_or(NoOperationSelected)?;
        debug!("Running operation \"{}\"", operation.name());
        operation.run()
    }

    /// Builds help for the current state: the selected operation and its options, or the
    /// list of all operations when nothing is selected.
    #[must_use]
    pub fn help(&self, program_name: &str, description: &str) -> HelpDocument {
        match self.selected {
            Some(index) => {
                let registration = &self.operations[index];
                let operation = registration.operation();
                operation_help(
                    program_name,
                    description,
                    operation.name(),
                    operation.help_text(),
                    &registration.options(),
                )
            }
            None => general_help(
                program_name,
                description,
                self.operations.iter().map(|registered| {
                    let operation = registered.operation();
                    (operation.name(), operation.help_text())
                }),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::option::OptionDescriptor;

    #[derive(Default)]
    struct Echo {
        text: Option<String>,
    }

    impl Operation for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn help_text(&self) -> &str {
            "Echoes text."
        }

        fn is_ready(&self) -> bool {
            self.text.is_some()
        }

        fn run(&mut self) -> Result<i32> {
            Ok(self.text.as_ref().map_or(0, |text| text.len() as i32))
        }

        fn option_fields() -> Result<Vec<OptionField<Self>>> {
            Ok(vec![OptionField::text(
                OptionDescriptor::new("text", Some("t"), "Text to echo")?,
                |echo: &mut Self, value| echo.text = Some(value),
            )])
        }
    }

    #[derive(Default)]
    struct Count;

    impl Operation for Count {
        fn name(&self) -> &str {
            "count"
        }

        fn help_text(&self) -> &str {
            "Counts."
        }

        fn is_ready(&self) -> bool {
            true
        }

        fn run(&mut self) -> Result<i32> {
            Ok(0)
        }

        fn option_fields() -> Result<Vec<OptionField<Self>>> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct Clashing;

    impl Operation for Clashing {
        fn name(&self) -> &str {
            "clash"
        }

        fn help_text(&self) -> &str {
            "Has clashing options."
        }

        fn is_ready(&self) -> bool {
            true
        }

        fn run(&mut self) -> Result<i32> {
            Ok(0)
        }

        fn option_fields() -> Result<Vec<OptionField<Self>>> {
            Ok(vec![
                OptionField::flag(OptionDescriptor::new("one", Some("x"), "First")?, |_, _| {}),
                OptionField::flag(OptionDescriptor::new("two", Some("x"), "Second")?, |_, _| {}),
            ])
        }
    }

    fn dispatcher() -> Dispatcher {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register::<Echo>().unwrap();
        dispatcher.register::<Count>().unwrap();
        dispatcher
    }

    #[test]
    fn test_detect_general_request() {
        assert_eq!(detect_general_request(&["--h"]), Some(GeneralRequest::Help));
        assert_eq!(detect_general_request(&["args", "--help"]), Some(GeneralRequest::Help));
        assert_eq!(detect_general_request(&["--v"]), Some(GeneralRequest::Version));
        assert_eq!(
            detect_general_request(&["--version", "--h"]),
            Some(GeneralRequest::Help)
        );
        assert_eq!(detect_general_request(&["--hh", "help"]), None);
    }

    #[test]
    fn test_select_by_name_ignores_case() {
        let dispatcher = dispatcher();
        assert_eq!(dispatcher.select_operation(&["ECHO"]), Some(0));
        assert_eq!(dispatcher.select_operation(&["--x", "count"]), Some(1));
    }

    #[test]
    fn test_select_nothing_or_ambiguous() {
        let dispatcher = dispatcher();
        let no_args: [&str; 0] = [];
        assert_eq!(dispatcher.select_operation(&no_args), None);
        assert_eq!(dispatcher.select_operation(&["echo", "count"]), None);
        // The same operation named twice is not ambiguous
        assert_eq!(dispatcher.select_operation(&["echo", "Echo"]), Some(0));
    }

    #[test]
    fn test_single_operation_is_selected_implicitly() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register::<Echo>().unwrap();
        assert_eq!(dispatcher.select_operation(&["--text", "hi"]), Some(0));
    }

    #[test]
    fn test_duplicate_operation_name_fails() {
        let mut dispatcher = dispatcher();
        assert!(matches!(
            dispatcher.register::<Echo>(),
            Err(Error::NonUniqueOperationName(_))
        ));
    }

    #[test]
    fn test_clashing_option_names_fail() {
        let mut dispatcher = Dispatcher::new();
        assert!(matches!(
            dispatcher.register::<Clashing>(),
            Err(Error::NonUniqueOptionName(..))
        ));
    }

    #[test]
    fn test_prepare_ready_and_run() {
        let mut dispatcher = dispatcher();
        let preparation = dispatcher.prepare(&["echo", "--t", "hello"], None).unwrap();

        assert_eq!(preparation, Preparation::Ready);
        assert_eq!(dispatcher.selected().map(|op| op.name()), Some("echo"));
        assert_eq!(dispatcher.last_report().map(|r| r.assignments.len()), Some(1));
        assert_eq!(dispatcher.run_selected().unwrap(), 5);
    }

    #[test]
    fn test_prepare_not_ready() {
        let mut dispatcher = dispatcher();
        let preparation = dispatcher.prepare(&["echo"], None).unwrap();
        assert_eq!(preparation, Preparation::NotReady);
    }

    #[test]
    fn test_prepare_starts_from_a_fresh_operation() {
        let mut dispatcher = dispatcher();

        let first = dispatcher.prepare(&["echo", "--text", "hello"], None).unwrap();
        assert_eq!(first, Preparation::Ready);

        let second = dispatcher.prepare(&["echo"], None).unwrap();
        assert_eq!(second, Preparation::NotReady);
        assert_eq!(dispatcher.run_selected().unwrap(), 0);
    }

    #[test]
    fn test_prepare_unselected() {
        let mut dispatcher = dispatcher();
        let preparation = dispatcher.prepare(&["nothing"], None).unwrap();

        assert_eq!(preparation, Preparation::Unselected);
        assert!(dispatcher.selected().is_none());
        assert!(dispatcher.last_report().is_none());
        assert!(matches!(dispatcher.run_selected(), Err(Error::NoOperationSelected)));
    }

    #[test]
    fn test_prepare_uses_configuration_section() {
        let config: Configuration = "echo:\n  text: configured\n".parse().unwrap();
        let mut dispatcher = dispatcher();

        let preparation = dispatcher.prepare(&["echo"], Some(&config)).unwrap();
        assert_eq!(preparation, Preparation::Ready);
        assert_eq!(dispatcher.run_selected().unwrap(), 10);
    }

    #[test]
    fn test_operation_names_keep_registration_order() {
        let names = dispatcher().operation_names();
        assert_eq!(names.iter().collect::<Vec<_>>(), vec!["echo", "count"]);
    }

    #[test]
    fn test_help_depends_on_selection() {
        let mut dispatcher = dispatcher();
        let general = dispatcher.help("opkit", "").to_string();
        assert!(general.contains("Operations:"));
        assert!(general.contains("  echo            Echoes text."));

        dispatcher.prepare(&["echo"], None).unwrap();
        let selected = dispatcher.help("opkit", "").to_string();
        assert!(selected.contains("Selected operation options:"));
        assert!(selected.contains("  --text|--t        Text to echo"));
        assert!(!selected.contains("Operations:"));
    }
}
