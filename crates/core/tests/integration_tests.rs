//! Integration tests for opkit-core
//!
//! These tests verify that selection, configuration loading, binding and help work
//! together correctly by testing complete invocations end-to-end.

use chrono::NaiveDate;
use opkit_core::{
    binder::Source,
    config::Configuration,
    dispatch::{Dispatcher, Preparation},
    error::{Error, Result},
    operation::{Operation, OptionField},
    option::OptionDescriptor,
    value::{CoercionError, EnumMember, EnumSpec, OptionValue},
};
use std::io::Write;
use tempfile::NamedTempFile;

static DANCES: EnumSpec = EnumSpec::new(
    "Dances",
    &[
        EnumMember::new("Tango", 0),
        EnumMember::new("Salsa", 1),
        EnumMember::new("Waltz", 2),
        EnumMember::new("Modern", 3),
    ],
);

static DAYS: EnumSpec = EnumSpec::new(
    "Days",
    &[
        EnumMember::new("Monday", 1),
        EnumMember::new("Tuesday", 2),
        EnumMember::new("Wednesday", 4),
        EnumMember::new("Weekend", 8),
    ],
);

#[derive(Debug, Default, Clone, PartialEq)]
struct Demo {
    ready: bool,
    text: Option<String>,
    number: i64,
    date: Option<chrono::NaiveDateTime>,
    dance: Option<&'static str>,
    days: i64,
}

impl Operation for Demo {
    fn name(&self) -> &str {
        "args"
    }

    fn help_text(&self) -> &str {
        "Shows how arguments are bound."
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn run(&mut self) -> Result<i32> {
        Ok(self.number as i32)
    }

    fn option_fields() -> Result<Vec<OptionField<Self>>> {
        Ok(vec![
            OptionField::flag(
                OptionDescriptor::new("readycheck", Some("rc"), "Marks the operation ready")?,
                |demo: &mut Self, value| demo.ready = value,
            ),
            OptionField::text(
                OptionDescriptor::new("text", Some("t"), "Some text")?,
                |demo: &mut Self, value| demo.text = Some(value),
            ),
            OptionField::integer(
                OptionDescriptor::new("number", Some("n"), "Some number")?,
                |demo: &mut Self, value| demo.number = value,
            ),
            OptionField::date_time(
                OptionDescriptor::new("date", Some("d"), "Some date")?,
                |demo: &mut Self, value| demo.date = Some(value),
            ),
            OptionField::enumeration(
                OptionDescriptor::new("enum", Some("e"), "A dance")?,
                &DANCES,
                |demo: &mut Self, member| demo.dance = Some(member.name),
            ),
            OptionField::flags(
                OptionDescriptor::new("days", None, "Days of the week")?,
                &DAYS,
                |demo: &mut Self, value| demo.days = value,
            ),
        ])
    }
}

#[derive(Default)]
struct Other;

impl Operation for Other {
    fn name(&self) -> &str {
        "other"
    }

    fn help_text(&self) -> &str {
        "Does something else."
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
struct Broken;

impl Operation for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn help_text(&self) -> &str {
        "Has an invalid option."
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn run(&mut self) -> Result<i32> {
        Ok(0)
    }

    fn option_fields() -> Result<Vec<OptionField<Self>>> {
        Ok(vec![OptionField::flag(
            OptionDescriptor::new("not valid", None, "Broken")?,
            |_, _| {},
        )])
    }
}

#[derive(Default)]
struct Unnamed;

impl Operation for Unnamed {
    fn name(&self) -> &str {
        "unnamed"
    }

    fn help_text(&self) -> &str {
        ""
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

fn single() -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register::<Demo>().unwrap();
    dispatcher
}

fn several() -> Dispatcher {
    let mut dispatcher = single();
    dispatcher.register::<Other>().unwrap();
    dispatcher
}

/// Runs the prepared `args` operation and reads its number back as the exit code.
fn selected_number(dispatcher: &mut Dispatcher) -> i32 {
    dispatcher.run_selected().unwrap()
}

/// Scenario A: numbers and presence-only booleans from the command line
#[test]
fn test_arguments_bind_number_and_boolean() {
    let mut dispatcher = single();
    let preparation = dispatcher
        .prepare(&["args", "--number", "42", "--readycheck"], None)
        .unwrap();

    assert_eq!(preparation, Preparation::Ready);
    let report = dispatcher.last_report().unwrap();
    assert_eq!(report.value_of("number"), Some(&OptionValue::Integer(42)));
    assert_eq!(report.value_of("readycheck"), Some(&OptionValue::Bool(true)));
    assert_eq!(report.value_of("text"), None);
    assert!(!report.has_warnings());
    assert_eq!(selected_number(&mut dispatcher), 42);
}

/// Scenario B: a configuration section fills fields the command line leaves alone
#[test]
fn test_configuration_only() {
    let config: Configuration = r#"{"args":{"text":"hello"}}"#.parse().unwrap();
    let mut dispatcher = single();
    let no_args: [&str; 0] = [];

    let preparation = dispatcher.prepare(&no_args, Some(&config)).unwrap();

    assert_eq!(preparation, Preparation::NotReady);
    let report = dispatcher.last_report().unwrap();
    assert_eq!(
        report.value_of("text"),
        Some(&OptionValue::Text("hello".to_string()))
    );
    assert_eq!(report.source_of("text"), Some(Source::Configuration));
}

/// Scenario C: the command line overrides configuration
#[test]
fn test_arguments_override_configuration() {
    let config: Configuration = r#"{"args":{"text":"hello"}}"#.parse().unwrap();
    let mut dispatcher = single();

    dispatcher
        .prepare(&["args", "--text", "world"], Some(&config))
        .unwrap();

    let report = dispatcher.last_report().unwrap();
    assert_eq!(
        report.value_of("text"),
        Some(&OptionValue::Text("world".to_string()))
    );
    assert_eq!(report.source_of("text"), Some(Source::Arguments));
    assert_eq!(report.assignments.len(), 2);
}

/// Scenario D: a bad date is a warning, not an error
#[test]
fn test_invalid_date_is_recorded_as_warning() {
    let mut dispatcher = single();
    let preparation = dispatcher
        .prepare(&["args", "--date", "notadate", "--rc"], None)
        .unwrap();

    assert_eq!(preparation, Preparation::Ready);
    let report = dispatcher.last_report().unwrap();
    assert_eq!(report.value_of("date"), None);

    let warnings: Vec<_> = report.warnings_for("date").collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].source, Source::Arguments);
    assert_eq!(
        warnings[0].error,
        CoercionError::InvalidDateTime("notadate".to_string())
    );
}

/// Scenario E: several operations and none named
#[test]
fn test_no_operation_named_selects_nothing() {
    let mut dispatcher = several();
    let preparation = dispatcher.prepare(&["--number", "5"], None).unwrap();

    assert_eq!(preparation, Preparation::Unselected);
    assert!(dispatcher.selected().is_none());

    let help = dispatcher.help("opkit", "Toolkit demo").to_string();
    assert!(help.contains("Operations:"));
    assert!(help.contains("  args            Shows how arguments are bound."));
    assert!(help.contains("  other           Does something else."));
}

#[test]
fn test_implicit_selection_with_one_operation() {
    let mut dispatcher = single();
    let preparation = dispatcher.prepare(&["--rc", "--n", "7"], None).unwrap();

    assert_eq!(preparation, Preparation::Ready);
    assert_eq!(selected_number(&mut dispatcher), 7);
}

#[test]
fn test_enum_ordinal_and_name_bind_the_same_member() {
    let mut by_ordinal = several();
    by_ordinal.prepare(&["args", "--enum", "2"], None).unwrap();

    let mut by_name = several();
    by_name.prepare(&["args", "--e", "WALTZ"], None).unwrap();

    let expected = OptionValue::Enum(EnumMember::new("Waltz", 2));
    assert_eq!(by_ordinal.last_report().unwrap().value_of("enum"), Some(&expected));
    assert_eq!(by_name.last_report().unwrap().value_of("enum"), Some(&expected));
}

#[test]
fn test_flags_from_names_numbers_and_configuration() {
    let mut by_names = single();
    by_names
        .prepare(&["args", "--days", "Monday,Wednesday"], None)
        .unwrap();
    assert_eq!(
        by_names.last_report().unwrap().value_of("days"),
        Some(&OptionValue::Flags(5))
    );

    let mut by_number = single();
    by_number.prepare(&["args", "--days", "12"], None).unwrap();
    assert_eq!(
        by_number.last_report().unwrap().value_of("days"),
        Some(&OptionValue::Flags(12))
    );

    let config: Configuration = "args:\n  days: [Tuesday, Weekend]\n".parse().unwrap();
    let mut from_config = single();
    from_config.prepare(&["args"], Some(&config)).unwrap();
    assert_eq!(
        from_config.last_report().unwrap().value_of("days"),
        Some(&OptionValue::Flags(10))
    );
}

#[test]
fn test_configuration_file_workflow() {
    let yaml_content = r#"
Args:
  Text: from file
  number: 12
  readycheck: true
  date: 2024-03-15
  enum: salsa
other:
  ignored: 1
"#;

    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{yaml_content}").unwrap();
    let temp_path = temp_file.path().to_str().unwrap().to_string();

    let config = Configuration::load_optional(&temp_path).unwrap().unwrap();
    let mut dispatcher = several();
    let preparation = dispatcher.prepare(&["args"], Some(&config)).unwrap();

    assert_eq!(preparation, Preparation::Ready);
    let report = dispatcher.last_report().unwrap();
    assert!(!report.has_warnings());
    assert_eq!(
        report.value_of("text"),
        Some(&OptionValue::Text("from file".to_string()))
    );
    assert_eq!(
        report.value_of("date"),
        Some(&OptionValue::DateTime(
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        ))
    );
    assert_eq!(
        report.value_of("enum"),
        Some(&OptionValue::Enum(EnumMember::new("Salsa", 1)))
    );
    assert_eq!(selected_number(&mut dispatcher), 12);
}

#[test]
fn test_preparing_twice_gives_the_same_report() {
    let config: Configuration = "args:\n  number: 3\n  enum: Modern\n".parse().unwrap();
    let args = ["args", "--text", "again", "--rc", "--number", "9"];

    let mut dispatcher = single();
    dispatcher.prepare(&args, Some(&config)).unwrap();
    let first = dispatcher.last_report().cloned().unwrap();
    dispatcher.prepare(&args, Some(&config)).unwrap();
    let second = dispatcher.last_report().cloned().unwrap();

    assert_eq!(first, second);
    assert_eq!(selected_number(&mut dispatcher), 9);
}

#[test]
fn test_bad_configuration_value_is_warning() {
    let config: Configuration = "args:\n  number: lots\n".parse().unwrap();
    let mut dispatcher = single();
    dispatcher.prepare(&["args", "--rc"], Some(&config)).unwrap();

    let report = dispatcher.last_report().unwrap();
    let warnings: Vec<_> = report.warnings_for("number").collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].source, Source::Configuration);
    assert_eq!(warnings[0].raw, Some("lots".to_string()));
    assert_eq!(selected_number(&mut dispatcher), 0);
}

#[test]
fn test_invalid_descriptor_fails_registration() {
    let mut dispatcher = Dispatcher::new();
    let result = dispatcher.register::<Broken>();

    assert!(matches!(result, Err(Error::OptionNameWithSpace(_))));
    assert!(result.unwrap_err().is_configuration_error());
    assert!(dispatcher.operation_names().is_empty());
}

#[test]
fn test_invalid_operation_metadata_fails_preparation() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register::<Unnamed>().unwrap();

    let result = dispatcher.prepare(&["unnamed"], None);
    assert!(matches!(result, Err(Error::EmptyHelpText(_))));
}

#[test]
fn test_selected_operation_help_lists_enum_members() {
    let mut dispatcher = several();
    dispatcher.prepare(&["args"], None).unwrap();

    let help = dispatcher.help("opkit", "").to_string();
    assert!(help.contains("  args           Shows how arguments are bound."));
    assert!(help.contains("  --readycheck|--rc Marks the operation ready"));
    assert!(help.contains("  --enum|--e        A dance"));
    assert!(help.contains("Enums: Tango(0),Salsa(1),Waltz(2),Modern(3)"));
    assert!(help.contains("Enums: Monday(1),Tuesday(2),Wednesday(4),Weekend(8)"));
    assert!(help.contains("  --days            Days of the week"));
}
