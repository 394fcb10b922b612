#[cfg(test)]
mod tests {
    use std::io::Write;

    use opkit_cli::operations::{dispatcher, PROGRAM_DESCRIPTION, PROGRAM_NAME};
    use opkit_cli::output::console::{format_segments, Segment};
    use opkit_core::binder::Source;
    use opkit_core::config::Configuration;
    use opkit_core::dispatch::Preparation;
    use opkit_core::value::OptionValue;
    use tempfile::NamedTempFile;

    #[test]
    fn test_demo_operations_are_registered_in_order() {
        let dispatcher = dispatcher().unwrap();
        let names: Vec<String> = dispatcher.operation_names().into_iter().collect();

        assert_eq!(names, ["args", "colors", "output", "input"]);
    }

    #[test]
    fn test_no_operation_named_shows_general_help() {
        let mut dispatcher = dispatcher().unwrap();

        let preparation = dispatcher.prepare::<&str>(&[], None).unwrap();
        assert_eq!(preparation, Preparation::Unselected);

        let help = dispatcher.help(PROGRAM_NAME, PROGRAM_DESCRIPTION).to_string();
        assert!(help.contains("Usage: opkit [operation] [options]"));
        assert!(help.contains("Operations:"));
        assert!(help.contains("Command to show color scheme variations on console output."));
        assert!(help.contains("Method to show possibilities of input extensions."));
    }

    #[test]
    fn test_args_binding_from_command_line() {
        let mut dispatcher = dispatcher().unwrap();

        let preparation = dispatcher
            .prepare(
                &["args", "--number", "42", "--readycheck", "--days", "Monday,Sunday", "--e", "1"],
                None,
            )
            .unwrap();

        assert_eq!(preparation, Preparation::Ready);
        assert_eq!(dispatcher.selected().map(|operation| operation.name()), Some("args"));

        let report = dispatcher.last_report().unwrap();
        assert_eq!(report.value_of("number"), Some(&OptionValue::Integer(42)));
        assert_eq!(report.value_of("readycheck"), Some(&OptionValue::Bool(true)));
        assert_eq!(report.value_of("days"), Some(&OptionValue::Flags(65)));
        assert!(matches!(
            report.value_of("enum"),
            Some(OptionValue::Enum(member)) if member.name == "Salsa"
        ));
        assert_eq!(report.value_of("text"), None);
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_args_without_readycheck_is_not_ready() {
        let mut dispatcher = dispatcher().unwrap();

        let preparation = dispatcher.prepare(&["args", "--text", "hello"], None).unwrap();
        assert_eq!(preparation, Preparation::NotReady);

        let help = dispatcher.help(PROGRAM_NAME, PROGRAM_DESCRIPTION).plain_lines();
        assert!(help.iter().any(|line| line.starts_with("  --readycheck|--rc")));
        assert!(help
            .iter()
            .any(|line| line.contains("Enums: Tango(0),Salsa(1),Waltz(2),Modern(3)")));
    }

    #[test]
    fn test_repeated_prepare_does_not_keep_earlier_values() {
        let mut dispatcher = dispatcher().unwrap();

        let first = dispatcher
            .prepare(&["args", "--readycheck", "--number", "42"], None)
            .unwrap();
        assert_eq!(first, Preparation::Ready);

        let second = dispatcher.prepare(&["args"], None).unwrap();
        assert_eq!(second, Preparation::NotReady);
        assert_eq!(dispatcher.last_report().unwrap().value_of("number"), None);
    }

    #[test]
    fn test_bad_date_is_a_warning() {
        let mut dispatcher = dispatcher().unwrap();

        let preparation = dispatcher
            .prepare(&["args", "--rc", "--date", "notadate"], None)
            .unwrap();

        assert_eq!(preparation, Preparation::Ready);
        let report = dispatcher.last_report().unwrap();
        assert_eq!(report.value_of("date"), None);
        assert_eq!(report.warnings_for("date").count(), 1);
    }

    #[test]
    fn test_colors_needs_a_known_scheme() {
        let mut dispatcher = dispatcher().unwrap();
        assert_eq!(
            dispatcher.prepare(&["colors"], None).unwrap(),
            Preparation::NotReady
        );

        let help = dispatcher.help(PROGRAM_NAME, PROGRAM_DESCRIPTION).plain_lines();
        assert!(help.iter().any(|line| line.starts_with("  --scheme|--s")));
        assert!(help.iter().any(|line| {
            line.contains("Default(0),Vintage(1),Campbell(2),HalfDark(3),Raspberry(4)")
        }));

        assert_eq!(
            dispatcher.prepare(&["COLORS", "--s", "halfdark"], None).unwrap(),
            Preparation::Ready
        );
    }

    #[test]
    fn test_scheme_from_settings_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "colors:\n  scheme: Vintage\nargs:\n  text: hello").unwrap();
        let configuration = Configuration::load(file.path().to_str().unwrap()).unwrap();

        let mut dispatcher = dispatcher().unwrap();
        let preparation = dispatcher.prepare(&["colors"], Some(&configuration)).unwrap();

        assert_eq!(preparation, Preparation::Ready);
        let report = dispatcher.last_report().unwrap();
        assert_eq!(report.source_of("scheme"), Some(Source::Configuration));
    }

    #[test]
    fn test_command_line_overrides_settings_file() {
        let configuration: Configuration = "{\"args\": {\"text\": \"hello\"}}".parse().unwrap();

        let mut dispatcher = dispatcher().unwrap();
        dispatcher
            .prepare(&["args", "--text", "world"], Some(&configuration))
            .unwrap();

        let report = dispatcher.last_report().unwrap();
        assert_eq!(
            report.value_of("text"),
            Some(&OptionValue::Text("world".to_string()))
        );
        assert_eq!(report.source_of("text"), Some(Source::Arguments));
    }

    #[test]
    fn test_formatted_output_segments() {
        let segments = format_segments("Given number: {0}", &[42]).unwrap();

        assert_eq!(
            segments,
            [
                Segment::Text("Given number: ".to_string()),
                Segment::Argument("42".to_string()),
            ]
        );
    }
}
