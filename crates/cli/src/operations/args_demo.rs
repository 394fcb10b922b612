use chrono::NaiveDateTime;
use crossterm::style::Color;
use itertools::Itertools;

use opkit_core::error::Result;
use opkit_core::operation::{Operation, OptionField};
use opkit_core::option::OptionDescriptor;
use opkit_core::value::{EnumMember, EnumSpec};

use crate::output::console;

pub static DANCES: EnumSpec = EnumSpec::new(
    "Dances",
    &[
        EnumMember::new("Tango", 0),
        EnumMember::new("Salsa", 1),
        EnumMember::new("Waltz", 2),
        EnumMember::new("Modern", 3),
    ],
);

pub static DAYS: EnumSpec = EnumSpec::new(
    "Days",
    &[
        EnumMember::new("Monday", 1),
        EnumMember::new("Tuesday", 2),
        EnumMember::new("Wednesday", 4),
        EnumMember::new("Thursday", 8),
        EnumMember::new("Friday", 16),
        EnumMember::new("Saturday", 32),
        EnumMember::new("Sunday", 64),
    ],
);

/// Shows how values of every supported type reach operation fields.
#[derive(Debug, Default)]
pub struct ArgsDemo {
    pub ready_check: bool,
    pub text: Option<String>,
    pub number: Option<i64>,
    pub date: Option<NaiveDateTime>,
    pub dance: Option<EnumMember>,
    pub days: Option<i64>,
}

/// One reported field: its label and the value it was given, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GivenValue {
    pub label: &'static str,
    pub value: Option<String>,
}

impl ArgsDemo {
    #[must_use]
    pub fn given_values(&self) -> Vec<GivenValue> {
        vec![
            GivenValue {
                label: "text",
                value: self.text.clone().filter(|text| !text.is_empty()),
            },
            GivenValue {
                label: "number",
                value: self.number.map(|number| number.to_string()),
            },
            GivenValue {
                label: "date",
                value: self
                    .date
                    .map(|date| date.format("%A, %B %-d, %Y").to_string()),
            },
            GivenValue {
                label: "enum",
                value: self.dance.map(|dance| dance.name.to_string()),
            },
            GivenValue {
                label: "days",
                value: self.days.map(describe_days),
            },
        ]
    }
}

fn describe_days(value: i64) -> String {
    let names = DAYS.flag_names(value);
    if names.is_empty() {
        value.to_string()
    } else {
        names.iter().join(", ")
    }
}

fn capitalized(label: &str) -> String {
    let mut chars = label.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

impl Operation for ArgsDemo {
    fn name(&self) -> &str {
        "args"
    }

    fn help_text(&self) -> &str {
        "Demo of values passing to command properties via command-line args."
    }

    fn is_ready(&self) -> bool {
        self.ready_check
    }

    fn run(&mut self) -> Result<i32> {
        for given in self.given_values() {
            match given.value {
                Some(value) => console::write_formatted_line(
                    &format!("Given {}: {{0}}", given.label),
                    Color::Grey,
                    Color::White,
                    &[value],
                )?,
                None => console::write_line(
                    &format!("{} was not given.", capitalized(given.label)),
                    Color::Grey,
                )?,
            }
        }

        Ok(0)
    }

    fn option_fields() -> Result<Vec<OptionField<Self>>> {
        Ok(vec![
            OptionField::flag(
                OptionDescriptor::new(
                    "readycheck",
                    Some("rc"),
                    "Mandatory boolean parameter, which must be specified for command to run",
                )?,
                |demo: &mut Self, value| demo.ready_check = value,
            ),
            OptionField::text(
                OptionDescriptor::new("text", Some("t"), "Optional argument to specify some text")?,
                |demo: &mut Self, value| demo.text = Some(value),
            ),
            OptionField::integer(
                OptionDescriptor::new("number", Some("n"), "Optional argument to specify some integer")?,
                |demo: &mut Self, value| demo.number = Some(value),
            ),
            OptionField::date_time(
                OptionDescriptor::new("date", Some("d"), "Optional argument to specify some date")?,
                |demo: &mut Self, value| demo.date = Some(value),
            ),
            OptionField::enumeration(
                OptionDescriptor::new(
                    "enum",
                    Some("e"),
                    "Optional argument as Enum to specify its value (Tango, Salsa, Waltz, Modern)",
                )?,
                &DANCES,
                |demo: &mut Self, member| demo.dance = Some(member),
            ),
            OptionField::flags(
                OptionDescriptor::new(
                    "days",
                    None,
                    "Optional flags argument to specify days, combined as Monday,Friday",
                )?,
                &DAYS,
                |demo: &mut Self, value| demo.days = Some(value),
            ),
        ])
    }
}
