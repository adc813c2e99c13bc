//! Tests for user-facing error text.

use rstest::rstest;

use super::*;

#[rstest]
#[case(
    OptionError::UnknownKind {
        family: "qdisc",
        kind: String::from("bogus"),
        option: String::from("limit"),
    },
    "Unknown qdisc \"bogus\", hence option \"limit\" is unparsable"
)]
#[case(
    OptionError::InvalidHandle { handle: String::from("zz") },
    "Unparsable filter ID \"zz\""
)]
#[case(
    OptionError::Classless { kind: String::from("pfifo") },
    "Qdisc \"pfifo\" is classless."
)]
#[case(OptionError::missing("limit"), "Option \"limit\" requires an argument")]
#[case(OptionError::invalid("bands"), "Illegal \"bands\"")]
#[case(OptionError::unknown("speed"), "What is \"speed\"?")]
fn option_errors_use_tc_wording(#[case] error: OptionError, #[case] expected: &str) {
    assert_eq!(error.to_string(), expected);
}

#[test]
fn missing_unit_names_the_probed_path() {
    let error = LoadError::NotFound {
        path: Utf8PathBuf::from("/usr/lib/tc/q_sfq.so"),
    };
    assert_eq!(
        error.to_string(),
        "extension unit /usr/lib/tc/q_sfq.so not found"
    );
}
