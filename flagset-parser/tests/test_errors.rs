use std::error::Error as _;
use std::ffi::OsString;

use flagset_parser::{Error, ErrorHandling, ErrorKind, FlagSet, OptionName, Parser};

fn flags() -> FlagSet {
    let mut flags = FlagSet::new("test", ErrorHandling::Continue);
    flags
        .bool("t", false, "")
        .bool("a", false, "")
        .string("o", "", "")
        .string("story", "for", "")
        .int("count", 0, "");
    flags
}

#[test]
fn test_help_short() {
    let mut parser = Parser::new(flags());
    let err = parser.parse(["-h", "help!"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HelpRequested);
    assert!(err.is_help());
    assert_eq!(err.exit_code(), 0);
    assert_eq!(err.option(), Some(&OptionName::Short('h')));
    assert_eq!(err.to_string(), "help requested");
}

#[test]
fn test_help_long() {
    let mut parser = Parser::new(flags());
    let err = parser.parse(["--help"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HelpRequested);
    assert_eq!(err.option(), Some(&OptionName::Long("help".into())));
}

#[test]
fn test_help_in_short_cluster() {
    let mut parser = Parser::new(flags());
    let err = parser.parse(["-tah"]).unwrap_err();
    assert!(err.is_help());
    assert_eq!(parser.registry().get::<bool>("t"), Some(true));
    assert_eq!(parser.registry().get::<bool>("a"), Some(true));
}

#[test]
fn test_registered_help_is_an_option() -> Result<(), Error> {
    let mut flags = FlagSet::new("test", ErrorHandling::Continue);
    flags.string("h", "q", "").bool("help", false, "");
    let mut parser = Parser::new(flags);
    parser.parse(["-h", "value", "--help"])?;
    assert_eq!(parser.registry().value_of("h").as_deref(), Some("value"));
    assert_eq!(parser.registry().get::<bool>("help"), Some(true));
    Ok(())
}

#[test]
fn test_option_not_found() {
    let mut parser = Parser::new(flags());
    let err = parser.parse(["-x"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OptionNotFound);
    assert_eq!(err.option(), Some(&OptionName::Short('x')));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(err.to_string(), "unknown option -x");

    let err = parser.parse(["--nope=1"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OptionNotFound);
    assert_eq!(err.to_string(), "unknown option --nope");

    let err = parser.parse(["--hel"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OptionNotFound);

    // numbers are not special
    let err = parser.parse(["-1"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OptionNotFound);
    assert_eq!(err.option(), Some(&OptionName::Short('1')));
}

#[test]
fn test_option_not_flag() {
    let mut parser = Parser::new(flags());
    let err = parser.parse(["-ovalue"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OptionNotFlag);
    assert_eq!(err.option(), Some(&OptionName::Short('o')));
    assert_eq!(err.to_string(), "option -o expects a value and cannot be combined");

    let err = parser.parse(["-toa"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OptionNotFlag);
}

#[test]
fn test_invalid_value() {
    let mut parser = Parser::new(flags());
    let err = parser.parse(["--count=abc"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert_eq!(err.option(), Some(&OptionName::Long("count".into())));
    assert_eq!(err.value(), Some("abc"));
    assert!(err.source().is_some());
    assert_eq!(err.to_string(), "invalid value for option --count");
    assert_eq!(
        format!("{:#}", err),
        "invalid value for option --count: \"abc\" (invalid digit found in string)"
    );

    let err = parser.parse(["-t=maybe"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert_eq!(err.value(), Some("maybe"));
}

#[test]
fn test_trailing_option_without_value() -> Result<(), Error> {
    let mut parser = Parser::new(flags());
    parser.parse(["-t", "a", "--story"])?;
    assert_eq!(parser.registry().get::<bool>("t"), Some(true));
    assert_eq!(parser.registry().value_of("story").as_deref(), Some("for"));
    assert_eq!(parser.args(), ["a"]);

    parser.parse(["a", "-to"])?;
    assert_eq!(parser.registry().value_of("o").as_deref(), Some(""));
    assert_eq!(parser.args(), ["a"]);
    Ok(())
}

fn make_invalid_unicode_os_string() -> OsString {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStringExt;
        OsString::from_vec(vec![0xff, 0xff])
    }
    #[cfg(windows)]
    {
        use std::os::windows::ffi::OsStringExt;
        OsString::from_wide(&[0xD800])
    }
}

#[test]
fn test_invalid_unicode() {
    let mut invalid_unicode = OsString::from("--story=");
    invalid_unicode.push(make_invalid_unicode_os_string());

    let mut parser = Parser::new(flags());
    let err = parser
        .parse_os([OsString::from("-t"), invalid_unicode.clone(), OsString::from("x")])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidUnicode);
    assert_eq!(err.raw_value(), Some(invalid_unicode.as_os_str()));
    assert_eq!(err.value(), None);
    assert_eq!(err.to_string(), "argument is invalid unicode");
    assert_eq!(
        format!("{:#}", err),
        format!("argument is invalid unicode: {:?}", invalid_unicode)
    );
    assert!(parser.parsed());
    assert!(parser.args().is_empty());
    // nothing is scanned if any argument is rejected
    assert_eq!(parser.registry().get::<bool>("t"), Some(false));
}

#[test]
fn test_parse_os() -> Result<(), Error> {
    let mut parser = Parser::new(flags());
    parser.parse_os(["-t", "--story=of", "first"])?;
    assert_eq!(parser.registry().get::<bool>("t"), Some(true));
    assert_eq!(parser.registry().value_of("story").as_deref(), Some("of"));
    assert_eq!(parser.args(), ["first"]);
    Ok(())
}

#[test]
fn test_partial_mutation_is_kept() {
    let mut parser = Parser::new(flags());
    let err = parser
        .parse(["-t", "--story", "of", "first", "--count=x", "-a", "second"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert!(parser.parsed());

    let flags = parser.registry();
    assert_eq!(flags.get::<bool>("t"), Some(true));
    assert_eq!(flags.value_of("story").as_deref(), Some("of"));
    assert_eq!(flags.get::<i64>("count"), Some(0));
    assert_eq!(flags.get::<bool>("a"), Some(false));
    assert_eq!(parser.args(), ["first"]);
}

#[test]
fn test_flagset_set_errors() {
    let mut flags = flags();
    let err = flags.set("missing", "1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OptionNotFound);
    assert_eq!(err.to_string(), "unknown option --missing");

    let err = flags.set("t", "nope").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert_eq!(err.option(), Some(&OptionName::Short('t')));
}

#[test]
fn test_custom_error() {
    let err = Error::from("something went wrong");
    assert_eq!(err.kind(), ErrorKind::Custom);
    assert_eq!(err.to_string(), "something went wrong");
    assert_eq!(format!("{:#}", err), "something went wrong");
}
