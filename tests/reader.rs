use anyhow::{bail, Result};
use oddl::debug::{Event, EventLog};
use oddl::listener::Listener;
use oddl::parse::{ParseError, ParseErrorWithPos};
use oddl::pos::Pos;
use oddl::properties::PropertyMap;
use oddl::read::{read_all, read_file, read_str, Reader, ReadFileError};
use oddl::settings::{Settings, DEFAULT_SETTINGS};
use oddl::value::{DataType, Name, Value};
use std::path::Path;
use thiserror::Error;

/// The event log, one string per event, without the begin/end
/// document events.
fn events(s: &str) -> Result<Vec<String>> {
    let events = read_str(s, &mut EventLog::new())?;
    assert_eq!(events.first(), Some(&Event::Begin));
    assert_eq!(events.last(), Some(&Event::End));
    Ok(events[1..events.len() - 1].iter().map(|e| e.to_string()).collect())
}

fn read_err(s: &str) -> ParseErrorWithPos {
    read_str(s, &mut EventLog::new()).unwrap_err()
}

/// The properties of the first custom structure in `s`.
fn properties(s: &str) -> Result<PropertyMap> {
    for e in read_str(s, &mut EventLog::new())? {
        if let Event::BeginCustomStructure(_, _, props) = e {
            return Ok(props)
        }
    }
    bail!("no custom structure in {:?}", s)
}

#[test]
fn empty_document() -> Result<()> {
    assert_eq!(read_str("", &mut EventLog::new())?, vec![Event::Begin, Event::End]);
    assert!(events(" // only a comment\n")?.is_empty());
    Ok(())
}

#[test]
fn empty_structures() -> Result<()> {
    assert_eq!(events("Empty {}")?, vec!["begin Empty", "end Empty"]);
    assert_eq!(events("float {}")?, vec!["begin list float", "end list float"]);
    assert_eq!(events("float[3]{}")?,
               vec!["begin array list float[3]", "end array list float[3]"]);
    assert_eq!(events("Foo () {}")?, vec!["begin Foo", "end Foo"]);
    Ok(())
}

#[test]
fn float_list_promotes_integers() -> Result<()> {
    let evs = read_str("float {1.0, 2.0, 3}", &mut EventLog::new())?;
    let values: Vec<f64> = evs.iter().filter_map(|e| match e {
        Event::Value(Value::Float(x)) => Some(x.value),
        _ => None
    }).collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0]);
    assert_eq!(events("double {-1} half {0x10}")?,
               vec!["begin list double", "value -1.0", "end list double",
                    "begin list half", "value 16.0", "end list half"]);
    Ok(())
}

#[test]
fn array_list() -> Result<()> {
    assert_eq!(events("int32[2] $pairs {{1, 2}, {3, 4}}")?, vec![
        "begin array list int32[2] $pairs",
        "begin subarray int32[2]",
        "value 1",
        "value 2",
        "end subarray int32[2]",
        "begin subarray int32[2]",
        "value 3",
        "value 4",
        "end subarray int32[2]",
        "end array list int32[2] $pairs",
    ]);
    Ok(())
}

#[test]
fn subarray_size_mismatch() {
    let e = read_err("float [3] {{1.0,2.0,3.0},{4.0,5.0}}");
    assert!(matches!(e.err, ParseError::SubarraySizeMismatch { expected: 3, actual: 2 }));
    assert_eq!(e.pos, Pos { line: 1, col: 26 });
    assert_eq!(e.to_string(), "expected 3 elements in subarray but found 2 @1.26");
    assert!(matches!(read_err("float[3]{{}}").err,
                     ParseError::SubarraySizeMismatch { expected: 3, actual: 0 }));
    assert!(matches!(read_err("float[1]{{1.0, 2.0}}").err,
                     ParseError::SubarraySizeMismatch { expected: 1, actual: 2 }));
}

#[test]
fn subarray_size_must_be_natural() {
    assert!(matches!(read_err("float[-1]{}").err, ParseError::InvalidSubarraySize(-1)));
    assert!(matches!(read_err("float[1.5]{}").err, ParseError::UnexpectedToken { .. }));
    assert!(matches!(read_err("float[2{}").err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn strings_concatenate() -> Result<()> {
    let evs = read_str(r#"string {"foo" "bar", "baz"}"#, &mut EventLog::new())?;
    let strings: Vec<(String, String)> = evs.iter().filter_map(|e| match e {
        Event::Value(Value::String(s)) => Some((s.value.to_string(), s.text.to_string())),
        _ => None
    }).collect();
    assert_eq!(strings, vec![
        ("foobar".to_string(), r#""foo""bar""#.to_string()),
        ("baz".to_string(), r#""baz""#.to_string()),
    ]);
    Ok(())
}

#[test]
fn named_lists() -> Result<()> {
    assert_eq!(events("bool %flags {true, false} string null {}")?, vec![
        "begin list bool %flags",
        "value true",
        "value false",
        "end list bool %flags",
        "begin list string null",
        "end list string null",
    ]);
    Ok(())
}

#[test]
fn refs_and_types() -> Result<()> {
    assert_eq!(events("ref {$a%b, null, %c} type {f, i8, string}")?, vec![
        "begin list ref",
        "value $a%b",
        "value null",
        "value %c",
        "end list ref",
        "begin list type",
        "value float",
        "value int8",
        "value string",
        "end list type",
    ]);
    assert!(matches!(read_err("ref {%a$b}").err, ParseError::UnexpectedToken { .. }));
    assert!(matches!(read_err("ref {%a null}").err, ParseError::UnexpectedToken { .. }));
    Ok(())
}

#[test]
fn property_values() -> Result<()> {
    let props = properties(
        r#"Foo (foo=1, bar=2.0, baz="string", qux=$name, quux=true, kind=u8) {}"#)?;
    assert_eq!(props.len(), 6);
    assert_eq!(props.keys().collect::<Vec<_>>(),
               vec!["foo", "bar", "baz", "qux", "quux", "kind"]);
    assert_eq!(props.get("foo").and_then(Value::as_int), Some(1));
    assert_eq!(props.get("bar").and_then(Value::as_float), Some(2.0));
    assert_eq!(props.get("baz").and_then(Value::as_str), Some("string"));
    let qux = props.get("qux").and_then(Value::as_reference);
    assert_eq!(qux.map(|r| r.names().to_vec()), Some(vec![Name::Global("name".into())]));
    assert_eq!(props.get("quux").and_then(Value::as_bool), Some(true));
    assert_eq!(props.get("kind").and_then(Value::as_data_type), Some(DataType::UInt8));
    assert!(props.get("missing").is_none());
    Ok(())
}

#[test]
fn property_refs() -> Result<()> {
    let props = properties("Foo (prop=null) {}")?;
    assert!(props.get("prop").and_then(Value::as_reference).map_or(false, |r| r.is_null()));

    let props = properties("Foo (prop=$foo%bar%baz) {}")?;
    let r = props.get("prop").and_then(Value::as_reference);
    assert_eq!(r.map(|r| r.to_string()), Some("$foo%bar%baz".to_string()));
    assert_eq!(r.map(|r| r.names().len()), Some(3));

    let e = read_err("Foo (prop=$foo$bar$baz) {}");
    match e.err {
        ParseError::UnexpectedToken { actual, expected } => {
            assert_eq!(actual, "name '$bar'");
            assert_eq!(expected, "local name");
        }
        e => bail!("{}", e)
    }
    assert_eq!(e.pos, Pos { line: 1, col: 15 });
    Ok(())
}

#[test]
fn property_strings_concatenate() -> Result<()> {
    let props = properties(r#"Foo (text = "a" /* */ "b") {}"#)?;
    assert_eq!(props.get("text").and_then(Value::as_str), Some("ab"));
    Ok(())
}

#[test]
fn repeated_property_replaces() -> Result<()> {
    let props = properties("Foo (a=1, c=2, a=3) {}")?;
    assert_eq!(props.iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<_>>(),
               vec!["a=3", "c=2"]);
    Ok(())
}

#[test]
fn bad_property_lists() {
    assert!(matches!(read_err("Foo (a=1,) {}").err, ParseError::UnexpectedToken { .. }));
    assert!(matches!(read_err("Foo (a 1) {}").err, ParseError::UnexpectedToken { .. }));
    assert!(matches!(read_err("Foo (a={}) {}").err, ParseError::UnexpectedToken { .. }));
    assert!(matches!(read_err("Foo (a=1").err,
                     ParseError::UnexpectedEof(Some("property list"))));
}

#[test]
fn children_in_order() -> Result<()> {
    assert_eq!(events("A $a { B { C {} float {1} } D (x=1) {} }")?, vec![
        "begin A $a",
        "begin B",
        "begin C",
        "end C",
        "begin list float",
        "value 1.0",
        "end list float",
        "end B",
        "begin D (x=1)",
        "end D",
        "end A $a",
    ]);
    Ok(())
}

#[test]
fn element_type_mismatch() -> Result<()> {
    let e = read_err("float { Child {}}");
    match &e.err {
        ParseError::ElementTypeMismatch { actual, expected } => {
            assert_eq!(actual, "identifier 'Child'");
            assert_eq!(*expected, DataType::Float);
        }
        e => bail!("{}", e)
    }
    assert_eq!(e.to_string(),
               "list element identifier 'Child' does not match data type float; \
                expected float or integer literal @1.9");
    assert!(matches!(read_err("int32 {1.5}").err,
                     ParseError::ElementTypeMismatch { expected: DataType::Int32, .. }));
    assert!(matches!(read_err("bool {1}").err,
                     ParseError::ElementTypeMismatch { expected: DataType::Bool, .. }));
    assert!(matches!(read_err("string {$a}").err,
                     ParseError::ElementTypeMismatch { expected: DataType::String, .. }));
    assert!(matches!(read_err("ref {\"a\"}").err,
                     ParseError::ElementTypeMismatch { expected: DataType::Ref, .. }));
    Ok(())
}

#[test]
fn trailing_comma_in_list() {
    assert!(matches!(read_err("float {1.0,}").err, ParseError::UnexpectedToken { .. }));
    assert!(matches!(read_err("float[1] {{1.0},}").err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn delimiter_in_element_position() {
    assert_eq!(read_err("float {1.0,}").to_string(),
               "unexpected delimiter '}'; expected float or integer literal @1.12");
    assert_eq!(read_err("float {(}").to_string(),
               "unexpected delimiter '('; expected float or integer literal @1.8");
}

#[test]
fn incomplete_input() {
    let e = read_err("A { B {}");
    assert!(matches!(e.err, ParseError::UnexpectedEof(Some("custom structure"))));
    assert_eq!(e.to_string(), "unexpected EOF in custom structure @1.9");
    assert!(matches!(read_err("float {1").err,
                     ParseError::UnexpectedEof(Some("list structure"))));
    assert!(matches!(read_err("float").err,
                     ParseError::UnexpectedEof(Some("list structure"))));
    assert!(matches!(read_err("Foo $x").err,
                     ParseError::UnexpectedEof(Some("custom structure"))));
}

#[test]
fn stray_tokens() {
    let e = read_err("}");
    match e.err {
        ParseError::UnexpectedToken { actual, expected } => {
            assert_eq!(actual, "delimiter '}'");
            assert_eq!(expected, "identifier or data type");
        }
        e => panic!("{}", e)
    }
    assert!(matches!(read_err("A {} 42").err, ParseError::UnexpectedToken { .. }));
    assert!(matches!(read_err("A { $b }").err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn nesting_limit() -> Result<()> {
    let settings = Settings { max_nesting: 3, ..DEFAULT_SETTINGS };
    let ok = "A{B{C{float{1}}}}";
    Reader::new(ok.chars().map(Ok), &settings).read(&mut EventLog::new())?;
    let e = Reader::new("A{B{C{D{}}}}".chars().map(Ok), &settings)
        .read(&mut EventLog::new()).unwrap_err();
    assert!(matches!(e.err, ParseError::NestingTooDeep));
    assert_eq!(e.pos, Pos { line: 1, col: 7 });
    // no stack overflow with the defaults either
    let deep = format!("{}{}", "A{".repeat(10000), "}".repeat(10000));
    assert!(matches!(read_err(&deep).err, ParseError::NestingTooDeep));
    Ok(())
}

#[derive(Error, Debug)]
#[error("no {0} allowed")]
struct Rejected(String);

/// Counts list values; rejects custom structures named `Bad`.
#[derive(Default)]
struct Picky {
    values: usize,
}

impl Listener for Picky {
    type Output = usize;

    fn end(&mut self) -> Result<usize> {
        Ok(self.values)
    }

    fn value(&mut self, _value: Value) -> Result<()> {
        self.values += 1;
        Ok(())
    }

    fn begin_custom_structure(
        &mut self, identifier: &str, _name: Option<&Name>, _properties: &PropertyMap
    ) -> Result<()> {
        if identifier == "Bad" {
            return Err(Rejected(identifier.to_string()).into())
        }
        Ok(())
    }
}

#[test]
fn listener_output() -> Result<()> {
    let mut picky = Picky::default();
    assert_eq!(read_str("Good { int8 {1, 2} } u8[2] {{1, 2}, {3, 4}}", &mut picky)?, 6);
    Ok(())
}

#[test]
fn listener_errors_abort() -> Result<()> {
    let mut picky = Picky::default();
    let e = read_str("Good {} Bad { float {1.0} }", &mut picky).unwrap_err();
    assert_eq!(e.pos, Pos { line: 1, col: 13 });
    assert_eq!(e.to_string(), "no Bad allowed @1.13");
    match e.err {
        ParseError::Format(inner) => {
            let r = inner.downcast_ref::<Rejected>();
            assert_eq!(r.map(|r| r.0.as_str()), Some("Bad"));
        }
        e => bail!("{}", e)
    }
    // nothing after the rejection was reported
    assert_eq!(picky.values, 0);
    Ok(())
}

#[test]
fn invalid_utf8() {
    let input: &[u8] = b"Foo { string {\"\xff\"} }";
    let e = read_all(input, &mut EventLog::new()).unwrap_err();
    assert!(matches!(e.err, ParseError::IOError(_)));
}

#[test]
fn crlf_input_bytes() -> Result<()> {
    let input: &[u8] = b"A\r\n{\r\n  float {1}\r\n}\r\n}";
    let e = read_all(input, &mut EventLog::new()).unwrap_err();
    assert!(matches!(e.err, ParseError::UnexpectedToken { .. }));
    assert_eq!(e.pos, Pos { line: 5, col: 1 });
    Ok(())
}

#[test]
fn files() -> Result<()> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/t-input.oddl");
    let evs = read_file(&path, &mut EventLog::new())?;
    assert!(evs.len() > 2);

    let missing = Path::new("tests/does-not-exist.oddl");
    match read_file(missing, &mut EventLog::new()) {
        Err(e @ ReadFileError::IO(..)) =>
            assert!(e.to_string().starts_with("\"tests/does-not-exist.oddl\": ")),
        r => bail!("expected an IO error, got {:?}", r)
    }

    let bad = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/t-expected.txt");
    match read_file(&bad, &mut EventLog::new()) {
        Err(ReadFileError::Parse(e)) => {
            assert!(e.to_string().ends_with(&format!("in {:?}@2.1", bad)));
            assert!(matches!(e.err_with_pos().err, ParseError::UnexpectedToken { .. }));
        }
        r => bail!("expected a parse error, got {:?}", r)
    }
    Ok(())
}
