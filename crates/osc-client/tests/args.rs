// crates/osc-client/tests/args.rs
use osc_client::{parse_arg, parse_args, ClientError};
use osc_core::{Arg, Native, OscValue, TypeTag};

fn value(word: &str) -> OscValue {
    parse_arg(word).unwrap().into_value().unwrap()
}

#[test]
fn words_are_inferred_best_effort() {
    assert_eq!(value("42"), OscValue::Int(42));
    assert_eq!(value("-7"), OscValue::Int(-7));
    assert_eq!(value("4.5"), OscValue::Float(4.5));
    assert_eq!(value("true"), OscValue::Bool(true));
    assert_eq!(value("false"), OscValue::Bool(false));
    assert_eq!(value("nil"), OscValue::Nil);
    assert_eq!(value("hello"), OscValue::String("hello".to_string()));
}

#[test]
fn float_keywords_stay_strings() {
    for word in ["inf", "-inf", "+infinity", "infinity", "nan", "NaN", "Infinity"] {
        assert_eq!(value(word), OscValue::String(word.to_string()), "{:?}", word);
    }
    assert_eq!(value(".5"), OscValue::Float(0.5));
    assert_eq!(value("-2.5"), OscValue::Float(-2.5));
    assert_eq!(value("+1e3"), OscValue::Float(1000.0));
}

#[test]
fn big_integers_become_longs() {
    assert_eq!(value("5000000000"), OscValue::Long(5_000_000_000));
}

#[test]
fn tag_prefix_forces_the_type() {
    assert_eq!(value("h:42"), OscValue::Long(42));
    assert_eq!(value("d:42"), OscValue::Double(42.0));
    assert_eq!(value("f:0.5"), OscValue::Float(0.5));
    assert_eq!(value("s:42"), OscValue::String("42".to_string()));
    assert_eq!(value("S:sym"), OscValue::Symbol("sym".to_string()));
    assert_eq!(value("c:x"), OscValue::Char('x'));
    assert_eq!(value("b:ni!"), OscValue::Blob(b"ni!".to_vec()));
    assert_eq!(value("m:0,144,60,100"), OscValue::Midi([0, 144, 60, 100]));
    assert_eq!(value("r:255, 0, 0, 128"), OscValue::Rgba([255, 0, 0, 128]));
    assert_eq!(value("I:"), OscValue::Impulse);
    assert_eq!(value("N:whatever"), OscValue::Nil);
}

#[test]
fn colons_without_a_known_tag_stay_strings() {
    assert_eq!(value("http://x"), OscValue::String("http://x".to_string()));
    assert_eq!(value("x:1"), OscValue::String("x:1".to_string()));
    assert_eq!(value(":1"), OscValue::String(":1".to_string()));
}

#[test]
fn unparsable_forced_values_are_rejected() {
    for word in ["i:abc", "h:1.5", "m:1,2,x,4", "f:"] {
        assert!(
            matches!(parse_arg(word), Err(ClientError::Argument(..))),
            "{:?} should be rejected",
            word
        );
    }
}

#[test]
fn parse_args_keeps_order() {
    let args = parse_args(["1", "two", "h:3"]).unwrap();
    assert_eq!(
        args,
        vec![
            Arg::Inferred(Native::Int(1)),
            Arg::Inferred(Native::Str("two".to_string())),
            Arg::Tagged(TypeTag::Long, Native::Int(3)),
        ]
    );
}
