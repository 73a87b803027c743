// crates/osc-client/src/args.rs
//
// Command-line words to encoder arguments.

use osc_core::{Arg, Native, TypeTag};

use crate::error::{ClientError, Result};

/// Turn one command-line word into an encoder argument.
///
/// Best effort unless a tag is forced:
///
/// | word              | argument                          |
/// |-------------------|-----------------------------------|
/// | `42`, `-7`        | `i` (`h` if it does not fit i32)  |
/// | `4.2`, `1e3`      | `f`                               |
/// | `true` / `false`  | `T` / `F`                         |
/// | `nil`             | `N`                               |
/// | anything else     | `s`                               |
/// | `tag:value`       | forced tag, e.g. `h:42`, `m:0,144,60,100` |
pub fn parse_arg(word: &str) -> Result<Arg> {
    if let Some((tag, value)) = split_tagged(word) {
        return forced(tag, value).map_err(|e| ClientError::Argument(word.to_string(), e));
    }

    if let Ok(n) = word.parse::<i64>() {
        if i32::try_from(n).is_ok() {
            return Ok(Arg::infer(n));
        }
        return Ok(Arg::tagged(TypeTag::Long, n));
    }
    if looks_numeric(word) {
        if let Ok(x) = word.parse::<f64>() {
            return Ok(Arg::infer(x));
        }
    }

    Ok(match word {
        "true" => Arg::infer(true),
        "false" => Arg::infer(false),
        "nil" => Arg::Inferred(Native::None),
        _ => Arg::infer(word),
    })
}

/// Digits or `.` after an optional sign. Keeps `inf`, `nan` and the
/// like out of the float parse.
fn looks_numeric(word: &str) -> bool {
    let unsigned = word.strip_prefix(&['+', '-'][..]).unwrap_or(word);
    unsigned
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.')
}

pub fn parse_args<'a>(words: impl IntoIterator<Item = &'a str>) -> Result<Vec<Arg>> {
    words.into_iter().map(parse_arg).collect()
}

/// `"h:42"` -> `(Long, "42")`. Only a single known tag char counts, so
/// words like `"http://x"` stay strings.
fn split_tagged(word: &str) -> Option<(TypeTag, &str)> {
    let (tag, value) = word.split_once(':')?;
    let mut chars = tag.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => TypeTag::from_char(c).map(|t| (t, value)),
        _ => None,
    }
}

fn forced(tag: TypeTag, value: &str) -> std::result::Result<Arg, String> {
    let native = match tag {
        TypeTag::Int | TypeTag::Long => Native::Int(parse_num(value)?),
        TypeTag::Float | TypeTag::Double | TypeTag::TimeTag => match value.parse::<i64>() {
            Ok(n) => Native::Int(n),
            Err(_) => Native::Float(parse_num(value)?),
        },
        TypeTag::Midi | TypeTag::Rgba => Native::Ints(
            value
                .split(',')
                .map(|b| parse_num(b.trim()))
                .collect::<std::result::Result<_, _>>()?,
        ),
        TypeTag::String | TypeTag::Symbol | TypeTag::Char | TypeTag::Blob => {
            Native::Str(value.to_string())
        }
        TypeTag::True | TypeTag::False | TypeTag::Nil | TypeTag::Impulse => Native::None,
    };
    Ok(Arg::Tagged(tag, native))
}

fn parse_num<T: std::str::FromStr>(s: &str) -> std::result::Result<T, String> {
    s.parse::<T>().map_err(|_| format!("{:?} is not a number", s))
}
