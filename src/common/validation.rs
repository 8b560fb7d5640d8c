//! RFC 6265の文法に基づくCookieフィールドの検証関数群
//!
//! いずれも純粋関数で、失敗時はパニックせずに`false`を返す。

use std::sync::OnceLock;

use log::error;
use regex::Regex;

use super::value::Value;

/// token のセパレータ（RFC 2616）
const SEPARATORS: &str = "()<>@,;:\\\"/[]?={}";

/// Cookie名の文法（初回利用時にコンパイルしてキャッシュ）
static COOKIE_NAME_PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn cookie_name_pattern() -> &'static Result<Regex, regex::Error> {
    COOKIE_NAME_PATTERN.get_or_init(|| {
        // 可視ASCII全体からセパレータと空白・タブを除いた文字の繰り返し
        let alternatives: Vec<String> = (0x20u8..=0x7E)
            .map(char::from)
            .filter(|c| !SEPARATORS.contains(*c) && *c != ' ' && *c != '\t')
            .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
            .collect();
        Regex::new(&format!(r"\A(?:{})+\z", alternatives.join("|")))
    })
}

/// Cookie名が token として妥当か
pub fn valid_cookie_name(name: &str) -> bool {
    match cookie_name_pattern() {
        Ok(regex) => regex.is_match(name),
        Err(e) => {
            error!("Cookie name pattern failed to compile: {}", e);
            false
        }
    }
}

/// Cookie値が cookie-octet の1文字以上の並びか
/// 許容: 0x21, 0x23-0x2B, 0x2D-0x3A, 0x3C-0x5B, 0x5D-0x7E
pub fn valid_cookie_value(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| {
            matches!(c as u32,
                0x21 |
                0x23..=0x2B |
                0x2D..=0x3A |
                0x3C..=0x5B |
                0x5D..=0x7E
            )
        })
}

/// ドット区切りのラベル（英数字とハイフン）の並びか
pub fn valid_domain(domain: &str) -> bool {
    domain.split('.').all(|label| {
        !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// 日時値、または整数とみなせる数値か（負数も可）
pub fn valid_expires(expires: &Value) -> bool {
    matches!(expires, Value::DateTime(_)) || is_math_integer(expires)
}

/// 整数とみなせる数値か（RFC 6265 5.2.2により負数も可）
pub fn valid_max_age(max_age: &Value) -> bool {
    is_math_integer(max_age)
}

/// セミコロン以外の可視ASCII（空白含む）のみか。空文字列は可
pub fn valid_path(path: &str) -> bool {
    path.chars()
        .all(|c| matches!(c as u32, 0x20..=0x3A | 0x3C..=0x7E))
}

/// 数学的に整数か
///
/// 浮動小数点は小数部が0のときのみ真（`NaN`・無限大は偽）。文字列は数値表記で、
/// かつ小数点の後に0以外の数字が続かないときのみ真。このため`"3.0e10"`は真、
/// `"3.0010e9"`は値としては整数でも偽になる。
pub fn is_math_integer(x: &Value) -> bool {
    match x {
        Value::Int(_) => true,
        Value::Float(f) => f.is_finite() && f.fract() == 0.0,
        Value::Str(s) => is_numeric_string(s) && !has_nonzero_fraction(s),
        _ => false,
    }
}

/// 整数秒への正規化（`Expires`・`Max-Age`の出力用）
///
/// 0方向に切り捨てる。`i64`に収まらない場合や数値でない場合は`None`。
pub fn integer_seconds(x: &Value) -> Option<i64> {
    match x {
        Value::Int(i) => Some(*i),
        Value::Float(f) => float_to_i64(*f),
        Value::Str(s) if is_numeric_string(s) => {
            let trimmed = s.trim_matches(is_numeric_whitespace);
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_i64))
        }
        _ => None,
    }
}

fn float_to_i64(f: f64) -> Option<i64> {
    // i64::MIN はちょうど表現可能、i64::MAX + 1 は範囲外
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_finite() && f >= -LIMIT && f < LIMIT {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

fn is_numeric_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

/// 数値表記の文字列か
/// 形式: [空白][符号](数字[.数字*] | .数字)[e[符号]数字][空白]
fn is_numeric_string(s: &str) -> bool {
    let bytes = s.trim_matches(is_numeric_whitespace).as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }

    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// 小数点の後の数字列に0以外が含まれるか
fn has_nonzero_fraction(s: &str) -> bool {
    s.split('.').skip(1).any(|after| {
        after
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .any(|c| c != '0')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::value::CookieAttributes;
    use chrono::Utc;

    #[test]
    fn test_is_math_integer_true() {
        for candidate in [
            Value::from(1),
            Value::from(2),
            Value::from(3.0),
            Value::from("3.0e10"),
            Value::from(".000"),
            Value::from("-0"),
            Value::from(-4000),
        ] {
            assert!(is_math_integer(&candidate), "expected integer: {:?}", candidate);
        }
    }

    #[test]
    fn test_is_math_integer_false() {
        for candidate in [
            Value::from(1.1),
            Value::from("x"),
            Value::from("0.0010"),
            Value::from("3.0010e9"),
            Value::from("3e1.2"),
            Value::from(f64::INFINITY),
            Value::from(f64::NEG_INFINITY),
            Value::from(f64::NAN),
            Value::from(""),
            Value::from("."),
            Value::from("1e"),
            Value::Null,
            Value::from(true),
            Value::from(Utc::now()),
        ] {
            assert!(!is_math_integer(&candidate), "expected non-integer: {:?}", candidate);
        }
    }

    #[test]
    fn test_numeric_string_grammar() {
        assert!(is_numeric_string("42"));
        assert!(is_numeric_string(" +42 "));
        assert!(is_numeric_string("1."));
        assert!(is_numeric_string("1.5E-3"));
        assert!(!is_numeric_string("0x1A"));
        assert!(!is_numeric_string("1 2"));
        assert!(!is_numeric_string("--1"));
        assert!(!is_numeric_string("INF"));
    }

    #[test]
    fn test_integer_seconds() {
        assert_eq!(integer_seconds(&Value::from(100)), Some(100));
        assert_eq!(integer_seconds(&Value::from(3.0)), Some(3));
        assert_eq!(integer_seconds(&Value::from("3.0e10")), Some(30_000_000_000));
        assert_eq!(integer_seconds(&Value::from("-0")), Some(0));
        assert_eq!(integer_seconds(&Value::from(".000")), Some(0));
        assert_eq!(integer_seconds(&Value::from(" 12 ")), Some(12));
        assert_eq!(integer_seconds(&Value::from(1e300)), None);
        assert_eq!(integer_seconds(&Value::from("x")), None);
    }

    #[test]
    fn test_cookie_name() {
        assert!(valid_cookie_name("SESSIONID"));
        assert!(valid_cookie_name("a!#$%&'*+-.^_`|~z"));
        assert!(!valid_cookie_name(""));
        assert!(!valid_cookie_name("bad name"));
        assert!(!valid_cookie_name("bad\tname"));
        assert!(!valid_cookie_name("bad;name"));
        assert!(!valid_cookie_name("a=b"));
        assert!(!valid_cookie_name("caf\u{e9}"));
        assert!(!valid_cookie_name("line\n"));
        for c in SEPARATORS.chars() {
            assert!(!valid_cookie_name(&format!("x{}y", c)), "separator accepted: {:?}", c);
        }
    }

    #[test]
    fn test_cookie_value() {
        assert!(valid_cookie_value("abcDEF123-_.:~"));
        assert!(valid_cookie_value("!#[]"));
        assert!(!valid_cookie_value(""));
        assert!(!valid_cookie_value("bad value"));
        assert!(!valid_cookie_value("bad;value"));
        assert!(!valid_cookie_value("bad,value"));
        assert!(!valid_cookie_value("bad\\value"));
        assert!(!valid_cookie_value("\"quoted\""));
        assert!(!valid_cookie_value("bad\nvalue"));
    }

    #[test]
    fn test_domain() {
        assert!(valid_domain("example.com"));
        assert!(valid_domain("localhost"));
        assert!(valid_domain("sub-1.example.co.uk"));
        assert!(!valid_domain(""));
        assert!(!valid_domain("a/b"));
        assert!(!valid_domain(".example.com"));
        assert!(!valid_domain("example..com"));
        assert!(!valid_domain("example.com."));
        assert!(!valid_domain("exa mple.com"));
    }

    #[test]
    fn test_path() {
        assert!(valid_path(""));
        assert!(valid_path("/a/b c"));
        assert!(!valid_path(";"));
        assert!(!valid_path("x\ty"));
        assert!(!valid_path("\x01"));
        assert!(!valid_path("/\u{7f}"));
    }

    #[test]
    fn test_expires_and_max_age() {
        assert!(valid_expires(&Value::from(Utc::now())));
        assert!(valid_expires(&Value::from(-1)));
        assert!(!valid_expires(&Value::from("x")));
        assert!(!valid_expires(&Value::from(f64::NAN)));
        assert!(!valid_expires(&Value::from(CookieAttributes::new())));

        assert!(valid_max_age(&Value::from(-100)));
        assert!(!valid_max_age(&Value::from(Utc::now())));
        assert!(!valid_max_age(&Value::from(f64::INFINITY)));
    }
}
