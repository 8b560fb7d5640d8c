// Set-Cookieヘッダー生成の公開APIに対する統合テスト
use std::thread;

use chrono::{FixedOffset, TimeZone, Utc};
use runbridge_cookies::common::cookie::{with_cookie_set, with_cookie_unset, SET_COOKIE};
use runbridge_cookies::common::http::{HttpMessage, Response};
use runbridge_cookies::common::validation::{is_math_integer, valid_cookie_name};
use runbridge_cookies::common::value::{CookieAttributes, Value};
use runbridge_cookies::error::{CookieField, Error};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_set_with_all_attributes_converts_to_utc() {
    init_logger();
    let expires = FixedOffset::east_opt(6 * 3600)
        .unwrap()
        .with_ymd_and_hms(2000, 1, 1, 12, 0, 0)
        .unwrap();
    let attrs = CookieAttributes::new()
        .with_path("/a/b")
        .with_max_age(100)
        .with_expires(expires)
        .with_domain("example.com");

    let res = with_cookie_set(&Response::ok(), "city", "London", &attrs).unwrap();
    assert_eq!(
        res.header_values(SET_COOKIE),
        vec!["city=London; Domain=example.com; Expires=Sat, 01 Jan 2000 06:00:00 GMT; Max-Age=100; Path=/a/b"]
    );
}

#[test]
fn test_unset_basic_and_with_attributes() {
    init_logger();
    let res = with_cookie_unset(&Response::ok(), "city", &CookieAttributes::new()).unwrap();
    assert_eq!(
        res.header("Set-Cookie"),
        Some("city=; Expires=Thu, 01 Jan 1970 00:00:00 GMT")
    );

    let attrs = CookieAttributes::new()
        .with_domain("x.com")
        .with_path("/y")
        .with("unrecognized", "x");
    let res = with_cookie_unset(&Response::ok(), "city", &attrs).unwrap();
    assert_eq!(
        res.header("Set-Cookie"),
        Some("city=; Domain=x.com; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/y")
    );
}

#[test]
fn test_multiple_cookies_accumulate_without_touching_input() {
    init_logger();
    let original = Response::ok()
        .with_added_header("Content-Type", "text/plain")
        .unwrap();
    let first = with_cookie_set(&original, "a", "1", &CookieAttributes::new()).unwrap();
    let second = with_cookie_set(&first, "b", "2", &CookieAttributes::new().with_secure(true)).unwrap();

    assert!(original.header_values(SET_COOKIE).is_empty());
    assert_eq!(first.header_values(SET_COOKIE), vec!["a=1"]);
    assert_eq!(second.header_values(SET_COOKIE), vec!["a=1", "b=2; Secure"]);
    assert_eq!(second.header("content-type"), Some("text/plain"));
}

#[test]
fn test_failed_set_adds_nothing() {
    init_logger();
    let original = Response::ok();
    let attrs = CookieAttributes::new().with_domain("example.com").with_path(";");

    let err = with_cookie_set(&original, "city", "London", &attrs).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidCookieField {
            field: CookieField::Path,
            value: ";".to_string(),
        }
    );
    assert_eq!(err.to_string(), "Invalid cookie path: ;");
    assert!(original.headers().is_empty());
}

#[test]
fn test_expires_from_epoch_seconds_and_datetime_agree() {
    init_logger();
    let instant = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
    let by_datetime = CookieAttributes::new().with_expires(instant);
    let by_seconds = CookieAttributes::new().with_expires(instant.timestamp());
    let by_string = CookieAttributes::new().with_expires(instant.timestamp().to_string());

    let expected = "k=v; Expires=Tue, 31 Dec 2024 23:59:59 GMT";
    for attrs in [by_datetime, by_seconds, by_string] {
        let res = with_cookie_set(&Response::ok(), "k", "v", &attrs).unwrap();
        assert_eq!(res.header(SET_COOKIE), Some(expected));
    }
}

#[test]
fn test_is_math_integer_table() {
    let truthy: Vec<Value> = vec![
        1.into(),
        2.into(),
        3.0.into(),
        "3.0e10".into(),
        ".000".into(),
        "-0".into(),
        (-4000).into(),
    ];
    let falsy: Vec<Value> = vec![
        1.1.into(),
        "x".into(),
        "0.0010".into(),
        "3.0010e9".into(),
        "3e1.2".into(),
        f64::INFINITY.into(),
        f64::NAN.into(),
    ];

    assert!(truthy.iter().all(is_math_integer));
    assert!(!falsy.iter().any(is_math_integer));
}

#[test]
fn test_cookie_name_pattern_is_shared_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let name = format!("cookie{}", i);
                valid_cookie_name(&name) && !valid_cookie_name("bad name")
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[cfg(feature = "http")]
#[test]
fn test_header_map_message() {
    use http::HeaderMap;

    init_logger();
    let map = HeaderMap::new();
    let map = with_cookie_set(&map, "a", "1", &CookieAttributes::new().with_http_only(true)).unwrap();
    let map = with_cookie_unset(&map, "b", &CookieAttributes::new()).unwrap();

    let values: Vec<_> = map
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(
        values,
        vec![
            "a=1; HttpOnly".to_string(),
            "b=; Expires=Thu, 01 Jan 1970 00:00:00 GMT".to_string(),
        ]
    );
}
