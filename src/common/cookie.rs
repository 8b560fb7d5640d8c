//! Set-Cookieヘッダー値の生成とメッセージへの追加

use chrono::{DateTime, Datelike, TimeZone, Utc};
use log::trace;

use crate::error::{CookieField, Error};
use super::http::HttpMessage;
use super::validation::{
    integer_seconds, valid_cookie_name, valid_cookie_value, valid_domain, valid_expires,
    valid_max_age, valid_path,
};
use super::value::{AttributeKey, CookieAttributes, Value};

/// Set-Cookieヘッダー名
pub const SET_COOKIE: &str = "Set-Cookie";

/// Expires属性の書式（数値オフセットではなく常に"GMT"）
const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// 検証済みで出力可能な形に変換した属性
#[derive(Debug, Default)]
struct RenderedAttributes {
    domain: Option<String>,
    expires: Option<DateTime<Utc>>,
    max_age: Option<i64>,
    path: Option<String>,
    http_only: bool,
    secure: bool,
}

impl RenderedAttributes {
    /// domain, expires, max_age, path の順に検証し、最初の違反でエラーを返す
    fn validate(attributes: &CookieAttributes) -> Result<Self, Error> {
        let mut rendered = Self::default();

        if let Some(domain) = attributes.attribute(AttributeKey::Domain) {
            rendered.domain = Some(text_checked(domain, CookieField::Domain, valid_domain)?);
        }

        if let Some(expires) = attributes.attribute(AttributeKey::Expires) {
            if !valid_expires(expires) {
                return Err(Error::invalid_field(CookieField::Expires, expires));
            }
            let utc = expires_to_utc(expires)
                .ok_or_else(|| Error::invalid_field(CookieField::Expires, expires))?;
            rendered.expires = Some(utc);
        }

        if let Some(max_age) = attributes.attribute(AttributeKey::MaxAge) {
            if !valid_max_age(max_age) {
                return Err(Error::invalid_field(CookieField::MaxAge, max_age));
            }
            let seconds = integer_seconds(max_age)
                .ok_or_else(|| Error::invalid_field(CookieField::MaxAge, max_age))?;
            rendered.max_age = Some(seconds);
        }

        if let Some(path) = attributes.attribute(AttributeKey::Path) {
            rendered.path = Some(text_checked(path, CookieField::Path, valid_path)?);
        }

        rendered.http_only = attributes
            .attribute(AttributeKey::HttpOnly)
            .map_or(false, Value::is_truthy);
        rendered.secure = attributes
            .attribute(AttributeKey::Secure)
            .map_or(false, Value::is_truthy);

        Ok(rendered)
    }

    /// 固定順（Domain, Expires, HttpOnly, Max-Age, Path, Secure）で書き出す
    fn write_to(&self, out: &mut String) {
        if let Some(domain) = &self.domain {
            out.push_str("; Domain=");
            out.push_str(domain);
        }

        if let Some(expires) = &self.expires {
            out.push_str(&format!("; Expires={}", expires.format(EXPIRES_FORMAT)));
        }

        if self.http_only {
            out.push_str("; HttpOnly");
        }

        if let Some(max_age) = self.max_age {
            out.push_str(&format!("; Max-Age={}", max_age));
        }

        if let Some(path) = &self.path {
            out.push_str("; Path=");
            out.push_str(path);
        }

        if self.secure {
            out.push_str("; Secure");
        }
    }
}

/// 文字列として扱える属性値を取り出して検証する
fn text_checked(
    value: &Value,
    field: CookieField,
    is_valid: fn(&str) -> bool,
) -> Result<String, Error> {
    match value.as_text() {
        Some(text) if is_valid(&text) => Ok(text.into_owned()),
        _ => Err(Error::invalid_field(field, value)),
    }
}

/// Expiresの値をUTC日時へ変換（数値はUNIXエポックからの秒数）
///
/// 年が4桁（0000-9999）に収まらない日時は`None`。
fn expires_to_utc(expires: &Value) -> Option<DateTime<Utc>> {
    let utc = match expires {
        Value::DateTime(dt) => Some(dt.with_timezone(&Utc)),
        other => integer_seconds(other).and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
    }?;
    (0..=9999).contains(&utc.year()).then_some(utc)
}

fn check_name(name: &str) -> Result<(), Error> {
    if valid_cookie_name(name) {
        Ok(())
    } else {
        Err(Error::invalid_field(CookieField::Name, name))
    }
}

/// 名前・値が検証済みであることを前提に属性を検証して組み立てる
fn build_header_value(
    name: &str,
    value: &str,
    attributes: &CookieAttributes,
) -> Result<String, Error> {
    let rendered = RenderedAttributes::validate(attributes)?;
    let mut header_value = format!("{}={}", name, value);
    rendered.write_to(&mut header_value);
    Ok(header_value)
}

/// Set-Cookieヘッダー値を生成
///
/// 名前・値・各属性を検証し、未知の属性キーは無視する。
pub fn set_cookie_header_value(
    name: &str,
    value: &str,
    attributes: &CookieAttributes,
) -> Result<String, Error> {
    check_name(name)?;
    if !valid_cookie_value(value) {
        return Err(Error::invalid_field(CookieField::Value, value));
    }
    build_header_value(name, value, attributes)
}

/// Cookieを設定するSet-Cookieヘッダーを追加した新しいメッセージを返す
pub fn with_cookie_set<M: HttpMessage>(
    message: &M,
    name: &str,
    value: &str,
    attributes: &CookieAttributes,
) -> Result<M, Error> {
    let header_value = set_cookie_header_value(name, value, attributes)?;
    trace!("Adding Set-Cookie header for cookie {:?}", name);
    message.with_added_header(SET_COOKIE, &header_value)
}

/// Cookieを削除（空値・エポック期限）するSet-Cookieヘッダーを追加した新しいメッセージを返す
///
/// 引き継ぐ属性は`domain`と`path`のみ。`expires`は常にエポックで上書きされる。
pub fn with_cookie_unset<M: HttpMessage>(
    message: &M,
    name: &str,
    attributes: &CookieAttributes,
) -> Result<M, Error> {
    let mut reduced = CookieAttributes::new().with_expires(0);
    for key in [AttributeKey::Domain, AttributeKey::Path] {
        if let Some(value) = attributes.attribute(key) {
            reduced = reduced.with(key.as_str(), value.clone());
        }
    }

    // 空の値はcookie-octetの検証を通らないため、名前のみ検証して直接組み立てる
    check_name(name)?;
    let header_value = build_header_value(name, "", &reduced)?;
    trace!("Adding expiring Set-Cookie header for cookie {:?}", name);
    message.with_added_header(SET_COOKIE, &header_value)
}
