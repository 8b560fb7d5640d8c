//! Cookie属性とリスト要素を表す動的な値

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, Offset, TimeZone};

/// 属性値・リスト要素として受け付ける値
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// タイムゾーン付きの日時
    DateTime(DateTime<FixedOffset>),
    List(Vec<Value>),
    Map(CookieAttributes),
}

impl Value {
    /// 文字列として扱える場合はその表現を返す（文字列と整数のみ）
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Str(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Int(i) => Some(Cow::Owned(i.to_string())),
            _ => None,
        }
    }

    /// 真偽値としての評価（`http_only`・`secure`用）
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !(s.is_empty() || s == "0"),
            Value::DateTime(_) => true,
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
        }
    }

    /// マップであれば参照を返す
    pub fn as_map(&self) -> Option<&CookieAttributes> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// リストであれば要素のスライスを返す
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// エラーメッセージ用の型名
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Int(i64::from(i))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(dt: DateTime<Tz>) -> Self {
        let offset = dt.offset().fix();
        Value::DateTime(dt.with_timezone(&offset))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<CookieAttributes> for Value {
    fn from(map: CookieAttributes) -> Self {
        Value::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// 出力対象として認識される属性キー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKey {
    Domain,
    Expires,
    MaxAge,
    Path,
    HttpOnly,
    Secure,
}

impl AttributeKey {
    /// 属性マップ上のキー文字列
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKey::Domain => "domain",
            AttributeKey::Expires => "expires",
            AttributeKey::MaxAge => "max_age",
            AttributeKey::Path => "path",
            AttributeKey::HttpOnly => "http_only",
            AttributeKey::Secure => "secure",
        }
    }
}

/// Cookie属性のマップ
///
/// 未知のキーも保持できるが、ヘッダー生成時には無視される。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieAttributes {
    entries: BTreeMap<String, Value>,
}

impl CookieAttributes {
    /// 空の属性マップを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 任意のキーで値を設定
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// ドメインを設定
    pub fn with_domain(self, domain: impl Into<Value>) -> Self {
        self.with(AttributeKey::Domain.as_str(), domain)
    }

    /// 有効期限を設定（日時またはUNIX秒）
    pub fn with_expires(self, expires: impl Into<Value>) -> Self {
        self.with(AttributeKey::Expires.as_str(), expires)
    }

    /// Max-Ageを設定
    pub fn with_max_age(self, max_age: impl Into<Value>) -> Self {
        self.with(AttributeKey::MaxAge.as_str(), max_age)
    }

    /// パスを設定
    pub fn with_path(self, path: impl Into<Value>) -> Self {
        self.with(AttributeKey::Path.as_str(), path)
    }

    /// HttpOnlyフラグを設定
    pub fn with_http_only(self, http_only: impl Into<Value>) -> Self {
        self.with(AttributeKey::HttpOnly.as_str(), http_only)
    }

    /// セキュアフラグを設定
    pub fn with_secure(self, secure: impl Into<Value>) -> Self {
        self.with(AttributeKey::Secure.as_str(), secure)
    }

    /// 認識済みキーの値を取得
    pub fn attribute(&self, key: AttributeKey) -> Option<&Value> {
        self.entries.get(key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CookieAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
