//! Cookie変更命令（set/unset）とリスト要素からの解釈

use crate::common::cookie::{with_cookie_set, with_cookie_unset};
use crate::common::http::HttpMessage;
use crate::common::value::{CookieAttributes, Value};
use crate::error::{CookieField, Error};

/// 設定命令を表すマーカー
pub const SET_MARKER: char = '+';
/// 削除命令を表すマーカー
pub const UNSET_MARKER: char = '-';

/// 1件のCookie変更命令
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeInstruction {
    Set {
        name: String,
        value: Value,
        attributes: CookieAttributes,
    },
    Unset {
        name: String,
        attributes: CookieAttributes,
    },
}

impl ChangeInstruction {
    /// 設定命令を作成
    pub fn set(
        name: impl Into<String>,
        value: impl Into<Value>,
        attributes: CookieAttributes,
    ) -> Self {
        ChangeInstruction::Set {
            name: name.into(),
            value: value.into(),
            attributes,
        }
    }

    /// 削除命令を作成
    pub fn unset(name: impl Into<String>, attributes: CookieAttributes) -> Self {
        ChangeInstruction::Unset {
            name: name.into(),
            attributes,
        }
    }

    /// 対象のCookie名
    pub fn name(&self) -> &str {
        match self {
            ChangeInstruction::Set { name, .. } | ChangeInstruction::Unset { name, .. } => name,
        }
    }

    /// 変更リストの1要素を解釈する
    ///
    /// 要素は先頭がマーカー付きの名前（`"+city"`・`"-city"`）のリストでなければならない。
    /// - 設定: `["+name", value]` または `["+name", value, {属性}]`
    /// - 削除: `["-name"]` または `["-name", {属性}]`
    pub fn parse(index: usize, entry: &Value) -> Result<Self, Error> {
        let malformed = || Error::MalformedChangeList { index };

        let (head, tail) = entry
            .as_list()
            .and_then(|items| items.split_first())
            .ok_or_else(malformed)?;

        let token = match head {
            Value::Str(token) if token.len() >= 2 => token,
            _ => return Err(malformed()),
        };
        // 先頭がASCIIのマーカーであることを確認してから切り出す
        let name = match token.chars().next() {
            Some(SET_MARKER) | Some(UNSET_MARKER) => token[1..].to_string(),
            _ => return Err(malformed()),
        };

        if token.starts_with(SET_MARKER) {
            match tail {
                [value] => Ok(Self::set(name, value.clone(), CookieAttributes::new())),
                [value, Value::Map(attributes)] => {
                    Ok(Self::set(name, value.clone(), attributes.clone()))
                }
                _ => Err(malformed()),
            }
        } else {
            match tail {
                [] => Ok(Self::unset(name, CookieAttributes::new())),
                [Value::Map(attributes)] => Ok(Self::unset(name, attributes.clone())),
                _ => Err(malformed()),
            }
        }
    }

    /// 命令をメッセージに適用し、新しいメッセージを返す
    pub fn apply<M: HttpMessage>(&self, message: &M) -> Result<M, Error> {
        match self {
            ChangeInstruction::Set {
                name,
                value,
                attributes,
            } => {
                let text = value
                    .as_text()
                    .ok_or_else(|| Error::invalid_field(CookieField::Value, value))?;
                with_cookie_set(message, name, &text, attributes)
            }
            ChangeInstruction::Unset { name, attributes } => {
                with_cookie_unset(message, name, attributes)
            }
        }
    }
}
