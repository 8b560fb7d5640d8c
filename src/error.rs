//! エラー型の定義

use std::fmt;
use thiserror::Error;

/// 検証対象となるCookieのフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieField {
    Name,
    Value,
    Domain,
    Expires,
    MaxAge,
    Path,
}

impl fmt::Display for CookieField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookieField::Name => write!(f, "cookie name"),
            CookieField::Value => write!(f, "cookie value"),
            CookieField::Domain => write!(f, "cookie domain"),
            CookieField::Expires => write!(f, "'expires' value"),
            CookieField::MaxAge => write!(f, "'max_age' value"),
            CookieField::Path => write!(f, "cookie path"),
        }
    }
}

/// ライブラリのエラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// 名前・値・属性が文法に合致しない
    #[error("Invalid {field}: {value}")]
    InvalidCookieField { field: CookieField, value: String },

    /// リスト要素の形（要素数・型）が操作に合わない
    #[error("Invalid {operation} entry at index {index}: {reason}")]
    ArityError {
        operation: &'static str,
        index: usize,
        reason: String,
    },

    /// 変更リストの要素がset/unsetとして解釈できない
    #[error("Invalid cookie change list: change at index {index} is invalid")]
    MalformedChangeList { index: usize },

    /// JSONとして読めない変更リスト
    #[error("Invalid change list JSON: {0}")]
    InvalidJson(String),

    /// メッセージ側が表現できないヘッダー
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl Error {
    /// 不正なフィールドの生成ヘルパー
    pub fn invalid_field(field: CookieField, value: impl fmt::Display) -> Self {
        Error::InvalidCookieField {
            field,
            value: value.to_string(),
        }
    }

    /// 問題のあったフィールド（フィールド検証エラーのみ）
    pub fn field(&self) -> Option<CookieField> {
        match self {
            Error::InvalidCookieField { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// 問題のあったリスト要素の位置
    pub fn index(&self) -> Option<usize> {
        match self {
            Error::ArityError { index, .. } => Some(*index),
            Error::MalformedChangeList { index } => Some(*index),
            _ => None,
        }
    }
}
