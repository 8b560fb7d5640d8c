//! HTTPメッセージの抽象化と基本的なレスポンス型

use crate::error::Error;

/// ヘッダー追加のたびに新しい値を返す不変HTTPメッセージ
pub trait HttpMessage: Clone {
    /// ヘッダーを1件追加（既存の同名ヘッダーは置換しない）した新しいメッセージを返す
    ///
    /// メッセージ側が表現できないヘッダーは追加せずにエラーを返す。
    fn with_added_header(&self, name: &str, value: &str) -> Result<Self, Error>;
}

/// HTTPレスポンス
///
/// ヘッダーは追加順に保持され、同名ヘッダーの複数回出現を許す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTPステータスコード
    pub status: u16,
    headers: Vec<(String, String)>,
}

impl Response {
    /// 新しいレスポンスを作成
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// 200 OKレスポンスを作成
    pub fn ok() -> Self {
        Self::new(200)
    }

    /// 全ヘッダー（追加順）
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// 指定名の最初のヘッダー値（大文字小文字を区別しない）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).into_iter().next()
    }

    /// 指定名のヘッダー値をすべて追加順に取得
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

impl HttpMessage for Response {
    fn with_added_header(&self, name: &str, value: &str) -> Result<Self, Error> {
        let mut next = self.clone();
        next.headers.push((name.to_string(), value.to_string()));
        Ok(next)
    }
}

#[cfg(feature = "http")]
mod http_compat {
    use http::header::{HeaderName, HeaderValue};
    use http::HeaderMap;

    use super::HttpMessage;
    use crate::error::Error;

    impl HttpMessage for HeaderMap {
        fn with_added_header(&self, name: &str, value: &str) -> Result<Self, Error> {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::InvalidHeader(format!("{:?}: {}", name, e)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| Error::InvalidHeader(format!("{:?}: {}", name, e)))?;

            let mut next = self.clone();
            next.append(header_name, header_value);
            Ok(next)
        }
    }
}
