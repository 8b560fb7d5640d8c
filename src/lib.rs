//! RunBridge Cookies: 不変HTTPメッセージにSet-Cookieヘッダーを追加するライブラリ
//!
//! Cookieの名前・値・属性をRFC 6265の文法で検証し、ヘッダー値を固定の属性順で生成する。
//! メッセージは変更せず、操作ごとにヘッダーを追加した新しい値を返す。
//!
//! ```
//! use runbridge_cookies::{change_client_cookies, CookieAttributes, Response, Value};
//!
//! let changes = vec![
//!     Value::List(vec!["+city".into(), "London".into()]),
//!     Value::List(vec!["-spice".into(), CookieAttributes::new().with_path("/").into()]),
//! ];
//! let res = change_client_cookies(&Response::ok(), &changes).unwrap();
//! assert_eq!(
//!     res.header_values("Set-Cookie"),
//!     vec!["city=London", "spice=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/"]
//! );
//! ```

pub mod change;
pub mod common;
pub mod error;

pub use change::*;
pub use common::*;
pub use error::*;
