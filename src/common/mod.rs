//! 共通の型（メッセージ抽象化・属性値）とCookieの検証・生成

pub mod cookie;
pub mod http;
pub mod validation;
pub mod value;

pub use cookie::{set_cookie_header_value, with_cookie_set, with_cookie_unset, SET_COOKIE};
pub use self::http::{HttpMessage, Response};
pub use validation::{
    is_math_integer, valid_cookie_name, valid_cookie_value, valid_domain, valid_expires,
    valid_max_age, valid_path,
};
pub use value::{AttributeKey, CookieAttributes, Value};
