//! Cookie変更の一括適用（分割モジュール）

pub mod instruction;
pub mod batch;

pub use instruction::{ChangeInstruction, SET_MARKER, UNSET_MARKER};
pub use batch::{
    apply_changes, change_client_cookies,
    parse_change_list, parse_change_list_json,
    with_cookie_list_set, with_cookie_list_unset,
};
