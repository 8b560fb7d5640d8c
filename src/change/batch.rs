//! 複数のCookie変更をメッセージへ順に適用する

use log::debug;

use crate::common::http::HttpMessage;
use crate::common::value::{CookieAttributes, Value};
use crate::error::{CookieField, Error};

use super::instruction::ChangeInstruction;

const LIST_SET: &str = "with_cookie_list_set";
const LIST_UNSET: &str = "with_cookie_list_unset";

/// 変更リスト全体を解釈する（1件でも不正なら最初の要素位置でエラー）
pub fn parse_change_list(entries: &[Value]) -> Result<Vec<ChangeInstruction>, Error> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| ChangeInstruction::parse(index, entry))
        .collect()
}

/// JSON配列で書かれた変更リストを解釈する
pub fn parse_change_list_json(json: &str) -> Result<Vec<ChangeInstruction>, Error> {
    let parsed: serde_json::Value =
        serde_json::from_str(json).map_err(|e| Error::InvalidJson(e.to_string()))?;

    match Value::from(parsed) {
        Value::List(entries) => parse_change_list(&entries),
        other => Err(Error::InvalidJson(format!(
            "expected an array of changes, got {}",
            other.type_name()
        ))),
    }
}

/// 命令を先頭から順に適用する。各ステップの出力が次のステップの入力になる
pub fn apply_changes<M: HttpMessage>(
    message: &M,
    changes: &[ChangeInstruction],
) -> Result<M, Error> {
    changes
        .iter()
        .enumerate()
        .try_fold(message.clone(), |current, (index, change)| {
            debug!("Applying cookie change {} for {:?}", index, change.name());
            change.apply(&current)
        })
}

/// マーカー付きの変更リストを適用する
///
/// リスト全体の形を先に検証するため、形の不正があればヘッダーは1件も追加されない。
pub fn change_client_cookies<M: HttpMessage>(message: &M, entries: &[Value]) -> Result<M, Error> {
    let changes = parse_change_list(entries)?;
    apply_changes(message, &changes)
}

/// `[name, value, 属性?]` の並びをすべて設定する
pub fn with_cookie_list_set<M: HttpMessage>(message: &M, entries: &[Value]) -> Result<M, Error> {
    let changes = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let items = list_items(LIST_SET, index, entry)?;
            match items {
                [name, value] => Ok(ChangeInstruction::set(
                    entry_name(name)?,
                    value.clone(),
                    CookieAttributes::new(),
                )),
                [name, value, Value::Map(attributes)] => Ok(ChangeInstruction::set(
                    entry_name(name)?,
                    value.clone(),
                    attributes.clone(),
                )),
                [_, _, other] => Err(arity(
                    LIST_SET,
                    index,
                    format!("attributes must be a map, got {}", other.type_name()),
                )),
                _ => Err(arity(
                    LIST_SET,
                    index,
                    format!("expected 2 or 3 elements, got {}", items.len()),
                )),
            }
        })
        .collect::<Result<Vec<_>, Error>>()?;

    apply_changes(message, &changes)
}

/// `[name, 属性?]` の並びをすべて削除する
pub fn with_cookie_list_unset<M: HttpMessage>(message: &M, entries: &[Value]) -> Result<M, Error> {
    let changes = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let items = list_items(LIST_UNSET, index, entry)?;
            match items {
                [name] => Ok(ChangeInstruction::unset(
                    entry_name(name)?,
                    CookieAttributes::new(),
                )),
                [name, Value::Map(attributes)] => Ok(ChangeInstruction::unset(
                    entry_name(name)?,
                    attributes.clone(),
                )),
                [_, other] => Err(arity(
                    LIST_UNSET,
                    index,
                    format!("attributes must be a map, got {}", other.type_name()),
                )),
                _ => Err(arity(
                    LIST_UNSET,
                    index,
                    format!("expected 1 or 2 elements, got {}", items.len()),
                )),
            }
        })
        .collect::<Result<Vec<_>, Error>>()?;

    apply_changes(message, &changes)
}

fn list_items<'a>(
    operation: &'static str,
    index: usize,
    entry: &'a Value,
) -> Result<&'a [Value], Error> {
    entry.as_list().ok_or_else(|| {
        arity(
            operation,
            index,
            format!("expected a list, got {}", entry.type_name()),
        )
    })
}

fn entry_name(name: &Value) -> Result<String, Error> {
    name.as_text()
        .map(|text| text.into_owned())
        .ok_or_else(|| Error::invalid_field(CookieField::Name, name))
}

fn arity(operation: &'static str, index: usize, reason: String) -> Error {
    Error::ArityError {
        operation,
        index,
        reason,
    }
}
