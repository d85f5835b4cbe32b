//! 序列解码路径。
//!
//! 每个输入取值按元素类型独立走单值解码；失败元素交给调用方记录并从结果中剔除，
//! 成功元素按输入顺序保留。零个取值得到空序列，不视为错误。

use crate::error::FieldErrorKind;
use crate::kind::{ScalarKind, ScalarValue};
use crate::scalar;

pub(crate) fn decode_sequence(
    element: ScalarKind,
    values: &[String],
    trim: bool,
    mut on_error: impl FnMut(usize, FieldErrorKind),
) -> Vec<ScalarValue> {
    let mut items = Vec::with_capacity(values.len());
    for (index, raw) in values.iter().enumerate() {
        match scalar::coerce(element, core::slice::from_ref(raw), trim) {
            Ok(item) => items.push(item),
            Err(kind) => on_error(index, kind),
        }
    }
    items
}
