//! 标量解码路径：基数检查 → 解析 → 边界检查。
//!
//! # 执行逻辑（How）
//! 1. 取值数量必须恰好为 1：多于 1 个报告 `MultipleValues`，为 0 报告 `Missing`；
//! 2. 整数按十进制解析到 `i128` 中间表示，浮点按声明精度（`f32`/`f64`）解析（不受区域设置影响），字符串原样保留；
//!    解析失败报告 `Invalid`，不再做边界检查；
//! 3. 有符号整数超出声明位宽报告 `Overflow`；
//! 4. 无符号整数先检查负数（`Underflow`），再检查上界（`Overflow`）；
//! 5. 浮点取值超出声明精度的有限范围（解析结果为无穷且并非 inf 字面量）报告 `Overflow`。
//!
//! 越界取值一律不写入，不做截断或回绕。

use core::num::IntErrorKind;

use crate::error::{FieldErrorKind, ParseFailure};
use crate::kind::{ScalarClass, ScalarKind, ScalarValue};

/// 对单值字段执行完整的标量解码。
pub(crate) fn coerce(
    kind: ScalarKind,
    values: &[String],
    trim: bool,
) -> Result<ScalarValue, FieldErrorKind> {
    match values {
        [raw] => coerce_one(kind, raw, trim),
        [] => Err(FieldErrorKind::Missing),
        _ => Err(FieldErrorKind::MultipleValues {
            count: values.len(),
        }),
    }
}

/// 解析并校验单个取值。
fn coerce_one(
    kind: ScalarKind,
    raw: &str,
    trim: bool,
) -> Result<ScalarValue, FieldErrorKind> {
    let text = if trim {
        raw.trim_matches(|c: char| c.is_ascii_whitespace())
    } else {
        raw
    };

    match kind.class() {
        ScalarClass::Signed => coerce_signed(kind, text),
        ScalarClass::Unsigned => coerce_unsigned(kind, text),
        ScalarClass::Float => coerce_float(kind, text),
        ScalarClass::Text => Ok(ScalarValue::Text(raw.to_owned())),
    }
}

fn coerce_signed(kind: ScalarKind, text: &str) -> Result<ScalarValue, FieldErrorKind> {
    let parsed = text.parse::<i128>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => overflow(kind, text),
        _ => invalid(kind, text, err.into()),
    })?;

    // 落在声明位宽内的取值必然可由 `i64` 承载。
    let (min, max) = kind.signed_bounds();
    match i64::try_from(parsed) {
        Ok(value) if (min..=max).contains(&value) => Ok(ScalarValue::Signed(value)),
        _ => Err(overflow(kind, text)),
    }
}

fn coerce_unsigned(kind: ScalarKind, text: &str) -> Result<ScalarValue, FieldErrorKind> {
    let parsed = text.parse::<i128>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow => overflow(kind, text),
        IntErrorKind::NegOverflow => underflow(kind, text),
        _ => invalid(kind, text, err.into()),
    })?;

    if parsed < 0 {
        return Err(underflow(kind, text));
    }

    match u64::try_from(parsed) {
        Ok(value) if value <= kind.unsigned_max() => Ok(ScalarValue::Unsigned(value)),
        _ => Err(overflow(kind, text)),
    }
}

fn coerce_float(kind: ScalarKind, text: &str) -> Result<ScalarValue, FieldErrorKind> {
    // 按声明精度解析，`f32` 字段不经 `f64` 中转。
    let parsed = match kind {
        ScalarKind::F32 => text.parse::<f32>().map(f64::from),
        _ => text.parse::<f64>(),
    }
    .map_err(|err| invalid(kind, text, err.into()))?;

    // 超出有限范围的字面量解析为无穷，显式写出的 inf/infinity 才是合法取值。
    if parsed.is_infinite() && !is_infinity_literal(text) {
        return Err(overflow(kind, text));
    }

    Ok(ScalarValue::Float(parsed))
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn invalid(kind: ScalarKind, text: &str, source: ParseFailure) -> FieldErrorKind {
    FieldErrorKind::Invalid {
        kind,
        value: text.to_owned(),
        source,
    }
}

fn overflow(kind: ScalarKind, text: &str) -> FieldErrorKind {
    FieldErrorKind::Overflow {
        kind,
        value: text.to_owned(),
    }
}

fn underflow(kind: ScalarKind, text: &str) -> FieldErrorKind {
    FieldErrorKind::Underflow {
        kind,
        value: text.to_owned(),
    }
}
