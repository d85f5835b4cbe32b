//! 字段写入契约。
//!
//! # 契约说明（What）
//! - [`FieldTarget`] 由派生宏生成的绑定表以 `&mut dyn FieldTarget` 形式持有；
//! - 解码器先通过 [`FieldTarget::kind`] 选择解码路径，再把结果交给 [`FieldTarget::store`]；
//! - `store` 仅在取值形态与 `kind` 不符时拒绝写入，拒绝时字段保持原值。
//!
//! # 扩展方式（How）
//! - 业务新类型（如 `struct UserId(u32)`）可手写 `FieldTarget`，复用内置标量的解码与边界检查；
//! - 嵌套序列 `Vec<Vec<_>>` 不实现本 trait，在编译期即被拒绝。

use crate::kind::{Decoded, FieldKind, ScalarKind, ScalarValue};

/// 可被解码器写入的字段。
pub trait FieldTarget {
    /// 字段形态，决定走标量路径还是序列路径。
    fn kind(&self) -> FieldKind;

    /// 写入解码结果；形态不符时原样退回取值。
    fn store(&mut self, value: Decoded) -> Result<(), Decoded>;
}

/// 可作为单值字段或序列元素的标量类型。
pub trait Scalar: Sized {
    const KIND: ScalarKind;

    /// 将已通过边界检查的取值收窄为具体类型。
    fn from_value(value: ScalarValue) -> Option<Self>;
}

macro_rules! signed_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn from_value(value: ScalarValue) -> Option<Self> {
                match value {
                    ScalarValue::Signed(raw) => <$ty>::try_from(raw).ok(),
                    _ => None,
                }
            }
        }
    )*};
}

macro_rules! unsigned_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn from_value(value: ScalarValue) -> Option<Self> {
                match value {
                    ScalarValue::Unsigned(raw) => <$ty>::try_from(raw).ok(),
                    _ => None,
                }
            }
        }
    )*};
}

signed_scalar!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);
unsigned_scalar!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize);

impl Scalar for f32 {
    const KIND: ScalarKind = ScalarKind::F32;

    fn from_value(value: ScalarValue) -> Option<Self> {
        match value {
            // 上界已在解析阶段校验，这里的收窄只损失精度。
            ScalarValue::Float(raw) => Some(raw as f32),
            _ => None,
        }
    }
}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::F64;

    fn from_value(value: ScalarValue) -> Option<Self> {
        match value {
            ScalarValue::Float(raw) => Some(raw),
            _ => None,
        }
    }
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn from_value(value: ScalarValue) -> Option<Self> {
        match value {
            ScalarValue::Text(raw) => Some(raw),
            _ => None,
        }
    }
}

macro_rules! scalar_field {
    ($($ty:ty),* $(,)?) => {$(
        impl FieldTarget for $ty {
            fn kind(&self) -> FieldKind {
                FieldKind::Scalar(<$ty as Scalar>::KIND)
            }

            fn store(&mut self, value: Decoded) -> Result<(), Decoded> {
                match value {
                    Decoded::Scalar(scalar) => match <$ty as Scalar>::from_value(scalar.clone()) {
                        Some(parsed) => {
                            *self = parsed;
                            Ok(())
                        }
                        None => Err(Decoded::Scalar(scalar)),
                    },
                    other => Err(other),
                }
            }
        }
    )*};
}

scalar_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String);

impl<T: Scalar> FieldTarget for Vec<T> {
    fn kind(&self) -> FieldKind {
        FieldKind::Sequence(T::KIND)
    }

    fn store(&mut self, value: Decoded) -> Result<(), Decoded> {
        let Decoded::Sequence(items) = value else {
            return Err(value);
        };
        // 先完整转换再替换，任一元素不符时字段保持原值。
        let mut converted = Vec::with_capacity(items.len());
        for item in &items {
            match T::from_value(item.clone()) {
                Some(parsed) => converted.push(parsed),
                None => return Err(Decoded::Sequence(items)),
            }
        }
        *self = converted;
        Ok(())
    }
}

macro_rules! unsupported_field {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl FieldTarget for $ty {
            fn kind(&self) -> FieldKind {
                FieldKind::Unsupported($name)
            }

            fn store(&mut self, value: Decoded) -> Result<(), Decoded> {
                Err(value)
            }
        }
    )*};
}

unsupported_field!(bool => "bool", char => "char");
