//! 解码目标的结构描述。
//!
//! # 设计意图（Why）
//! - `#[derive(QueryRecord)]` 为每个记录类型生成一张字段绑定表（[`RecordFields`]），
//!   解码器只面向该表工作，不在运行时遍历类型信息；
//! - 非记录类型同样实现 [`QueryTarget`]，以 [`Shape::Other`] 报告自身形态，
//!   使“目标不是记录”成为普通的类型化错误。

use core::fmt;

use crate::field::{FieldTarget, Scalar};

/// 解码目标。
///
/// 记录类型通常通过派生宏实现；手写实现时需保证 [`RecordFields`] 中的字段按声明顺序排列。
pub trait QueryTarget {
    /// 暴露目标的外层形态。对记录类型而言，返回的绑定表持有各字段的可变借用。
    fn shape(&mut self) -> Shape<'_>;
}

/// 目标的外层形态。
pub enum Shape<'a> {
    Record(RecordFields<'a>),
    /// 非记录目标，携带类型名。
    Other(&'static str),
}

/// 记录类型的字段绑定表。
pub struct RecordFields<'a> {
    name: &'static str,
    slots: Vec<FieldSlot<'a>>,
}

impl<'a> RecordFields<'a> {
    pub fn new(name: &'static str, slots: Vec<FieldSlot<'a>>) -> Self {
        Self { name, slots }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn into_slots(self) -> Vec<FieldSlot<'a>> {
        self.slots
    }
}

impl fmt::Debug for RecordFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFields")
            .field("name", &self.name)
            .field("slots", &self.slots)
            .finish()
    }
}

pub(crate) type SlotParts<'a> = (
    &'static str,
    Option<&'static str>,
    Option<&'a mut dyn FieldTarget>,
);

/// 绑定表中的单个字段。
///
/// - `tagged`：字段声明了绑定注解；
/// - `untagged`：字段未声明注解，是否参与解码由 `UnannotatedPolicy` 决定；
/// - `skipped`：字段不可设置，解析器直接跳过。
pub struct FieldSlot<'a> {
    name: &'static str,
    annotation: Option<&'static str>,
    target: Option<&'a mut dyn FieldTarget>,
}

impl<'a> FieldSlot<'a> {
    pub fn tagged(
        name: &'static str,
        annotation: &'static str,
        target: &'a mut dyn FieldTarget,
    ) -> Self {
        Self {
            name,
            annotation: Some(annotation),
            target: Some(target),
        }
    }

    pub fn untagged(name: &'static str, target: &'a mut dyn FieldTarget) -> Self {
        Self {
            name,
            annotation: None,
            target: Some(target),
        }
    }

    pub fn skipped(name: &'static str) -> Self {
        Self {
            name,
            annotation: None,
            target: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn annotation(&self) -> Option<&'static str> {
        self.annotation
    }

    pub fn is_settable(&self) -> bool {
        self.target.is_some()
    }

    pub(crate) fn into_parts(self) -> SlotParts<'a> {
        (self.name, self.annotation, self.target)
    }
}

impl fmt::Debug for FieldSlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSlot")
            .field("name", &self.name)
            .field("annotation", &self.annotation)
            .field("kind", &self.target.as_ref().map(|target| target.kind()))
            .finish()
    }
}

macro_rules! non_record_target {
    ($($ty:ty),* $(,)?) => {$(
        impl QueryTarget for $ty {
            fn shape(&mut self) -> Shape<'_> {
                Shape::Other(<$ty as FieldTarget>::kind(self).name())
            }
        }
    )*};
}

non_record_target!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, bool, char
);

impl<T: Scalar> QueryTarget for Vec<T> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Other(T::KIND.sequence_name())
    }
}
