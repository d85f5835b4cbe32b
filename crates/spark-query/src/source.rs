//! 输入映射抽象。
//!
//! 解码器只需要“按键取有序取值列表”这一能力。查询串或表单的解析由调用方完成，
//! 结果以 [`QuerySource`] 的形式交给解码器；不存在的键等价于零个取值。

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// 键到有序取值列表的只读映射。
pub trait QuerySource {
    /// 返回 `key` 对应的全部取值，顺序即输入顺序。
    fn values_of(&self, key: &str) -> &[String];
}

impl<S: BuildHasher> QuerySource for HashMap<String, Vec<String>, S> {
    fn values_of(&self, key: &str) -> &[String] {
        self.get(key).map(Vec::as_slice).unwrap_or_default()
    }
}

impl QuerySource for BTreeMap<String, Vec<String>> {
    fn values_of(&self, key: &str) -> &[String] {
        self.get(key).map(Vec::as_slice).unwrap_or_default()
    }
}

impl<T: QuerySource + ?Sized> QuerySource for &T {
    fn values_of(&self, key: &str) -> &[String] {
        (**self).values_of(key)
    }
}

/// 自带的有序输入映射。
///
/// 同一键多次 [`append`](QueryMap::append) 时按调用顺序保留全部取值，
/// `FromIterator` / `Extend` 同样采用追加语义。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为 `key` 追加一个取值。
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// 以 `values` 替换 `key` 的全部取值，返回旧值。
    pub fn insert<I, V>(&mut self, key: impl Into<String>, values: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.entries
            .insert(key.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// 不同键的数量。
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl QuerySource for QueryMap {
    fn values_of(&self, key: &str) -> &[String] {
        self.get(key).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for QueryMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.append(key, value);
        }
    }
}

impl From<BTreeMap<String, Vec<String>>> for QueryMap {
    fn from(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self { entries }
    }
}

impl<S: BuildHasher> From<HashMap<String, Vec<String>, S>> for QueryMap {
    fn from(entries: HashMap<String, Vec<String>, S>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}
