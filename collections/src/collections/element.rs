use std::fmt::Debug;

/// A marker for values that can travel through the queues in this crate.<br/>
/// このクレートのキューを通過できる値のマーカー。
pub trait Element: Debug + Send + Sync + 'static {}

impl<T: Debug + Send + Sync + 'static> Element for T {}
