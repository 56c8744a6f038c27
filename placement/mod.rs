//! 屏幕元素避让布局
//!
//! 按优先级逐个尝试候选元素：足迹与已接受元素不重叠时显示并占据空间，否则隐藏。
//! 视口变化（例如缩放级别改变）时从头重新计算。

pub mod footprint;
pub mod layer;
pub mod measure;

pub use footprint::{Footprint, NestedBox};
pub use layer::{CollisionLayer, Placed, PlacementOptions, PlacementReport};
pub use measure::{Measure, PlacementError};
