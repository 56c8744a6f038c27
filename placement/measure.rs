use std::fmt::{Debug, Display};

use crate::placement::footprint::Footprint;

/// 布局过程中的错误
///
/// 只影响出错的那个元素：该元素在本轮中视为未显示，其他元素照常处理
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    #[error("failed to measure element {element}: {reason}")]
    Measurement { element: String, reason: String },
    #[error("element {0} has no anchor in the current viewport")]
    MissingAnchor(String),
}

impl PlacementError {
    pub fn measurement<E: Debug, R: Display>(element: &E, reason: R) -> Self {
        PlacementError::Measurement {
            element: format!("{:?}", element),
            reason: reason.to_string(),
        }
    }

    pub fn missing_anchor<E: Debug>(element: &E) -> Self {
        PlacementError::MissingAnchor(format!("{:?}", element))
    }
}

/// 几何测量协作者
///
/// 实现必须是确定的：同一元素每次返回相同的足迹，否则足迹缓存会给出错误的结果。
/// 锚点随视口状态变化，每次评估都会重新查询。
pub trait Measure<E> {
    /// 元素在局部坐标系中的足迹（每个元素只查询一次，之后使用缓存）
    fn footprint(&self, element: &E) -> Result<Footprint, PlacementError>;

    /// 元素锚点在当前视口坐标系中的位置
    fn anchor(&self, element: &E) -> Result<[f64; 2], PlacementError>;
}

impl<E, M: Measure<E> + ?Sized> Measure<E> for &M {
    fn footprint(&self, element: &E) -> Result<Footprint, PlacementError> {
        (**self).footprint(element)
    }

    fn anchor(&self, element: &E) -> Result<[f64; 2], PlacementError> {
        (**self).anchor(element)
    }
}
