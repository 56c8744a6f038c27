use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::DeclutterConfig;
use crate::placement::footprint::Footprint;
use crate::placement::measure::{Measure, PlacementError};
use crate::rtree::{RTree, Rectangle, DEFAULT_MAX_ENTRIES};

/// 索引中的一个已放置矩形，记录它属于哪个元素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placed<E> {
    pub owner: E,
    pub bbox: Rectangle,
}

fn placed_bbox<E>(placed: &Placed<E>) -> Rectangle {
    placed.bbox
}

/// 布局参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOptions {
    /// 足迹矩形四周的扩展距离
    pub margin: f64,
    /// 静态元素是否占据索引空间
    pub static_obstructs: bool,
    /// 索引节点的最大条目数
    pub max_entries: usize,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        PlacementOptions {
            margin: 0.0,
            static_obstructs: false,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl From<&DeclutterConfig> for PlacementOptions {
    fn from(config: &DeclutterConfig) -> Self {
        PlacementOptions {
            margin: config.placement.margin,
            static_obstructs: config.placement.static_obstructs,
            max_entries: config.index.max_entries,
        }
    }
}

/// 一次视口变化的布局结果
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementReport<E> {
    /// 被接受（显示）的候选元素，按评估顺序
    pub accepted: Vec<E>,
    /// 因碰撞被拒绝的候选元素
    pub rejected: Vec<E>,
    /// 测量失败的元素，本轮视为未显示
    pub failures: Vec<(E, PlacementError)>,
}

impl<E> PlacementReport<E> {
    fn new() -> Self {
        PlacementReport {
            accepted: Vec::new(),
            rejected: Vec::new(),
            failures: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct Candidate<E> {
    element: E,
    priority: i32,
}

/// 碰撞避让图层
///
/// 维护静态元素（总是显示）和按优先级排列的候选元素。视口变化时清空索引，
/// 按优先级从高到低贪心地逐个尝试候选元素：足迹的所有矩形都不与索引中已有矩形相交时接受它，
/// 并把它的矩形加入索引；否则隐藏。先接受的元素可以挡住后面的元素，反之不会。
pub struct CollisionLayer<E, M> {
    measure: M,
    options: PlacementOptions,
    index: RTree<Placed<E>>,
    statics: Vec<E>,
    /// 按优先级从高到低排列，优先级相同时保持加入顺序
    candidates: Vec<Candidate<E>>,
    /// 局部坐标系中的足迹缓存
    footprints: HashMap<E, Footprint>,
    /// 当前显示的元素，按放置顺序
    visible: Vec<E>,
    /// 每个元素放入索引的视口坐标矩形
    placed: HashMap<E, Vec<Rectangle>>,
}

impl<E, M> CollisionLayer<E, M>
where
    E: Clone + Eq + Hash + Debug,
    M: Measure<E>,
{
    pub fn new(measure: M, options: PlacementOptions) -> Self {
        CollisionLayer {
            measure,
            options,
            index: RTree::with_accessor(options.max_entries, placed_bbox::<E>),
            statics: Vec::new(),
            candidates: Vec::new(),
            footprints: HashMap::new(),
            visible: Vec::new(),
            placed: HashMap::new(),
        }
    }

    pub fn options(&self) -> &PlacementOptions {
        &self.options
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }

    /// 可变访问测量协作者（例如更新其视口状态），之后应调用 `on_viewport_change`
    pub fn measure_mut(&mut self) -> &mut M {
        &mut self.measure
    }

    /// 已放置矩形的空间索引
    pub fn index(&self) -> &RTree<Placed<E>> {
        &self.index
    }

    /// 添加静态元素，它总是显示
    ///
    /// 静态元素占据空间时，其矩形不经碰撞检测直接放入索引
    pub fn add_static(&mut self, element: E) -> Result<(), PlacementError> {
        self.remove_element(&element);
        self.statics.push(element.clone());
        self.visible.push(element.clone());

        if self.options.static_obstructs {
            let boxes = self.positioned_boxes(&element)?;
            self.occupy(&element, boxes);
        }
        Ok(())
    }

    /// 移除静态元素
    pub fn remove_static(&mut self, element: &E) -> bool {
        match self.statics.iter().position(|e| e == element) {
            Some(position) => {
                self.statics.remove(position);
                self.release(element);
                true
            }
            None => false,
        }
    }

    /// 添加候选元素，并只针对当前索引尝试放置它
    ///
    /// 不会重新评估其他候选元素。返回是否显示；测量失败时元素仍保留为候选，
    /// 在下一次视口变化时重新尝试。已存在的同一元素会先被移除。
    pub fn add_candidate(&mut self, element: E, priority: i32) -> Result<bool, PlacementError> {
        self.remove_element(&element);

        let position = self
            .candidates
            .partition_point(|candidate| candidate.priority >= priority);
        self.candidates.insert(
            position,
            Candidate {
                element: element.clone(),
                priority,
            },
        );

        self.try_place(&element)
    }

    /// 移除候选元素：从索引中删除它的矩形，不重新评估其他候选元素
    pub fn remove_candidate(&mut self, element: &E) -> bool {
        match self.candidates.iter().position(|c| &c.element == element) {
            Some(position) => {
                self.candidates.remove(position);
                self.release(element);
                true
            }
            None => false,
        }
    }

    /// 移除元素（静态或候选）
    pub fn remove_element(&mut self, element: &E) -> bool {
        self.remove_candidate(element) || self.remove_static(element)
    }

    /// 清空所有元素、索引和足迹缓存
    pub fn clear(&mut self) {
        self.index.clear();
        self.statics.clear();
        self.candidates.clear();
        self.footprints.clear();
        self.visible.clear();
        self.placed.clear();
    }

    /// 视口变化：清空索引和可见集合，从头重新布局
    pub fn on_viewport_change(&mut self) -> PlacementReport<E> {
        self.index.clear();
        self.visible.clear();
        self.placed.clear();

        let mut report = PlacementReport::new();

        let statics = self.statics.clone();
        for element in statics {
            self.visible.push(element.clone());
            if !self.options.static_obstructs {
                continue;
            }
            match self.positioned_boxes(&element) {
                Ok(boxes) => self.occupy(&element, boxes),
                Err(err) => {
                    warn!(element = ?element, error = %err, "static element not measured");
                    report.failures.push((element, err));
                }
            }
        }

        let order: Vec<E> = self
            .candidates
            .iter()
            .map(|candidate| candidate.element.clone())
            .collect();

        for element in order {
            match self.try_place(&element) {
                Ok(true) => report.accepted.push(element),
                Ok(false) => report.rejected.push(element),
                Err(err) => {
                    warn!(element = ?element, error = %err, "candidate rejected: measurement failed");
                    report.failures.push((element, err));
                }
            }
        }

        info!(
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            failed = report.failures.len(),
            "viewport placement finished"
        );
        report
    }

    /// 元素当前是否显示
    pub fn is_visible(&self, element: &E) -> bool {
        self.visible.contains(element)
    }

    /// 当前显示的元素：静态元素在前，候选元素按放置顺序
    pub fn visible(&self) -> impl Iterator<Item = &E> {
        self.visible.iter()
    }

    /// 元素放入索引的视口坐标矩形（已包含扩展距离）
    pub fn visible_boxes(&self, element: &E) -> Option<&[Rectangle]> {
        self.placed.get(element).map(|boxes| boxes.as_slice())
    }

    /// 候选元素，按评估顺序
    pub fn candidates(&self) -> impl Iterator<Item = &E> {
        self.candidates.iter().map(|candidate| &candidate.element)
    }

    pub fn statics(&self) -> &[E] {
        &self.statics
    }

    /// 针对当前索引尝试放置一个候选元素
    fn try_place(&mut self, element: &E) -> Result<bool, PlacementError> {
        let boxes = self.positioned_boxes(element)?;

        if boxes.iter().any(|rect| self.index.collides(rect)) {
            debug!(element = ?element, "candidate collides");
            return Ok(false);
        }

        self.visible.push(element.clone());
        self.occupy(element, boxes);
        Ok(true)
    }

    /// 把元素的矩形批量加入索引
    fn occupy(&mut self, element: &E, boxes: Vec<Rectangle>) {
        let entries = boxes
            .iter()
            .map(|rect| Placed {
                owner: element.clone(),
                bbox: *rect,
            })
            .collect();
        self.index.bulk_load(entries);
        self.placed.insert(element.clone(), boxes);
    }

    /// 从索引、可见集合和足迹缓存中移除元素
    fn release(&mut self, element: &E) {
        if let Some(boxes) = self.placed.remove(element) {
            for rect in boxes {
                let entry = Placed {
                    owner: element.clone(),
                    bbox: rect,
                };
                if !self.index.remove(&entry) {
                    warn!(element = ?element, "placed box missing from index");
                }
            }
        }
        self.visible.retain(|e| e != element);
        self.footprints.remove(element);
    }

    /// 取得（必要时测量并缓存）足迹，按当前锚点放到视口坐标系
    fn positioned_boxes(&mut self, element: &E) -> Result<Vec<Rectangle>, PlacementError> {
        let anchor = self.measure.anchor(element)?;
        let footprint = match self.footprints.entry(element.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(self.measure.footprint(element)?),
        };
        Ok(footprint.position(anchor, self.options.margin))
    }
}
