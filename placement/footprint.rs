use serde::{Deserialize, Serialize};

use crate::rtree::Rectangle;

/// 元素的足迹：元素在自身局部坐标系中占据的一组矩形
///
/// 局部坐标系的原点是元素的锚点，放置时再平移到视口坐标系
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    boxes: Vec<Rectangle>,
}

/// 嵌套的相对矩形
///
/// `rect` 相对于最近的定位父元素；`positioned` 为 true 时它自身成为子元素的定位父元素，
/// 否则子元素继续相对于它的定位祖先
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedBox {
    pub rect: Rectangle,
    #[serde(default)]
    pub positioned: bool,
    #[serde(default)]
    pub children: Vec<NestedBox>,
}

impl Footprint {
    pub fn new(boxes: Vec<Rectangle>) -> Self {
        Footprint { boxes }
    }

    pub fn single(rect: Rectangle) -> Self {
        Footprint { boxes: vec![rect] }
    }

    /// 由嵌套的相对矩形组合足迹
    ///
    /// 根矩形位于局部坐标系中，后代矩形逐层偏移到局部坐标系；根矩形放在最后
    pub fn nested(root: &NestedBox) -> Self {
        let mut boxes = Vec::new();
        collect_relative(&root.children, &root.rect, &mut boxes);
        boxes.push(root.rect);
        Footprint { boxes }
    }

    pub fn boxes(&self) -> &[Rectangle] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// 所有矩形的外包矩形，空足迹返回 `None`
    pub fn bounds(&self) -> Option<Rectangle> {
        (!self.boxes.is_empty()).then(|| self.boxes.iter().copied().collect())
    }

    /// 把足迹放到视口中：每个矩形按锚点平移，再向四周扩展 `margin`
    pub fn position(&self, anchor: [f64; 2], margin: f64) -> Vec<Rectangle> {
        self.boxes
            .iter()
            .map(|rect| rect.translate(anchor[0], anchor[1]).inflate(margin))
            .collect()
    }
}

fn collect_relative(children: &[NestedBox], parent: &Rectangle, boxes: &mut Vec<Rectangle>) {
    for child in children {
        let rect = child.rect.translate(parent.min[0], parent.min[1]);
        boxes.push(rect);

        if !child.children.is_empty() {
            let next_parent = if child.positioned { rect } else { *parent };
            collect_relative(&child.children, &next_parent, boxes);
        }
    }
}

impl From<Vec<Rectangle>> for Footprint {
    fn from(boxes: Vec<Rectangle>) -> Self {
        Footprint::new(boxes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_box(rect: Rectangle) -> NestedBox {
        NestedBox {
            rect,
            positioned: false,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_position_offsets_and_inflates() {
        let footprint = Footprint::new(vec![
            Rectangle::new(-5.0, -5.0, 5.0, 5.0),
            Rectangle::new(6.0, -2.0, 30.0, 2.0),
        ]);

        let placed = footprint.position([100.0, 50.0], 2.0);
        assert_eq!(
            placed,
            vec![
                Rectangle::new(93.0, 43.0, 107.0, 57.0),
                Rectangle::new(104.0, 46.0, 132.0, 54.0),
            ]
        );
        // 原足迹保持在局部坐标系
        assert_eq!(footprint.boxes()[0], Rectangle::new(-5.0, -5.0, 5.0, 5.0));
    }

    #[test]
    fn test_bounds() {
        assert!(Footprint::default().bounds().is_none());

        let footprint = Footprint::from(vec![
            Rectangle::new(0.0, 0.0, 1.0, 1.0),
            Rectangle::new(-3.0, 2.0, -1.0, 4.0),
        ]);
        assert_eq!(footprint.bounds(), Some(Rectangle::new(-3.0, 0.0, 1.0, 4.0)));
        assert_eq!(footprint.len(), 2);
    }

    #[test]
    fn test_nested_boxes() {
        // 图标框位于 (-10,-10)，标签相对图标偏移 (20,0)，
        // 定位的标签内部还有一个相对它偏移 (2,2) 的徽标
        let root = NestedBox {
            rect: Rectangle::new(-10.0, -10.0, 10.0, 10.0),
            positioned: false,
            children: vec![NestedBox {
                rect: Rectangle::new(20.0, 0.0, 60.0, 12.0),
                positioned: true,
                children: vec![leaf_box(Rectangle::new(2.0, 2.0, 6.0, 6.0))],
            }],
        };

        let footprint = Footprint::nested(&root);
        assert_eq!(
            footprint.boxes(),
            &[
                Rectangle::new(10.0, -10.0, 50.0, 2.0),
                Rectangle::new(12.0, -8.0, 16.0, -4.0),
                Rectangle::new(-10.0, -10.0, 10.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_nested_unpositioned_parent() {
        // 未定位的中间元素不改变子元素的参照
        let root = NestedBox {
            rect: Rectangle::new(0.0, 0.0, 10.0, 10.0),
            positioned: false,
            children: vec![NestedBox {
                rect: Rectangle::new(5.0, 5.0, 8.0, 8.0),
                positioned: false,
                children: vec![leaf_box(Rectangle::new(1.0, 1.0, 2.0, 2.0))],
            }],
        };

        let footprint = Footprint::nested(&root);
        assert_eq!(footprint.boxes()[1], Rectangle::new(1.0, 1.0, 2.0, 2.0));
    }

    #[test]
    fn test_nested_from_json() {
        let json = r#"{
            "rect": {"min": [0.0, 0.0], "max": [4.0, 4.0]},
            "children": [{"rect": {"min": [1.0, 1.0], "max": [2.0, 2.0]}}]
        }"#;
        let root: NestedBox = serde_json::from_str(json).unwrap();
        assert!(!root.positioned);
        assert_eq!(Footprint::nested(&root).len(), 2);
    }
}
