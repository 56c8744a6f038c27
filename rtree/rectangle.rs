use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 矩形边界框 - 用于表示R-tree中的最小边界矩形(MBR)
///
/// 空矩形（`Rectangle::empty()`）的 min 为 +∞、max 为 -∞，是 `union` 的单位元。
#[derive(Debug, Display, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[display(fmt = "({:?} -> {:?})", min, max)]
pub struct Rectangle {
    pub min: [f64; 2], // [x_min, y_min]
    pub max: [f64; 2], // [x_max, y_max]
}

impl Rectangle {
    /// 创建新的矩形
    ///
    /// 调用者需保证 `x_min <= x_max`、`y_min <= y_max` 且不含 NaN，
    /// 违反时索引的查询结果未定义（仅在 debug 构建中断言）。
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        debug_assert!(x_min <= x_max && y_min <= y_max, "Invalid rectangle bounds");
        Rectangle {
            min: [x_min, y_min],
            max: [x_max, y_max],
        }
    }

    /// 空矩形（并集运算的单位元）
    pub const fn empty() -> Self {
        Rectangle {
            min: [f64::INFINITY, f64::INFINITY],
            max: [f64::NEG_INFINITY, f64::NEG_INFINITY],
        }
    }

    /// 创建一个点矩形
    pub fn from_point(x: f64, y: f64) -> Self {
        Rectangle {
            min: [x, y],
            max: [x, y],
        }
    }

    /// 是否为空矩形
    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    /// 计算矩形面积
    pub fn area(&self) -> f64 {
        (self.max[0] - self.min[0]) * (self.max[1] - self.min[1])
    }

    /// 半周长：(宽 + 高)
    pub fn margin(&self) -> f64 {
        (self.max[0] - self.min[0]) + (self.max[1] - self.min[1])
    }

    /// 计算两个矩形的并集MBR
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    /// 原地扩展为包含另一个矩形
    pub fn extend(&mut self, other: &Rectangle) {
        *self = self.union(other);
    }

    /// 并集的面积
    pub fn enlarged_area(&self, other: &Rectangle) -> f64 {
        (self.max[0].max(other.max[0]) - self.min[0].min(other.min[0]))
            * (self.max[1].max(other.max[1]) - self.min[1].min(other.min[1]))
    }

    /// 计算扩大到包含另一个矩形所需的面积增量
    pub fn enlargement(&self, other: &Rectangle) -> f64 {
        self.enlarged_area(other) - self.area()
    }

    /// 计算两个矩形的交集面积，不相交时为 0
    pub fn intersection_area(&self, other: &Rectangle) -> f64 {
        let min_x = self.min[0].max(other.min[0]);
        let min_y = self.min[1].max(other.min[1]);
        let max_x = self.max[0].min(other.max[0]);
        let max_y = self.max[1].min(other.max[1]);

        (max_x - min_x).max(0.0) * (max_y - min_y).max(0.0)
    }

    /// 判断两个矩形是否相交（闭区间，边相接也算相交）
    pub fn intersects(&self, other: &Rectangle) -> bool {
        other.min[0] <= self.max[0]
            && other.min[1] <= self.max[1]
            && other.max[0] >= self.min[0]
            && other.max[1] >= self.min[1]
    }

    /// 判断当前矩形是否完整包含另一个矩形
    pub fn contains(&self, other: &Rectangle) -> bool {
        self.min[0] <= other.min[0]
            && self.min[1] <= other.min[1]
            && other.max[0] <= self.max[0]
            && other.max[1] <= self.max[1]
    }

    /// 判断当前矩形是否包含一个点
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.min[0] <= x && x <= self.max[0] && self.min[1] <= y && y <= self.max[1]
    }

    /// 平移
    pub fn translate(&self, dx: f64, dy: f64) -> Rectangle {
        Rectangle {
            min: [self.min[0] + dx, self.min[1] + dy],
            max: [self.max[0] + dx, self.max[1] + dy],
        }
    }

    /// 四边各向外扩展 `amount`
    pub fn inflate(&self, amount: f64) -> Rectangle {
        Rectangle {
            min: [self.min[0] - amount, self.min[1] - amount],
            max: [self.max[0] + amount, self.max[1] + amount],
        }
    }

    /// 计算矩形中心点
    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        ]
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Rectangle> for Rectangle {
    fn from_iter<I: IntoIterator<Item = Rectangle>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Rectangle::empty(), |acc, rect| acc.union(&rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(rect.min, [0.0, 0.0]);
        assert_eq!(rect.max, [10.0, 10.0]);
    }

    #[test]
    fn test_rectangle_area_and_margin() {
        let rect = Rectangle::new(0.0, 0.0, 10.0, 5.0);
        assert_eq!(rect.area(), 50.0);
        assert_eq!(rect.margin(), 15.0);
    }

    #[test]
    fn test_empty_is_union_identity() {
        let rect = Rectangle::new(1.0, 2.0, 3.0, 4.0);
        assert!(Rectangle::empty().is_empty());
        assert_eq!(Rectangle::empty().union(&rect), rect);
        assert_eq!(rect.union(&Rectangle::empty()), rect);

        let collected: Rectangle = vec![rect, Rectangle::new(-1.0, 0.0, 0.0, 1.0)]
            .into_iter()
            .collect();
        assert_eq!(collected, Rectangle::new(-1.0, 0.0, 3.0, 4.0));
    }

    #[test]
    fn test_rectangle_union() {
        let rect1 = Rectangle::new(0.0, 0.0, 5.0, 5.0);
        let rect2 = Rectangle::new(3.0, 3.0, 8.0, 8.0);
        assert_eq!(rect1.union(&rect2), Rectangle::new(0.0, 0.0, 8.0, 8.0));

        let mut extended = rect1;
        extended.extend(&rect2);
        assert_eq!(extended, Rectangle::new(0.0, 0.0, 8.0, 8.0));
    }

    #[test]
    fn test_rectangle_intersects() {
        let rect1 = Rectangle::new(0.0, 0.0, 5.0, 5.0);
        let rect2 = Rectangle::new(3.0, 3.0, 8.0, 8.0);
        let rect3 = Rectangle::new(10.0, 10.0, 15.0, 15.0);
        // 边相接
        let rect4 = Rectangle::new(5.0, 0.0, 6.0, 5.0);

        assert!(rect1.intersects(&rect2));
        assert!(!rect1.intersects(&rect3));
        assert!(rect1.intersects(&rect4));
        assert!(!Rectangle::empty().intersects(&rect1));
    }

    #[test]
    fn test_rectangle_contains() {
        let rect1 = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let rect2 = Rectangle::new(2.0, 2.0, 8.0, 8.0);
        let rect3 = Rectangle::new(5.0, 5.0, 15.0, 15.0);

        assert!(rect1.contains(&rect2));
        assert!(rect1.contains(&rect1));
        assert!(!rect1.contains(&rect3));
        assert!(rect1.contains_point(5.0, 5.0));
        assert!(!rect1.contains_point(15.0, 15.0));
    }

    #[test]
    fn test_rectangle_enlargement() {
        let rect1 = Rectangle::new(0.0, 0.0, 5.0, 5.0);
        let rect2 = Rectangle::new(3.0, 3.0, 8.0, 8.0);
        assert_eq!(rect1.enlarged_area(&rect2), 64.0);
        assert_eq!(rect1.enlargement(&rect2), 39.0); // 8*8 - 5*5 = 64 - 25 = 39
    }

    #[test]
    fn test_rectangle_intersection_area() {
        let rect1 = Rectangle::new(0.0, 0.0, 5.0, 5.0);
        assert_eq!(rect1.intersection_area(&Rectangle::new(3.0, 3.0, 8.0, 8.0)), 4.0);
        assert_eq!(rect1.intersection_area(&Rectangle::new(6.0, 6.0, 8.0, 8.0)), 0.0);
        assert_eq!(rect1.intersection_area(&Rectangle::new(5.0, 0.0, 8.0, 5.0)), 0.0);
    }

    #[test]
    fn test_translate_and_inflate() {
        let rect = Rectangle::new(0.0, 0.0, 2.0, 1.0);
        assert_eq!(rect.translate(10.0, 20.0), Rectangle::new(10.0, 20.0, 12.0, 21.0));
        assert_eq!(rect.inflate(1.0), Rectangle::new(-1.0, -1.0, 3.0, 2.0));
        assert_eq!(rect.center(), [1.0, 0.5]);
    }

    #[test]
    fn test_display() {
        let rect = Rectangle::new(0.0, 1.0, 2.0, 3.0);
        assert_eq!(rect.to_string(), "([0.0, 1.0] -> [2.0, 3.0])");
    }
}
