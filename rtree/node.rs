use crate::rtree::rectangle::Rectangle;
use serde::{Deserialize, Serialize};

/// R-tree节点的子元素
///
/// 用标签变体明确区分两种节点，类型上保证叶子节点只含数据、索引节点只含子节点：
/// - `Leaf`：叶子节点，直接持有用户插入的数据
/// - `Index`：索引节点，持有子节点（每个子节点独占所有权，没有父指针）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Children<T> {
    Leaf(Vec<T>),
    Index(Vec<Node<T>>),
}

/// R-tree节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<T> {
    /// 节点的最小边界矩形，始终是子元素边界的紧致并集
    ///
    /// 空节点的 MBR 为 `Rectangle::empty()`，序列化时写为 `null`
    #[serde(with = "mbr_serde")]
    pub mbr: Rectangle,

    /// 到叶子层的距离，叶子节点为 1
    pub height: usize,

    pub children: Children<T>,
}

impl<T> Node<T> {
    /// 创建新的叶子节点
    pub fn new_leaf(items: Vec<T>) -> Self {
        Node {
            mbr: Rectangle::empty(),
            height: 1,
            children: Children::Leaf(items),
        }
    }

    /// 创建新的索引节点
    ///
    /// 子节点必须具有相同的高度，新节点高度为子节点高度 + 1
    pub fn new_index(nodes: Vec<Node<T>>, height: usize) -> Self {
        debug_assert!(height > 1, "index node must sit above the leaf level");
        let mut node = Node {
            mbr: Rectangle::empty(),
            height,
            children: Children::Index(nodes),
        };
        node.update_mbr_with(|_| Rectangle::empty());
        node
    }

    /// 空的根节点（空叶子，高度 1）
    pub fn empty_root() -> Self {
        Self::new_leaf(Vec::new())
    }

    /// 检查是否为叶子节点
    pub fn is_leaf(&self) -> bool {
        matches!(self.children, Children::Leaf(_))
    }

    /// 子元素个数
    pub fn len(&self) -> usize {
        match &self.children {
            Children::Leaf(items) => items.len(),
            Children::Index(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按位置取子节点（仅索引节点）
    pub fn child(&self, index: usize) -> Option<&Node<T>> {
        match &self.children {
            Children::Index(nodes) => nodes.get(index),
            Children::Leaf(_) => None,
        }
    }

    /// 按位置取子节点的可变引用（仅索引节点）
    pub fn child_mut(&mut self, index: usize) -> Option<&mut Node<T>> {
        match &mut self.children {
            Children::Index(nodes) => nodes.get_mut(index),
            Children::Leaf(_) => None,
        }
    }

    /// 从子元素重新计算紧致 MBR
    ///
    /// 叶子节点的数据边界通过 `to_bbox` 取得，索引节点直接使用子节点的 MBR
    pub fn update_mbr_with<F>(&mut self, to_bbox: F)
    where
        F: Fn(&T) -> Rectangle,
    {
        self.mbr = match &self.children {
            Children::Leaf(items) => items.iter().map(&to_bbox).collect(),
            Children::Index(nodes) => nodes.iter().map(|node| node.mbr).collect(),
        };
    }

    /// 将子元素从 `at` 开始切下，生成同类型、同高度的兄弟节点
    ///
    /// 两个节点的 MBR 都需要调用者重新计算
    pub(crate) fn split_off(&mut self, at: usize) -> Node<T> {
        let children = match &mut self.children {
            Children::Leaf(items) => Children::Leaf(items.split_off(at)),
            Children::Index(nodes) => Children::Index(nodes.split_off(at)),
        };
        Node {
            mbr: Rectangle::empty(),
            height: self.height,
            children,
        }
    }

    /// 收集子树中的所有数据
    pub fn collect_items<'a>(&'a self, result: &mut Vec<&'a T>) {
        let mut nodes_to_search = vec![self];
        while let Some(node) = nodes_to_search.pop() {
            match &node.children {
                Children::Leaf(items) => result.extend(items.iter()),
                Children::Index(nodes) => nodes_to_search.extend(nodes.iter()),
            }
        }
    }
}

/// 空矩形的坐标是无穷大，JSON 无法表示，这里以 `Option` 的形式读写
mod mbr_serde {
    use crate::rtree::rectangle::Rectangle;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(mbr: &Rectangle, serializer: S) -> Result<S::Ok, S::Error> {
        let value = if mbr.is_empty() { None } else { Some(*mbr) };
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rectangle, D::Error> {
        Ok(Option::<Rectangle>::deserialize(deserializer)?.unwrap_or_else(Rectangle::empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(rect: &Rectangle) -> Rectangle {
        *rect
    }

    #[test]
    fn test_node_creation() {
        let leaf = Node::<Rectangle>::empty_root();
        assert!(leaf.is_leaf());
        assert!(leaf.is_empty());
        assert_eq!(leaf.height, 1);
        assert!(leaf.mbr.is_empty());

        let index = Node::new_index(vec![leaf.clone(), leaf], 2);
        assert!(!index.is_leaf());
        assert_eq!(index.len(), 2);
        assert_eq!(index.height, 2);
    }

    #[test]
    fn test_node_update_mbr() {
        let mut node = Node::new_leaf(vec![
            Rectangle::new(0.0, 0.0, 5.0, 5.0),
            Rectangle::new(3.0, 3.0, 8.0, 8.0),
        ]);
        node.update_mbr_with(identity);
        assert_eq!(node.mbr, Rectangle::new(0.0, 0.0, 8.0, 8.0));

        let parent = Node::new_index(vec![node], 2);
        assert_eq!(parent.mbr, Rectangle::new(0.0, 0.0, 8.0, 8.0));
    }

    #[test]
    fn test_split_off_keeps_kind_and_height() {
        let mut node = Node::new_leaf((0..6).map(|i| Rectangle::from_point(i as f64, 0.0)).collect());
        let sibling = node.split_off(4);

        assert!(sibling.is_leaf());
        assert_eq!(sibling.height, node.height);
        assert_eq!(node.len(), 4);
        assert_eq!(sibling.len(), 2);
    }

    #[test]
    fn test_collect_items() {
        let mut a = Node::new_leaf(vec![Rectangle::from_point(0.0, 0.0)]);
        let mut b = Node::new_leaf(vec![
            Rectangle::from_point(1.0, 1.0),
            Rectangle::from_point(2.0, 2.0),
        ]);
        a.update_mbr_with(identity);
        b.update_mbr_with(identity);
        let root = Node::new_index(vec![a, b], 2);

        let mut items = Vec::new();
        root.collect_items(&mut items);
        assert_eq!(items.len(), 3);
        assert!(root.child(1).is_some());
        assert!(root.child(2).is_none());
    }

    #[test]
    fn test_empty_mbr_json_roundtrip() {
        let node = Node::<Rectangle>::empty_root();
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"mbr\":null"));

        let restored: Node<Rectangle> = serde_json::from_str(&json).unwrap();
        assert!(restored.mbr.is_empty());
        assert_eq!(restored, node);
    }
}
