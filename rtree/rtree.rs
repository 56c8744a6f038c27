use super::node::{Children, Node};
use super::rectangle::Rectangle;

/// 默认的最大条目数 M
pub const DEFAULT_MAX_ENTRIES: usize = 9;

/// 从数据中取出边界框的访问器
///
/// 访问器必须是确定且无状态的：同一数据每次都要返回相同的矩形，否则索引的正确性无法保证
pub type BBoxFn<T> = fn(&T) -> Rectangle;

fn identity(rect: &Rectangle) -> Rectangle {
    *rect
}

/// R-tree主结构
///
/// 节点以所有权树的形式组织（每个节点独占其子节点，没有父指针），
/// 需要回溯时通过从根出发的下标路径 `Vec<usize>` 重新定位。
#[derive(Debug, Clone)]
pub struct RTree<T> {
    /// 根节点，空树时为空叶子（高度 1）
    pub(crate) root: Node<T>,
    /// 最大条目数M
    pub(crate) max_entries: usize,
    /// 最小条目数m = ceil(0.4 * M)，至少为 2
    pub(crate) min_entries: usize,
    pub(crate) to_bbox: BBoxFn<T>,
}

impl RTree<Rectangle> {
    /// 创建直接存放矩形的R-tree
    pub fn new(max_entries: usize) -> Self {
        Self::with_accessor(max_entries, identity)
    }
}

impl Default for RTree<Rectangle> {
    /// 使用默认参数创建R-tree（M=9, m=4）
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl<T> RTree<T> {
    /// 使用自定义的边界框访问器创建R-tree
    ///
    /// `max_entries` 小于 4 时按 4 处理
    pub fn with_accessor(max_entries: usize, to_bbox: BBoxFn<T>) -> Self {
        let max_entries = max_entries.max(4);
        let min_entries = ((max_entries as f64 * 0.4).ceil() as usize).max(2);

        RTree {
            root: Node::empty_root(),
            max_entries,
            min_entries,
            to_bbox,
        }
    }

    /// 清空所有数据，根节点恢复为空叶子
    pub fn clear(&mut self) {
        self.root = Node::empty_root();
    }

    /// 检查R-tree是否为空
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// 获取总的条目数量
    pub fn len(&self) -> usize {
        fn count_entries<T>(node: &Node<T>) -> usize {
            match &node.children {
                Children::Leaf(items) => items.len(),
                Children::Index(nodes) => nodes.iter().map(count_entries).sum(),
            }
        }
        count_entries(&self.root)
    }

    /// 树高（叶子层为 1）
    pub fn height(&self) -> usize {
        self.root.height
    }

    /// 获取最大条目数
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// 获取最小条目数
    pub fn min_entries(&self) -> usize {
        self.min_entries
    }

    /// 根节点的MBR，空树返回 `None`
    pub fn root_mbr(&self) -> Option<&Rectangle> {
        (!self.root.is_empty()).then_some(&self.root.mbr)
    }

    /// 计算数据的边界框
    pub fn bbox_of(&self, item: &T) -> Rectangle {
        (self.to_bbox)(item)
    }

    /// 所有数据，顺序不保证
    pub fn all(&self) -> Vec<&T> {
        let mut result = Vec::new();
        self.root.collect_items(&mut result);
        result
    }

    /// 导出树结构快照（根节点）
    ///
    /// 快照可以直接交给 serde 序列化，之后通过 `restore` 还原
    pub fn snapshot(&self) -> &Node<T> {
        &self.root
    }

    /// 用快照整体替换根节点
    ///
    /// 不做任何结构校验：调用者只应还原由 `snapshot` 得到的、结构合法的树，
    /// 且必须使用相同的访问器
    pub fn restore(&mut self, root: Node<T>) {
        self.root = root;
    }
}
