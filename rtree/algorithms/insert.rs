use tracing::warn;

use crate::rtree::node::{Children, Node};
use crate::rtree::rectangle::Rectangle;
use crate::rtree::rtree::RTree;

/// 待插入的条目：单条数据（落到叶子层）或整棵子树（批量加载合并时使用）
pub(crate) enum Pending<T> {
    Item(T),
    Subtree(Node<T>),
}

/// 插入操作相关算法
impl<T> RTree<T> {
    /// 插入新的数据条目
    pub fn insert(&mut self, item: T) {
        let bbox = (self.to_bbox)(&item);
        self.insert_entry(Pending::Item(item), bbox, 1);
    }

    /// 将条目放入高度为 `target_height` 的节点中
    ///
    /// 1. 选择子树，记录从根到目标节点的路径
    /// 2. 把条目追加到目标节点
    /// 3. 沿路径向上检查溢出并分裂，直到某层不再溢出或根节点分裂
    /// 4. 扩展剩余祖先节点的MBR
    pub(crate) fn insert_entry(&mut self, entry: Pending<T>, bbox: Rectangle, target_height: usize) {
        let path = self.choose_subtree_path(&bbox, target_height);

        let node = match self.node_at_mut(&path) {
            Some(node) => node,
            None => {
                warn!(?path, "insertion path does not resolve to a node");
                return;
            }
        };
        match (&mut node.children, entry) {
            (Children::Leaf(items), Pending::Item(item)) => items.push(item),
            (Children::Index(nodes), Pending::Subtree(subtree)) => nodes.push(subtree),
            _ => {
                warn!(height = node.height, "entry kind does not match the chosen node");
                return;
            }
        }
        node.mbr.extend(&bbox);

        // 自底向上处理溢出；depth 为当前检查节点在路径中的深度
        let mut depth = path.len();
        while self
            .node_at(&path[..depth])
            .is_some_and(|node| node.len() > self.max_entries)
        {
            self.split(&path[..depth]);
            if depth == 0 {
                // 根节点分裂后整棵树的MBR都已重新计算
                return;
            }
            depth -= 1;
        }

        self.extend_path(&path[..depth], &bbox);
    }

    /// 选择子树路径：每层选择扩大面积最小的子节点，相同则选面积最小的
    ///
    /// 到达叶子或高度等于 `target_height` 的节点时停止
    pub(crate) fn choose_subtree_path(&self, rect: &Rectangle, target_height: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = &self.root;

        while let Children::Index(nodes) = &current.children {
            if current.height <= target_height {
                break;
            }
            match Self::choose_subtree(nodes, rect) {
                Some(best_index) => {
                    path.push(best_index);
                    current = &nodes[best_index];
                }
                None => break,
            }
        }

        path
    }

    /// 选择子树 - 计算扩大面积最小的条目
    fn choose_subtree(nodes: &[Node<T>], rect: &Rectangle) -> Option<usize> {
        let mut best_index = None;
        let mut min_enlargement = f64::INFINITY;
        let mut min_area = f64::INFINITY;

        for (i, node) in nodes.iter().enumerate() {
            let area = node.mbr.area();
            let enlargement = node.mbr.enlarged_area(rect) - area;

            // 选择扩大面积最小的，如果相同则选择面积最小的
            if best_index.is_none()
                || enlargement < min_enlargement
                || (enlargement == min_enlargement && area < min_area)
            {
                min_enlargement = enlargement;
                min_area = area;
                best_index = Some(i);
            }
        }

        best_index
    }
}
