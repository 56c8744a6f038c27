use tracing::{debug, warn};

use crate::rtree::node::{Children, Node};
use crate::rtree::rectangle::Rectangle;
use crate::rtree::rtree::RTree;

/// R-tree删除算法实现
impl<T> RTree<T> {
    /// 删除与 `item` 相等（`PartialEq`）的一个条目
    ///
    /// 找到并删除时返回 `true`；条目不存在时树保持不变
    pub fn remove(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.remove_with(item, |a, b| a == b)
    }

    /// 使用自定义的相等判断删除一个条目
    ///
    /// 只进入 MBR 包含 `item` 边界框的子树；找到后从叶子中移除并沿路径收缩
    pub fn remove_with<F>(&mut self, item: &T, eq: F) -> bool
    where
        F: Fn(&T, &T) -> bool,
    {
        if self.root.is_empty() {
            return false;
        }

        let bbox = (self.to_bbox)(item);
        let (path, index) = match self.find_item(item, &bbox, &eq) {
            Some(found) => found,
            None => return false,
        };

        match self.node_at_mut(&path) {
            Some(Node {
                children: Children::Leaf(items),
                ..
            }) => {
                items.remove(index);
            }
            _ => {
                warn!(?path, "failed to get leaf node during deletion");
                return false;
            }
        }

        self.condense(&path);
        true
    }

    /// 迭代深度优先查找条目，返回叶子节点路径和条目在叶子中的位置
    ///
    /// 栈中每一帧记录节点和下一个待检查子节点的下标，`path` 与栈同步增减
    fn find_item<F>(&self, item: &T, bbox: &Rectangle, eq: &F) -> Option<(Vec<usize>, usize)>
    where
        F: Fn(&T, &T) -> bool,
    {
        let mut path = Vec::new();
        let mut stack: Vec<(&Node<T>, usize)> = vec![(&self.root, 0)];

        while let Some((node, cursor)) = stack.pop() {
            match &node.children {
                Children::Leaf(items) => {
                    if let Some(index) = items.iter().position(|candidate| eq(candidate, item)) {
                        return Some((path, index));
                    }
                    path.pop();
                }
                Children::Index(nodes) => {
                    let next = nodes
                        .iter()
                        .enumerate()
                        .skip(cursor)
                        .find(|(_, child)| child.mbr.contains(bbox));

                    match next {
                        Some((i, child)) => {
                            stack.push((node, i + 1));
                            stack.push((child, 0));
                            path.push(i);
                        }
                        None => {
                            path.pop();
                        }
                    }
                }
            }
        }

        None
    }

    /// 沿路径自底向上收缩
    ///
    /// 空节点从父节点中移除（根节点为空时清空整棵树），其余节点重新计算紧致 MBR。
    /// 不合并条目数低于 `min_entries` 的节点。
    fn condense(&mut self, path: &[usize]) {
        let to_bbox = self.to_bbox;

        for depth in (0..=path.len()).rev() {
            let node_path = &path[..depth];
            let is_empty = match self.node_at(node_path) {
                Some(node) => node.is_empty(),
                None => {
                    warn!(?node_path, "failed to get node during condense");
                    return;
                }
            };

            if !is_empty {
                if let Some(node) = self.node_at_mut(node_path) {
                    node.update_mbr_with(to_bbox);
                }
                continue;
            }

            match node_path.split_last() {
                Some((&index, parent_path)) => {
                    if let Some(Node {
                        children: Children::Index(nodes),
                        ..
                    }) = self.node_at_mut(parent_path)
                    {
                        nodes.remove(index);
                    }
                }
                None => {
                    self.clear();
                    debug!("tree emptied by removal");
                }
            }
        }
    }
}
