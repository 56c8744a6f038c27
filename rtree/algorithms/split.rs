use std::mem;

use tracing::{debug, warn};

use crate::rtree::algorithms::utils::dist_bbox;
use crate::rtree::node::{Children, Node};
use crate::rtree::rectangle::Rectangle;
use crate::rtree::rtree::RTree;

/// 节点分裂算法 - R*-tree 风格的轴选择 + 最小重叠分裂点
impl<T> RTree<T> {
    /// 分裂路径末端的溢出节点
    ///
    /// 新的兄弟节点追加到父节点中（父节点可能因此溢出，由调用者继续向上处理）；
    /// 如果分裂的是根节点，则创建高一层的新根
    pub(crate) fn split(&mut self, path: &[usize]) {
        let min_entries = self.min_entries;
        let to_bbox = self.to_bbox;

        let node = match self.node_at_mut(path) {
            Some(node) => node,
            None => {
                warn!(?path, "failed to get node during split");
                return;
            }
        };

        let split_index = match &mut node.children {
            Children::Leaf(items) => choose_split(items, min_entries, to_bbox),
            Children::Index(nodes) => choose_split(nodes, min_entries, |node| node.mbr),
        };

        let mut sibling = node.split_off(split_index);
        node.update_mbr_with(to_bbox);
        sibling.update_mbr_with(to_bbox);

        match path.split_last() {
            None => self.split_root(sibling),
            Some((_, parent_path)) => match self.node_at_mut(parent_path) {
                Some(Node {
                    children: Children::Index(nodes),
                    ..
                }) => nodes.push(sibling),
                _ => warn!(?parent_path, "failed to get parent node during split"),
            },
        }
    }

    /// 以旧根节点和新节点作为两个子节点，创建新的根节点
    pub(crate) fn split_root(&mut self, sibling: Node<T>) {
        let old_root = mem::replace(&mut self.root, Node::empty_root());
        let height = old_root.height + 1;
        self.root = Node::new_index(vec![old_root, sibling], height);
        debug!(height, "root split");
    }
}

/// 对溢出节点的子条目排序并返回分裂位置
///
/// 先分别按 x、y 排序计算所有合法分布的边长总和，选总和较小的轴（条目保持按该轴排序）；
/// 再在该轴上选择两侧MBR重叠面积最小的分裂点，相同则选面积之和最小的
pub(crate) fn choose_split<E, F>(entries: &mut [E], min_entries: usize, bbox: F) -> usize
where
    F: Fn(&E) -> Rectangle,
{
    let min_entries = min_entries.min(entries.len() / 2).max(1);

    let x_margin = all_dist_margin(entries, min_entries, &bbox, 0);
    let y_margin = all_dist_margin(entries, min_entries, &bbox, 1);

    // x 轴更优时重新按 x 排序，否则条目已经按 y 排好
    if x_margin < y_margin {
        sort_by_axis(entries, &bbox, 0);
    }

    choose_split_index(entries, min_entries, &bbox)
}

fn sort_by_axis<E, F>(entries: &mut [E], bbox: &F, axis: usize)
where
    F: Fn(&E) -> Rectangle,
{
    entries.sort_by(|a, b| bbox(a).min[axis].total_cmp(&bbox(b).min[axis]));
}

/// 两侧至少 `min_entries` 个条目的所有分布的边长（半周长）总和
fn all_dist_margin<E, F>(entries: &mut [E], min_entries: usize, bbox: &F, axis: usize) -> f64
where
    F: Fn(&E) -> Rectangle,
{
    sort_by_axis(entries, bbox, axis);

    let total = entries.len();
    let mut left_bbox = dist_bbox(&entries[..min_entries], bbox);
    let mut right_bbox = dist_bbox(&entries[total - min_entries..], bbox);
    let mut margin = left_bbox.margin() + right_bbox.margin();

    for entry in &entries[min_entries..total - min_entries] {
        left_bbox.extend(&bbox(entry));
        margin += left_bbox.margin();
    }

    for entry in entries[min_entries..total - min_entries].iter().rev() {
        right_bbox.extend(&bbox(entry));
        margin += right_bbox.margin();
    }

    margin
}

fn choose_split_index<E, F>(entries: &[E], min_entries: usize, bbox: &F) -> usize
where
    F: Fn(&E) -> Rectangle,
{
    let total = entries.len();
    let mut index = min_entries;
    let mut min_overlap = f64::INFINITY;
    let mut min_area = f64::INFINITY;

    for i in min_entries..=total - min_entries {
        let bbox1 = dist_bbox(&entries[..i], bbox);
        let bbox2 = dist_bbox(&entries[i..], bbox);

        let overlap = bbox1.intersection_area(&bbox2);
        let area = bbox1.area() + bbox2.area();

        // 选择重叠最小的分布，相同则选择面积最小的
        if overlap < min_overlap || (overlap == min_overlap && area < min_area) {
            min_overlap = overlap;
            min_area = area;
            index = i;
        }
    }

    index
}
