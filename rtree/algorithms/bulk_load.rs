use std::cmp::Ordering;
use std::mem;

use tracing::debug;

use crate::rtree::algorithms::insert::Pending;
use crate::rtree::algorithms::select::partition_at;
use crate::rtree::node::{Children, Node};
use crate::rtree::rtree::RTree;

/// 批量加载 - OMT（Overlap Minimizing Tree）自顶向下打包
impl<T> RTree<T> {
    /// 批量插入数据
    ///
    /// 条目数少于 `min_entries` 时逐个插入；否则先用 OMT 打包出一棵新树，再合并进现有树：
    /// - 现有树为空：直接采用新树
    /// - 较矮（高度相同时子节点较少）的树根不少于 `min_entries` 个子节点：
    ///   高度相同时两棵树作为新根的两个子节点，否则作为子树插入较高树的对应层
    /// - 否则拆开较矮的树根，把它的子节点逐个插入
    pub fn bulk_load(&mut self, items: Vec<T>) {
        let count = items.len();
        if count < self.min_entries {
            for item in items {
                self.insert(item);
            }
            return;
        }

        let height = tree_height(count, self.max_entries);
        let node = self.build(items, height);

        if self.root.is_empty() {
            self.root = node;
        } else {
            self.merge(node);
        }

        debug!(count, height = self.root.height, "bulk load finished");
    }

    fn merge(&mut self, mut node: Node<T>) {
        if (node.height, node.len()) > (self.root.height, self.root.len()) {
            // 始终把较矮的树并入较高的树
            mem::swap(&mut self.root, &mut node);
        }

        if node.len() < self.min_entries {
            self.dissolve(node);
        } else if node.height == self.root.height {
            self.split_root(node);
        } else {
            let bbox = node.mbr;
            let target_height = node.height + 1;
            self.insert_entry(Pending::Subtree(node), bbox, target_height);
        }
    }

    /// 拆开一个节点，把它的子条目逐个插入当前树
    fn dissolve(&mut self, node: Node<T>) {
        match node.children {
            Children::Leaf(items) => {
                for item in items {
                    self.insert(item);
                }
            }
            Children::Index(nodes) => {
                for child in nodes {
                    let bbox = child.mbr;
                    let target_height = child.height + 1;
                    self.insert_entry(Pending::Subtree(child), bbox, target_height);
                }
            }
        }
    }

    /// 把一段条目打包成高度为 `height` 的子树
    ///
    /// 子节点数 `k = ceil(N / M^(height-1))`，条目尽量平均地分给各子节点（相差不超过 1）。
    /// 先按 minX 切成 `ceil(sqrt(k))` 列，每列再按 minY 切成若干行，每行递归构建一个子节点。
    /// 这样非根节点的子节点数总在 `[m, M]` 内，所有叶子位于同一层。
    fn build(&self, mut items: Vec<T>, height: usize) -> Node<T> {
        if height <= 1 {
            let mut node = Node::new_leaf(items);
            node.update_mbr_with(self.to_bbox);
            return node;
        }

        let total = items.len();
        let capacity = self.max_entries.pow(height as u32 - 1);
        let child_sizes = even_split(total, total.div_ceil(capacity));
        let column_runs = even_split(child_sizes.len(), ceil_sqrt(child_sizes.len()));

        let mut rows_per_column = Vec::with_capacity(column_runs.len());
        let mut rest = child_sizes.as_slice();
        for &run in &column_runs {
            let (rows, tail) = rest.split_at(run);
            rows_per_column.push(rows);
            rest = tail;
        }
        let column_lens: Vec<usize> = rows_per_column
            .iter()
            .map(|rows| rows.iter().sum())
            .collect();

        let to_bbox = self.to_bbox;
        let compare_min_x = |a: &T, b: &T| axis_order(to_bbox(a).min[0], to_bbox(b).min[0]);
        let compare_min_y = |a: &T, b: &T| axis_order(to_bbox(a).min[1], to_bbox(b).min[1]);

        partition_at(&mut items, &cut_points(&column_lens), &compare_min_x);

        let mut children = Vec::with_capacity(child_sizes.len());
        for (mut column, rows) in split_into(items, &column_lens).into_iter().zip(rows_per_column) {
            partition_at(&mut column, &cut_points(rows), &compare_min_y);

            for row in split_into(column, rows) {
                children.push(self.build(row, height - 1));
            }
        }

        Node::new_index(children, height)
    }
}

fn axis_order(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// 容纳 `total` 个条目所需的最小高度：满足 `M^h >= total` 的最小 h
fn tree_height(total: usize, max_entries: usize) -> usize {
    let mut height = 1;
    let mut capacity = max_entries;
    while capacity < total {
        capacity = capacity.saturating_mul(max_entries);
        height += 1;
    }
    height
}

fn ceil_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root < n {
        root += 1;
    }
    while root > 1 && (root - 1) * (root - 1) >= n {
        root -= 1;
    }
    root
}

/// 把 `total` 平均分成 `parts` 份，前 `total % parts` 份多一个
fn even_split(total: usize, parts: usize) -> Vec<usize> {
    let parts = parts.max(1);
    let (base, extra) = (total / parts, total % parts);
    (0..parts).map(|i| base + usize::from(i < extra)).collect()
}

/// 各分组的起始位置（不含 0）
fn cut_points(lens: &[usize]) -> Vec<usize> {
    let mut cuts = Vec::with_capacity(lens.len().saturating_sub(1));
    let mut offset = 0;
    for &len in lens.iter().take(lens.len().saturating_sub(1)) {
        offset += len;
        cuts.push(offset);
    }
    cuts
}

/// 按给定长度把条目依次切成若干块
fn split_into<T>(mut items: Vec<T>, lens: &[usize]) -> Vec<Vec<T>> {
    let mut chunks = Vec::with_capacity(lens.len());
    // 从尾部切下，避免反复移动前面的元素
    for &len in lens.iter().skip(1).rev() {
        let at = items.len() - len;
        chunks.push(items.split_off(at));
    }
    chunks.push(items);
    chunks.reverse();
    chunks
}
