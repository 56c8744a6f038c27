use crate::rtree::node::{Children, Node};
use crate::rtree::rectangle::Rectangle;
use crate::rtree::rtree::RTree;

/// 搜索操作相关算法
impl<T> RTree<T> {
    /// 搜索边界框与查询矩形相交的所有数据
    ///
    /// 深度优先遍历；子节点被查询矩形完全包含时直接收集其全部数据，不再逐个比较。
    /// 结果顺序不保证。
    pub fn search(&self, query: &Rectangle) -> Vec<&T> {
        let mut results = Vec::new();
        if !self.root.mbr.intersects(query) {
            return results;
        }

        let mut nodes_to_search: Vec<&Node<T>> = vec![&self.root];
        while let Some(node) = nodes_to_search.pop() {
            match &node.children {
                Children::Leaf(items) => {
                    for item in items {
                        if query.intersects(&(self.to_bbox)(item)) {
                            results.push(item);
                        }
                    }
                }
                Children::Index(children) => {
                    for child in children {
                        if !query.intersects(&child.mbr) {
                            continue;
                        }
                        if query.contains(&child.mbr) {
                            child.collect_items(&mut results);
                        } else {
                            nodes_to_search.push(child);
                        }
                    }
                }
            }
        }

        results
    }

    /// 判断是否存在与查询矩形相交的数据
    ///
    /// 与 `search` 相同的遍历，遇到第一个相交的数据或被完全包含的子节点立即返回
    pub fn collides(&self, query: &Rectangle) -> bool {
        if !self.root.mbr.intersects(query) {
            return false;
        }

        let mut nodes_to_search: Vec<&Node<T>> = vec![&self.root];
        while let Some(node) = nodes_to_search.pop() {
            match &node.children {
                Children::Leaf(items) => {
                    if items.iter().any(|item| query.intersects(&(self.to_bbox)(item))) {
                        return true;
                    }
                }
                Children::Index(children) => {
                    for child in children {
                        if !query.intersects(&child.mbr) {
                            continue;
                        }
                        // 非空子树被完全包含，必然存在相交的数据
                        if query.contains(&child.mbr) {
                            return true;
                        }
                        nodes_to_search.push(child);
                    }
                }
            }
        }

        false
    }
}
