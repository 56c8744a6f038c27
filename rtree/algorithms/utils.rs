use crate::rtree::node::Node;
use crate::rtree::rectangle::Rectangle;
use crate::rtree::rtree::RTree;

/// 计算一组条目的最小边界矩形
pub(crate) fn dist_bbox<E, F>(entries: &[E], bbox: F) -> Rectangle
where
    F: Fn(&E) -> Rectangle,
{
    entries.iter().map(bbox).collect()
}

/// R-tree工具函数实现
impl<T> RTree<T> {
    /// 按路径获取节点
    ///
    /// 路径是从根节点开始、逐层的子节点下标；空路径表示根节点
    pub(crate) fn node_at(&self, path: &[usize]) -> Option<&Node<T>> {
        let mut current = &self.root;
        for &index in path {
            current = current.child(index)?;
        }
        Some(current)
    }

    /// 获取路径中最后一个节点的可变引用
    pub(crate) fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node<T>> {
        let mut current = &mut self.root;
        for &index in path {
            current = current.child_mut(index)?;
        }
        Some(current)
    }

    /// 沿路径向下扩展每一层节点的MBR（包含路径末端节点）
    ///
    /// 路径上的 MBR 原本是紧致的，新条目落在该路径之下时，扩展后仍然紧致
    pub(crate) fn extend_path(&mut self, path: &[usize], bbox: &Rectangle) {
        let mut current = &mut self.root;
        current.mbr.extend(bbox);
        for &index in path {
            match current.child_mut(index) {
                Some(child) => {
                    child.mbr.extend(bbox);
                    current = child;
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dist_bbox() {
        let group = vec![
            Rectangle::new(0.0, 0.0, 1.0, 1.0),
            Rectangle::new(2.0, 2.0, 3.0, 3.0),
            Rectangle::new(0.5, 0.5, 1.5, 1.5),
        ];
        assert_eq!(dist_bbox(&group, |r| *r), Rectangle::new(0.0, 0.0, 3.0, 3.0));
        assert!(dist_bbox(&group[..0], |r| *r).is_empty());
    }

    #[test]
    fn test_node_at() {
        let mut rtree = RTree::new(4);
        for i in 0..5 {
            let x = (i as f64) * 2.0;
            rtree.insert(Rectangle::new(x, x, x + 1.0, x + 1.0));
        }

        // 空路径返回根节点
        assert!(rtree.node_at(&[]).is_some());
        // 分裂后根节点有两个叶子
        assert!(rtree.node_at(&[0]).is_some_and(|node| node.is_leaf()));
        assert!(rtree.node_at(&[1]).is_some());
        assert!(rtree.node_at(&[7]).is_none());
        assert!(rtree.node_at_mut(&[0, 0]).is_none());
    }

    #[test]
    fn test_extend_path() {
        let mut rtree = RTree::new(4);
        for i in 0..5 {
            let x = (i as f64) * 2.0;
            rtree.insert(Rectangle::new(x, x, x + 1.0, x + 1.0));
        }

        let far = Rectangle::new(100.0, 100.0, 101.0, 101.0);
        rtree.extend_path(&[0], &far);
        assert!(rtree.snapshot().mbr.contains(&far));
        assert!(rtree.node_at(&[0]).is_some_and(|node| node.mbr.contains(&far)));
        assert!(rtree.node_at(&[1]).is_some_and(|node| !node.mbr.contains(&far)));
    }
}
