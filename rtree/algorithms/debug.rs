use std::fmt::Debug;

use crate::rtree::node::{Children, Node};
use crate::rtree::rectangle::Rectangle;
use crate::rtree::rtree::RTree;

/// 树结构不变量被破坏时的描述
///
/// `path` 是从根出发的子节点下标序列
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("node {path:?}: mbr {actual} is not the tight union {expected}")]
    LooseMbr {
        path: Vec<usize>,
        actual: Rectangle,
        expected: Rectangle,
    },
    #[error("node {path:?}: height {actual}, expected {expected}")]
    Height {
        path: Vec<usize>,
        actual: usize,
        expected: usize,
    },
    #[error("node {path:?}: {count} children exceed max_entries {max}")]
    Overflow { path: Vec<usize>, count: usize, max: usize },
    #[error("node {path:?}: {count} children below min_entries {min}")]
    Underflow { path: Vec<usize>, count: usize, min: usize },
    #[error("node {path:?}: empty non-root node")]
    EmptyNode { path: Vec<usize> },
}

/// R-tree调试功能实现
impl<T> RTree<T> {
    /// 打印完整的树结构用于调试
    ///
    /// 递归遍历整个树结构，打印每个节点的类型、高度、MBR边界和条目数量
    pub fn print_tree_structure_debug(&self)
    where
        T: Debug,
    {
        fn print_node_recursive<T: Debug>(node: &Node<T>, depth: usize, path: String) {
            let indent = "  ".repeat(depth);
            let kind = if node.is_leaf() { "Leaf" } else { "Index" };
            println!(
                "{}Node{} (height={}, type={}, mbr={}, {} entries):",
                indent,
                path,
                node.height,
                kind,
                node.mbr,
                node.len()
            );

            if node.is_empty() {
                println!("{}  EMPTY NODE", indent);
            }

            match &node.children {
                Children::Leaf(items) => {
                    for (i, item) in items.iter().enumerate() {
                        println!("{}  [{}] Data: {:?}", indent, i, item);
                    }
                }
                Children::Index(nodes) => {
                    for (i, child) in nodes.iter().enumerate() {
                        print_node_recursive(child, depth + 1, format!("{}[{}]", path, i));
                    }
                }
            }
        }

        println!("=== R-tree Structure Debug ===");
        if self.is_empty() {
            println!("Empty tree");
        } else {
            print_node_recursive(&self.root, 0, String::new());
        }
        println!("=== End Debug ===");
    }

    /// 检查结构不变量：MBR 紧致、叶子等深、高度字段正确、扇出不超过 `max_entries`、
    /// 非根节点不为空
    ///
    /// 删除后节点可能少于 `min_entries`，这里不检查下限，见 `check_min_fanout`
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut stack: Vec<(&Node<T>, Vec<usize>)> = vec![(&self.root, Vec::new())];

        while let Some((node, path)) = stack.pop() {
            if node.len() > self.max_entries {
                return Err(InvariantViolation::Overflow {
                    path,
                    count: node.len(),
                    max: self.max_entries,
                });
            }
            if node.is_empty() && !path.is_empty() {
                return Err(InvariantViolation::EmptyNode { path });
            }

            let expected: Rectangle = match &node.children {
                Children::Leaf(items) => {
                    if node.height != 1 {
                        return Err(InvariantViolation::Height {
                            path,
                            actual: node.height,
                            expected: 1,
                        });
                    }
                    items.iter().map(self.to_bbox).collect()
                }
                Children::Index(nodes) => {
                    for (i, child) in nodes.iter().enumerate() {
                        if child.height + 1 != node.height {
                            let mut child_path = path.clone();
                            child_path.push(i);
                            return Err(InvariantViolation::Height {
                                path: child_path,
                                actual: child.height,
                                expected: node.height.saturating_sub(1),
                            });
                        }
                    }
                    nodes.iter().map(|child| child.mbr).collect()
                }
            };

            if node.mbr != expected {
                return Err(InvariantViolation::LooseMbr {
                    path,
                    actual: node.mbr,
                    expected,
                });
            }

            if let Children::Index(nodes) = &node.children {
                for (i, child) in nodes.iter().enumerate() {
                    let mut child_path = path.clone();
                    child_path.push(i);
                    stack.push((child, child_path));
                }
            }
        }

        Ok(())
    }

    /// 检查非根节点的条目数不少于 `min_entries`
    ///
    /// 插入和批量加载构建的树满足该条件；删除不合并下溢的节点，可能留下较小的节点
    pub fn check_min_fanout(&self) -> Result<(), InvariantViolation> {
        let mut stack: Vec<(&Node<T>, Vec<usize>)> = vec![(&self.root, Vec::new())];

        while let Some((node, path)) = stack.pop() {
            if !path.is_empty() && node.len() < self.min_entries {
                return Err(InvariantViolation::Underflow {
                    path,
                    count: node.len(),
                    min: self.min_entries,
                });
            }
            if let Children::Index(nodes) = &node.children {
                for (i, child) in nodes.iter().enumerate() {
                    let mut child_path = path.clone();
                    child_path.push(i);
                    stack.push((child, child_path));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_functions() {
        let mut rtree = RTree::new(4);

        // 测试空树的调试输出
        rtree.print_tree_structure_debug();

        for i in 0..10 {
            let x = i as f64;
            rtree.insert(Rectangle::new(x, x, x + 1.0, x + 1.0));
        }

        // 这个测试主要确保调试函数不会崩溃
        rtree.print_tree_structure_debug();
        assert!(!rtree.is_empty());
    }

    #[test]
    fn test_check_invariants_detects_loose_mbr() {
        let mut rtree = RTree::new(4);
        for i in 0..10 {
            let x = i as f64 * 2.0;
            rtree.insert(Rectangle::new(x, 0.0, x + 1.0, 1.0));
        }
        assert!(rtree.check_invariants().is_ok());

        let mut root = rtree.snapshot().clone();
        root.mbr = Rectangle::new(-5.0, -5.0, 100.0, 100.0);
        rtree.restore(root);

        assert!(matches!(
            rtree.check_invariants(),
            Err(InvariantViolation::LooseMbr { .. })
        ));
    }

    #[test]
    fn test_check_invariants_detects_bad_height() {
        let mut leaf = Node::new_leaf(vec![Rectangle::new(0.0, 0.0, 1.0, 1.0)]);
        leaf.update_mbr_with(|r| *r);
        leaf.height = 2;

        let mut rtree = RTree::new(4);
        rtree.restore(leaf);
        let violation = rtree.check_invariants().unwrap_err();
        assert_eq!(
            violation,
            InvariantViolation::Height {
                path: vec![],
                actual: 2,
                expected: 1
            }
        );
        assert!(violation.to_string().contains("height 2"));
    }

    #[test]
    fn test_check_min_fanout() {
        let mut small = Node::new_leaf(vec![Rectangle::new(0.0, 0.0, 1.0, 1.0)]);
        small.update_mbr_with(|r| *r);
        let mut full = Node::new_leaf(vec![
            Rectangle::new(5.0, 5.0, 6.0, 6.0),
            Rectangle::new(7.0, 7.0, 8.0, 8.0),
        ]);
        full.update_mbr_with(|r| *r);

        let mut rtree = RTree::new(4);
        rtree.restore(Node::new_index(vec![small, full], 2));

        assert!(rtree.check_invariants().is_ok());
        assert!(matches!(
            rtree.check_min_fanout(),
            Err(InvariantViolation::Underflow { count: 1, min: 2, .. })
        ));
    }
}
