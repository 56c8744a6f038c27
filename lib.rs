//! # declutter
//!
//! 动态 R-tree 空间索引，以及构建在其上的贪心式屏幕元素避让（碰撞）布局。
//!
//! - `rtree`：R-tree（插入、节点分裂、OMT 批量加载、删除与路径收缩、快照）
//! - `placement`：按优先级逐个尝试候选元素，只显示不与已接受元素重叠的那些
//! - `config`：分层配置（内嵌默认值 → 配置文件 → 环境变量）
//! - `client`：命令行前端使用的场景文件与输出格式化
//!
//! ```rust
//! use declutter::{RTree, Rectangle};
//!
//! let mut tree = RTree::new(9);
//! tree.insert(Rectangle::new(0.0, 0.0, 10.0, 10.0));
//! tree.insert(Rectangle::new(20.0, 20.0, 30.0, 30.0));
//! tree.insert(Rectangle::new(5.0, 5.0, 15.0, 15.0));
//!
//! let hits = tree.search(&Rectangle::new(0.0, 0.0, 12.0, 12.0));
//! assert_eq!(hits.len(), 2);
//! assert!(tree.collides(&Rectangle::new(25.0, 25.0, 26.0, 26.0)));
//! ```

pub mod client;
pub mod config;
pub mod placement;
pub mod rtree;

use std::error::Error;

// 重新导出主要的公共接口
pub use config::DeclutterConfig;
pub use placement::{CollisionLayer, Footprint, Measure, PlacementError, PlacementReport};
pub use rtree::{Children, Node, RTree, Rectangle};

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;
