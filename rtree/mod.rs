pub mod algorithms;
pub mod node;
pub mod rectangle;
#[allow(clippy::module_inception)]
pub mod rtree;

// 重新导出主要类型
pub use algorithms::debug::InvariantViolation;
pub use algorithms::persistence::{PersistenceError, SerializationFormat};
pub use algorithms::select::{multi_select, select};
pub use node::{Children, Node};
pub use rectangle::Rectangle;
pub use rtree::{BBoxFn, RTree, DEFAULT_MAX_ENTRIES};
