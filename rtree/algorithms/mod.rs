// R-tree算法模块
//
// 这个模块包含R-tree的所有核心算法实现，按功能分解为不同的子模块：
// - search: 搜索和碰撞检测
// - insert: 插入和子树选择
// - split: 节点分裂算法
// - bulk_load: OMT 批量加载
// - select: Floyd–Rivest 选择与多路分组（批量加载使用）
// - delete: 删除和路径收缩
// - utils: 共用的工具函数
// - debug: 调试输出和不变量检查
// - persistence: 持久化和序列化功能（快照文件）

pub mod bulk_load;
pub mod debug;
pub mod delete;
pub mod insert;
pub mod persistence;
pub mod search;
pub mod select;
pub mod split;
pub mod utils;
