use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::rtree::node::Node;
use crate::rtree::rtree::RTree;

/// 持久化错误类型
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Binary serialization error: {0}")]
    Binary(#[from] bincode::Error),
    #[error("Invalid file format")]
    InvalidFormat,
}

/// 序列化格式枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationFormat {
    /// JSON格式 - 可读性好，方便调试
    Json,
    /// 二进制格式 - 性能好，体积小
    Binary,
}

impl SerializationFormat {
    /// 根据文件扩展名自动判断格式：`.json` 为 JSON，其他一律为二进制
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("json") => SerializationFormat::Json,
            _ => SerializationFormat::Binary,
        }
    }

    /// 按名称解析格式（命令行参数使用）
    pub fn from_name(name: &str) -> Result<Self, PersistenceError> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Ok(SerializationFormat::Json),
            "bin" | "binary" | "bincode" => Ok(SerializationFormat::Binary),
            _ => Err(PersistenceError::InvalidFormat),
        }
    }
}

/// R-tree持久化功能实现
///
/// 只持久化根节点快照；边界框访问器是函数指针，恢复时沿用当前树的访问器
impl<T> RTree<T> {
    /// 快照序列化为 JSON 字符串
    pub fn to_json(&self) -> Result<String, PersistenceError>
    where
        T: Serialize,
    {
        Ok(serde_json::to_string(&self.root)?)
    }

    /// 从 JSON 字符串还原快照，替换当前的全部数据
    pub fn from_json(&mut self, json: &str) -> Result<(), PersistenceError>
    where
        T: DeserializeOwned,
    {
        let root: Node<T> = serde_json::from_str(json)?;
        self.restore(root);
        Ok(())
    }

    /// 导出到文件
    ///
    /// 根据文件扩展名自动选择序列化格式：
    /// - .json -> JSON格式（调试友好）
    /// - 其他 -> 二进制格式（高性能）
    pub fn dump_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError>
    where
        T: Serialize,
    {
        let format = SerializationFormat::from_extension(&path);
        self.dump_to_file_with_format(path, format)
    }

    /// 使用指定格式导出到文件
    ///
    /// 先写临时文件再重命名，写入中途失败不会破坏已有文件
    pub fn dump_to_file_with_format<P: AsRef<Path>>(
        &self,
        path: P,
        format: SerializationFormat,
    ) -> Result<(), PersistenceError>
    where
        T: Serialize,
    {
        let path = path.as_ref();

        // 创建临时文件路径，确保原子性写入
        let temp_path = path.with_extension(format!(
            "{}.tmp",
            path.extension().unwrap_or_default().to_string_lossy()
        ));

        let data = match format {
            SerializationFormat::Json => serde_json::to_vec_pretty(&self.root)?,
            SerializationFormat::Binary => bincode::serialize(&self.root)?,
        };

        fs::write(&temp_path, data)?;
        fs::rename(&temp_path, path)?;

        debug!(path = %path.display(), ?format, "index snapshot written");
        Ok(())
    }

    /// 从文件还原快照（格式由扩展名决定）
    pub fn restore_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), PersistenceError>
    where
        T: DeserializeOwned,
    {
        let format = SerializationFormat::from_extension(&path);
        self.restore_from_file_with_format(path, format)
    }

    /// 使用指定格式从文件还原快照
    pub fn restore_from_file_with_format<P: AsRef<Path>>(
        &mut self,
        path: P,
        format: SerializationFormat,
    ) -> Result<(), PersistenceError>
    where
        T: DeserializeOwned,
    {
        let data = fs::read(path)?;

        let root: Node<T> = match format {
            SerializationFormat::Json => serde_json::from_slice(&data)?,
            SerializationFormat::Binary => bincode::deserialize(&data)?,
        };

        self.restore(root);
        Ok(())
    }
}
