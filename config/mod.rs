use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::rtree::DEFAULT_MAX_ENTRIES;

/// declutter 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclutterConfig {
    /// 空间索引配置
    #[serde(default)]
    pub index: IndexConfig,

    /// 避让布局配置
    #[serde(default)]
    pub placement: PlacementConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 空间索引配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// R-tree 节点最大条目数
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

/// 避让布局配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// 足迹矩形四周的扩展距离
    #[serde(default)]
    pub margin: f64,

    /// 静态元素是否占据索引空间
    #[serde(default)]
    pub static_obstructs: bool,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别：trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 日志输出：stderr, stdout, file
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志文件路径（当 output = file 时）
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// 默认值函数
// ============================================================================

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stderr".to_string()
}

// ============================================================================
// 实现
// ============================================================================

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin: 0.0,
            static_obstructs: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: default_log_output(),
            log_file: None,
        }
    }
}

impl Default for DeclutterConfig {
    fn default() -> Self {
        Self {
            index: IndexConfig::default(),
            placement: PlacementConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DeclutterConfig {
    /// 从文件加载配置
    ///
    /// 配置加载顺序（优先级从低到高）：
    /// 1. 默认配置（内嵌的 default.toml）
    /// 2. 用户配置文件（可选）
    /// 3. 环境变量（DECLUTTER__ 前缀，使用双下划线分隔嵌套）
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use declutter::config::DeclutterConfig;
    ///
    /// // 加载配置（如果文件不存在，使用默认配置）
    /// let config = DeclutterConfig::from_file("declutter.toml").unwrap();
    /// ```
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            // 1. 加载默认配置（内嵌）
            .add_source(config::File::from_str(
                include_str!("default.toml"),
                config::FileFormat::Toml,
            ))
            // 2. 加载用户配置（可选，不存在不报错）
            .add_source(config::File::with_name(path).required(false))
            // 3. 加载环境变量（DECLUTTER__ 前缀，双下划线分隔嵌套）
            .add_source(
                config::Environment::with_prefix("DECLUTTER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| format!("Failed to load config: {}", e))?;

        Ok(settings
            .try_deserialize()
            .map_err(|e| format!("Failed to parse config: {}", e))?)
    }

    /// 保存配置到文件
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use declutter::config::DeclutterConfig;
    ///
    /// let config = DeclutterConfig::default();
    /// config.save_to_file("declutter.toml").unwrap();
    /// ```
    pub fn save_to_file(&self, path: &str) -> crate::Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, toml_string)
            .map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// 验证配置
    ///
    /// 检查配置的合法性，包括：
    /// - 节点最大条目数
    /// - 扩展距离
    /// - 日志级别与输出
    pub fn validate(&self) -> Result<(), String> {
        if self.index.max_entries < 4 {
            return Err(format!(
                "Index max_entries {} is below the minimum of 4",
                self.index.max_entries
            ));
        }

        if !self.placement.margin.is_finite() || self.placement.margin < 0.0 {
            return Err(format!(
                "Placement margin {} must be a finite, non-negative number",
                self.placement.margin
            ));
        }

        // 验证日志级别
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "Invalid log level: '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ))
            }
        }

        match self.logging.output.as_str() {
            "stderr" | "stdout" | "file" => {}
            _ => {
                return Err(format!(
                    "Invalid log output: '{}'. Must be one of: stderr, stdout, file",
                    self.logging.output
                ))
            }
        }

        // 验证日志文件配置
        if self.logging.output == "file" && self.logging.log_file.is_none() {
            return Err("Log output is 'file' but log_file path is not specified".to_string());
        }

        Ok(())
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        println!("📋 Declutter Configuration:");
        println!("   Max Entries: {}", self.index.max_entries);
        println!();
        println!("   Margin:      {}", self.placement.margin);
        println!(
            "   Statics:     {}",
            if self.placement.static_obstructs {
                "obstructing"
            } else {
                "non-obstructing"
            }
        );
        println!();
        println!("   Log Level:   {}", self.logging.level);
        println!("   Log Output:  {}", self.logging.output);
        if let Some(ref log_file) = self.logging.log_file {
            println!("   Log File:    {}", log_file.display());
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = DeclutterConfig::default();
        assert_eq!(config.index.max_entries, 9);
        assert_eq!(config.placement.margin, 0.0);
        assert!(!config.placement.static_obstructs);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = DeclutterConfig::default();

        // 有效配置
        assert!(config.validate().is_ok());

        // 节点容量过小
        config.index.max_entries = 3;
        assert!(config.validate().is_err());
        config.index.max_entries = 16;

        // 负的或非有限的扩展距离
        config.placement.margin = -1.0;
        assert!(config.validate().is_err());
        config.placement.margin = f64::NAN;
        assert!(config.validate().is_err());
        config.placement.margin = 2.5;
        assert!(config.validate().is_ok());

        // 无效日志级别
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
        config.logging.level = "debug".to_string();

        // 输出到文件但未指定路径
        config.logging.output = "file".to_string();
        assert!(config.validate().is_err());
        config.logging.log_file = Some(PathBuf::from("declutter.log"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("declutter.toml");
        let path = path.to_str().unwrap();

        let mut config = DeclutterConfig::default();
        config.index.max_entries = 12;
        config.placement.margin = 3.0;
        config.placement.static_obstructs = true;

        // 保存
        config.save_to_file(path).unwrap();

        // 加载
        let loaded = DeclutterConfig::from_file(path).unwrap();
        assert_eq!(loaded.index.max_entries, 12);
        assert_eq!(loaded.placement.margin, 3.0);
        assert!(loaded.placement.static_obstructs);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.toml");

        let loaded = DeclutterConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.index, IndexConfig::default());
        assert_eq!(loaded.logging.output, "stderr");
    }
}
