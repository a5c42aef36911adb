use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub intake: IntakeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 后端 API 地址 (同时承载文档解析接口和 /docs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    pub max_file_size_mb: u64,
    /// 文件选择框上传是否也校验扩展名 (拖拽上传总是校验)
    pub validate_picker_uploads: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            backend: BackendConfig {
                base_url: "http://127.0.0.1:8003".to_string(),
            },
            intake: IntakeConfig {
                max_file_size_mb: 10,
                validate_picker_uploads: true,
            },
        }
    }
}

impl AppConfig {
    /// 加载顺序: 默认值 -> gateway.toml (可选) -> GATEWAY__* 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("gateway")
    }

    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("backend.base_url", defaults.backend.base_url)?
            .set_default("intake.max_file_size_mb", defaults.intake.max_file_size_mb as i64)?
            .set_default(
                "intake.validate_picker_uploads",
                defaults.intake.validate_picker_uploads,
            )?
            .add_source(File::with_name(file_stem).required(false))
            .add_source(
                Environment::with_prefix("GATEWAY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
