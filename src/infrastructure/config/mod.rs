mod settings;

pub use settings::{
    ApiConfig, DatabaseConfig, DraftConfig, LoggingConfig, OtelConfig, RenderConfig,
    ServerConfig, Settings, StorageConfig,
};
