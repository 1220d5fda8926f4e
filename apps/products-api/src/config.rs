//! Configuration for Products API

use core_config::{
    app_info, cloudinary::CloudinaryConfig, env_bool, server::ServerConfig, AppInfo, FromEnv,
};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub cloudinary: CloudinaryConfig,
    pub environment: Environment,
    /// Reject product creation without at least one image (`IMAGE_UPLOAD_REQUIRED`).
    pub image_upload_required: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?.with_app_name(env!("CARGO_PKG_NAME"));
        let server = ServerConfig::from_env()?;
        let cloudinary = CloudinaryConfig::from_env()?;
        let image_upload_required = env_bool("IMAGE_UPLOAD_REQUIRED", true)?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            cloudinary,
            environment,
            image_upload_required,
        })
    }
}
