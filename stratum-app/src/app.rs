//! Application setup: logging and session selection.

use crate::session::{Session, SessionConfig};
use std::error::Error;
use std::path::PathBuf;
use stratum_layer::{Input1dConfig, ModelConfig, UpSampling1dConfig};
use stratum_scene::RetainedScene;
use tracing::info;

/// Logging configuration.
pub struct LoggingConfig {
    pub level: String,
    #[cfg_attr(not(feature = "tracy"), allow(dead_code))]
    pub enable_tracy: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_tracy: cfg!(feature = "tracy"),
        }
    }
}

/// Builder for configuring and running a demo session.
pub struct AppBuilder {
    logging: LoggingConfig,
    session_file: Option<PathBuf>,
    fallback: SessionConfig,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            logging: LoggingConfig::default(),
            session_file: None,
            fallback: SessionConfig {
                model: ModelConfig::default(),
                input: Input1dConfig {
                    width: 4,
                    depth: 3,
                    real_virtual_ratio: 1.0,
                },
                layers: vec![UpSampling1dConfig::with_size(2)],
            },
        }
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.logging.level = level.to_string();
        self
    }

    /// Session used when no file is given: one upsampling layer over an input.
    pub fn with_fallback_chain(mut self, width: usize, depth: usize, size: usize, open: bool) -> Self {
        self.fallback.input.width = width;
        self.fallback.input.depth = depth;
        self.fallback.model.layer_init_status = open;
        self.fallback.layers = vec![UpSampling1dConfig::with_size(size)];
        self
    }

    pub fn with_session_file(mut self, path: PathBuf) -> Self {
        self.session_file = Some(path);
        self
    }

    pub fn run(self) -> Result<(), Box<dyn Error>> {
        self.init_logging();

        let config = match &self.session_file {
            Some(path) => {
                info!("Loading session from {}", path.display());
                SessionConfig::from_path(path)?
            }
            None => self.fallback,
        };

        let mut scene = RetainedScene::new();
        let mut session = Session::build(&config)?;
        session.init(&mut scene)?;
        session.push_values(&mut scene)?;
        session.replay_interactions(&mut scene)?;

        for line in session.summary() {
            println!("{}", line);
        }

        session.dispose(&mut scene)?;
        info!(
            "Scene after teardown: {} groups, {} primitives",
            scene.live_groups(),
            scene.live_primitives()
        );
        Ok(())
    }

    fn init_logging(&self) {
        #[cfg(feature = "tracy")]
        {
            if self.logging.enable_tracy {
                use tracing_subscriber::Layer;
                use tracing_subscriber::layer::SubscriberExt;
                use tracing_subscriber::util::SubscriberInitExt;
                tracing_subscriber::registry()
                    .with(tracing_tracy::TracyLayer::default())
                    .with(
                        tracing_subscriber::fmt::layer().with_filter(
                            tracing_subscriber::EnvFilter::try_from_default_env()
                                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.logging.level)),
                        ),
                    )
                    .init();
                return;
            }
        }

        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.logging.level)),
            )
            .with_target(false)
            .init();
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
