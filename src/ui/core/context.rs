use crate::{backends::Services, config::Config, logger::Logger};

/// Shared handles every view may need
#[derive(Clone)]
pub struct AppContext {
    pub services: Services,
    pub config: Config,
    pub logger: Logger,
}

impl AppContext {
    pub fn new(services: Services, config: Config, logger: Logger) -> Self {
        Self {
            services,
            config,
            logger,
        }
    }
}
