// Config layer - bootstrap, tunables, logging
pub mod application_settings;
pub mod bootstrap_settings;
pub mod logging;

pub use application_settings::ApplicationSettings;
pub use bootstrap_settings::BootstrapSettings;
pub use logging::init_logging;
