pub mod labels;
pub mod logging;
pub mod manifest;

pub use logging::setup_logging;
pub use manifest::kind_from_wire;
