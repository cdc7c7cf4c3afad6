pub mod errors;
pub mod kinds;
pub mod messages;
pub mod model;

pub use errors::WcpError;
pub use kinds::{ComponentKind, ComponentStatus};
pub use messages::BusMessage;
pub use model::{Workload, WorkloadComponent, WorkloadDetails, WorkloadTimeSummary};
