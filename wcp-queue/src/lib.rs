pub mod bus;

pub use bus::{cluster_queue_name, Bus, Delivery, FEEDBACK_QUEUE};
