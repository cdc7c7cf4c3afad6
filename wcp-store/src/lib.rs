pub mod db;
pub mod records;
pub mod repo;

pub use db::connect_postgres;
pub use repo::cluster::{ClusterRepo, DbClusterRepo};
pub use repo::component::{ComponentRepo, DbComponentRepo};
pub use repo::project::{DbProjectRepo, Project, ProjectRepo};
pub use repo::stats::{DbStatsRepo, StatsRepo, StatusCount};
pub use repo::time_summary::{DbTimeSummaryRepo, TimeSummaryRepo};
pub use repo::workload::{DbWorkloadRepo, WorkloadRepo};
