// Library for tests to access modules

pub mod broadcast;
pub mod client;
pub mod config;
pub mod docker_repo;
pub mod estimator;
pub mod models;
pub mod platform;
pub mod routes;
pub mod sampler;
pub mod snapshot_cache;
pub mod sysinfo_repo;
pub mod worker;
