// Wire and sampling models

mod container;
mod host;
mod sample;
mod snapshot;

pub use container::{ContainerListing, ContainerSnapshot, ContainerState};
pub use host::{HostCounters, HostSnapshot, LoadAverage};
pub use sample::RawUsageSample;
pub use snapshot::Snapshot;

/// Bytes per MiB; all memory on the wire is whole MiB.
pub const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Whole MiB, rounded down.
pub fn bytes_to_mib(bytes: u64) -> u64 {
    bytes / BYTES_PER_MIB
}
