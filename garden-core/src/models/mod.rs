mod cluster;
mod completion_request;
mod degradation_event;
mod tombstone;
mod user_profile;

pub use cluster::{Cluster, ClusterId, ClusterRecord, DeletionReport, StoredClusterRecord};
pub use completion_request::CompletionRequest;
pub use degradation_event::DegradationEvent;
pub use tombstone::Tombstone;
pub use user_profile::UserProfile;
