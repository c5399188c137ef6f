pub mod connectivity;
pub mod engine;
pub mod error;
pub mod mealdb;
pub mod remote;

// Re-export commonly used types and functions
pub use connectivity::{Connectivity, ConnectivityMode, ConnectivityState};
pub use engine::{ImportOutcome, SyncEngine, SyncHandle};
pub use error::SyncError;
pub use mealdb::MealDbClient;
pub use remote::{
    BatchWrite, Disconnected, Identity, RemoteStore, SearchProvider, SnapshotEvent, Subscription,
};
