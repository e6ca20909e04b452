mod request;
mod response;

pub use request::{FindRequest, ListParams, LocationPayload, StatisticsParams};
pub use response::{HealthResponse, StoreHealth};
