// Service exports
pub mod provider;
pub mod upstream;
pub mod vision;

pub use provider::ProviderEndpoint;
pub use upstream::{HttpUpstream, Upstream, UpstreamError};
pub use vision::{split_data_url, VisionClient, VisionError};
