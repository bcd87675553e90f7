// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ChatMessage, ErrorKind, ModelCandidateList, PairingRequest, ProviderKind, ProxyFailure, ProxyResult, UpstreamAttempt, Vintage, WineSummary};
pub use requests::{ContentEntry, ContentPart, FoodForWineRequest, LabelScanRequest, ProxyRequest, WineForFoodRequest};
pub use responses::{ErrorResponse, HealthResponse, LabelScanError, LabelScanResponse, ProviderStatus, ProxyErrorBody, SuggestionResponse};
