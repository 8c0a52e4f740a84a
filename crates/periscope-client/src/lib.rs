pub mod backend;
pub mod http;

pub use backend::AgentBackend;
pub use http::HttpAgentBackend;
