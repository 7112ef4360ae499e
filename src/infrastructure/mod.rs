// Infrastructure layer - External dependencies and adapters
pub mod chunked_json;
pub mod config;
pub mod envelope_mapper;
pub mod http_poller;
pub mod websocket_transport;
