pub mod http_trash_gateway;

pub use http_trash_gateway::HttpTrashGateway;
