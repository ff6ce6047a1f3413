pub mod trash_gateway;

pub use trash_gateway::TrashGateway;
