mod classifier;
mod command_service;
mod decoder;
mod dispatcher;
mod gateway;
mod ingest_service;
mod query_service;

pub use classifier::*;
pub use command_service::*;
pub use decoder::*;
pub use dispatcher::*;
pub use gateway::*;
pub use ingest_service::*;
pub use query_service::*;
