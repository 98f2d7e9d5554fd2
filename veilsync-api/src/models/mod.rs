mod command;
mod curtain;
mod page;
mod telemetry;

pub use command::*;
pub use curtain::*;
pub use page::*;
pub use telemetry::*;
