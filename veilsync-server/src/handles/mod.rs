mod command_handle;
mod curtain_handle;

pub use command_handle::*;
pub use curtain_handle::*;
