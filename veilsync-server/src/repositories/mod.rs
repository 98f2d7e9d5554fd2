mod device_state;
mod history_event;

pub use device_state::DeviceStateRepository;
pub use history_event::HistoryEventRepository;
