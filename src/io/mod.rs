pub mod config_io;
pub mod lane_store;
pub mod logging;
