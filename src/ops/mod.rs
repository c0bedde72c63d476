pub mod import;
pub mod split;
pub mod stats;
pub mod task_ops;
