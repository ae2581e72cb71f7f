pub mod display;
pub mod store_ops;
pub mod task_ops;
