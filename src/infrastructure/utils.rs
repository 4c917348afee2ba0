pub mod forms;
pub mod markdown;
