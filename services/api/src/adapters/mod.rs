pub mod backend;
pub mod notifier;

pub use backend::HttpDatasetSource;
pub use notifier::LogNotifier;
