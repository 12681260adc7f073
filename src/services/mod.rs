pub mod notifier;
pub mod session;
pub mod store;
