pub mod engine;
pub mod mailbox;
pub mod subscription;
pub mod topic;

pub use engine::Broker;
pub use mailbox::Mailbox;
pub use subscription::Subscription;

#[cfg(test)]
mod tests;
