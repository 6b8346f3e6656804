pub mod errors;
pub mod id;
pub mod message;
pub mod notifications;
pub mod outbox;
pub mod registry;

pub use errors::{BridgeError, ConfigError, TrellisError};
pub use id::SurfaceId;
pub use message::{Command, Message, ERROR_FIELD};
pub use notifications::{LogNotifier, Notification, NotificationLevel, NotificationQueue, Notifier};
pub use outbox::Outbox;
pub use registry::{DispatchRegistry, Handler};

/// Result of the host's top-level operations.
pub type Result<T> = std::result::Result<T, TrellisError>;
