//! External collaborators of the booking saga and their in-memory implementations.

pub mod gateway;
pub mod notification;

pub use gateway::InMemoryPaymentGateway;
pub use notification::{
    InMemoryNotificationService, Notification, NotificationError, NotificationService,
};
