pub mod notification_handlers;
pub mod notification_models;
pub mod notification_repository;
pub mod notification_router;
pub mod templates;

pub use notification_models::{
    DeliveryChannel, Notification, NotificationType, RoutingTable, TemplateData,
};
pub use notification_repository::NotificationRepository;
pub use notification_router::{NotificationOutcome, NotificationRequest, NotificationRouter};
