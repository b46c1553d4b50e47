//! Best-effort notification fan-out.

pub mod channel;
pub mod dispatcher;
pub mod email;
pub mod in_app;
pub mod webhook;

pub use channel::NotificationChannel;
pub use dispatcher::{
    ChannelOutcome, ChannelReport, DispatchReport, NotificationDispatcher, RetryPolicy,
};
pub use email::EmailChannel;
pub use in_app::InAppChannel;
pub use webhook::WebhookChannel;
