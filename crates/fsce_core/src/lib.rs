pub mod animation;
pub mod error;
pub mod input;
pub mod notify;
pub mod policy;
pub mod time;

pub use animation::AnimationFrame;
pub use error::{EngineError, EngineResult};
pub use input::{Action, ActionKind, ActionQueue};
pub use notify::{ErrorSink, LogSink, Notification, NotificationLog};
pub use policy::FrameErrorPolicy;
pub use time::TimeState;

/// Grid cell edge lengths, in pixels, the engine accepts.
pub const SUPPORTED_ITEM_SIZES: [u32; 6] = [8, 16, 32, 64, 128, 256];
