//! Domain models for Stagecast

mod event;
mod overlay;
mod schedule;
mod user;
mod webhook;
mod webinar;

pub use event::{CountdownTimer, CtaButton, IntervalEvent, ScriptedMessage};
pub use overlay::{LayoutAxis, OverlayPosition};
pub use schedule::Schedule;
pub use user::{AuthSession, User, UserRole};
pub use webhook::{Webhook, WebhookEvent};
pub use webinar::Webinar;
