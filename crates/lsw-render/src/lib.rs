//! Logic Stories secure renderer
//!
//! All writes into the page go through [`SecureDom`]: element construction
//! from typed [`Attributes`], literal text insertion, atomic content
//! replacement and the canned loading/error/empty states. Strings handed to
//! the renderer are stored as text and escaped on serialization; nothing is
//! ever parsed as markup.

mod attrs;
mod dashboard;
mod flags;
mod gamification;
mod models;
mod secure;
mod template;
mod timers;
mod user_table;

pub use attrs::{Attribute, AttrValue, Attributes};
pub use dashboard::{MessageKind, ShownMessage, MESSAGE_AUTO_HIDE};
pub use gamification::{
    is_gamification_page, level_for, next_level, Action, ActivityStats, Badge, Level, Progress, Requirement,
    BADGES, BADGE_NOTICE_STAGGER, GAMIFICATION_PAGES, LEVELS, PROGRESS_ENDPOINT,
};
pub use models::{Curriculum, DashboardUser, OpenFlag, Topic, UserRecord};
pub use secure::{Content, Placeholder, SecureDom};
pub use template::{create_template, sanitize_html};
pub use timers::{
    clamp_interval, clamp_timeout, safe_interval, safe_timeout, TimerHandle,
    DEFAULT_INTERVAL_MS, DEFAULT_MAX_DELAY_MS, MIN_INTERVAL_MS,
};
pub use user_table::{FilterColumn, UnknownColumn, UserFilter};

pub use lsw_dom::{Document, NodeId};

/// Result type for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Renderer error. Only raised for programmer error, never for content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid tag: {0:?}")]
    InvalidTag(String),

    #[error("Invalid attribute name: {0:?}")]
    InvalidAttribute(String),

    #[error(transparent)]
    Dom(#[from] lsw_dom::DomError),
}
