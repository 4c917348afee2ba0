use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Cookie carrying the admin access token for browser clients.
pub const ADMIN_SESSION_COOKIE: &str = "admin_session";

pub const DEFAULT_PORT: u16 = 8000;
