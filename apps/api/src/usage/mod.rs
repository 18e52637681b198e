// Per-user daily usage limits for AI operations.

pub mod handlers;
pub mod quota;
