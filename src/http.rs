pub mod bearer_token;
pub mod conversions;
pub mod extractors;
pub mod handlers;
pub mod middleware;
