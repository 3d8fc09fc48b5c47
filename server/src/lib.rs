//! # Leaderboard Server Library
//!
//! HTTP gateway that accepts finished-game scores and serves the ranked
//! leaderboard. The game itself runs entirely on the client; this server only
//! sees the final `{name, score, level}` of each session.
//!
//! ## Endpoints
//!
//! - `POST /leaderboard` validates and stores a submission, answering with the
//!   rank it landed at (1 + number of strictly higher scores)
//! - `GET /leaderboard` returns the top ten rows, highest score first, equal
//!   scores in insertion order
//!
//! ## Validation
//!
//! Every submission goes through the same checks:
//! - Body must parse as JSON with an integer score and level
//! - Name is 1 to 20 characters after trimming
//! - Score and level are positive
//! - Score is at most `level * 100 * 2` and never above 100000, unless the
//!   plausibility check is disabled
//! - The `Origin` header matches, when an allowed origin is configured
//!
//! ## Storage
//!
//! Rows live in memory behind an async read-write lock. Given a snapshot path,
//! the store rewrites a bincode snapshot after every insert and reloads it on
//! startup. A snapshot that fails to load leaves the server running with an
//! unavailable store, answering 500 until restarted.
//!
//! ## Modules
//!
//! - [`network`]: router, handlers and the listener wrapper
//! - [`store`]: ranked score storage and snapshotting
//! - [`error`]: request failures and their HTTP status codes

pub mod error;
pub mod network;
pub mod store;
