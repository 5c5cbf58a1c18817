//! Client-side authentication session for the invoice app.
//!
//! SYSTEM CONTEXT
//! ==============
//! The view layer dispatches [`Action`]s into a [`SessionStore`], which runs the
//! pure [`reduce`] function and mirrors `token`/`user` into a persistent
//! [`KeyValueStore`]. On startup the store rehydrates from that storage via
//! [`initialize`]. Route components consult [`guard`] before rendering
//! anything private.
//!
//! DESIGN
//! ======
//! Token presence is the only authentication signal. The reducer never reads
//! storage; it only describes the writes it wants ([`StorageEffect`]) so the
//! transition itself stays deterministic and testable without I/O.

pub mod action;
pub mod guard;
pub mod reducer;
pub mod session;
pub mod storage;
pub mod store;
pub mod user;

pub use action::Action;
pub use guard::{Access, Route, guard};
pub use reducer::{LOGGED_OUT_MESSAGE, StorageEffect, reduce, transition};
pub use session::Session;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError, TOKEN_KEY, USER_KEY};
pub use store::{SessionStore, initialize};
pub use user::User;

#[cfg(feature = "hydrate")]
pub use storage::BrowserStorage;
