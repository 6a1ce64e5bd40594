//! Sea-ORM entity models backing the guestbook.
//!
//! Three tables: `user` (account rows owned by the credential handlers),
//! `guestbook_message` (the core persisted entity, FK to `user` with cascade
//! on delete), and `session` (serialized session records consumed by the
//! [`SeaOrmStore`](crate::session_store::SeaOrmStore)).

pub mod guestbook_message;
pub mod session;
pub mod user;
