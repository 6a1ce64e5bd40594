//! HTTP handlers: feed pages and actions, login/register forms, and the
//! image upload relay. Thin layers over [`crate::guestbook`] and the
//! session provider; the authorization policy itself lives in
//! [`crate::authorize`].

pub mod guestbook;
pub mod images;
pub mod pages;
