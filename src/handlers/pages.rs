//! HTML pages. Small server-rendered forms and lists, no template engine.

use axum::response::Html;

use crate::entity::guestbook_message;

/// `GET /login`: the sign-in form. Only reachable without a session; the
/// hook redirects signed-in users to `/app`.
pub async fn login_page() -> Html<&'static str> {
    Html(
        r#"
        <html>
            <head><title>Sign in - Guestbook</title></head>
            <body>
                <h1>Sign in</h1>
                <form action="/login" method="post">
                    <label>Email: <input type="email" name="email" required></label><br><br>
                    <label>Password: <input type="password" name="password" required></label><br><br>
                    <button type="submit">Sign in</button>
                </form>
                <p>No account? <a href="/register">Register</a></p>
            </body>
        </html>
        "#,
    )
}

/// `GET /register`: the account-creation form.
pub async fn register_page() -> Html<&'static str> {
    Html(
        r#"
        <html>
            <head><title>Register - Guestbook</title></head>
            <body>
                <h1>Register</h1>
                <form action="/register" method="post">
                    <label>Name: <input type="text" name="name"></label><br><br>
                    <label>Email: <input type="email" name="email" required></label><br><br>
                    <label>Password: <input type="password" name="password" required></label><br><br>
                    <button type="submit">Create account</button>
                </form>
                <p>Already registered? <a href="/login">Sign in</a></p>
            </body>
        </html>
        "#,
    )
}

/// The public feed with the submission form.
pub fn public_feed_page(entries: &[(String, String)]) -> String {
    let items: String = entries
        .iter()
        .map(|(entry, author)| format!("<li>{entry} &mdash; {}</li>\n", escape(author)))
        .collect();

    format!(
        r#"
        <html>
            <head><title>Guestbook</title></head>
            <body>
                <h1>Guestbook</h1>
                <form action="/" method="post">
                    <label>Message: <input type="text" name="message"></label>
                    <button type="submit">Sign the guestbook</button>
                </form>
                <ul>
                {items}
                </ul>
                <p><a href="/app">My messages</a> | <a href="/login">Sign in</a></p>
            </body>
        </html>
        "#,
    )
}

/// The signed-in user's own messages.
pub fn private_feed_page(name: &str, entries: &[String]) -> String {
    let items: String = entries
        .iter()
        .map(|entry| format!("<li>{entry}</li>\n"))
        .collect();

    format!(
        r#"
        <html>
            <head><title>My messages - Guestbook</title></head>
            <body>
                <h1>Welcome, {}</h1>
                <form action="/app" method="post">
                    <label>Message: <input type="text" name="message"></label>
                    <button type="submit">Sign the guestbook</button>
                </form>
                <ul>
                {items}
                </ul>
                <form action="/logout" method="post"><button type="submit">Sign out</button></form>
                <p><a href="/">Public feed</a></p>
            </body>
        </html>
        "#,
        escape(name),
    )
}

/// One feed entry: escaped message text plus its metadata.
pub fn format_entry(message: &guestbook_message::Model) -> String {
    let country = message.country.as_deref().unwrap_or("Unknown");
    format!(
        "{} <small>({}, {})</small>",
        escape(&message.message),
        escape(country),
        escape(&message.created_at),
    )
}

// Minimal HTML escaping for user-supplied text.
fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_in_messages() {
        assert_eq!(escape("<b>&\"hi\""), "&lt;b&gt;&amp;&quot;hi&quot;");
    }
}
