use poem::Request;

use crate::auth::SESSION_COOKIE;
use crate::config::settings::CookieSettings;

/// Best-effort client address for rate limiting and logs
///
/// Checks X-Forwarded-For (proxy/load balancer), then X-Real-IP (nginx),
/// then the socket peer. Falls back to a fixed key so throttling still
/// applies when no address is derivable.
pub fn client_ip(req: &Request) -> String {
    if let Some(forwarded) = req.header("X-Forwarded-For") {
        if let Some(ip) = forwarded.split(',').next() {
            let ip = ip.trim();
            if !ip.is_empty() {
                return ip.to_string();
            }
        }
    }

    if let Some(real_ip) = req.header("X-Real-IP") {
        return real_ip.to_string();
    }

    req.remote_addr()
        .as_socket_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Build the session cookie header value. HttpOnly always; Secure and
/// SameSite come from configuration.
pub fn session_cookie(settings: &CookieSettings, token: &str, max_age: i64) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; Max-Age={}; SameSite={}",
        SESSION_COOKIE, token, max_age, settings.same_site
    );
    if settings.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Expire the session cookie immediately
pub fn clear_session_cookie(settings: &CookieSettings) -> String {
    session_cookie(settings, "", 0)
}
