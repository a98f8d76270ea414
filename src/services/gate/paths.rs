//! Path classification and the gateway's well-known locations.
//!
//! Rules are compiled in and read-only for the life of the process. Paths are classified
//! in their canonical form (see [`canonical_path`]). Matching is a plain prefix check
//! (`/admin` also matches `/administrator`), evaluated in table order, so the most
//! specific prefix must be listed first.

use url::form_urlencoded;

use super::decision::RejectReason;
use super::role::Role;

/// Maps a path prefix to the role required to enter it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathRule {
    pub prefix: &'static str,
    pub required: Role,
}

/// Outcome of classifying a request path. Exactly one applies to every path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Static assets, build internals and API routes. The gateway does no work at all.
    Excluded,
    /// The login page. No role required, but guarded against redirect loops.
    Login,
    /// Any other page with no role requirement.
    Public,
    /// Page behind a role.
    Restricted(Role),
}

impl PathClass {
    pub fn required_role(self) -> Option<Role> {
        match self {
            PathClass::Restricted(role) => Some(role),
            _ => None,
        }
    }
}

const DEFAULT_RULES: &[PathRule] = &[
    PathRule {
        prefix: "/admin",
        required: Role::Admin,
    },
    PathRule {
        prefix: "/sales",
        required: Role::Salesperson,
    },
];

const DEFAULT_EXCLUDED: &[&str] = &["/api", "/_next", "/static", "/favicon.ico"];

/// Well-known locations and names the gateway works with.
#[derive(Debug, Clone)]
pub struct GateRoutes {
    pub login_path: &'static str,
    pub unauthorized_path: &'static str,
    pub sales_landing: &'static str,
    /// Query parameter carrying a token in non-production builds.
    pub debug_token_param: &'static str,
    /// Cookie holding the access token.
    pub access_cookie: &'static str,
    pub rules: &'static [PathRule],
    pub excluded_prefixes: &'static [&'static str],
}

impl Default for GateRoutes {
    fn default() -> Self {
        Self {
            login_path: "/login",
            unauthorized_path: "/unauthorized",
            sales_landing: "/sales/dashboard",
            debug_token_param: "token",
            access_cookie: "accessToken",
            rules: DEFAULT_RULES,
            excluded_prefixes: DEFAULT_EXCLUDED,
        }
    }
}

impl GateRoutes {
    pub fn classify(&self, path: &str) -> PathClass {
        if self.excluded_prefixes.iter().any(|p| path.starts_with(p)) {
            return PathClass::Excluded;
        }
        if self.is_login(path) {
            return PathClass::Login;
        }
        self.rules
            .iter()
            .find(|rule| path.starts_with(rule.prefix))
            .map(|rule| PathClass::Restricted(rule.required))
            .unwrap_or(PathClass::Public)
    }

    pub fn is_login(&self, path: &str) -> bool {
        normalize(path) == self.login_path
    }

    /// Landing page for an authenticated user who wandered into an area they do not own.
    pub fn landing_for(&self, role: Role) -> Option<&'static str> {
        match role {
            Role::Salesperson => Some(self.sales_landing),
            Role::Admin | Role::User => None,
        }
    }

    /// `/login?expired=true&redirect=<original path>`
    pub fn login_location(&self, return_to: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("expired", "true")
            .append_pair("redirect", return_to)
            .finish();
        format!("{}?{}", self.login_path, query)
    }

    /// `/unauthorized?reason=<code>`
    pub fn unauthorized_location(&self, reason: RejectReason) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("reason", reason.code())
            .finish();
        format!("{}?{}", self.unauthorized_path, query)
    }
}

/// Canonical form of a raw request path: percent-decoded once, `\` read as `/`, empty and
/// `.` segments dropped, `..` resolved (never above the root), no trailing slash.
///
/// Every path goes through here before classification, so `/%61dmin`, `//admin` and
/// `/api/../admin` all land on `/admin`. Bytes that are not UTF-8 after decoding become
/// U+FFFD; the result is still classified, never rejected.
pub fn canonical_path(raw: &str) -> String {
    let decoded = urlencoding::decode_binary(raw.as_bytes());
    let decoded = String::from_utf8_lossy(&decoded).replace('\\', "/");

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Strips a trailing slash so `/login/` and `/login` compare equal. `/` is left alone.
pub fn normalize(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_paths_short_circuit() {
        let routes = GateRoutes::default();
        for path in [
            "/api/v1/health",
            "/_next/static/chunk.js",
            "/static/logo.png",
            "/favicon.ico",
        ] {
            assert_eq!(routes.classify(path), PathClass::Excluded, "{path}");
        }
    }

    #[test]
    fn restricted_areas_map_to_roles() {
        let routes = GateRoutes::default();
        assert_eq!(
            routes.classify("/admin/orders"),
            PathClass::Restricted(Role::Admin)
        );
        assert_eq!(routes.classify("/admin"), PathClass::Restricted(Role::Admin));
        assert_eq!(
            routes.classify("/sales/dashboard"),
            PathClass::Restricted(Role::Salesperson)
        );
    }

    #[test]
    fn everything_else_is_public() {
        let routes = GateRoutes::default();
        assert_eq!(routes.classify("/"), PathClass::Public);
        assert_eq!(routes.classify("/products/42"), PathClass::Public);
        assert_eq!(routes.classify("/unauthorized"), PathClass::Public);
    }

    #[test]
    fn login_is_its_own_class() {
        let routes = GateRoutes::default();
        assert_eq!(routes.classify("/login"), PathClass::Login);
        assert_eq!(routes.classify("/login/"), PathClass::Login);
        assert_eq!(routes.classify("/login").required_role(), None);
    }

    #[test]
    fn login_location_encodes_return_path() {
        let routes = GateRoutes::default();
        assert_eq!(
            routes.login_location("/admin/orders"),
            "/login?expired=true&redirect=%2Fadmin%2Forders"
        );
    }

    #[test]
    fn unauthorized_location_carries_reason() {
        let routes = GateRoutes::default();
        assert_eq!(
            routes.unauthorized_location(RejectReason::AuthError),
            "/unauthorized?reason=auth-error"
        );
    }

    #[test]
    fn canonical_path_resolves_disguised_admin_paths() {
        for raw in [
            "/%61dmin/orders",
            "/api/../admin/orders",
            "//admin/orders",
            "/static/../admin/orders",
            "/./admin//orders/",
            "/%2e%2e/admin/orders",
            "\\admin\\orders",
        ] {
            assert_eq!(canonical_path(raw), "/admin/orders", "{raw}");
        }
    }

    #[test]
    fn canonical_path_stays_under_root() {
        assert_eq!(canonical_path("/../../etc"), "/etc");
        assert_eq!(canonical_path(""), "/");
        assert_eq!(canonical_path("/"), "/");
        assert_eq!(canonical_path("/%ff"), "/\u{fffd}");
    }

    #[test]
    fn canonical_forms_classify_as_restricted() {
        let routes = GateRoutes::default();
        for raw in ["/%61dmin/orders", "/api/../admin/orders", "/static/../admin/orders"] {
            assert_eq!(
                routes.classify(&canonical_path(raw)),
                PathClass::Restricted(Role::Admin),
                "{raw}"
            );
        }
        assert_eq!(
            routes.classify(&canonical_path("/api/v1/health")),
            PathClass::Excluded
        );
    }

    #[test]
    fn normalize_keeps_root() {
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("/login/"), "/login");
        assert_eq!(normalize("/login"), "/login");
    }
}
