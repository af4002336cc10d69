//! Role derivation and route guard across every role and screen.

use civic_core::{Role, RouteDecision, guard};

const GUARDED: [(Role, &str); 3] = [
    (Role::Admin, "/admin/dashboard"),
    (Role::Officer, "/officer/dashboard"),
    (Role::Citizen, "/citizen/dashboard"),
];

const USERS: [(&str, Role); 4] = [
    ("chief@ad.com", Role::Admin),
    ("sanitation1@oi.com", Role::Officer),
    ("citizen1@ui.com", Role::Citizen),
    ("someone@example.com", Role::Unknown),
];

#[test]
fn test_every_user_reaches_only_their_own_dashboard() {
    for (email, role) in USERS {
        assert_eq!(Role::from_email(email), role);

        for (required, path) in GUARDED {
            let decision = guard(Some(email), Some(required), path);
            if required == role {
                assert_eq!(decision, RouteDecision::Allow, "{email} -> {path}");
            } else {
                assert_eq!(
                    decision,
                    RouteDecision::RedirectToLogin {
                        path: role.login_path(),
                        from: path.to_owned(),
                    },
                    "{email} -> {path}"
                );
            }
        }
    }
}

#[test]
fn test_anonymous_visitors_go_home_with_origin() {
    for (required, path) in GUARDED {
        let decision = guard(None, Some(required), path);
        assert_eq!(
            decision.location(),
            Some(format!("/?from={}", path.replace('/', "%2F")))
        );
    }
}

#[test]
fn test_unknown_domain_is_sent_to_citizen_login() {
    let decision = guard(Some("x@gmail.com"), Some(Role::Admin), "/admin/dashboard");
    assert_eq!(
        decision.location().as_deref(),
        Some("/citizen/login?from=%2Fadmin%2Fdashboard")
    );
}

#[test]
fn test_signup_lands_on_role_login() {
    for (_, role) in USERS {
        let landing = role.post_signup_path();
        match role {
            Role::Unknown => assert_eq!(landing, "/"),
            known => assert_eq!(landing, known.login_path()),
        }
    }
}
