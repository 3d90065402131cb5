//! Session gate: decide whether the dashboard may open

use log::{info, warn};

use crate::api::DocumentApi;
use crate::models::User;

/// Result of validating the session at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed(User),
    /// Any failure, network included, sends the user back to log in
    RedirectToLogin,
}

pub fn verify_session(api: &dyn DocumentApi) -> GateDecision {
    match api.me() {
        Ok(user) => {
            info!("Session verified for {}", user.username);
            GateDecision::Proceed(user)
        }
        Err(e) => {
            warn!("Session check failed: {}", e);
            GateDecision::RedirectToLogin
        }
    }
}
