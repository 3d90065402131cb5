//! Directory loader: users that documents can be sent to

use log::error;

use crate::api::DocumentApi;
use crate::models::Recipient;

/// Load the recipient directory, in server order
///
/// Failures leave the selector empty; they are logged, never surfaced.
pub fn load_recipients(api: &dyn DocumentApi) -> Vec<Recipient> {
    match api.users() {
        Ok(users) => users,
        Err(e) => {
            error!("Error loading users: {}", e);
            Vec::new()
        }
    }
}
