//! Render model for the dashboard's document lists
//!
//! Plain data built from `DocumentLists` through the status classifier.
//! Front ends turn it into markup or terminal text.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::models::{Document, DocumentId, DocumentLists};
use crate::status::AccessState;

/// Placeholder shown instead of an empty list
pub const NO_DOCUMENTS: &str = "No documents";
/// Shown when a document has no expiration
pub const NO_EXPIRATION: &str = "No expiration";

/// Which side of the exchange a list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListKind {
    Sent,
    Received,
}

impl ListKind {
    /// Label for the other party of a document in this list
    pub fn counterpart_label(self) -> &'static str {
        match self {
            ListKind::Sent => "To:",
            ListKind::Received => "From:",
        }
    }

    /// Label of the download action in this list
    pub fn action_label(self) -> &'static str {
        match self {
            ListKind::Sent => "View",
            ListKind::Received => "View/Download",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BadgeTone {
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub tone: BadgeTone,
}

impl Badge {
    pub fn for_state(state: AccessState) -> Option<Self> {
        let tone = match state {
            AccessState::Active => return None,
            AccessState::NearLimit => BadgeTone::Warning,
            AccessState::LimitReached | AccessState::Expired => BadgeTone::Danger,
        };
        state.label().map(|label| Badge { label, tone })
    }
}

/// One rendered document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentCard {
    pub id: DocumentId,
    pub filename: String,
    pub counterpart_label: &'static str,
    pub counterpart: String,
    /// `"8 / 10"`, or just `"8"` when unlimited
    pub views: String,
    pub expires: String,
    pub created: String,
    #[serde(skip)]
    pub state: AccessState,
    pub badge: Option<Badge>,
    /// Present only when the document is download-eligible
    pub action: Option<&'static str>,
}

impl DocumentCard {
    pub fn from_document(doc: &Document, kind: ListKind) -> Self {
        let state = doc.access_state();
        let counterpart = match kind {
            ListKind::Sent => doc.recipient_username.clone(),
            ListKind::Received => doc.sender_username.clone(),
        };
        let views = match doc.view_limit {
            Some(limit) if limit > 0 => format!("{} / {}", doc.view_count, limit),
            _ => doc.view_count.to_string(),
        };
        let expires = doc
            .expires_at
            .map(format_timestamp)
            .unwrap_or_else(|| NO_EXPIRATION.to_string());

        Self {
            id: doc.id.clone(),
            filename: doc.filename.clone(),
            counterpart_label: kind.counterpart_label(),
            counterpart,
            views,
            expires,
            created: format_timestamp(doc.created_at),
            state,
            badge: Badge::for_state(state),
            action: doc.is_download_eligible().then(|| kind.action_label()),
        }
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }
}

/// A rendered list: either cards or the explicit placeholder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ListView {
    Empty { placeholder: &'static str },
    Cards(Vec<DocumentCard>),
}

impl ListView {
    pub fn render(documents: &[Document], kind: ListKind) -> Self {
        if documents.is_empty() {
            return ListView::Empty { placeholder: NO_DOCUMENTS };
        }
        ListView::Cards(
            documents
                .iter()
                .map(|doc| DocumentCard::from_document(doc, kind))
                .collect(),
        )
    }

    pub fn cards(&self) -> &[DocumentCard] {
        match self {
            ListView::Empty { .. } => &[],
            ListView::Cards(cards) => cards,
        }
    }
}

/// Both lists as rendered after a refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub sent: ListView,
    pub received: ListView,
    pub rendered_at: DateTime<Utc>,
}

impl DashboardView {
    pub fn render(lists: &DocumentLists) -> Self {
        Self {
            sent: ListView::render(&lists.sent, ListKind::Sent),
            received: ListView::render(&lists.received, ListKind::Received),
            rendered_at: Utc::now(),
        }
    }

    pub fn list(&self, kind: ListKind) -> &ListView {
        match kind {
            ListKind::Sent => &self.sent,
            ListKind::Received => &self.received,
        }
    }
}

/// Timestamps in the viewer's local time, e.g. `5/1/2024, 9:15:00 AM`
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn doc(id: &str, count: u32, limit: Option<u32>, expired: bool, limit_reached: bool) -> Document {
        Document {
            id: DocumentId::new(id),
            filename: format!("{id}.pdf"),
            sender_id: Some(1),
            sender_username: "alice".into(),
            recipient_id: Some(2),
            recipient_username: "bob".into(),
            view_count: count,
            view_limit: limit,
            expires_at: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 15, 0).unwrap(),
            is_expired: expired,
            is_limit_reached: limit_reached,
        }
    }

    #[test]
    fn test_empty_list_renders_placeholder() {
        let view = ListView::render(&[], ListKind::Sent);
        assert_eq!(view, ListView::Empty { placeholder: "No documents" });
        assert!(view.cards().is_empty());
    }

    #[test]
    fn test_near_limit_card_keeps_action() {
        let card = DocumentCard::from_document(&doc("d1", 8, Some(10), false, false), ListKind::Received);
        assert_eq!(card.state, AccessState::NearLimit);
        assert_eq!(card.badge, Some(Badge { label: "Near limit", tone: BadgeTone::Warning }));
        assert_eq!(card.action, Some("View/Download"));
        assert_eq!(card.views, "8 / 10");
        assert_eq!(card.counterpart_label, "From:");
        assert_eq!(card.counterpart, "alice");
        assert_eq!(card.expires, NO_EXPIRATION);
    }

    #[test]
    fn test_ineligible_cards_have_no_action() {
        let expired = DocumentCard::from_document(&doc("d1", 0, None, true, false), ListKind::Sent);
        assert_eq!(expired.badge.as_ref().map(|b| b.label), Some("Expired"));
        assert_eq!(expired.action, None);

        let reached = DocumentCard::from_document(&doc("d2", 3, Some(3), false, true), ListKind::Sent);
        assert_eq!(reached.badge, Some(Badge { label: "Limit reached", tone: BadgeTone::Danger }));
        assert!(!reached.has_action());
    }

    #[test]
    fn test_sent_card() {
        let card = DocumentCard::from_document(&doc("d1", 2, None, false, false), ListKind::Sent);
        assert_eq!(card.badge, None);
        assert_eq!(card.action, Some("View"));
        assert_eq!(card.views, "2");
        assert_eq!(card.counterpart_label, "To:");
        assert_eq!(card.counterpart, "bob");
    }
}
