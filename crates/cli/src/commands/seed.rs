//! Seed the portal database with demo data.
//!
//! Inserts two department officers, one citizen complaint and a few board
//! messages. Re-running skips rows that already exist.

use civic_core::{Channel, Department, Email, IssueDraft, IssueForm};
use civic_portal::db::{IssueRepository, MessageRepository, OfficerRepository, RepositoryError};
use tracing::info;

use super::connect;

/// Officers loaded by `seed`: email, display name, department.
const DEMO_OFFICERS: [(&str, &str, Department); 2] = [
    ("sanitation1@oi.com", "John Doe", Department::Sanitation),
    ("transport1@oi.com", "Jane Smith", Department::Transport),
];

const DEMO_REPORTER: &str = "citizen1@ui.com";

/// Messages loaded by `seed`: channel, sender, text.
const DEMO_MESSAGES: [(Channel, &str, &str); 3] = [
    (
        Channel::Department(Department::Sanitation),
        "sanitation1@oi.com",
        "Main Street bin is on today's pickup route.",
    ),
    (
        Channel::Department(Department::Transport),
        "transport1@oi.com",
        "Signal timing review scheduled for Friday.",
    ),
    (
        Channel::Admin,
        "admin@ad.com",
        "Weekly department reports are due Monday.",
    ),
];

fn demo_issue() -> IssueForm {
    IssueForm {
        subject: "Overflowing garbage bin".to_owned(),
        details: "Bin at Main Street is overflowing for 2 days".to_owned(),
        area: "Main Street".to_owned(),
        department: Department::Sanitation.slug().to_owned(),
    }
}

/// Load the demo data set.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is missing or a database operation fails.
pub async fn demo_data() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    let officers = OfficerRepository::new(&pool);
    let mut officers_added = 0;
    for (email, name, department) in DEMO_OFFICERS {
        let email = Email::parse(email)?;
        match officers.create(&email, name, Some(department)).await {
            Ok(_) => officers_added += 1,
            Err(RepositoryError::Conflict(_)) => info!(%email, "Officer already present, skipping"),
            Err(e) => return Err(e.into()),
        }
    }

    let issues = IssueRepository::new(&pool);
    let reporter = Email::parse(DEMO_REPORTER)?;
    let draft = IssueDraft::new(&demo_issue())?;
    let existing = issues.list_by_reporter(&reporter).await?;
    let issues_added = if existing.iter().any(|i| i.subject == draft.subject) {
        info!(subject = %draft.subject, "Demo issue already present, skipping");
        0
    } else {
        issues.create(&draft, &reporter).await?;
        1
    };

    let messages = MessageRepository::new(&pool);
    let mut messages_added = 0;
    if messages.list_all().await?.is_empty() {
        for (channel, sender, text) in DEMO_MESSAGES {
            messages.post(channel, &Email::parse(sender)?, text).await?;
            messages_added += 1;
        }
    } else {
        info!("Message board not empty, skipping demo messages");
    }

    info!("Seeding complete!");
    info!("  Officers inserted: {officers_added}");
    info!("  Issues inserted: {issues_added}");
    info!("  Messages inserted: {messages_added}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_core::Role;

    #[test]
    fn test_demo_officers_use_officer_domain() {
        for (email, _, _) in DEMO_OFFICERS {
            assert_eq!(Role::from_email(email), Role::Officer);
        }
    }

    #[test]
    fn test_demo_issue_is_valid() {
        let draft = IssueDraft::new(&demo_issue());
        assert!(draft.is_ok());
        assert_eq!(Role::from_email(DEMO_REPORTER), Role::Citizen);
    }
}
