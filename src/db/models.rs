use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted customer row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

/// Fields for a customer that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

/// A set of field changes. `None` leaves the column untouched;
/// for nullable columns `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub company: Option<Option<String>>,
}

impl CustomerChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.company.is_none()
    }
}

impl From<NewCustomer> for CustomerChanges {
    /// Full replacement: every column is written, absent optionals become NULL.
    fn from(c: NewCustomer) -> Self {
        Self {
            name: Some(c.name),
            email: Some(c.email),
            phone: Some(c.phone),
            company: Some(c.company),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_writes_every_column() {
        let changes: CustomerChanges = NewCustomer {
            name: "Bia".into(),
            email: "bia@x.com".into(),
            phone: None,
            company: Some("Acme".into()),
        }
        .into();
        assert_eq!(changes.name.as_deref(), Some("Bia"));
        assert_eq!(changes.email.as_deref(), Some("bia@x.com"));
        assert_eq!(changes.phone, Some(None));
        assert_eq!(changes.company, Some(Some("Acme".to_string())));
    }

    #[test]
    fn empty_changes() {
        assert!(CustomerChanges::default().is_empty());
        assert!(
            !CustomerChanges {
                phone: Some(None),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
