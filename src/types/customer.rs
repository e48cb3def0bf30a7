//! JSON request bodies for the customer routes.
//!
//! Every field is optional at the serde level so that missing or blank
//! required fields surface as our own validation errors.

use serde::{Deserialize, Deserializer};

use crate::db::models::{CustomerChanges, NewCustomer};
use crate::error::CrmError;

/// Body of `POST /customers` and `PUT /customers/{id}`.
/// An `id` key, if present, is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

impl CustomerPayload {
    pub fn into_new_customer(self) -> Result<NewCustomer, CrmError> {
        Ok(NewCustomer {
            name: required("name", self.name)?,
            email: required("email", self.email)?,
            phone: self.phone,
            company: self.company,
        })
    }
}

/// Body of `PATCH /customers/{id}`. Absent keys are left unchanged,
/// `null` clears `phone`/`company` and is rejected for `name`/`email`.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub company: Option<Option<String>>,
}

impl CustomerPatch {
    pub fn into_changes(self) -> Result<CustomerChanges, CrmError> {
        Ok(CustomerChanges {
            name: self.name.map(|v| required("name", v)).transpose()?,
            email: self.email.map(|v| required("email", v)).transpose()?,
            phone: self.phone,
            company: self.company,
        })
    }
}

/// Marks a key as present even when its value is `null`.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn required(field: &str, value: Option<String>) -> Result<String, CrmError> {
    match value {
        None => Err(CrmError::validation(format!(
            "missing required field `{field}`"
        ))),
        Some(v) if v.trim().is_empty() => {
            Err(CrmError::validation(format!("`{field}` must not be empty")))
        }
        Some(v) => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(v: serde_json::Value) -> CustomerPayload {
        serde_json::from_value(v).unwrap()
    }

    fn patch(v: serde_json::Value) -> CustomerPatch {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn create_requires_name_and_email() {
        let err = payload(json!({"email": "ana@x.com"}))
            .into_new_customer()
            .unwrap_err();
        assert!(err.to_string().contains("`name`"));

        let err = payload(json!({"name": "Ana", "email": "   "}))
            .into_new_customer()
            .unwrap_err();
        assert!(err.to_string().contains("`email` must not be empty"));
    }

    #[test]
    fn create_ignores_client_supplied_id() {
        let new = payload(json!({"id": 99, "name": "Ana", "email": "ana@x.com", "phone": "123"}))
            .into_new_customer()
            .unwrap();
        assert_eq!(new.name, "Ana");
        assert_eq!(new.phone.as_deref(), Some("123"));
        assert_eq!(new.company, None);
    }

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let changes = patch(json!({"phone": null, "company": "Acme"}))
            .into_changes()
            .unwrap();
        assert_eq!(changes.name, None);
        assert_eq!(changes.email, None);
        assert_eq!(changes.phone, Some(None));
        assert_eq!(changes.company, Some(Some("Acme".to_string())));
    }

    #[test]
    fn patch_rejects_clearing_required_fields() {
        assert!(matches!(
            patch(json!({"name": null})).into_changes(),
            Err(CrmError::Validation(_))
        ));
        assert!(matches!(
            patch(json!({"email": ""})).into_changes(),
            Err(CrmError::Validation(_))
        ));
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        assert!(patch(json!({})).into_changes().unwrap().is_empty());
    }
}
