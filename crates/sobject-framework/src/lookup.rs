//! # Data Source Lookups
//!
//! A [`Lookup`] reads one existing record of a remote type by an equality
//! filter on a single field, e.g. an `Account` by `Name`. Lookups never
//! create or track anything; they hand back the canonical identifier and
//! the selected attributes.

use crate::cancel::Cancellation;
use crate::error::ReconcileError;
use crate::id::normalize_id;
use crate::resolver::canonicalize;
use crate::schema::ResourceSchema;
use crate::store::RemoteStore;
use crate::value::AttributeValues;
use tracing::{debug, instrument, warn};

/// The record a lookup found.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub id: String,
    pub values: AttributeValues,
}

#[derive(Debug, Clone)]
pub struct Lookup {
    remote_type: &'static str,
    field: &'static str,
    schema: ResourceSchema,
}

impl Lookup {
    /// Looks up `remote_type` records by `field`; `schema` selects the
    /// attributes returned.
    pub fn new(remote_type: &'static str, field: &'static str, schema: ResourceSchema) -> Self {
        Self {
            remote_type,
            field,
            schema,
        }
    }

    pub fn remote_type(&self) -> &'static str {
        self.remote_type
    }

    pub fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    /// Returns the first record whose filter field equals `value`.
    #[instrument(skip(self, store, cancel), fields(remote_type = self.remote_type, field = self.field))]
    pub async fn read_by<S: RemoteStore>(
        &self,
        store: &S,
        value: &str,
        cancel: &Cancellation,
    ) -> Result<LookupResult, ReconcileError> {
        let records = cancel
            .guard(store.query(self.remote_type, self.field, value))
            .await?
            .map_err(|e| {
                warn!(error = %e, "Query failed");
                ReconcileError::remote("Getting", self.remote_type, e)
            })?;

        let Some(record) = records.into_iter().next() else {
            warn!("No match");
            return Err(ReconcileError::LookupEmpty {
                remote_type: self.remote_type,
                filter: format!("{} = '{}'", self.field, value),
            });
        };
        debug!(id = %record.id, "Found");

        let values = record
            .fields
            .to_values(&self.schema)
            .iter()
            .filter_map(|(name, value)| {
                let attr = self.schema.attribute(name)?;
                Some((name.to_string(), canonicalize(attr, value.clone())))
            })
            .collect();
        Ok(LookupResult {
            id: normalize_id(&record.id),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::mock::MockStore;
    use crate::representation::Representation;
    use crate::schema::Attribute;
    use crate::store::Record;
    use crate::value::PlanValue;

    fn license_lookup() -> Lookup {
        Lookup::new(
            "UserLicense",
            "LicenseDefinitionKey",
            ResourceSchema::new("user license")
                .with(Attribute::plain("license_definition_key", "LicenseDefinitionKey"))
                .with(Attribute::plain("name", "Name")),
        )
    }

    #[tokio::test]
    async fn test_read_by_returns_first_match() {
        let mock = MockStore::new();
        mock.expect_query("UserLicense").return_ok(vec![Record {
            id: "100000000000001".into(),
            fields: Representation::new()
                .with("LicenseDefinitionKey", "SFDC")
                .with("Name", "Salesforce")
                .with("CreatedDate", "2024-01-01T00:00:00.000Z"),
        }]);

        let result = license_lookup()
            .read_by(&mock.client(), "SFDC", &Cancellation::none())
            .await
            .unwrap();
        assert_eq!(result.id, "100000000000001AAA");
        assert_eq!(result.values.get("name"), &PlanValue::known("Salesforce"));
        assert_eq!(result.values.len(), 2);
        mock.verify();
    }

    #[tokio::test]
    async fn test_read_by_empty_result() {
        let mock = MockStore::new();
        mock.expect_query("UserLicense").return_ok(vec![]);

        let err = license_lookup()
            .read_by(&mock.client(), "PID_Nothing", &Cancellation::none())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error Getting UserLicense: No UserLicense where LicenseDefinitionKey = 'PID_Nothing'"
        );
    }

    #[tokio::test]
    async fn test_read_by_remote_failure() {
        let mock = MockStore::new();
        mock.expect_query("UserLicense")
            .return_err(StoreError::Remote("INVALID_SESSION_ID".into()));

        let err = license_lookup()
            .read_by(&mock.client(), "SFDC", &Cancellation::none())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error Getting UserLicense: INVALID_SESSION_ID");
    }
}
