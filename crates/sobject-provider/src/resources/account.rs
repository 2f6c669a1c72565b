use sobject_framework::{Attribute, ManagedResource, RemoteType, ResourceSchema, ValidationRule};

/// Account types accepted by the remote store.
pub const ACCOUNT_TYPES: [&str; 3] = ["Customer", "Prospect", "Partner"];

/// A business account.
#[derive(Debug, Clone)]
pub struct Account {
    schema: ResourceSchema,
}

impl Account {
    pub const TYPE_NAME: &'static str = "Account";

    pub fn new() -> Self {
        let schema = ResourceSchema::new("Account Resource for the Salesforce Provider")
            .with(
                Attribute::plain("name", "Name")
                    .required()
                    .validate(ValidationRule::NonEmpty),
            )
            .with(Attribute::plain("account_number", "AccountNumber"))
            .with(
                Attribute::plain("type", "Type")
                    .validate(ValidationRule::optional_one_of(&ACCOUNT_TYPES)),
            )
            .with(Attribute::plain("industry", "Industry"))
            .with(Attribute::plain("phone", "Phone"))
            .with(Attribute::plain("website", "Website"));
        Self { schema }
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteType for Account {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}

impl ManagedResource for Account {
    fn schema(&self) -> &ResourceSchema {
        &self.schema
    }
}
