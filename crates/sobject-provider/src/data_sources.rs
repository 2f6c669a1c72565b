//! # Data Sources
//!
//! Read-only lookups of existing records by one field:
//!
//! | Data source | Record type | Filter field |
//! |-------------|-------------|--------------|
//! | [`account_by_name`] | `Account` | `Name` |
//! | [`profile_by_name`] | `Profile` | `Name` |
//! | [`user_license_by_definition_key`] | `UserLicense` | `LicenseDefinitionKey` |

use sobject_framework::{Attribute, Lookup, ResourceSchema};

pub fn account_by_name() -> Lookup {
    Lookup::new(
        "Account",
        "Name",
        ResourceSchema::new("Account Data Source for the Salesforce Provider")
            .with(Attribute::plain("name", "Name"))
            .with(Attribute::plain("account_number", "AccountNumber"))
            .with(Attribute::plain("type", "Type"))
            .with(Attribute::plain("industry", "Industry"))
            .with(Attribute::plain("phone", "Phone"))
            .with(Attribute::plain("website", "Website")),
    )
}

pub fn profile_by_name() -> Lookup {
    Lookup::new(
        "Profile",
        "Name",
        ResourceSchema::new("Profile Data Source for the Salesforce Provider")
            .with(Attribute::plain("name", "Name")),
    )
}

pub fn user_license_by_definition_key() -> Lookup {
    Lookup::new(
        "UserLicense",
        "LicenseDefinitionKey",
        ResourceSchema::new("User License Data Source for the Salesforce Provider")
            .with(Attribute::plain("license_definition_key", "LicenseDefinitionKey")),
    )
}
