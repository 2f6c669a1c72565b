//! # Salesforce Provider Demo
//!
//! Walks one configuration through its whole lifecycle against the
//! in-memory record store:
//! 1. Create an [`Account`](sobject_provider::resources::Account), then change its phone.
//! 2. Look up a license and create a [`Profile`](sobject_provider::resources::Profile) on it.
//! 3. Create a [`User`](sobject_provider::resources::User) with that profile.
//! 4. Tear everything down. The user is deactivated rather than deleted.

use sobject_framework::{AttributeValues, Cancellation, ResourceInstance};
use sobject_provider::config::ProviderConfig;
use sobject_provider::data_sources::user_license_by_definition_key;
use sobject_provider::lifecycle::{setup_tracing, ProviderSystem};
use sobject_provider::resources::{Account, Profile, User};
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ProviderConfig {
        client_id: Some("demo-client".to_string()),
        private_key: Some("demo-key".to_string()),
        api_version: Some("58.0".to_string()),
        username: Some("admin@example.com".to_string()),
        login_url: None,
    };
    let credentials = config.resolve_from_env().map_err(|e| e.to_string())?;

    info!("Starting provider");
    let system = ProviderSystem::new(&credentials, 32);
    let cancel = Cancellation::none();

    // Account
    let mut account = ResourceInstance::new(Account::TYPE_NAME);
    let span = tracing::info_span!("account");
    async {
        let config = AttributeValues::new()
            .with("name", "Acme")
            .with("type", "Customer")
            .with("phone", "555-0100");
        system
            .accounts
            .create(&mut account, &config, &cancel)
            .await?;

        let config = config.with("phone", "555-0199");
        let outcome = system
            .accounts
            .update(&mut account, &config, &cancel)
            .await?;
        info!(?outcome, phone = %account.state().get("phone"), "Account updated");
        Ok::<_, sobject_framework::ReconcileError>(())
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    // Profile on the SFDC license
    let mut profile = ResourceInstance::new(Profile::TYPE_NAME);
    let span = tracing::info_span!("profile");
    async {
        let license = system
            .lookup(&user_license_by_definition_key(), "SFDC", &cancel)
            .await?;
        info!(license_id = %license.id, "License found");

        let config = AttributeValues::new()
            .with("name", "Support Agent")
            .with("user_license_id", license.id);
        system
            .profiles
            .create(&mut profile, &config, &cancel)
            .await?;
        system.profiles.read(&mut profile, &cancel).await?;
        info!(created_date = %profile.state().get("created_date"), "Profile read back");
        Ok::<_, sobject_framework::ReconcileError>(())
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    // User with that profile
    let mut user = ResourceInstance::new(User::TYPE_NAME);
    let span = tracing::info_span!("user");
    async {
        let profile_id = profile
            .identifier()
            .unwrap_or_default()
            .to_string();
        let config = AttributeValues::new()
            .with("alias", "asmith")
            .with("email", "alice@example.com")
            .with("last_name", "Smith")
            .with("profile_id", profile_id)
            .with("username", "alice@example.com.demo");
        system.users.create(&mut user, &config, &cancel).await?;
        info!(
            time_zone = %user.state().get("time_zone_sid_key"),
            "User created with defaults"
        );
        Ok::<_, sobject_framework::ReconcileError>(())
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    // Teardown
    let span = tracing::info_span!("teardown");
    async {
        system.users.delete(&mut user, &cancel).await?;
        system.profiles.delete(&mut profile, &cancel).await?;
        system.accounts.delete(&mut account, &cancel).await?;
        Ok::<_, sobject_framework::ReconcileError>(())
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
