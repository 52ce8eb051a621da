use actionpack_action::ActionRegistry;
use actionpack_terraform::actions::HOST_URL;
use tracing::{debug, warn};

use crate::config::CliConfig;

const CREATE_VARIABLES: &str = "Create Variables";

/// Register every content-pack action and apply the configured defaults.
pub fn build_registry(config: &CliConfig) -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    let packs = [
        actionpack_excel::actions(),
        actionpack_ldap::actions(),
        actionpack_mail::actions(),
        actionpack_ocr::actions_with_tools(&config.ocr),
        actionpack_terraform::actions(),
        actionpack_utilities::actions(),
    ];
    for action in packs.into_iter().flatten() {
        registry.register(action);
    }

    let mut defaults = config.defaults.clone();
    if let Some(host_url) = &config.terraform.host_url {
        defaults
            .entry(CREATE_VARIABLES.to_owned())
            .or_default()
            .entry(HOST_URL.to_owned())
            .or_insert_with(|| host_url.clone());
    }
    for (action, values) in defaults {
        if registry.get(&action).is_none() {
            warn!(action = %action, "defaults configured for an unknown action");
        }
        registry.set_defaults(action, values);
    }

    debug!(actions = registry.len(), "registry built");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_pack() {
        let registry = build_registry(&CliConfig::default());
        for name in [
            "Get Cell",
            "Modify Cell",
            "Delete Cell",
            "Add Excel Data",
            "New Excel Document",
            "Get Row Index By Condition",
            "Get Computer Account OU",
            "Reset Computer Account",
            "Send Mail",
            "Extract Text From Image",
            "Extract Text From PDF",
            "Create Variables",
            "Default If Empty",
        ] {
            assert!(registry.get(name).is_some(), "{name} is not registered");
        }
    }

    #[tokio::test]
    async fn configured_defaults_fill_inputs() {
        let config: CliConfig = toml::from_str(
            r#"
[defaults."Default If Empty"]
defaultValue = "from-config"
"#,
        )
        .unwrap();
        let registry = build_registry(&config);
        let result = registry
            .run("Default If Empty", &actionpack_core::Inputs::new())
            .await;
        assert_eq!(result.return_result(), "from-config");
    }
}
