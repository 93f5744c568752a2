//! Config subcommand handlers.

use std::collections::HashMap;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, CredentialBackend, Defaults, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg)
        .unwrap_or_else(|e| format!("# failed to render config: {e}"))
        .trim_end()
        .to_owned()
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("shopdash configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let defaults = Profile::default();
            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default(defaults.api_url.clone())
                .interact_text()
                .map_err(prompt_err)?;
            if url::Url::parse(&api_url).is_err() {
                return Err(CliError::Validation {
                    field: "api_url".into(),
                    reason: format!("invalid URL: {api_url}"),
                });
            }

            let backend_choices = &[
                "System keyring (recommended)",
                "File in the data directory",
            ];
            let backend = match Select::new()
                .with_prompt("Where should the session token be stored?")
                .items(backend_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?
            {
                0 => CredentialBackend::Keyring,
                _ => CredentialBackend::File,
            };

            let page_size: u32 = Input::new()
                .with_prompt("Products per page")
                .default(Defaults::default().page_size)
                .interact_text()
                .map_err(prompt_err)?;

            let profile = Profile {
                api_url,
                credential_backend: backend,
                page_size: Some(page_size),
                ..defaults
            };

            let mut profiles = HashMap::new();
            profiles.insert(profile_name.clone(), profile);
            let cfg = Config {
                default_profile: Some(profile_name.clone()),
                defaults: Defaults::default(),
                profiles,
            };

            config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: shopdash login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.default_profile.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
