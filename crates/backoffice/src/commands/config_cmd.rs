//! Config subcommand handlers.

use dialoguer::{Input, Select};

use backoffice_config::{self as config, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("backoffice configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = config::load_config()?;

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let base_url: String = Input::new()
                .with_prompt("Backend URL")
                .default("http://localhost:3030".into())
                .interact_text()
                .map_err(prompt_err)?;

            let username: String = Input::new()
                .with_prompt("Username (blank to skip)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let profile = Profile {
                base_url,
                username: (!username.is_empty()).then_some(username),
                ..Profile::default()
            };
            config::profile_base_url(&profile)?;

            let token_choices = &[
                "Log in later with `backoffice login`",
                "Paste a token now (stored in system keyring)",
            ];
            let token_selection = Select::new()
                .with_prompt("Bearer token")
                .items(token_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            if token_selection == 1 {
                let token = rpassword::prompt_password("Token: ").map_err(prompt_err)?;
                if token.is_empty() {
                    return Err(CliError::Validation {
                        field: "token".into(),
                        reason: "token cannot be empty".into(),
                    });
                }
                config::store_token(&profile_name, &token)?;
                eprintln!("   ✓ Token stored in system keyring");
            }

            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            output::success(
                &format!("Configuration written to {}", config_path.display()),
                color,
                false,
            );
            eprintln!("  Active profile: {profile_name}");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = match global.output {
                OutputFormat::Json | OutputFormat::JsonCompact => {
                    serde_json::to_string_pretty(&cfg)?
                }
                _ => toml::to_string_pretty(&cfg).map_err(config::ConfigError::from)?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let default = cfg.profile_name(None);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: backoffice config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::success(&format!("Default profile set to '{name}'"), color, global.quiet);
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config()?;
            let profile_name = profile.unwrap_or_else(|| active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let token = match global.token {
                Some(ref token) => token.clone(),
                None => rpassword::prompt_password("Token: ").map_err(prompt_err)?,
            };
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }

            config::store_token(&profile_name, &token)?;
            output::success(
                &format!("Token stored in system keyring for profile '{profile_name}'"),
                color,
                global.quiet,
            );
            Ok(())
        }
    }
}
