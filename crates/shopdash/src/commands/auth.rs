//! Session command handlers: login, logout, whoami.

use std::fmt::Write as _;

use shopdash_core::{ProductsController, SessionState, User};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output;

use super::util;

fn user_detail(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:     {}", user.id);
    let _ = writeln!(out, "Name:   {}", user.name);
    let _ = writeln!(out, "Email:  {}", user.email);
    if let Some(ref role) = user.role {
        let _ = writeln!(out, "Role:   {role}");
    }
    if let Some(ref avatar) = user.avatar {
        let _ = write!(out, "Avatar: {avatar}");
    }
    out.trim_end().to_owned()
}

pub async fn login(
    controller: &ProductsController,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = util::value_or_prompt(args.email, "Email")?;
    let password = match args.password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ").map_err(util::prompt_err)?,
    };
    if email.is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "email and password cannot be empty".into(),
        });
    }

    let user = controller.session().sign_in(&email, &password).await?;
    if !global.quiet {
        eprintln!("Signed in as {} <{}>", user.name, user.email);
    }
    Ok(())
}

pub async fn logout(controller: &ProductsController, global: &GlobalOpts) -> Result<(), CliError> {
    controller.session().sign_out().await?;
    if !global.quiet {
        eprintln!("Signed out");
    }
    Ok(())
}

pub async fn whoami(controller: &ProductsController, global: &GlobalOpts) -> Result<(), CliError> {
    match controller.session().restore().await {
        SessionState::Authenticated(user) => {
            let out = output::render_single(&global.output, user.as_ref(), user_detail, |u| {
                u.email.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
        _ => match controller.session().last_error() {
            // Anything other than a rejected token is worth surfacing as-is.
            Some(err) if !err.is_auth() => Err((*err).clone().into()),
            _ => Err(CliError::NotSignedIn),
        },
    }
}
