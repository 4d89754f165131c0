//! Generate command - write the static HTML page for a user

use std::path::PathBuf;

use anyhow::Result;
use cinelog_core::services::LogEvent;

use super::{get_context, get_logger, log_event, resolve_user};
use crate::output;

pub fn run(user: &str, output: Option<PathBuf>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    let user = resolve_user(&ctx, user)?;

    let result = match output {
        Some(path) => ctx.site_service.generate_to(&user, path),
        None => ctx.site_service.generate(&user),
    };

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            log_event(
                logger.as_ref(),
                LogEvent::new("site_failed")
                    .with_profile(&user.name)
                    .with_command("generate")
                    .with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };

    log_event(
        logger.as_ref(),
        LogEvent::new("site_generated")
            .with_profile(&user.name)
            .with_command("generate"),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        output::success("Website was generated successfully.");
        println!("  Movies: {}", result.movie_count);
        println!("  File: {}", result.path.display());
    }
    Ok(())
}
