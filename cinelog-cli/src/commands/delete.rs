//! Delete command - remove a movie by title

use anyhow::Result;
use cinelog_core::services::LogEvent;

use super::{get_context, get_logger, log_event, resolve_user};
use crate::output;

pub fn run(title: &str, user: &str) -> Result<()> {
    let ctx = get_context()?;
    let user = resolve_user(&ctx, user)?;

    ctx.movie_service.delete_movie(user.id, title)?;
    log_event(
        get_logger().as_ref(),
        LogEvent::new("movie_deleted")
            .with_profile(&user.name)
            .with_command("delete"),
    );

    output::success(&format!("Deleted: {}", title.trim()));
    Ok(())
}
