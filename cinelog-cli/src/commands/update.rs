//! Update command - change a movie's rating

use anyhow::Result;
use cinelog_core::services::LogEvent;

use super::{get_context, get_logger, log_event, resolve_user};
use crate::output::{self, format_rating};

pub fn run(title: &str, rating: f64, user: &str) -> Result<()> {
    let ctx = get_context()?;
    let user = resolve_user(&ctx, user)?;

    ctx.movie_service.update_rating(user.id, title, rating)?;
    log_event(
        get_logger().as_ref(),
        LogEvent::new("rating_updated")
            .with_profile(&user.name)
            .with_command("update"),
    );

    output::success(&format!(
        "Updated: {} is now rated {}",
        title.trim(),
        format_rating(rating)
    ));
    Ok(())
}
