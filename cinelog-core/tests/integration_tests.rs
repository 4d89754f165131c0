//! Integration tests for cinelog-core services
//!
//! These tests run against a real DuckDB file in a temp directory.
//! The metadata lookup is stubbed at the trait level.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;
use tempfile::TempDir;

use cinelog_core::adapters::duckdb::DuckDbRepository;
use cinelog_core::config::{Config, SiteConfig};
use cinelog_core::services::{collection, EventLog, LogEvent, MovieFilter, SiteService};
use cinelog_core::{CinelogContext, Error, LookupResult, MovieLookup, NewMovie};

// ============================================================================
// Test Helpers
// ============================================================================

/// Lookup stub that never touches the network
struct NoLookup;

impl MovieLookup for NoLookup {
    fn name(&self) -> &str {
        "none"
    }

    fn lookup(&self, _title: &str) -> LookupResult {
        LookupResult::missing("lookup disabled in tests")
    }
}

fn create_context(temp_dir: &TempDir) -> CinelogContext {
    let config = Config::defaults(temp_dir.path());
    CinelogContext::with_lookup(temp_dir.path(), config, Box::new(NoLookup))
        .expect("Failed to open context")
}

fn new_movie(title: &str, year: i32, rating: f64, poster: Option<&str>) -> NewMovie {
    NewMovie::new(title, year, rating, poster.map(str::to_string)).unwrap()
}

// ============================================================================
// Store
// ============================================================================

#[test]
fn test_added_movie_is_listed_with_stored_details() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let user = ctx.user_service.add_user("dana").unwrap();

    ctx.movie_service
        .add_movie(
            user.id,
            &new_movie("Inception", 2010, 8.8, Some("https://img/inception.jpg")),
        )
        .unwrap();

    let movies = ctx.movie_service.list_movies(user.id).unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "Inception");
    assert_eq!(movies[0].year, 2010);
    assert_eq!(movies[0].rating, 8.8);
    assert_eq!(movies[0].poster_url.as_deref(), Some("https://img/inception.jpg"));
    assert_eq!(movies[0].user_id, user.id);
}

#[test]
fn test_duplicate_title_keeps_prior_row() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let dana = ctx.user_service.add_user("dana").unwrap();
    let lee = ctx.user_service.add_user("lee").unwrap();

    ctx.movie_service
        .add_movie(dana.id, &new_movie("Heat", 1995, 8.3, None))
        .unwrap();

    let err = ctx
        .movie_service
        .add_movie(dana.id, &new_movie("Heat", 2020, 1.0, None))
        .unwrap_err();
    assert!(err.is_duplicate(), "expected duplicate, got {err}");

    let stored = ctx.movie_service.find_movie(dana.id, "Heat").unwrap().unwrap();
    assert_eq!(stored.year, 1995);
    assert_eq!(stored.rating, 8.3);

    // Same title for another user is fine
    ctx.movie_service
        .add_movie(lee.id, &new_movie("Heat", 1995, 7.0, None))
        .unwrap();
    assert_eq!(ctx.movie_service.list_movies(lee.id).unwrap().len(), 1);
}

#[test]
fn test_delete_missing_title_leaves_store_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let user = ctx.user_service.add_user("dana").unwrap();
    ctx.movie_service
        .add_movie(user.id, &new_movie("Alien", 1979, 8.5, None))
        .unwrap();

    let err = ctx.movie_service.delete_movie(user.id, "Aliens").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(ctx.repository.count_movies(user.id).unwrap(), 1);

    ctx.movie_service.delete_movie(user.id, "alien").unwrap();
    assert_eq!(ctx.repository.count_movies(user.id).unwrap(), 0);
}

#[test]
fn test_update_changes_only_rating() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let user = ctx.user_service.add_user("dana").unwrap();
    let before = ctx
        .movie_service
        .add_movie(user.id, &new_movie("Heat", 1995, 8.3, Some("https://img/heat.jpg")))
        .unwrap();

    ctx.movie_service.update_rating(user.id, "HEAT", 9.1).unwrap();

    let after = ctx.movie_service.find_movie(user.id, "Heat").unwrap().unwrap();
    assert_eq!(after.rating, 9.1);
    assert_eq!(after.id, before.id);
    assert_eq!(after.title, before.title);
    assert_eq!(after.year, before.year);
    assert_eq!(after.poster_url, before.poster_url);
}

#[test]
fn test_collection_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let ctx = create_context(&temp_dir);
        let user = ctx.user_service.add_user("dana").unwrap();
        ctx.movie_service
            .add_movie(user.id, &new_movie("Heat", 1995, 8.3, None))
            .unwrap();
    }

    let ctx = create_context(&temp_dir);
    let user = ctx.user_service.require("dana").unwrap();
    assert_eq!(ctx.movie_service.list_movies(user.id).unwrap().len(), 1);
}

#[test]
fn test_users_are_listed_by_name() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    ctx.user_service.add_user("zoe").unwrap();
    ctx.user_service.add_user("amir").unwrap();

    let names: Vec<String> = ctx
        .user_service
        .list_users()
        .unwrap()
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, vec!["amir", "zoe"]);
}

// ============================================================================
// Collection analysis over stored rows
// ============================================================================

#[test]
fn test_filter_by_min_rating_over_stored_movies() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let user = ctx.user_service.add_user("dana").unwrap();
    for (title, rating) in [("Good", 8.8), ("Great", 9.0), ("Perfect", 10.0)] {
        ctx.movie_service
            .add_movie(user.id, &new_movie(title, 2000, rating, None))
            .unwrap();
    }

    let movies = ctx.movie_service.list_movies(user.id).unwrap();
    let top = collection::filter(
        &movies,
        &MovieFilter {
            min_rating: Some(9.0),
            ..Default::default()
        },
    );
    let titles: Vec<&str> = top.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Great", "Perfect"]);

    let stats = collection::statistics(&movies).unwrap();
    assert_eq!(stats.median, 9.0);
    assert_eq!(stats.best_titles, vec!["Perfect"]);
}

// ============================================================================
// Site generation
// ============================================================================

#[test]
fn test_site_for_empty_collection_has_empty_grid() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let user = ctx.user_service.add_user("dana").unwrap();

    let result = ctx.site_service.generate(&user).unwrap();
    assert_eq!(result.movie_count, 0);
    assert_eq!(
        result.path,
        temp_dir.path().join("site").join(format!("dana-{}.html", user.id))
    );

    let html = std::fs::read_to_string(&result.path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    let title = tera::escape_html("dana's Movie App");
    assert!(html.contains(&format!("<title>{}</title>", title)));
    assert!(html.contains(r#"<ul class="movie-grid">"#));
    assert!(!html.contains("<li>"));
    assert!(!html.contains("__TEMPLATE_"));
}

#[test]
fn test_site_pages_do_not_overwrite_each_other() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let first = ctx.user_service.add_user("mary jane").unwrap();
    let second = ctx.user_service.add_user("mary_jane").unwrap();
    ctx.movie_service
        .add_movie(first.id, &new_movie("Heat", 1995, 8.3, None))
        .unwrap();

    let first_page = ctx.site_service.generate(&first).unwrap();
    let second_page = ctx.site_service.generate(&second).unwrap();
    assert_ne!(first_page.path, second_page.path);

    let html = std::fs::read_to_string(&first_page.path).unwrap();
    assert!(html.contains("Heat"));
    let html = std::fs::read_to_string(&second_page.path).unwrap();
    assert!(!html.contains("Heat"));
}

#[test]
fn test_site_uses_custom_template_and_placeholder_poster() {
    let temp_dir = TempDir::new().unwrap();
    let template_path = temp_dir.path().join("tpl.html");
    std::fs::write(
        &template_path,
        "<h1>__TEMPLATE_TITLE__</h1><ul>__TEMPLATE_MOVIE_GRID__</ul>",
    )
    .unwrap();

    let repo = DuckDbRepository::new(&temp_dir.path().join("site.duckdb")).unwrap();
    repo.ensure_schema().unwrap();
    let repo = Arc::new(repo);
    let user = repo.insert_user("dana").unwrap();
    repo.insert_movie(user.id, &new_movie("Tom & Jerry", 1992, 6.0, None))
        .unwrap();

    let mut config = SiteConfig::with_output_dir(temp_dir.path().join("out"));
    config.template_path = Some(template_path);
    config.placeholder_poster = "https://placeholder/none.png".to_string();
    config.page_title = Some("Film Night".to_string());

    let service = SiteService::new(repo, config);
    let result = service.generate(&user).unwrap();
    let html = std::fs::read_to_string(result.path).unwrap();

    assert!(html.starts_with("<h1>Film Night</h1>"));
    assert!(html.contains("Tom &amp; Jerry"));
    assert!(html.contains(&tera::escape_html("https://placeholder/none.png")));
    assert!(html.contains(r#"<div class="movie-rating">6.0</div>"#));
}

#[test]
fn test_site_missing_template_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let repo = DuckDbRepository::in_memory().unwrap();
    repo.ensure_schema().unwrap();
    let repo = Arc::new(repo);
    let user = repo.insert_user("dana").unwrap();

    let mut config = SiteConfig::with_output_dir(temp_dir.path());
    config.template_path = Some(temp_dir.path().join("missing.html"));

    let err = SiteService::new(repo, config).generate(&user).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

// ============================================================================
// Event log
// ============================================================================

#[test]
fn test_event_log_lives_next_to_collection() {
    let temp_dir = TempDir::new().unwrap();
    let _ctx = create_context(&temp_dir);
    let events = EventLog::open(temp_dir.path(), "0.1.0").unwrap();

    events.record(&LogEvent::new("menu_opened")).unwrap();

    assert!(temp_dir.path().join("cinelog.duckdb").exists());
    assert!(temp_dir.path().join("logs.duckdb").exists());
    assert_eq!(events.count().unwrap(), 1);
}
