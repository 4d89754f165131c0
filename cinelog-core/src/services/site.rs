//! Site service - static HTML page for a user's collection

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use regex::{Captures, Regex};
use serde::Serialize;
use tera::{Context, Tera};

use crate::adapters::duckdb::DuckDbRepository;
use crate::config::SiteConfig;
use crate::domain::result::{Error, Result};
use crate::domain::{format_rating, Movie, User};

/// Placeholder replaced with the page title
pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";

/// Placeholder replaced with the movie cards
pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

/// Template used when no template file is configured
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/index_template.html");

/// Card list substituted for the grid placeholder
const GRID_TEMPLATE: &str = include_str!("../../templates/movie_grid.html");

/// Outcome of generating a page
#[derive(Debug, Clone, Serialize)]
pub struct SiteResult {
    pub path: PathBuf,
    pub movie_count: usize,
}

/// Site service
pub struct SiteService {
    repository: Arc<DuckDbRepository>,
    config: SiteConfig,
}

impl SiteService {
    pub fn new(repository: Arc<DuckDbRepository>, config: SiteConfig) -> Self {
        Self { repository, config }
    }

    /// Render the user's movies and write `{output_dir}/{stem}-{id}.html`
    pub fn generate(&self, user: &User) -> Result<SiteResult> {
        let path = self.config.output_dir.join(file_name(user));
        self.generate_to(user, path)
    }

    /// Render the user's movies into an explicit output file
    pub fn generate_to(&self, user: &User, path: PathBuf) -> Result<SiteResult> {
        if self.repository.get_user(user.id)?.is_none() {
            return Err(Error::not_found(format!("user '{}'", user.name)));
        }
        let movies = self.repository.list_movies(user.id)?;

        let template = self.load_template()?;
        let title = self
            .config
            .page_title
            .clone()
            .unwrap_or_else(|| format!("{}'s Movie App", user.name));
        let html = render_page(&template, &title, &movies, &self.config.placeholder_poster)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, html)?;
        log::info!("wrote {} movie(s) to {}", movies.len(), path.display());

        Ok(SiteResult {
            path,
            movie_count: movies.len(),
        })
    }

    fn load_template(&self) -> Result<String> {
        match &self.config.template_path {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("cannot read template {}: {}", path.display(), e))
            }),
            None => Ok(DEFAULT_TEMPLATE.to_string()),
        }
    }
}

/// Substitute the title and movie cards into a template
///
/// Both placeholders are replaced in one pass, so neither value is scanned
/// for the other placeholder.
pub fn render_page(
    template: &str,
    title: &str,
    movies: &[Movie],
    placeholder_poster: &str,
) -> Result<String> {
    static PLACEHOLDERS: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDERS.get_or_init(|| {
        Regex::new(r"__TEMPLATE_(TITLE|MOVIE_GRID)__").expect("valid placeholder regex")
    });

    if !template.contains(GRID_PLACEHOLDER) {
        log::warn!("template has no {} placeholder", GRID_PLACEHOLDER);
    }

    let title = tera::escape_html(title);
    let grid = render_grid(movies, placeholder_poster)?;

    let html = re.replace_all(template, |caps: &Captures| match &caps[1] {
        "TITLE" => title.clone(),
        _ => grid.clone(),
    });
    Ok(html.into_owned())
}

#[derive(Serialize)]
struct Card<'a> {
    title: &'a str,
    year: i32,
    rating: String,
    poster: &'a str,
}

/// `<li>` cards for every movie, rendered with autoescaping on
fn render_grid(movies: &[Movie], placeholder_poster: &str) -> Result<String> {
    let cards: Vec<Card> = movies
        .iter()
        .map(|movie| Card {
            title: &movie.title,
            year: movie.year,
            rating: format_rating(movie.rating),
            poster: movie
                .poster_url
                .as_deref()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(placeholder_poster),
        })
        .collect();

    let mut context = Context::new();
    context.insert("movies", &cards);
    Ok(Tera::one_off(GRID_TEMPLATE, &context, true)?)
}

/// Output file name: the profile name reduced to `[A-Za-z0-9_-]`, plus the id
///
/// Two profiles whose names reduce to the same stem still get separate files.
fn file_name(user: &User) -> String {
    let stem: String = user
        .name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = if stem.is_empty() { "user" } else { stem.as_str() };
    format!("{}-{}.html", stem, user.id)
}
