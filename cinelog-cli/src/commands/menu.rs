//! Menu command - the interactive movie database session

use std::io;

use anyhow::Result;
use colored::Colorize;

use cinelog_core::domain::{MAX_RATING, MAX_YEAR, MIN_RATING, MIN_YEAR};
use cinelog_core::services::{collection, LogEvent, EventLog, MovieFilter};
use cinelog_core::{CinelogContext, Error, Movie, NewMovie, User};

use super::add::lookup_with_spinner;
use super::{get_context, get_logger, log_event};
use crate::output::{format_rating, movie_line};
use crate::prompt::{self, is_input_closed, LinePrompt, Prompt, TerminalPrompt};

const FAREWELL: &str = "Bye!";

/// One entry of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    List,
    Add,
    Delete,
    Update,
    Stats,
    Random,
    Search,
    SortByRating,
    SortByYear,
    Filter,
    GenerateSite,
    SwitchUser,
}

impl MenuChoice {
    const ALL: [MenuChoice; 13] = [
        MenuChoice::Exit,
        MenuChoice::List,
        MenuChoice::Add,
        MenuChoice::Delete,
        MenuChoice::Update,
        MenuChoice::Stats,
        MenuChoice::Random,
        MenuChoice::Search,
        MenuChoice::SortByRating,
        MenuChoice::SortByYear,
        MenuChoice::Filter,
        MenuChoice::GenerateSite,
        MenuChoice::SwitchUser,
    ];

    /// Parse the number typed at the menu prompt
    pub fn parse(input: &str) -> Option<Self> {
        let index: usize = input.trim().parse().ok()?;
        Self::ALL.get(index).copied()
    }

    fn label(self) -> &'static str {
        match self {
            MenuChoice::Exit => "Exit",
            MenuChoice::List => "List movies",
            MenuChoice::Add => "Add movie",
            MenuChoice::Delete => "Delete movie",
            MenuChoice::Update => "Update movie",
            MenuChoice::Stats => "Stats",
            MenuChoice::Random => "Random movie",
            MenuChoice::Search => "Search movie",
            MenuChoice::SortByRating => "Movies sorted by rating",
            MenuChoice::SortByYear => "Movies in chronological order",
            MenuChoice::Filter => "Filter movies",
            MenuChoice::GenerateSite => "Generate website",
            MenuChoice::SwitchUser => "Switch user",
        }
    }

    /// Short name recorded in the event log
    fn command(self) -> &'static str {
        match self {
            MenuChoice::Exit => "exit",
            MenuChoice::List => "list",
            MenuChoice::Add => "add",
            MenuChoice::Delete => "delete",
            MenuChoice::Update => "update",
            MenuChoice::Stats => "stats",
            MenuChoice::Random => "random",
            MenuChoice::Search => "search",
            MenuChoice::SortByRating => "sort_rating",
            MenuChoice::SortByYear => "sort_year",
            MenuChoice::Filter => "filter",
            MenuChoice::GenerateSite => "generate",
            MenuChoice::SwitchUser => "switch_user",
        }
    }
}

pub fn run() -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    if atty::is(atty::Stream::Stdin) {
        run_session(&ctx, logger.as_ref(), &mut TerminalPrompt)
    } else {
        let stdin = io::stdin();
        let mut prompt = LinePrompt::new(stdin.lock(), io::stdout());
        run_session(&ctx, logger.as_ref(), &mut prompt)
    }
}

/// Run the menu until the user exits or input ends
pub fn run_session(
    ctx: &CinelogContext,
    logger: Option<&EventLog>,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    log_event(logger, LogEvent::new("menu_opened").with_command("menu"));

    match session_loop(ctx, logger, prompt) {
        Err(e) if is_input_closed(&e) => {
            prompt.say("");
            prompt.say(&FAREWELL.magenta().to_string());
            Ok(())
        }
        other => other,
    }
}

fn session_loop(
    ctx: &CinelogContext,
    logger: Option<&EventLog>,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    let user = select_user(ctx, logger, prompt)?;
    let mut session = Session { ctx, logger, user };

    loop {
        session.print_menu(prompt);
        let raw = prompt.ask(&"Enter choice (0-12)".green().to_string())?;

        let choice = match MenuChoice::parse(&raw) {
            Some(MenuChoice::Exit) => {
                prompt.say(&FAREWELL.magenta().to_string());
                return Ok(());
            }
            Some(choice) => choice,
            None => {
                prompt.say(
                    &"Invalid choice, please enter a number between 0 and 12."
                        .red()
                        .to_string(),
                );
                continue;
            }
        };

        if let Err(e) = session.handle(choice, prompt) {
            if is_input_closed(&e) {
                return Err(e);
            }
            prompt.say(&format!("Error: {:#}", e).red().to_string());
            session.log(
                LogEvent::new("menu_error")
                    .with_command(choice.command())
                    .with_error(e.to_string()),
            );
        }
    }
}

/// Pick an existing profile or create one
///
/// Keeps asking until a profile is active. Only end of input gets out.
fn select_user(
    ctx: &CinelogContext,
    logger: Option<&EventLog>,
    prompt: &mut dyn Prompt,
) -> Result<User> {
    loop {
        let users = ctx.user_service.list_users()?;

        if users.is_empty() {
            prompt.say(&"No users yet. Please create one.".yellow().to_string());
            if let Some(user) = create_user(ctx, logger, prompt)? {
                return Ok(user);
            }
            continue;
        }

        prompt.say("");
        prompt.say(&"Select a user profile:".cyan().to_string());
        for (i, user) in users.iter().enumerate() {
            prompt.say(&format!("{}. {}", i + 1, user.name).yellow().to_string());
        }
        prompt.say(&format!("{}. Create new user", users.len() + 1).yellow().to_string());

        loop {
            let choice: usize = prompt::number(prompt, "Enter choice")?;
            if (1..=users.len()).contains(&choice) {
                let user = users[choice - 1].clone();
                prompt.say(&format!("Welcome back, {}! 🎬", user.name));
                return Ok(user);
            } else if choice == users.len() + 1 {
                match create_user(ctx, logger, prompt)? {
                    Some(user) => return Ok(user),
                    None => break,
                }
            } else {
                prompt.say(&"Invalid choice.".red().to_string());
            }
        }
    }
}

fn create_user(
    ctx: &CinelogContext,
    logger: Option<&EventLog>,
    prompt: &mut dyn Prompt,
) -> Result<Option<User>> {
    let name = prompt.ask("Enter new user name")?;

    match ctx.user_service.add_user(&name) {
        Ok(user) => {
            prompt.say(&format!("User '{}' created. Welcome, {}!", user.name, user.name).green().to_string());
            log_event(logger, LogEvent::new("user_created").with_profile(&user.name));
            Ok(Some(user))
        }
        Err(Error::Duplicate(_)) => {
            prompt.say(&format!("User '{}' already exists.", name.trim()).red().to_string());
            Ok(None)
        }
        Err(Error::Validation(_)) => {
            prompt.say(&"User name cannot be empty.".red().to_string());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Active profile plus everything the handlers need
struct Session<'a> {
    ctx: &'a CinelogContext,
    logger: Option<&'a EventLog>,
    user: User,
}

impl Session<'_> {
    fn log(&self, event: LogEvent) {
        log_event(self.logger, event.with_profile(&self.user.name));
    }

    fn print_menu(&self, prompt: &mut dyn Prompt) {
        prompt.say("");
        prompt.say(
            &format!("*** {}'s Movies Database ***", self.user.name)
                .cyan()
                .to_string(),
        );
        prompt.say("");
        for (i, choice) in MenuChoice::ALL.iter().enumerate() {
            prompt.say(&format!("{}. {}", i, choice.label()).yellow().to_string());
        }
    }

    fn handle(&mut self, choice: MenuChoice, prompt: &mut dyn Prompt) -> Result<()> {
        match choice {
            MenuChoice::Exit => Ok(()),
            MenuChoice::List => self.list_movies(prompt),
            MenuChoice::Add => self.add_movie(prompt),
            MenuChoice::Delete => self.delete_movie(prompt),
            MenuChoice::Update => self.update_movie(prompt),
            MenuChoice::Stats => self.print_statistics(prompt),
            MenuChoice::Random => self.random_movie(prompt),
            MenuChoice::Search => self.search_movies(prompt),
            MenuChoice::SortByRating => self.sort_by_rating(prompt),
            MenuChoice::SortByYear => self.sort_by_year(prompt),
            MenuChoice::Filter => self.filter_movies(prompt),
            MenuChoice::GenerateSite => self.generate_site(prompt),
            MenuChoice::SwitchUser => {
                self.user = select_user(self.ctx, self.logger, prompt)?;
                Ok(())
            }
        }
    }

    fn movies(&self) -> Result<Vec<Movie>> {
        Ok(self.ctx.movie_service.list_movies(self.user.id)?)
    }

    /// The user's movies, or `None` after telling them there are none
    fn movies_or_notice(&self, prompt: &mut dyn Prompt) -> Result<Option<Vec<Movie>>> {
        let movies = self.movies()?;
        if movies.is_empty() {
            prompt.say("No movies found.");
            return Ok(None);
        }
        Ok(Some(movies))
    }

    fn print_lines(prompt: &mut dyn Prompt, movies: &[Movie]) {
        for movie in movies {
            prompt.say(&movie_line(movie));
        }
    }

    fn list_movies(&self, prompt: &mut dyn Prompt) -> Result<()> {
        let movies = self.movies()?;
        if movies.is_empty() {
            prompt.say(&format!("{}, your movie collection is empty.", self.user.name));
            return Ok(());
        }
        prompt.say("");
        prompt.say(&format!("{} movie(s) in total", movies.len()));
        Self::print_lines(prompt, &movies);
        Ok(())
    }

    fn add_movie(&self, prompt: &mut dyn Prompt) -> Result<()> {
        let title = prompt::non_empty(prompt, "Enter new movie title")?;

        if self.ctx.movie_service.find_movie(self.user.id, &title)?.is_some() {
            prompt.say(&format!("Movie '{}' already exists.", title).red().to_string());
            return Ok(());
        }

        let result = lookup_with_spinner(self.ctx, &title);
        if let Some(message) = &result.message {
            self.log(
                LogEvent::new("lookup_failed")
                    .with_command("add")
                    .with_error(message.clone()),
            );
        }

        let movie = match result.into_new_movie(&title) {
            Some(Ok(movie)) => movie,
            fetched => {
                if let Some(Err(e)) = fetched {
                    log::warn!("discarding lookup result for {:?}: {}", title, e);
                }
                prompt.say("Could not fetch complete data from OMDb API. Enter details manually.");
                self.manual_details(prompt, &title)?
            }
        };

        match self.ctx.movie_service.add_movie(self.user.id, &movie) {
            Ok(stored) => {
                prompt.say(&format!("Movie '{}' added successfully.", stored.title).green().to_string());
                self.log(LogEvent::new("movie_added").with_command("add"));
            }
            Err(Error::Duplicate(_)) => {
                prompt.say(
                    &format!("Could not add movie '{}' (already exists).", title)
                        .red()
                        .to_string(),
                );
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn manual_details(&self, prompt: &mut dyn Prompt, title: &str) -> Result<NewMovie> {
        let year = prompt::year(prompt, "Enter release year", MIN_YEAR, MAX_YEAR)?;
        let rating = prompt::float_in_range(prompt, "Enter rating (0-10)", MIN_RATING, MAX_RATING)?;
        let poster = prompt.ask("Enter poster URL (or leave blank)")?;
        Ok(NewMovie::new(title, year, rating, Some(poster))?)
    }

    fn delete_movie(&self, prompt: &mut dyn Prompt) -> Result<()> {
        let title = prompt::non_empty(prompt, "Enter the title to delete")?;
        match self.ctx.movie_service.delete_movie(self.user.id, &title) {
            Ok(()) => {
                prompt.say(&format!("Movie '{}' deleted successfully.", title).green().to_string());
                self.log(LogEvent::new("movie_deleted").with_command("delete"));
                Ok(())
            }
            Err(Error::NotFound(_)) => {
                prompt.say(&format!("Movie '{}' not found.", title).red().to_string());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn update_movie(&self, prompt: &mut dyn Prompt) -> Result<()> {
        let title = prompt::non_empty(prompt, "Enter the title to update")?;
        let rating =
            prompt::float_in_range(prompt, "Enter new rating (0-10)", MIN_RATING, MAX_RATING)?;
        match self.ctx.movie_service.update_rating(self.user.id, &title, rating) {
            Ok(()) => {
                prompt.say(&format!("Movie '{}' updated successfully.", title).green().to_string());
                self.log(LogEvent::new("rating_updated").with_command("update"));
                Ok(())
            }
            Err(Error::NotFound(_)) => {
                prompt.say(&format!("Movie '{}' not found.", title).red().to_string());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn print_statistics(&self, prompt: &mut dyn Prompt) -> Result<()> {
        let Some(stats) = collection::statistics(&self.movies()?) else {
            prompt.say("No movies found.");
            return Ok(());
        };
        prompt.say("");
        prompt.say(&format!("Average rating: {:.1}", stats.average));
        prompt.say(&format!("Median rating: {:.1}", stats.median));
        prompt.say(&format!(
            "Best movie: {}, {:.1}",
            stats.best_titles.join(", "),
            stats.best_rating
        ));
        prompt.say(&format!(
            "Worst movie: {}, {:.1}",
            stats.worst_titles.join(", "),
            stats.worst_rating
        ));
        Ok(())
    }

    fn random_movie(&self, prompt: &mut dyn Prompt) -> Result<()> {
        let Some(movies) = self.movies_or_notice(prompt)? else {
            return Ok(());
        };
        if let Some(movie) = collection::pick_random(&movies) {
            prompt.say("");
            prompt.say(&format!("Your movie for tonight: {}", movie_line(movie)));
        }
        Ok(())
    }

    fn search_movies(&self, prompt: &mut dyn Prompt) -> Result<()> {
        let query = prompt::non_empty(prompt, "Enter part of the movie title to search")?;
        let matches = collection::search(&self.movies()?, &query);
        if matches.is_empty() {
            prompt.say("No matches found.");
        } else {
            Self::print_lines(prompt, &matches);
        }
        Ok(())
    }

    fn sort_by_rating(&self, prompt: &mut dyn Prompt) -> Result<()> {
        if let Some(movies) = self.movies_or_notice(prompt)? {
            Self::print_lines(prompt, &collection::sort_by_rating(&movies));
        }
        Ok(())
    }

    fn sort_by_year(&self, prompt: &mut dyn Prompt) -> Result<()> {
        let Some(movies) = self.movies_or_notice(prompt)? else {
            return Ok(());
        };
        let latest_first = prompt::yes_no(prompt, "Show latest first? (y/n)")?;
        Self::print_lines(prompt, &collection::sort_by_year(&movies, latest_first));
        Ok(())
    }

    fn filter_movies(&self, prompt: &mut dyn Prompt) -> Result<()> {
        let Some(movies) = self.movies_or_notice(prompt)? else {
            return Ok(());
        };
        let filter = MovieFilter {
            min_rating: prompt::optional(
                prompt,
                "Enter minimum rating (leave blank for no minimum rating)",
                "number",
            )?,
            start_year: prompt::optional(
                prompt,
                "Enter start year (leave blank for no start year)",
                "integer",
            )?,
            end_year: prompt::optional(
                prompt,
                "Enter end year (leave blank for no end year)",
                "integer",
            )?,
        };

        let matches = collection::filter(&movies, &filter);
        if matches.is_empty() {
            prompt.say("No movies match the filters.");
            return Ok(());
        }
        prompt.say("Filtered Movies:");
        for movie in &matches {
            prompt.say(&format!(
                "{} ({}): {}",
                movie.title,
                movie.year,
                format_rating(movie.rating)
            ));
        }
        Ok(())
    }

    fn generate_site(&self, prompt: &mut dyn Prompt) -> Result<()> {
        let result = self.ctx.site_service.generate(&self.user)?;
        prompt.say(
            &format!("Website was generated successfully: {}", result.path.display())
                .green()
                .to_string(),
        );
        self.log(LogEvent::new("site_generated").with_command("generate"));
        Ok(())
    }
}
