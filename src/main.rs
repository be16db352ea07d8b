use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use show_browser::{
    Action, CatalogProvider, Config, Controller, Overrides, SelectOption, ShowBrowserError, State,
    TvMazeCatalog, View, open_session,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Browse TV shows and their episodes from the TVMaze catalog
#[derive(Debug, Parser)]
#[command(name = "show_browser", version, about)]
struct Cli {
    /// Catalog API root (default: https://api.tvmaze.com)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Number of shows per page
    #[arg(long, global = true)]
    page_size: Option<usize>,

    /// Path to a config file instead of the per-user default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive session (default)
    Browse,

    /// Print one page of the show list
    Shows {
        /// Only shows whose name, summary or genres contain this text
        #[arg(long)]
        search: Option<String>,

        /// Page to print, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Print the episodes of a show
    Episodes {
        /// Catalog id of the show
        show_id: u64,

        /// Only episodes whose name or summary contain this text
        #[arg(long)]
        search: Option<String>,

        /// Print only the episode with this id
        #[arg(long)]
        episode: Option<u64>,
    },
}

/// Entries of the interactive menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    SelectShow,
    SelectEpisode,
    Search,
    NextPage,
    PrevPage,
    Back,
    ClearShow,
    Quit,
}

impl MenuItem {
    fn label(self) -> &'static str {
        match self {
            MenuItem::SelectShow => "Select a show",
            MenuItem::SelectEpisode => "Select an episode",
            MenuItem::Search => "Search",
            MenuItem::NextPage => "Next page",
            MenuItem::PrevPage => "Previous page",
            MenuItem::Back => "Back to shows",
            MenuItem::ClearShow => "Clear show selection",
            MenuItem::Quit => "Quit",
        }
    }

    fn for_state(state: State) -> Vec<MenuItem> {
        match state {
            State::BrowsingShows => vec![
                MenuItem::SelectShow,
                MenuItem::Search,
                MenuItem::NextPage,
                MenuItem::PrevPage,
                MenuItem::Quit,
            ],
            State::BrowsingEpisodes { .. } => vec![
                MenuItem::SelectEpisode,
                MenuItem::Search,
                MenuItem::SelectShow,
                MenuItem::Back,
                MenuItem::ClearShow,
                MenuItem::Quit,
            ],
        }
    }
}

/// Installs the stderr log subscriber
///
/// `RUST_LOG` wins over `--verbose`, which wins over the config file.
fn init_logging(verbose: bool, config_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("show_browser=debug")
        } else {
            EnvFilter::new(config_filter.unwrap_or("show_browser=warn"))
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_view(view: &View) {
    print!("{}", view);
}

/// Lets the user pick an entry of a selector
///
/// Returns `None` when the prompt is cancelled, otherwise the value of the
/// picked option (`Some(None)` for the default option).
fn pick(prompt: &str, options: &[SelectOption]) -> Result<Option<Option<u64>>, ShowBrowserError> {
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    let choice = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .max_length(15)
        .interact_opt()?;

    Ok(choice.map(|index| options[index].value))
}

fn browse<P: CatalogProvider>(session: &mut Controller<P>) -> Result<(), ShowBrowserError> {
    print_view(session.handle_with_progress(Action::Load, print_view));

    loop {
        let items = MenuItem::for_state(session.state());
        let labels: Vec<&str> = items.iter().map(|item| item.label()).collect();
        let choice = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact_opt()?;

        let action = match choice.map(|index| items[index]) {
            None | Some(MenuItem::Quit) => break,
            Some(MenuItem::SelectShow) => match pick("Show", session.show_options())? {
                None => continue,
                Some(Some(show_id)) => Action::SelectShow(show_id),
                Some(None) => Action::ClearShow,
            },
            Some(MenuItem::SelectEpisode) => match pick("Episode", session.episode_options())? {
                None => continue,
                Some(episode_id) => Action::SelectEpisode(episode_id),
            },
            Some(MenuItem::Search) => {
                let term: String = Input::new()
                    .with_prompt("Search (blank shows all)")
                    .allow_empty(true)
                    .with_initial_text(session.selection().search_term.clone())
                    .interact_text()?;
                Action::Search(term)
            }
            Some(MenuItem::NextPage) => Action::NextPage,
            Some(MenuItem::PrevPage) => Action::PrevPage,
            Some(MenuItem::Back) => Action::Back,
            Some(MenuItem::ClearShow) => Action::ClearShow,
        };

        print_view(session.handle_with_progress(action, print_view));
    }

    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<(), ShowBrowserError> {
    let mut session: Controller<TvMazeCatalog> = open_session(&config)?;

    match cli.command.unwrap_or(Command::Browse) {
        Command::Browse => browse(&mut session)?,
        Command::Shows { search, page } => {
            session.handle(Action::Load);
            let loaded = session.view().message.is_none();
            if let Some(term) = search.filter(|_| loaded) {
                session.handle(Action::Search(term));
            }
            if page > 1 {
                session.handle(Action::GoToPage(page));
            }
            print_view(session.view());
        }
        Command::Episodes {
            show_id,
            search,
            episode,
        } => {
            session.handle(Action::SelectShow(show_id));
            if session.state() == (State::BrowsingEpisodes { show_id }) {
                if let Some(term) = search {
                    session.handle(Action::Search(term));
                }
                if episode.is_some() {
                    session.handle(Action::SelectEpisode(episode));
                }
            }
            print_view(session.view());
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let overrides = Overrides {
        base_url: cli.base_url.clone(),
        page_size: cli.page_size,
    };
    let config = match Config::load(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    init_logging(cli.verbose, config.log_filter.as_deref());

    if let Err(e) = run(cli, config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
