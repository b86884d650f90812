use api::api::start_server;

#[macro_use]
extern crate diesel;

use clap::{Parser, Subcommand};

use crate::{config::Settings, todo_client::HttpTodoClient};

mod api;
mod config;
mod errors;
mod models;
mod schema;
mod storage;
mod todo_client;
mod todo_commands;
mod ui;
mod utils;

#[derive(Debug, Subcommand)]
enum Commands {
    #[clap(alias = "ls")]
    List,
    #[clap(alias = "c")]
    Create {
        /// Prompted for when left out
        title: Option<String>,
    },
    /// Mark a todo completed, or open again
    Toggle { id: String },
    #[clap(alias = "rm")]
    Delete { id: String },
    /// Check that the server is up
    Health,
    /// Interactive todo list
    Ui,
}

#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = "Manage todos from command line")]
struct TodoArgs {
    #[clap(short = 's', long = "start-server")]
    start_server: bool,

    #[clap(subcommand)]
    command: Option<Commands>,
}

const SERVER_LOG_FILTER: &str = "todo_app=debug,actix_web=info,actix_server=info";
const CLIENT_LOG_FILTER: &str = "warn";

fn init_logger(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args = TodoArgs::parse();

    if args.start_server {
        init_logger(SERVER_LOG_FILTER);

        let settings = Settings::from_env()?;

        return start_server(settings);
    }

    init_logger(CLIENT_LOG_FILTER);

    let client = HttpTodoClient::from_env();

    match args.command {
        Some(Commands::List) => {
            for line in todo_commands::list_todos(&client)? {
                println!("{}", line);
            }
        }
        Some(Commands::Create { title }) => {
            let todo = todo_commands::create_new_todo(&client, title)?;
            println!("{}", todo_commands::format_todo_line(&todo));
        }
        Some(Commands::Toggle { id }) => {
            let todo = todo_commands::toggle_todo(&client, &id)?;
            println!("{}", todo_commands::format_todo_line(&todo));
        }
        Some(Commands::Delete { id }) => {
            todo_commands::delete_todo(&client, &id)?;
            println!("Todo deleted successfully");
        }
        Some(Commands::Health) => todo_commands::print_health(&client)?,
        Some(Commands::Ui) => ui::todo_list_renderer::render_todo_list(&client)?,
        None => {}
    }

    Ok(())
}
