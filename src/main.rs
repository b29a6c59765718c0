use std::io::{BufReader, IsTerminal, Write};

use clap::Parser;
use dialoguer::console::Term;

mod carts;
mod cli;
mod config;
mod console;
mod db;
mod error;
mod products;
mod state;
mod users;

use crate::carts::CartService;
use crate::cli::{Cli, Commands, ProductCommand, UserCommand};
use crate::config::AppConfig;
use crate::console::{LinePrompt, TerminalPrompt};
use crate::products::Product;
use crate::state::AppState;
use crate::users::User;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "shopcart=info,sqlx=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // stdout carries the status lines, so logs go to stderr
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config = config.with_database_url(url)?;
    }
    let state = AppState::init(config).await?;
    tracing::info!(url = %state.config.database_url, "store ready");

    run(cli.command.unwrap_or(Commands::Scenario), &state).await
}

async fn run(command: Commands, state: &AppState) -> anyhow::Result<()> {
    let svc = CartService::new(state.db.clone());
    let mut out = std::io::stdout();

    match command {
        Commands::Scenario => {
            if std::io::stdin().is_terminal() && Term::stdout().is_term() {
                console::run_scenario(&svc, &mut TerminalPrompt::new(), &mut out).await?;
            } else {
                let mut prompt = LinePrompt::new(BufReader::new(std::io::stdin()), std::io::stdout());
                console::run_scenario(&svc, &mut prompt, &mut out).await?;
            }
        }
        Commands::Add(args) => {
            let outcome = svc.add_to_cart(args.user, args.product, args.quantity).await?;
            console::report_add(&mut out, &outcome)?;
        }
        Commands::Remove(args) => {
            svc.remove_from_cart(args.user, args.item).await?;
            console::report_removed(&mut out)?;
        }
        Commands::SignOut(args) => {
            svc.sign_out_cart(args.user).await?;
            console::report_signed_out(&mut out)?;
        }
        Commands::Show(args) => {
            console::show_cart(&svc, &state.db, args.user, args.json, &mut out).await?;
        }
        Commands::User(UserCommand::Add {
            username,
            password,
            email,
        }) => {
            let user = User::create(&state.db, &username, &password, &email).await?;
            tracing::info!(user_id = user.user_id, username = %user.username, "user created");
            writeln!(out, "User {} created with id {}.", user.username, user.user_id)?;
        }
        Commands::Product(ProductCommand::Add {
            name,
            description,
            price,
        }) => {
            let product = Product::create(&state.db, &name, description.as_deref(), price).await?;
            tracing::info!(product_id = product.product_id, name = %product.name, "product created");
            writeln!(
                out,
                "Product {} created with id {}.",
                product.name, product.product_id
            )?;
        }
    }
    Ok(())
}
