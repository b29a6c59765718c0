//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};

/// Shopping cart store backed by a single SQLite file.
#[derive(Parser, Debug)]
#[command(name = "shopcart")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database url, e.g. sqlite://shopping_website.db
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Defaults to the interactive scenario when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prompt for an add, a remove and a sign-out, in that order
    Scenario,

    /// Add a product to the user's active cart
    Add(AddArgs),

    /// Remove an item from one of the user's carts
    Remove(RemoveArgs),

    /// Sign out the user's active cart
    SignOut(UserArg),

    /// Show the user's active cart
    Show(ShowArgs),

    /// Manage users
    #[command(subcommand)]
    User(UserCommand),

    /// Manage products
    #[command(subcommand)]
    Product(ProductCommand),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub user: i64,
    #[arg(long)]
    pub product: i64,
    #[arg(long, allow_negative_numbers = true)]
    pub quantity: i64,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    #[arg(long)]
    pub user: i64,
    /// Cart item id
    #[arg(long)]
    pub item: i64,
}

#[derive(Args, Debug)]
pub struct UserArg {
    #[arg(long)]
    pub user: i64,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[arg(long)]
    pub user: i64,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Subcommands for `shopcart user`
#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Create a user; the password is stored as an Argon2 hash
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: String,
    },
}

/// Subcommands for `shopcart product`
#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    /// Create a product
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_scenario() {
        let cli = Cli::try_parse_from(["shopcart"]).expect("parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_add_with_global_url() {
        let cli = Cli::try_parse_from([
            "shopcart",
            "add",
            "--user",
            "1",
            "--product",
            "10",
            "--quantity",
            "-2",
            "--database-url",
            "sqlite://x.db",
        ])
        .expect("parse");
        assert_eq!(cli.database_url.as_deref(), Some("sqlite://x.db"));
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!((args.user, args.product, args.quantity), (1, 10, -2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_nested_product_add() {
        let cli = Cli::try_parse_from([
            "shopcart", "product", "add", "--name", "Tea", "--price", "4.5",
        ])
        .expect("parse");
        assert!(matches!(
            cli.command,
            Some(Commands::Product(ProductCommand::Add { ref name, description: None, price }))
                if name == "Tea" && price == 4.5
        ));
    }
}
