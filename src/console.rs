//! Console boundary: prompts for integers, calls the typed cart operations,
//! and prints one status line per outcome.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use anyhow::Context;
use dialoguer::console::Term;
use sqlx::SqlitePool;

use crate::carts::dto::{AddOutcome, CartContents, ItemChange};
use crate::carts::CartService;
use crate::products::Product;
use crate::users::User;

/// Source of integer answers to console prompts.
///
/// Every implementation treats a non-integer answer as an error and does not
/// re-prompt.
pub trait Prompt {
    fn read_int(&mut self, prompt: &str) -> anyhow::Result<i64>;
}

/// Prompts on an interactive terminal, with line editing.
pub struct TerminalPrompt {
    term: Term,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TerminalPrompt {
    fn read_int(&mut self, prompt: &str) -> anyhow::Result<i64> {
        self.term
            .write_str(&format!("{prompt}: "))
            .context("write prompt")?;
        let raw = self.term.read_line().context("read console input")?;
        parse_int(&raw)
    }
}

/// Prompts on any writer and reads one line per answer, for piped or
/// redirected input.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn read_int(&mut self, prompt: &str) -> anyhow::Result<i64> {
        write!(self.output, "{prompt}: ").context("write prompt")?;
        self.output.flush().context("write prompt")?;

        let mut raw = String::new();
        let read = self
            .input
            .read_line(&mut raw)
            .context("read console input")?;
        anyhow::ensure!(read > 0, "input ended before {prompt:?} was answered");
        parse_int(&raw)
    }
}

pub fn parse_int(raw: &str) -> anyhow::Result<i64> {
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("expected an integer, got {raw:?}"))
}

pub fn report_add<W: Write>(out: &mut W, outcome: &AddOutcome) -> anyhow::Result<()> {
    if outcome.cart_created {
        writeln!(out, "New cart created.")?;
    }
    match outcome.change {
        ItemChange::Updated => writeln!(out, "Quantity updated for existing item in cart.")?,
        ItemChange::Inserted => writeln!(out, "New item added to cart.")?,
    }
    Ok(())
}

pub fn report_removed<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "Item removed from cart.")?;
    Ok(())
}

pub fn report_signed_out<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "Cart signed out.")?;
    Ok(())
}

/// `names` maps product ids to catalog names; unknown products print by id only.
pub fn print_contents<W: Write>(
    out: &mut W,
    contents: &CartContents,
    names: &HashMap<i64, String>,
) -> anyhow::Result<()> {
    writeln!(
        out,
        "cart {} (user {}, {})",
        contents.cart.cart_id, contents.cart.user_id, contents.cart.status
    )?;
    if contents.items.is_empty() {
        writeln!(out, "  (empty)")?;
    }
    for item in &contents.items {
        match names.get(&item.product_id) {
            Some(name) => writeln!(
                out,
                "  item {}: product {} ({}) x {}",
                item.cart_item_id, item.product_id, name, item.quantity
            )?,
            None => writeln!(
                out,
                "  item {}: product {} x {}",
                item.cart_item_id, item.product_id, item.quantity
            )?,
        }
    }
    Ok(())
}

/// Print the user's active cart with user and product names, or as JSON with
/// the active cart (`null` when none) and every cart the user has had.
pub async fn show_cart<W: Write>(
    svc: &CartService,
    db: &SqlitePool,
    user_id: i64,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let contents = svc.active_cart_contents(user_id).await?;

    if json {
        let history = svc.carts(user_id).await?;
        let body = serde_json::json!({ "active": contents, "carts": history });
        serde_json::to_writer_pretty(&mut *out, &body)?;
        writeln!(out)?;
        return Ok(());
    }

    if let Some(user) = User::find_by_id(db, user_id).await? {
        if user.password_is_hashed() {
            writeln!(out, "{} <{}>", user.username, user.email)?;
        } else {
            writeln!(out, "{} <{}> [password not hashed]", user.username, user.email)?;
        }
    }
    match contents {
        Some(contents) => {
            let mut names = HashMap::new();
            for item in &contents.items {
                if let Some(product) = Product::find_by_id(db, item.product_id).await? {
                    names.insert(product.product_id, product.name);
                }
            }
            print_contents(out, &contents, &names)?;
        }
        None => writeln!(out, "No active cart for user {user_id}.")?,
    }
    Ok(())
}

pub async fn add_to_cart<P: Prompt, W: Write>(
    svc: &CartService,
    prompt: &mut P,
    out: &mut W,
) -> anyhow::Result<()> {
    let user_id = prompt.read_int("Enter user ID")?;
    let product_id = prompt.read_int("Enter product ID")?;
    let quantity = prompt.read_int("Enter quantity")?;

    let outcome = svc.add_to_cart(user_id, product_id, quantity).await?;
    report_add(out, &outcome)
}

pub async fn remove_from_cart<P: Prompt, W: Write>(
    svc: &CartService,
    prompt: &mut P,
    out: &mut W,
) -> anyhow::Result<()> {
    let user_id = prompt.read_int("Enter user ID")?;
    let cart_item_id = prompt.read_int("Enter cart item ID to remove")?;

    svc.remove_from_cart(user_id, cart_item_id).await?;
    report_removed(out)
}

pub async fn sign_out_cart<P: Prompt, W: Write>(
    svc: &CartService,
    prompt: &mut P,
    out: &mut W,
) -> anyhow::Result<()> {
    let user_id = prompt.read_int("Enter user ID to sign out cart")?;

    svc.sign_out_cart(user_id).await?;
    report_signed_out(out)
}

/// Add, then remove, then sign out; stops at the first failure.
pub async fn run_scenario<P: Prompt, W: Write>(
    svc: &CartService,
    prompt: &mut P,
    out: &mut W,
) -> anyhow::Result<()> {
    add_to_cart(svc, prompt, out).await?;
    remove_from_cart(svc, prompt, out).await?;
    sign_out_cart(svc, prompt, out).await?;
    Ok(())
}
