//! Line commands for the interactive shell.
//!
//! ```text
//! go <path>                      navigate with history
//! click <href> [target]          anchor click, intercepted when in-app
//! back | forward                 replay history
//! login <email> <password>
//! logout
//! register <email> <password> <first> <last> <yyyy-mm-dd> <country> <postal> <city> <street...>
//! add <product-id> [qty]
//! qty <line-id> <qty>            0 removes the line
//! remove <line-id>
//! clear
//! show                           re-print the page
//! help | quit
//! ```

use storefront_core::{AddressDraft, CustomerDraft};
use thiserror::Error;

use crate::app::{Action, App};
use crate::error::AppError;
use crate::router::{Anchor, ClickOutcome};

pub const HELP: &str = "\
go <path> | click <href> [target] | back | forward
login <email> <password> | logout
register <email> <password> <first> <last> <yyyy-mm-dd> <country> <postal> <city> <street...>
add <product-id> [qty] | qty <line-id> <qty> | remove <line-id> | clear
show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Not a number: {0}")]
    InvalidNumber(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Go(String),
    Click { href: String, target: Option<String> },
    Back,
    Forward,
    Login { email: String, password: String },
    Logout,
    Register(CustomerDraft),
    Add { product_id: String, quantity: i64 },
    Qty { line_item_id: String, quantity: i64 },
    Remove { line_item_id: String },
    Clear,
    Show,
    Help,
    Quit,
}

fn number(value: &str) -> Result<i64, ShellError> {
    value
        .parse()
        .map_err(|_| ShellError::InvalidNumber(value.to_string()))
}

impl ShellCommand {
    /// Parses one input line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            return Ok(None);
        };

        let parsed = match (command, args) {
            ("go", [path]) => ShellCommand::Go(path.to_string()),
            ("go", _) => return Err(ShellError::Usage("go <path>")),
            ("click", [href]) => ShellCommand::Click {
                href: href.to_string(),
                target: None,
            },
            ("click", [href, target]) => ShellCommand::Click {
                href: href.to_string(),
                target: Some(target.to_string()),
            },
            ("click", _) => return Err(ShellError::Usage("click <href> [target]")),
            ("back", []) => ShellCommand::Back,
            ("forward", []) => ShellCommand::Forward,
            ("login", [email, password]) => ShellCommand::Login {
                email: email.to_string(),
                password: password.to_string(),
            },
            ("login", _) => return Err(ShellError::Usage("login <email> <password>")),
            ("logout", []) => ShellCommand::Logout,
            ("register", [email, password, first, last, dob, country, postal, city, street @ ..])
                if !street.is_empty() =>
            {
                let address = AddressDraft {
                    street_name: street.join(" "),
                    city: city.to_string(),
                    postal_code: postal.to_string(),
                    country: country.to_string(),
                };
                ShellCommand::Register(CustomerDraft {
                    email: email.to_string(),
                    password: password.to_string(),
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    date_of_birth: dob.to_string(),
                    shipping_address: address,
                    billing_address: None,
                    default_shipping: true,
                    default_billing: true,
                })
            }
            ("register", _) => {
                return Err(ShellError::Usage(
                    "register <email> <password> <first> <last> <yyyy-mm-dd> <country> <postal> <city> <street...>",
                ))
            }
            ("add", [product_id]) => ShellCommand::Add {
                product_id: product_id.to_string(),
                quantity: 1,
            },
            ("add", [product_id, qty]) => ShellCommand::Add {
                product_id: product_id.to_string(),
                quantity: number(qty)?,
            },
            ("add", _) => return Err(ShellError::Usage("add <product-id> [qty]")),
            ("qty", [line_item_id, qty]) => ShellCommand::Qty {
                line_item_id: line_item_id.to_string(),
                quantity: number(qty)?,
            },
            ("qty", _) => return Err(ShellError::Usage("qty <line-id> <qty>")),
            ("remove", [line_item_id]) => ShellCommand::Remove {
                line_item_id: line_item_id.to_string(),
            },
            ("remove", _) => return Err(ShellError::Usage("remove <line-id>")),
            ("clear", []) => ShellCommand::Clear,
            ("show", []) => ShellCommand::Show,
            ("help", _) => ShellCommand::Help,
            ("quit" | "exit", _) => ShellCommand::Quit,
            (other, _) => return Err(ShellError::Unknown(other.to_string())),
        };
        Ok(Some(parsed))
    }
}

/// What the shell prints after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Render,
    Message(String),
    Quit,
}

/// Runs one command against the app.
///
/// Action failures have already been published as notices by
/// [`App::dispatch`]; they are returned so the shell can print them.
pub async fn execute(app: &App, command: ShellCommand) -> Result<Reply, AppError> {
    let action = match command {
        ShellCommand::Go(path) => {
            app.navigate(&path);
            return Ok(Reply::Render);
        }
        ShellCommand::Click { href, target } => {
            let anchor = match target {
                Some(target) => Anchor::new(href).with_target(target),
                None => Anchor::new(href),
            };
            return Ok(match app.click(&anchor) {
                ClickOutcome::Intercepted(_) => Reply::Render,
                ClickOutcome::PassThrough => {
                    Reply::Message(format!("{} opens outside the storefront", anchor.href))
                }
            });
        }
        ShellCommand::Back => {
            return Ok(match app.back() {
                Some(_) => Reply::Render,
                None => Reply::Message("Nothing to go back to".into()),
            });
        }
        ShellCommand::Forward => {
            return Ok(match app.forward() {
                Some(_) => Reply::Render,
                None => Reply::Message("Nothing to go forward to".into()),
            });
        }
        ShellCommand::Show => return Ok(Reply::Render),
        ShellCommand::Help => return Ok(Reply::Message(HELP.to_string())),
        ShellCommand::Quit => return Ok(Reply::Quit),
        ShellCommand::Login { email, password } => Action::Login { email, password },
        ShellCommand::Logout => Action::Logout,
        ShellCommand::Register(draft) => Action::Register(draft),
        ShellCommand::Add {
            product_id,
            quantity,
        } => Action::AddToCart {
            product_id,
            quantity,
        },
        ShellCommand::Qty {
            line_item_id,
            quantity,
        } => Action::ChangeQuantity {
            line_item_id,
            quantity,
        },
        ShellCommand::Remove { line_item_id } => Action::RemoveLine { line_item_id },
        ShellCommand::Clear => Action::ClearCart,
    };

    app.dispatch(action).await?;
    Ok(Reply::Render)
}
