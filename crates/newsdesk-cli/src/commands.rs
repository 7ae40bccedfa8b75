//! Command-line argument parsing.

use anyhow::{anyhow, bail, Context, Result};
use newsdesk_core::models::{SortBy, UpdateProfilePayload};

pub const USAGE: &str = "\
Usage: newsdesk <command> [args]

Account:
  login [email]                        Sign in (prompts for the password)
  register <email> <name> [country] [language]
  logout                               Sign out
  whoami [--json]                      Show the signed-in user
  profile [--name N] [--country C] [--languages a,b] [--topics a,b] [--api-token T]
  reset-password <email>               Request a password reset

News:
  search <topic> [--sort relevancy|publishedAt] [--from YYYY-MM-DD] [--to YYYY-MM-DD]
  more                                 Show more results of the last search
  history                              Recent search topics

Collections:
  collections                          List collections
  collection <id>                      Show a collection's articles
  create <name> [description]
  rename <id> <name>
  delete <id>                          Delete (press Enter to undo)
  save <collection_id> <result_number> Save a search result
  unsave <collection_id> <article_id>  Remove a saved article (press Enter to undo)
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { email: Option<String> },
    Register {
        email: String,
        name: String,
        country: Option<String>,
        language: Option<String>,
    },
    Logout,
    Whoami { json: bool },
    Profile(UpdateProfilePayload),
    ResetPassword { email: String },
    Search {
        topic: String,
        sort_by: SortBy,
        from: Option<String>,
        to: Option<String>,
    },
    More,
    History,
    Collections,
    Collection { id: i64 },
    Create { name: String, description: Option<String> },
    Rename { id: i64, name: String },
    Delete { id: i64 },
    Save { collection_id: i64, result: usize },
    Unsave { collection_id: i64, article_id: i64 },
    Help,
}

impl Command {
    /// Whether the command needs a signed-in user.
    pub fn requires_login(&self) -> bool {
        !matches!(
            self,
            Command::Login { .. }
                | Command::Register { .. }
                | Command::Logout
                | Command::Whoami { .. }
                | Command::ResetPassword { .. }
                | Command::Help
        )
    }
}

/// Parse the arguments following the program name.
pub fn parse(args: &[String]) -> Result<Command> {
    let Some((name, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };
    let mut args = Args::new(rest);

    let command = match name.as_str() {
        "login" => Command::Login {
            email: args.positional(),
        },
        "register" => Command::Register {
            email: args.required("email")?,
            name: args.required("name")?,
            country: args.positional(),
            language: args.positional(),
        },
        "logout" => Command::Logout,
        "whoami" => Command::Whoami {
            json: args.flag("--json"),
        },
        "profile" => Command::Profile(UpdateProfilePayload {
            name: args.option("--name")?,
            country: args.option("--country")?,
            languages: args.option("--languages")?.map(|v| split_list(&v)),
            favorite_topics: args.option("--topics")?.map(|v| split_list(&v)),
            news_api_token: args.option("--api-token")?,
        }),
        "reset-password" => Command::ResetPassword {
            email: args.required("email")?,
        },
        "search" => {
            let sort_by = match args.option("--sort")? {
                Some(s) => SortBy::from_str(&s).ok_or_else(|| anyhow!("Unknown sort order '{}'", s))?,
                None => SortBy::default(),
            };
            let from = args.option("--from")?;
            let to = args.option("--to")?;
            let topic = args.rest().join(" ");
            if topic.trim().is_empty() {
                bail!("Missing search topic");
            }
            Command::Search {
                topic,
                sort_by,
                from,
                to,
            }
        }
        "more" => Command::More,
        "history" => Command::History,
        "collections" => Command::Collections,
        "collection" => Command::Collection {
            id: args.id("collection id")?,
        },
        "create" => Command::Create {
            name: args.required("name")?,
            description: args.positional(),
        },
        "rename" => Command::Rename {
            id: args.id("collection id")?,
            name: args.required("name")?,
        },
        "delete" => Command::Delete {
            id: args.id("collection id")?,
        },
        "save" => {
            let collection_id = args.id("collection id")?;
            let result = args.required("result number")?;
            let result = result
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow!("Invalid result number '{}'", result))?;
            Command::Save { collection_id, result }
        }
        "unsave" => Command::Unsave {
            collection_id: args.id("collection id")?,
            article_id: args.id("article id")?,
        },
        "help" | "--help" | "-h" => Command::Help,
        other => bail!("Unknown command '{}'", other),
    };

    if let Some(extra) = args.rest().first() {
        bail!("Unexpected argument '{}'", extra);
    }
    Ok(command)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remaining arguments. Options are taken out wherever they appear;
/// positionals are consumed from the front.
struct Args {
    items: Vec<String>,
}

impl Args {
    fn new(items: &[String]) -> Self {
        Self { items: items.to_vec() }
    }

    fn flag(&mut self, name: &str) -> bool {
        match self.items.iter().position(|a| a == name) {
            Some(i) => {
                self.items.remove(i);
                true
            }
            None => false,
        }
    }

    fn option(&mut self, name: &str) -> Result<Option<String>> {
        let Some(i) = self.items.iter().position(|a| a == name) else {
            return Ok(None);
        };
        if i + 1 >= self.items.len() {
            bail!("Missing value for {}", name);
        }
        let value = self.items.remove(i + 1);
        self.items.remove(i);
        Ok(Some(value))
    }

    fn positional(&mut self) -> Option<String> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    fn required(&mut self, what: &str) -> Result<String> {
        self.positional().ok_or_else(|| anyhow!("Missing {}", what))
    }

    fn id(&mut self, what: &str) -> Result<i64> {
        let raw = self.required(what)?;
        raw.parse()
            .with_context(|| format!("Invalid {} '{}'", what, raw))
    }

    fn rest(&mut self) -> Vec<String> {
        std::mem::take(&mut self.items)
    }
}
