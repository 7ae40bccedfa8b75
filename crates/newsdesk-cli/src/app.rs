use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use newsdesk_core::auth::{FileTokenStorage, KeyringTokenStorage, TokenStorage};
use newsdesk_core::config::TokenBackend;
use newsdesk_core::models::{Article, CollectionPayload, RegisterPayload, SearchQuery, SortBy, UpdateProfilePayload, UserProfile};
use newsdesk_core::search_cache::{SearchCache, SearchMeta, SearchState};
use newsdesk_core::undo::UndoScheduler;
use newsdesk_core::{ApiClient, ApiError, Config, SessionError, SessionManager, TokenStore};

use crate::commands::{Command, USAGE};
use crate::utils::{format_date, format_list, format_optional, truncate_string};

// ============================================================================
// Constants
// ============================================================================

/// Results fetched per search page and shown per `more`.
pub const PAGE_SIZE: usize = 20;

/// Minimum password length accepted by the backend.
const MIN_PASSWORD_LEN: usize = 6;

/// How long `logout` waits for the server to acknowledge.
const LOGOUT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Width of article titles in listings.
const TITLE_WIDTH: usize = 80;

pub struct App {
    config: Config,
    api: ApiClient,
    session: SessionManager,
    search_cache: SearchCache,
    undo: UndoScheduler,
}

impl App {
    /// Create the application and start restoring the session.
    pub fn new(config: Config, cache_dir: PathBuf) -> Result<Self> {
        let api = ApiClient::new(&config)?;

        let storage: Arc<dyn TokenStorage> = match config.token_backend() {
            TokenBackend::File => Arc::new(FileTokenStorage::new(cache_dir.clone())),
            TokenBackend::Keyring => Arc::new(KeyringTokenStorage::new()),
        };
        debug!(backend = ?config.token_backend(), "Token storage configured");

        let session = SessionManager::start_with_client(&api, TokenStore::open(storage));
        let search_cache = SearchCache::new(cache_dir)?;
        let undo = UndoScheduler::new(config.undo_window());

        Ok(Self {
            config,
            api,
            session,
            search_cache,
            undo,
        })
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        if command == Command::Help {
            print!("{}", USAGE);
            return Ok(());
        }

        let state = self.session.settled().await;
        debug!(status = ?state.status(), "Session ready");
        if command.requires_login() && !state.is_authenticated() {
            return Err(SessionError::NotAuthenticated.into());
        }

        match command {
            Command::Login { email } => self.login(email).await,
            Command::Register {
                email,
                name,
                country,
                language,
            } => self.register(email, name, country, language).await,
            Command::Logout => self.logout().await,
            Command::Whoami { json } => self.whoami(json),
            Command::Profile(payload) => self.profile(payload).await,
            Command::ResetPassword { email } => self.reset_password(&email).await,
            Command::Search {
                topic,
                sort_by,
                from,
                to,
            } => self.search(topic, sort_by, from, to).await,
            Command::More => self.more().await,
            Command::History => self.history().await,
            Command::Collections => self.collections().await,
            Command::Collection { id } => self.collection(id).await,
            Command::Create { name, description } => self.create(&name, description.as_deref()).await,
            Command::Rename { id, name } => self.rename(id, name).await,
            Command::Delete { id } => self.delete(id).await,
            Command::Save { collection_id, result } => self.save(collection_id, result).await,
            Command::Unsave {
                collection_id,
                article_id,
            } => self.unsave(collection_id, article_id).await,
            Command::Help => Ok(()),
        }
    }

    // =========================================================================
    // Account
    // =========================================================================

    async fn login(&mut self, email: Option<String>) -> Result<()> {
        let email = match email {
            Some(email) => email,
            None => prompt_with_default("Email", self.config.last_email.as_deref())?,
        };
        if email.is_empty() {
            bail!("Email required");
        }
        let password = prompt_password("Password: ")?;

        self.session
            .login(&email, &password)
            .await
            .map_err(|e| friendly_auth_error(e, "Invalid email or password"))?;

        self.config.last_email = Some(email);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        let user = self.session.user().unwrap_or_default();
        println!("Signed in as {}", user.display_name());
        Ok(())
    }

    async fn register(
        &mut self,
        email: String,
        name: String,
        country: Option<String>,
        language: Option<String>,
    ) -> Result<()> {
        let password = prompt_password("Password: ")?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            bail!("Password must be at least {} characters", MIN_PASSWORD_LEN);
        }
        if prompt_password("Confirm password: ")? != password {
            bail!("Passwords do not match");
        }

        let payload = RegisterPayload {
            email: email.clone(),
            password,
            name,
            country,
            language,
        };
        self.session.register(&payload).await.context("Registration failed")?;

        self.config.last_email = Some(email);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        println!("Welcome, {}!", self.session.user().unwrap_or_default().display_name());
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        let was_signed_in = self.session.state().is_authenticated();
        let notify = self.session.logout();
        self.search_cache.clear();

        if let Some(notify) = notify {
            if tokio::time::timeout(LOGOUT_NOTIFY_TIMEOUT, notify).await.is_err() {
                debug!("Server did not acknowledge logout in time");
            }
        }

        if was_signed_in {
            println!("Signed out");
        } else {
            println!("Not signed in");
        }
        Ok(())
    }

    fn whoami(&self, json: bool) -> Result<()> {
        let Some(user) = self.session.user() else {
            println!("Not signed in");
            return Ok(());
        };
        if json {
            println!("{}", serde_json::to_string_pretty(&user)?);
        } else {
            print_profile(&user);
        }
        Ok(())
    }

    async fn profile(&mut self, payload: UpdateProfilePayload) -> Result<()> {
        if payload.is_empty() {
            return self.whoami(false);
        }
        let user = self.session.update_user(&payload).await?;
        println!("Profile updated ({})", payload.fields().join(", "));
        print_profile(&user);
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> Result<()> {
        let Some(token) = self.api.request_password_reset(email).await? else {
            println!("If {} has an account, a reset link is on its way.", email);
            return Ok(());
        };

        let password = prompt_password("New password: ")?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            bail!("Password must be at least {} characters", MIN_PASSWORD_LEN);
        }
        self.api.reset_password(&token, &password).await?;
        println!("Password updated. Sign in with `newsdesk login {}`.", email);
        Ok(())
    }

    // =========================================================================
    // Search
    // =========================================================================

    async fn search(
        &self,
        topic: String,
        sort_by: SortBy,
        from: Option<String>,
        to: Option<String>,
    ) -> Result<()> {
        let query = SearchQuery {
            sort_by,
            from: from.clone(),
            to: to.clone(),
            page_size: PAGE_SIZE as u32,
            ..SearchQuery::new(topic.clone())
        };
        let result = self.api.search_news(&query).await?;
        info!(topic = %topic, count = result.articles.len(), total = result.total_results, "Search completed");

        let mut state = SearchState {
            query: topic,
            from,
            to,
            sort_by,
            articles: result.articles,
            visible_count: 0,
            total: result.total_results,
            pages_fetched: 1,
        };
        state.show_more(PAGE_SIZE);
        self.search_cache.save_state(&state);
        self.search_cache.save_meta(&SearchMeta::default());

        if state.articles.is_empty() {
            println!("No articles found for '{}'", state.query);
            return Ok(());
        }
        println!("{} results for '{}'\n", state.total, state.query);
        print_articles(state.visible_articles(), 0);
        print_more_hint(&state);
        Ok(())
    }

    async fn more(&self) -> Result<()> {
        let cached = self
            .search_cache
            .load_state()
            .ok_or_else(|| anyhow!("No previous search. Run `newsdesk search <topic>` first."))?;
        if cached.is_stale() {
            println!("(results from {})", cached.age_display());
        }
        let mut state = cached.data;
        let start = state.visible_articles().len();

        if !state.has_hidden() && state.has_more_pages() {
            let query = SearchQuery {
                page: state.next_page(),
                page_size: PAGE_SIZE as u32,
                sort_by: state.sort_by,
                from: state.from.clone(),
                to: state.to.clone(),
                ..SearchQuery::new(state.query.clone())
            };
            let result = self.api.search_news(&query).await?;
            let added = state.append_page(result.articles);
            debug!(page = query.page, new = added, "Fetched next page");
        }

        if state.show_more(PAGE_SIZE) == 0 {
            println!("No more results for '{}'", state.query);
        } else {
            print_articles(&state.visible_articles()[start..], start);
            print_more_hint(&state);
        }

        self.search_cache.save_state(&state);
        self.search_cache.save_meta(&SearchMeta {
            selected_index: None,
            scroll_offset: start,
        });
        Ok(())
    }

    async fn history(&self) -> Result<()> {
        let topics = self.api.fetch_search_history().await?;
        if topics.is_empty() {
            println!("No searches yet");
        }
        for topic in topics {
            println!("  {}", topic);
        }
        Ok(())
    }

    // =========================================================================
    // Collections
    // =========================================================================

    async fn collections(&self) -> Result<()> {
        let collections = self.api.fetch_collections().await?;
        if collections.is_empty() {
            println!("No collections yet. Create one with `newsdesk create <name>`.");
        }
        for c in collections {
            println!("{:>5}  {:<30}  {}", c.id, truncate_string(&c.name, 30), c.display_article_count());
        }
        Ok(())
    }

    async fn collection(&self, id: i64) -> Result<()> {
        let collection = self.api.fetch_collection(id).await?;
        println!("{} ({})", collection.name, collection.display_article_count());
        if let Some(description) = collection.description.as_deref().filter(|d| !d.is_empty()) {
            println!("{}", description);
        }
        println!();
        for article in &collection.articles {
            let id = article.id.map(|i| i.to_string()).unwrap_or_else(|| "-".to_string());
            println!("{:>5}  {}", id, truncate_string(&article.title, TITLE_WIDTH));
            println!("       {}", article.url);
        }
        Ok(())
    }

    async fn create(&self, name: &str, description: Option<&str>) -> Result<()> {
        let collection = self.api.create_collection(name, description).await?;
        println!("Created collection {} '{}'", collection.id, collection.name);
        Ok(())
    }

    async fn rename(&self, id: i64, name: String) -> Result<()> {
        let payload = CollectionPayload {
            name: Some(name),
            description: None,
        };
        let collection = self.api.update_collection(id, &payload).await?;
        println!("Renamed collection {} to '{}'", collection.id, collection.name);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let collection = self.api.fetch_collection(id).await?;
        let label = format!("Deleted collection '{}'", collection.name);

        let api = self.api.clone();
        self.undo
            .schedule(label.clone(), move || async move { api.delete_collection(id).await });
        self.wait_for_undo(&label).await
    }

    async fn save(&self, collection_id: i64, result: usize) -> Result<()> {
        let state = self
            .search_cache
            .load_state()
            .ok_or_else(|| anyhow!("No previous search. Run `newsdesk search <topic>` first."))?
            .data;
        let article = state
            .visible_articles()
            .get(result - 1)
            .ok_or_else(|| anyhow!("No result number {} in the last search", result))?;

        let saved = self
            .api
            .add_article_to_collection(collection_id, article)
            .await?;
        println!(
            "Saved '{}' to collection {}",
            truncate_string(&saved.title, TITLE_WIDTH),
            collection_id
        );
        Ok(())
    }

    async fn unsave(&self, collection_id: i64, article_id: i64) -> Result<()> {
        let label = format!("Removed article {} from collection {}", article_id, collection_id);

        let api = self.api.clone();
        self.undo.schedule(label.clone(), move || async move {
            api.remove_article_from_collection(collection_id, article_id).await
        });
        self.wait_for_undo(&label).await
    }

    /// Show the pending action and let the user undo it with Enter until
    /// the window elapses.
    async fn wait_for_undo(&self, label: &str) -> Result<()> {
        println!(
            "{}. Press Enter within {}s to undo.",
            label,
            self.undo.window().as_secs()
        );

        let enter = read_line_in_background();
        tokio::select! {
            _ = self.undo.settled() => {
                println!("Done");
            }
            Ok(()) = enter => {
                if self.undo.undo() {
                    println!("Undone");
                } else {
                    // Window closed while the key was being read
                    self.undo.settled().await;
                    println!("Too late to undo");
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Output
// ============================================================================

fn print_profile(user: &UserProfile) {
    println!("Name:      {}", user.display_name());
    println!("Email:     {}", user.email);
    println!("Country:   {}", format_optional(user.country.as_deref(), "-"));
    println!("Languages: {}", format_list(&user.languages, "-"));
    println!("Topics:    {}", format_list(&user.favorite_topics, "-"));
    println!(
        "News API:  {}",
        if user.has_news_api_token() { "configured" } else { "not set" }
    );
}

fn print_articles(articles: &[Article], offset: usize) {
    for (i, article) in articles.iter().enumerate() {
        let published = article
            .published_at
            .as_deref()
            .map(format_date)
            .unwrap_or_default();
        println!("{:>3}. {}", offset + i + 1, truncate_string(&article.title, TITLE_WIDTH));
        println!("     {} {}", article.display_source(), published);
        println!("     {}", article.url);
    }
}

fn print_more_hint(state: &SearchState) {
    if state.has_hidden() || state.has_more_pages() {
        println!("\nShowing {} of {}. Run `newsdesk more` for more.", state.visible_count, state.total);
    }
}

fn friendly_auth_error(e: anyhow::Error, unauthorized: &str) -> anyhow::Error {
    if ApiError::is_unauthorized(&e) {
        anyhow!("{}", unauthorized)
    } else {
        e
    }
}

// ============================================================================
// Prompts
// ============================================================================

fn prompt_with_default(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(default) => print!("{} [{}]: ", label, default),
        None => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match default {
        Some(default) if input.is_empty() => default.to_string(),
        _ => input.to_string(),
    })
}

fn prompt_password(prompt: &str) -> Result<String> {
    let password = rpassword::prompt_password(prompt)?;
    Ok(password)
}

/// Resolves when a line is read from stdin. The reader thread is detached
/// so a pending read does not keep the process alive.
fn read_line_in_background() -> oneshot::Receiver<()> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let mut line = String::new();
        // EOF (non-interactive stdin) never counts as Enter
        if matches!(io::stdin().read_line(&mut line), Ok(n) if n > 0) {
            let _ = tx.send(());
        }
    });
    rx
}
