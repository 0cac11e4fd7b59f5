//! Sethmo Admin CLI - edit Sethmo Group website content
//!
//! # Session
//!
//! ```bash
//! sethmo-admin login -u admin          # store a session token
//! sethmo-admin whoami
//! sethmo-admin password                # change password (prompts)
//! sethmo-admin logout
//! ```
//!
//! # Content
//!
//! ```bash
//! sethmo-admin types                           # list content types
//! sethmo-admin pull careers -o careers.json    # load and print a document
//! sethmo-admin push careers careers.json       # validate and publish a document
//! sethmo-admin edit careers --add --set 0.title="Senior Mine Engineer"
//! sethmo-admin edit settings --set socialLinks.linkedin=https://linkedin.com/company/sethmo
//! sethmo-admin delete team 64f0c2...           # remove one record
//! sethmo-admin upload logo.png --type businesses
//! sethmo-admin messages --open 0
//! sethmo-admin stats
//! ```

use clap::{Parser, Subcommand};
use serde_json::Value;
use sethmo_admin::{
    content, dashboard, required_fields, server_id, session, ApiError, AssumeYes, CollectionEditor,
    Config, Confirm, ContentApi, ContentType, DocumentEditor, HttpContentApi, Inbox, Phase, SessionStore,
    StatusMessage, UploadTarget, CONTENT_TYPES,
};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "sethmo-admin")]
#[command(about = "Load, edit and publish Sethmo Group website content", long_about = None)]
struct Cli {
    /// Content API base URL (overrides SETHMO_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides SETHMO_SESSION_FILE)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Log API calls and state changes
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        /// Username (email)
        #[arg(short, long)]
        username: String,

        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// List editable content types
    Types,

    /// Load a content type and print its document
    Pull {
        /// Content type name or resource path
        content_type: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace a content type with a JSON file, validate and save it
    Push {
        /// Content type name or resource path
        content_type: String,

        /// JSON document, as printed by `pull`
        file: PathBuf,
    },

    /// Edit records in place, then save.
    ///
    /// Applied in this order: removals, the new record, field updates,
    /// envelope fields. VALUE is parsed as JSON when it parses, otherwise
    /// taken as text.
    Edit {
        /// Content type name or resource path
        content_type: String,

        /// Add a record from the content type's template
        #[arg(long)]
        add: bool,

        /// INDEX.FIELD=VALUE for collections, FIELD[.SUB]=VALUE for documents
        #[arg(long = "set", value_name = "PATH=VALUE")]
        sets: Vec<String>,

        /// Envelope field, e.g. sectionTitle=VALUE
        #[arg(long = "extra", value_name = "FIELD=VALUE")]
        extras: Vec<String>,

        /// Remove the record at INDEX (as loaded)
        #[arg(long = "remove", value_name = "INDEX")]
        removes: Vec<usize>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove one record by server id
    Delete {
        /// Content type name or resource path
        content_type: String,

        /// The record's `_id`
        id: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Upload a file and print its URL
    Upload {
        /// File to upload
        file: PathBuf,

        /// Use the upload endpoint of this content type (hero, businesses, expertise)
        #[arg(long = "type", value_name = "CONTENT_TYPE", conflicts_with_all = ["resource", "section"])]
        content_type: Option<String>,

        /// POST /<RESOURCE>/upload
        #[arg(long, conflicts_with = "section")]
        resource: Option<String>,

        /// POST /upload?section=<SECTION>
        #[arg(long)]
        section: Option<String>,
    },

    /// Read and delete contact messages
    Messages {
        /// Open (and mark read) the message at INDEX
        #[arg(long, value_name = "INDEX")]
        open: Option<usize>,

        /// Delete the message at INDEX
        #[arg(long, value_name = "INDEX")]
        delete: Option<usize>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show dashboard statistics
    Stats,

    /// Change the password of the logged-in user
    Password {
        #[arg(long)]
        current: Option<String>,

        #[arg(long)]
        new: Option<String>,

        #[arg(long)]
        confirm: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match load_config(&cli) {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(path) = &cli.session_file {
        config = config.with_session_file(path);
    }
    Ok(config)
}

async fn run(command: Commands, config: Config) -> CliResult {
    let api = HttpContentApi::new(&config)?;
    let store = SessionStore::new(&config.session_file);

    match command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password")?,
            };
            eprintln!("🔐 Logging in to {}", api.base_url());
            let session = session::login(&api, &store, &username, &password).await?;
            eprintln!("✅ Logged in as {}", session.username);
            eprintln!("   Session saved to: {}", store.path().display());
        }

        Commands::Logout => {
            if store.clear()? {
                eprintln!("👋 Logged out");
            } else {
                eprintln!("   No session stored");
            }
        }

        Commands::Whoami => match store.load()? {
            Some(session) => {
                println!("{}", session.username);
                eprintln!("   Logged in since {}", session.logged_in_at.format("%Y-%m-%d %H:%M UTC"));
            }
            None => eprintln!("   Not logged in"),
        },

        Commands::Types => cmd_types(),

        Commands::Pull { content_type, output } => {
            cmd_pull(api, &config, &content_type, output.as_deref()).await?
        }

        Commands::Push { content_type, file } => cmd_push(api, &config, &content_type, &file).await?,

        Commands::Edit {
            content_type,
            add,
            sets,
            extras,
            removes,
            yes,
        } => {
            let edits = Edits {
                add,
                sets,
                extras,
                removes,
            };
            cmd_edit(api, &config, &content_type, edits, yes).await?
        }

        Commands::Delete { content_type, id, yes } => {
            cmd_delete(api, &config, &content_type, &id, yes).await?
        }

        Commands::Upload {
            file,
            content_type,
            resource,
            section,
        } => {
            let target = match (content_type, resource, section) {
                (Some(name), _, _) => content::upload_target(&name)?,
                (None, Some(resource), _) => UploadTarget::Resource(resource),
                (None, None, Some(section)) => UploadTarget::Section(section),
                (None, None, None) => {
                    return Err("one of --type, --resource or --section is required".into())
                }
            };
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload")
                .to_string();
            let bytes = fs::read(&file)?;
            eprintln!("📤 Uploading {} ({} bytes)", file.display(), bytes.len());
            let uploaded = api
                .upload(&target, &name, bytes)
                .await
                .map_err(with_login_hint)?;
            eprintln!("✅ Uploaded");
            println!("{}", uploaded.url);
        }

        Commands::Messages { open, delete, yes } => cmd_messages(api, open, delete, yes).await?,

        Commands::Stats => {
            let stats = dashboard::overview(&api).await;
            for line in dashboard::summary(&stats) {
                println!("{}", line);
            }
        }

        Commands::Password {
            current,
            new,
            confirm,
        } => {
            let session = store.require()?;
            let current = or_prompt(current, "Current password")?;
            let new = or_prompt(new, "New password")?;
            let confirm = or_prompt(confirm, "Confirm new password")?;
            session::change_password(&api, &session, &current, &new, &confirm).await?;
            eprintln!("✅ Password changed for {}", session.username);
        }
    }

    Ok(())
}

// =============================================================================
// Content commands
// =============================================================================

fn cmd_types() {
    println!("{:<16} {:<20} {:<11} {:<10} REQUIRED", "NAME", "RESOURCE", "SHAPE", "DELETION");
    for ct in CONTENT_TYPES.iter() {
        let shape = if ct.is_collection() { "collection" } else { "document" };
        let deletion = if !ct.is_collection() {
            "-"
        } else if ct.deletion == content::Deletion::Immediate {
            "immediate"
        } else {
            "on save"
        };
        println!(
            "{:<16} {:<20} {:<11} {:<10} {}",
            ct.name,
            ct.resource,
            shape,
            deletion,
            required_fields(ct).join(", ")
        );
    }
}

async fn cmd_pull(api: HttpContentApi, config: &Config, name: &str, output: Option<&Path>) -> CliResult {
    let ct = sethmo_admin::content_type(name)?;
    eprintln!("📥 Loading {}", ct.label);

    let document = if ct.is_collection() {
        let mut editor = collection_editor(api, ct, config);
        if !editor.load().await {
            return Err(failure(editor.status()));
        }
        eprintln!("   {} records", editor.len());
        editor.to_document()
    } else {
        let mut editor = document_editor(api, ct, config);
        if !editor.load().await {
            return Err(failure(editor.status()));
        }
        editor.to_document()
    };

    write_output(&serde_json::to_string_pretty(&document)?, output)
}

async fn cmd_push(api: HttpContentApi, config: &Config, name: &str, file: &Path) -> CliResult {
    let ct = sethmo_admin::content_type(name)?;
    let document: Value = serde_json::from_str(&fs::read_to_string(file)?)?;
    eprintln!("📤 Publishing {} from {}", ct.label, file.display());

    if ct.is_collection() {
        let mut editor = collection_editor(api, ct, config);
        if !(editor.replace_document(document) && editor.save().await) {
            return Err(failure(editor.status()));
        }
        report(editor.status());
    } else {
        let mut editor = document_editor(api, ct, config);
        if !(editor.replace_document(document) && editor.save().await) {
            return Err(failure(editor.status()));
        }
        report(editor.status());
    }
    Ok(())
}

struct Edits {
    add: bool,
    sets: Vec<String>,
    extras: Vec<String>,
    removes: Vec<usize>,
}

async fn cmd_edit(api: HttpContentApi, config: &Config, name: &str, edits: Edits, yes: bool) -> CliResult {
    let ct = sethmo_admin::content_type(name)?;
    eprintln!("✏️  Editing {}", ct.label);

    if !ct.is_collection() {
        if edits.add || !edits.removes.is_empty() || !edits.extras.is_empty() {
            return Err(format!("'{}' is a single document: only --set applies", ct.name).into());
        }
        let mut editor = document_editor(api, ct, config);
        if !editor.load().await {
            return Err(failure(editor.status()));
        }
        for set in &edits.sets {
            let (path, value) = split_assignment(set)?;
            if !editor.set_field(path, value) {
                return Err(format!("cannot set '{}'", path).into());
            }
        }
        if !editor.save().await {
            return Err(failure(editor.status()));
        }
        report(editor.status());
        return Ok(());
    }

    let mut editor = collection_editor(api, ct, config);
    if !editor.load().await {
        return Err(failure(editor.status()));
    }

    // Resolve every index against the loaded list before anything moves.
    let mut keys = Vec::with_capacity(edits.removes.len());
    for index in &edits.removes {
        keys.push(
            editor
                .key_at(*index)
                .ok_or_else(|| format!("no record at index {}", index))?,
        );
    }
    let confirm = CliConfirm { yes };
    for key in keys {
        if !editor.remove_by_key(key, &confirm).await && editor.phase() == Phase::Error {
            return Err(failure(editor.status()));
        }
    }

    if edits.add {
        let key = editor.add_record();
        let index = editor.index_of(key).unwrap_or_default();
        eprintln!("   ➕ New record at index {}", index);
    }

    for set in &edits.sets {
        let (path, value) = split_assignment(set)?;
        let (index, field) = path
            .split_once('.')
            .and_then(|(i, f)| i.parse::<usize>().ok().map(|i| (i, f)))
            .ok_or_else(|| format!("expected INDEX.FIELD=VALUE, got '{}'", set))?;
        if !editor.update_field(index, field, value) {
            return Err(format!("no record at index {}", index).into());
        }
    }

    for extra in &edits.extras {
        let (field, value) = split_assignment(extra)?;
        if !editor.set_extra(field, value) {
            return Err(format!("'{}' has no envelope field '{}'", ct.name, field).into());
        }
    }

    if !editor.save().await {
        return Err(failure(editor.status()));
    }
    report(editor.status());
    Ok(())
}

async fn cmd_delete(api: HttpContentApi, config: &Config, name: &str, id: &str, yes: bool) -> CliResult {
    let ct = sethmo_admin::collection_type(name)?;
    let mut editor = collection_editor(api, ct, config);
    if !editor.load().await {
        return Err(failure(editor.status()));
    }

    let key = editor
        .entries()
        .iter()
        .find(|e| server_id(&e.record).as_deref() == Some(id))
        .map(|e| e.key)
        .ok_or_else(|| format!("no {} record with id {}", ct.name, id))?;

    eprintln!("🗑️  Removing {} from {}", id, ct.label);
    if !editor.remove_by_key(key, &CliConfirm { yes }).await {
        if editor.phase() == Phase::Error {
            return Err(failure(editor.status()));
        }
        eprintln!("   Cancelled");
        return Ok(());
    }

    if ct.deletion == content::Deletion::Deferred && !editor.save().await {
        return Err(failure(editor.status()));
    }
    report(editor.status());
    Ok(())
}

async fn cmd_messages(api: HttpContentApi, open: Option<usize>, delete: Option<usize>, yes: bool) -> CliResult {
    let mut inbox = Inbox::new(api);
    if !inbox.load().await {
        return Err(failure(inbox.status()));
    }

    if let Some(index) = open {
        let message = inbox
            .open(index)
            .await
            .ok_or_else(|| format!("no message at index {}", index))?;
        println!("{}", serde_json::to_string_pretty(&message)?);
        return Ok(());
    }

    if let Some(index) = delete {
        if !inbox.remove(index, &CliConfirm { yes }).await {
            if inbox.phase() == Phase::Error {
                return Err(failure(inbox.status()));
            }
            eprintln!("   Cancelled");
            return Ok(());
        }
        report(inbox.status());
        return Ok(());
    }

    eprintln!("📬 {} messages, {} unread\n", inbox.messages().len(), inbox.unread_count());
    for (index, message) in inbox.messages().iter().enumerate() {
        let unread = !message.get("isRead").and_then(Value::as_bool).unwrap_or(false);
        println!(
            "{:>3} {} {:<24} {}",
            index,
            if unread { "●" } else { " " },
            text(message, "name"),
            text(message, "subject")
        );
    }
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn collection_editor<A: ContentApi>(api: A, ct: &'static ContentType, config: &Config) -> CollectionEditor<A> {
    CollectionEditor::new(api, ct).with_status_window(config.status_window)
}

fn document_editor<A: ContentApi>(api: A, ct: &'static ContentType, config: &Config) -> DocumentEditor<A> {
    DocumentEditor::new(api, ct).with_status_window(config.status_window)
}

/// Asks on stderr, reads the answer from stdin.
struct CliConfirm {
    yes: bool,
}

impl Confirm for CliConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.yes {
            return AssumeYes.confirm(prompt);
        }
        eprint!("❓ {} [y/N] ", prompt);
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

fn prompt(label: &str) -> io::Result<String> {
    eprint!("{}: ", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn or_prompt(value: Option<String>, label: &str) -> io::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => prompt(label),
    }
}

/// `path=value`, with the value read as JSON when it parses.
fn split_assignment(assignment: &str) -> Result<(&str, Value), String> {
    let (path, raw) = assignment
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got '{}'", assignment))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((path.trim(), value))
}

fn text<'a>(record: &'a Value, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap_or("")
}

/// Point at `login` when the server turns the request away.
fn with_login_hint(err: ApiError) -> Box<dyn std::error::Error> {
    if err.needs_login() {
        format!("{} (run 'sethmo-admin login' first)", err).into()
    } else {
        err.into()
    }
}

fn report(status: Option<&StatusMessage>) {
    if let Some(status) = status {
        eprintln!("✅ {}", status.text);
    }
}

fn failure(status: Option<&StatusMessage>) -> Box<dyn std::error::Error> {
    status
        .map(|s| s.text.clone())
        .unwrap_or_else(|| "operation failed".to_string())
        .into()
}

fn write_output(content: &str, path: Option<&Path>) -> CliResult {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
