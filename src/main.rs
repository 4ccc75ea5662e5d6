//! Toolnest - Markdown authoring for the MK Tool Nest topic blogs.
//!
//! # Usage
//!
//! ```bash
//! toolnest render post.md --watch -o preview.html
//! toolnest format post.md --action bold --start 6 --end 11 --in-place
//! export TOOLNEST_ADMIN_EMAIL=me@example.com
//! toolnest save post.md --title "Brake Pads 101" --topic baybolt --draft
//! toolnest save post.md --id 3 --publish
//! toolnest list --topic baybolt
//! toolnest sitemap --base-url https://mktoolnest.com
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};

use toolnest::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use toolnest::editor::Selection;
use toolnest::format::{ToolbarAction, apply_format};
use toolnest::linkify::linkify;
use toolnest::perf;
use toolnest::post::{PostRecord, generate_slug};
use toolnest::preview::PreviewRenderer;
use toolnest::session::{EditorSession, PostEdits};
use toolnest::share::share_links;
use toolnest::sitemap::{DEFAULT_BASE_URL, build_sitemap, to_xml};
use toolnest::store::{
    ADMIN_ENV, AuthGate, EnvAuth, FileStore, ImageStore, PostFilter, PostStore, SettingsStore,
    mime_for_path, object_name, validate_upload,
};
use toolnest::topics::{HOME_HERO_KEY, TopicRegistry};
use toolnest::watcher::{DEFAULT_DEBOUNCE, SourceWatcher};

/// Markdown authoring for the MK Tool Nest topic blogs
#[derive(Parser, Debug)]
#[command(name = "toolnest", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Watch the source and re-render on change
    #[arg(short, long, global = true)]
    watch: bool,

    /// Log timing for rendering and storage
    #[arg(long, global = true)]
    perf: bool,

    /// Write detailed render debug events to a file
    #[arg(long, value_name = "PATH", global = true)]
    render_debug_log: Option<PathBuf>,

    /// Directory holding posts, settings and uploaded images
    #[arg(long, value_name = "DIR", global = true)]
    store: Option<PathBuf>,

    /// JSON5 topic configuration (defaults to the built-in topics)
    #[arg(long, value_name = "FILE", global = true)]
    topics: Option<PathBuf>,

    /// Public site origin used for sitemap and image URLs
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    /// Save current command-line flags as defaults
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults
    #[arg(long, global = true)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render Markdown to preview HTML
    Render {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Write HTML here instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
    /// Apply a toolbar action to a char range
    Format {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long, value_enum)]
        action: ToolbarAction,
        #[arg(long, default_value_t = 0)]
        start: usize,
        #[arg(long, default_value_t = 0)]
        end: usize,
        /// Rewrite FILE instead of printing the result
        #[arg(long)]
        in_place: bool,
    },
    /// Print the URL slug for a title
    Slug {
        #[arg(required = true, value_name = "TITLE")]
        title: Vec<String>,
    },
    /// Create or update a post from a Markdown file
    ///
    /// When updating, fields not given keep their stored values.
    Save {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Required for a new post
        #[arg(long)]
        title: Option<String>,
        /// Required for a new post
        #[arg(long)]
        topic: Option<String>,
        /// Update this post instead of creating one
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        excerpt: Option<String>,
        /// Pass an empty value to clear
        #[arg(long)]
        category: Option<String>,
        /// Pass an empty value to clear
        #[arg(long)]
        external_link: Option<String>,
        /// Make the post public (the default for new posts)
        #[arg(long, conflicts_with = "draft")]
        publish: bool,
        /// Take the post off the public site
        #[arg(long)]
        draft: bool,
    },
    /// List posts, newest first
    List {
        /// Only posts in this topic
        #[arg(long)]
        topic: Option<String>,
        /// Hide drafts
        #[arg(long)]
        published: bool,
    },
    /// Delete a post
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Print social share links for a published post
    Share {
        /// Post id or slug
        #[arg(value_name = "POST")]
        post: String,
    },
    /// Upload an image as a post's featured image or a hero image
    Upload {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
        /// Set as the featured image of this post
        #[arg(long, conflicts_with = "hero")]
        post: Option<String>,
        /// Set as the hero image of a topic id, or `home`
        #[arg(long)]
        hero: Option<String>,
    },
    /// List hero image settings
    Heroes,
    /// Print sitemap XML for the public site
    Sitemap,
    /// Convert raw URLs in text to links
    Linkify {
        #[arg(required = true, value_name = "TEXT")]
        text: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
        eprintln!("Saved defaults to {}", global_path.display());
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("TOOLNEST_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        tracing::warn!(
            path = ?render_debug_log_path,
            %err,
            "failed to initialize render debug log"
        );
    }

    let Some(command) = cli.command else {
        if cli.save || cli.clear {
            return Ok(());
        }
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Command::Render { file, output } => render(&file, output.as_deref(), effective.watch),
        Command::Format {
            file,
            action,
            start,
            end,
            in_place,
        } => format_file(&file, action, Selection::new(start, end), in_place),
        Command::Slug { title } => {
            println!("{}", generate_slug(&title.join(" ")));
            Ok(())
        }
        Command::Save {
            file,
            title,
            topic,
            id,
            excerpt,
            category,
            external_link,
            publish,
            draft,
        } => {
            let topics = load_topics(&effective)?;
            if let Some(topic) = &topic {
                topics.require(topic)?;
            }
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let published = match (publish, draft) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => id.is_none().then_some(true),
            };
            let store = open_store(&effective);
            let auth = EnvAuth;
            let mut session = open_session(&auth, &store, id.as_deref(), topic.as_deref())?;
            session.apply(PostEdits {
                content: Some(content),
                title,
                topic,
                excerpt,
                category,
                external_link,
                published,
            });
            let id = session.save().context("Error saving post")?;
            println!("{id}\t{}", session.model().post.path());
            Ok(())
        }
        Command::List { topic, published } => {
            let topics = load_topics(&effective)?;
            if let Some(topic) = &topic {
                topics.require(topic)?;
            }
            require_sign_in(&EnvAuth)?;
            let store = open_store(&effective);
            let filter = PostFilter {
                topic,
                published_only: published,
            };
            for post in store.list(&filter)? {
                println!("{}", list_line(&post));
            }
            Ok(())
        }
        Command::Delete { id } => {
            require_sign_in(&EnvAuth)?;
            let store = open_store(&effective);
            store
                .delete(&id)
                .with_context(|| format!("Failed to delete post {id}"))?;
            tracing::debug!(%id, "post deleted");
            eprintln!("Deleted post {id}");
            Ok(())
        }
        Command::Share { post } => {
            let store = open_store(&effective);
            let record = match store.get(&post)? {
                Some(record) => record,
                None => store
                    .get_by_slug(&post)?
                    .with_context(|| format!("No post with id or slug `{post}`"))?,
            };
            if !record.published {
                bail!("Post `{}` is a draft; publish it before sharing", record.slug);
            }
            let base_url = effective.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
            let page_url = format!("{}{}", base_url.trim_end_matches('/'), record.path());
            for (platform, url) in share_links(&page_url, &record.title) {
                println!("{platform}\t{url}");
            }
            Ok(())
        }
        Command::Upload { image, post, hero } => {
            let store = open_store(&effective);
            let topics = load_topics(&effective)?;
            upload(&store, &topics, &image, post.as_deref(), hero.as_deref())
        }
        Command::Heroes => {
            let store = open_store(&effective);
            let topics = load_topics(&effective)?;
            for (key, url) in store.hero_settings(&topics)? {
                println!("{key}\t{url}");
            }
            Ok(())
        }
        Command::Sitemap => {
            let store = open_store(&effective);
            let topics = load_topics(&effective)?;
            let posts = store.list(&PostFilter::published())?;
            let base_url = effective.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
            let entries = build_sitemap(base_url, &topics, &posts, chrono::Utc::now());
            print!("{}", to_xml(&entries));
            Ok(())
        }
        Command::Linkify { text } => {
            println!("{}", linkify(&text.join(" ")));
            Ok(())
        }
    }
}

fn render(file: &Path, output: Option<&Path>, watch: bool) -> Result<()> {
    let renderer = PreviewRenderer::new();
    render_once(&renderer, file, output)?;
    if !watch {
        return Ok(());
    }

    let mut watcher = SourceWatcher::new(file, DEFAULT_DEBOUNCE)
        .with_context(|| format!("Failed to watch {}", file.display()))?;
    eprintln!("Watching {} (Ctrl-C to stop)", watcher.source().display());
    loop {
        if watcher.wait_for_change(Duration::from_secs(1))
            && let Err(err) = render_once(&renderer, file, output)
        {
            tracing::warn!(%err, "re-render failed");
        }
    }
}

fn render_once(renderer: &PreviewRenderer, file: &Path, output: Option<&Path>) -> Result<()> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let html = renderer.render(&source);
    match output {
        Some(path) => std::fs::write(path, html)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn format_file(
    file: &Path,
    action: ToolbarAction,
    selection: Selection,
    in_place: bool,
) -> Result<()> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let edit = apply_format(&source, selection, &action.rule());
    if in_place {
        std::fs::write(file, &edit.content)
            .with_context(|| format!("Failed to write {}", file.display()))?;
    } else {
        print!("{}", edit.content);
    }
    eprintln!("selection {}..{}", edit.selection.start, edit.selection.end);
    Ok(())
}

fn upload(
    store: &FileStore,
    topics: &TopicRegistry,
    image: &Path,
    post: Option<&str>,
    hero: Option<&str>,
) -> Result<()> {
    let bytes =
        std::fs::read(image).with_context(|| format!("Failed to read {}", image.display()))?;
    let file_name = image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = mime_for_path(image);
    let auth = EnvAuth;

    if let Some(id) = post {
        let mut session = EditorSession::open_existing(&auth, store, store, id)
            .map_err(|err| signed_out_hint(err.into()))?;
        let url = session
            .upload_image(&file_name, mime, &bytes)
            .context("Failed to upload image")?;
        session.save().context("Error saving post")?;
        println!("{url}");
        return Ok(());
    }

    require_sign_in(&auth)?;
    let format = validate_upload(mime, &bytes).context("Failed to upload image")?;
    let url = store.upload(&object_name(&file_name, format), &bytes)?;
    if let Some(target) = hero {
        let key = if target == "home" {
            HOME_HERO_KEY.to_string()
        } else {
            topics.require(target)?.hero_key()
        };
        store.upsert_setting(&key, &url)?;
        eprintln!("Set {key}");
    }
    println!("{url}");
    Ok(())
}

fn open_session<'a>(
    auth: &'a EnvAuth,
    store: &'a FileStore,
    id: Option<&str>,
    topic: Option<&str>,
) -> Result<EditorSession<'a>> {
    let session = match (id, topic) {
        (Some(id), _) => EditorSession::open_existing(auth, store, store, id),
        (None, Some(topic)) => EditorSession::open_new(auth, store, store, topic),
        (None, None) => bail!("--topic is required for a new post"),
    };
    session.map_err(|err| signed_out_hint(err.into()))
}

fn require_sign_in(auth: &dyn AuthGate) -> Result<()> {
    if auth.current_user().is_none() {
        bail!("Not signed in; set {ADMIN_ENV}");
    }
    Ok(())
}

fn list_line(post: &PostRecord) -> String {
    let status = if post.published { "published" } else { "draft" };
    let id = post.id.as_deref().unwrap_or("-");
    format!("{id}\t{status}\t{}\t{}", post.topic, post.title)
}

fn signed_out_hint(err: anyhow::Error) -> anyhow::Error {
    let unauthenticated = err
        .downcast_ref::<toolnest::session::SessionError>()
        .is_some_and(|e| e.redirect().is_some());
    if unauthenticated {
        err.context(format!("Not signed in; set {ADMIN_ENV}"))
    } else {
        err
    }
}

fn open_store(flags: &ConfigFlags) -> FileStore {
    let dir = flags.store_dir();
    let base_url = flags.base_url.as_ref().map_or_else(
        || format!("file://{}", dir.display()),
        |url| url.trim_end_matches('/').to_string(),
    );
    tracing::debug!(dir = %dir.display(), %base_url, "opening store");
    FileStore::new(dir, base_url)
}

fn load_topics(flags: &ConfigFlags) -> Result<TopicRegistry> {
    match &flags.topics {
        Some(path) => TopicRegistry::load(path)
            .with_context(|| format!("Failed to load topics from {}", path.display())),
        None => Ok(TopicRegistry::builtin()),
    }
}
