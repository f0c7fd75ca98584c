use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "wdgt", version)]
struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the layouts of a definition in display order.
    Layouts(SourceArgs),
    /// Lay out one layout and write a PNG (or the primitive list as JSON).
    Render(RenderArgs),
    /// Print the layout picker pages with their carousel visuals.
    Preview(PreviewArgs),
    /// Resolve a definition through the cache and print a summary.
    Fetch(FetchArgs),
    /// Parse a `widget://` deep link, or build an add link from a pasted URL.
    Link(LinkArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Definition URL or local file path.
    input: String,

    /// Keep `extra_large` layouts.
    #[arg(long)]
    extra_large: bool,

    /// Directory of the definition cache. Without it the cache lives in memory.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Prefer a cached definition over fetching.
    #[arg(long)]
    cached: bool,

    /// User name for Basic auth.
    #[arg(long)]
    user: Option<String>,

    /// Password for Basic auth.
    #[arg(long)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Layout name; defaults to the definition's default layout.
    #[arg(long)]
    layout: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print the primitive list as JSON instead of writing a PNG.
    #[arg(long)]
    json: bool,

    /// Render as an in-app preview (no activation regions).
    #[arg(long)]
    in_app: bool,

    /// Color scheme for placeholders.
    #[arg(long, value_enum, default_value_t = SchemeChoice::Light)]
    scheme: SchemeChoice,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Page to scroll to before printing.
    #[arg(long)]
    select: Option<String>,

    /// Simulated drag translation in pixels, released with the same predicted translation.
    #[arg(long, allow_hyphen_values = true)]
    drag: Option<f64>,
}

#[derive(Args, Debug)]
struct FetchArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Args, Debug)]
struct LinkArgs {
    /// A `widget://` URL, or a pasted definition URL.
    text: String,

    /// User name to embed in the add link.
    #[arg(long)]
    user: Option<String>,

    /// Password to embed in the add link.
    #[arg(long)]
    password: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemeChoice {
    Light,
    Dark,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    match cli.cmd {
        Command::Layouts(args) => rt.block_on(cmd_layouts(args)),
        Command::Render(args) => rt.block_on(cmd_render(args)),
        Command::Preview(args) => rt.block_on(cmd_preview(args)),
        Command::Fetch(args) => rt.block_on(cmd_fetch(args)),
        Command::Link(args) => cmd_link(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn input_url(input: &str) -> anyhow::Result<String> {
    let trimmed = input.trim();
    if wdgt::is_requestable(trimmed) {
        return Ok(trimmed.to_owned());
    }
    wdgt::path_to_file_url(std::path::Path::new(trimmed))
}

fn make_pipeline(args: &SourceArgs) -> wdgt::FetchPipeline {
    let cache: Arc<dyn wdgt::CacheStore> = match &args.cache_dir {
        Some(dir) => Arc::new(wdgt::FsCacheStore::new(dir)),
        None => Arc::new(wdgt::MemoryCacheStore::new()),
    };
    let opts = wdgt::PipelineOpts {
        supports_extra_large: args.extra_large,
        ..wdgt::PipelineOpts::default()
    };
    wdgt::FetchPipeline::new(Arc::new(wdgt::FileTransport::new()), cache, opts)
}

async fn resolve(
    args: &SourceArgs,
) -> anyhow::Result<(wdgt::WidgetDefinition, wdgt::Source)> {
    let url = input_url(&args.input)?;
    let pipeline = make_pipeline(args);
    let outcome = pipeline
        .resolve(
            &url,
            args.user.as_deref(),
            args.password.as_deref(),
            args.cached,
            true,
        )
        .await;
    match outcome.result {
        Ok(resolved) => Ok(resolved),
        Err(e) => {
            tracing::debug!(error = ?e, "resolve failed");
            anyhow::bail!("{}: {}", url, outcome.error_text)
        }
    }
}

async fn cmd_layouts(args: SourceArgs) -> anyhow::Result<()> {
    let (widget, _) = resolve(&args).await?;
    let default = widget.default_layout_name();
    let thumbnail = widget.thumbnail_layout_name();

    println!("{}", widget.name());
    for name in widget.display_order() {
        let Some(layout) = widget.layout(name) else {
            continue;
        };
        let mut marks = Vec::new();
        if Some(name) == default {
            marks.push("default");
        }
        if Some(name) == thumbnail {
            marks.push("thumbnail");
        }
        if marks.is_empty() {
            println!("  {name}\t{}", layout.size.as_str());
        } else {
            println!("  {name}\t{}\t({})", layout.size.as_str(), marks.join(", "));
        }
    }
    Ok(())
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (widget, _) = resolve(&args.source).await?;
    let name = match args.layout.as_deref() {
        Some(name) => name.to_owned(),
        None => widget
            .default_layout_name()
            .context("definition has no layouts")?
            .to_owned(),
    };
    let size = widget
        .layout(&name)
        .map_or(wdgt::SizeClass::Small, |l| l.size);
    let target = size.footprint();

    let opts = wdgt::RenderOpts {
        in_app: args.in_app,
        appearance: match args.scheme {
            SchemeChoice::Light => wdgt::Appearance::Light,
            SchemeChoice::Dark => wdgt::Appearance::Dark,
        },
    };
    let prims = wdgt::render_with(&widget, &name, target, &opts);

    if args.json {
        let json = serde_json::to_string_pretty(&prims).context("serialize primitives")?;
        println!("{json}");
        return Ok(());
    }

    let out = args
        .out
        .context("either --out or --json is required")?;
    let width = target.width.ceil() as u32;
    let height = target.height.ceil() as u32;
    let img = wdgt::rasterize(&prims, width, height, &wdgt::RasterSettings::default())?;

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save_with_format(&out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

async fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let (widget, _) = resolve(&args.source).await?;
    let mut carousel =
        wdgt::CarouselController::from_definition(&widget, wdgt::CarouselOpts::default());

    if let Some(name) = args.select.as_deref()
        && carousel.scroll_to(name).is_none()
    {
        eprintln!("no page named '{name}'");
    }
    if let Some(dx) = args.drag {
        carousel.drag_changed(dx);
        carousel.drag_ended(dx);
    }

    let current = carousel.current_item();
    for (i, page) in carousel.pages().iter().enumerate() {
        let v = carousel.page_visual(i);
        let size = page.size.map_or("?", wdgt::SizeClass::as_str);
        let mark = if Some(i) == current { "*" } else { " " };
        println!(
            "{mark} {}\t{size}\tdistance={:.2}\tscale={:.3}\tz={:.2}\tx={:.1}",
            page.name, v.distance, v.scale, v.z_order, v.x_offset
        );
    }
    Ok(())
}

async fn cmd_fetch(args: FetchArgs) -> anyhow::Result<()> {
    let (widget, source) = resolve(&args.source).await?;
    let summary = serde_json::json!({
        "id": widget.id(),
        "name": widget.name(),
        "version": widget.version(),
        "source": source,
        "layouts": widget.layouts().len(),
        "content_url": widget.content_url(),
    });
    let json = serde_json::to_string_pretty(&summary).context("serialize summary")?;
    println!("{json}");
    Ok(())
}

fn cmd_link(args: LinkArgs) -> anyhow::Result<()> {
    let link = if args.text.trim_start().starts_with(&format!("{}://", wdgt::SCHEME)) {
        wdgt::DeepLink::parse(args.text.trim())?
    } else {
        wdgt::DeepLink::AddWidget {
            url: wdgt::normalize_widget_input(&args.text),
            user: args.user,
            password: args.password,
        }
    };
    let json = serde_json::to_string_pretty(&link).context("serialize link")?;
    println!("{json}");
    println!("{}", link.to_url());
    Ok(())
}
