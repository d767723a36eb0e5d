//! OM Player demo - upgrades a sample page and prints the result.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use dom::{serialize_pretty, Document, Window};
use player::{ActiveSource, PlayerConfig, PlayerHost};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// OM Player demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ad source for the main video
    #[arg(long)]
    ads_url: Option<String>,

    /// Viewport width
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Viewport height
    #[arg(long, default_value = "720")]
    height: u32,

    /// Player configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn sample_document(args: &Args) -> Result<Document> {
    let url = Url::parse("https://demo.om-player.local/")?;
    let mut doc = Document::with_window(url, Window::with_viewport(args.width, args.height));

    let article = doc.create_element_with("article", r#"class="content""#);
    doc.append_to_body(article);

    let ads = args
        .ads_url
        .as_deref()
        .map(|url| format!(r#" data-om-ads="{url}""#))
        .unwrap_or_default();
    let markup = [
        ("video", format!(r#"id="feature" class="om-player" src="feature.mp4"{ads}"#)),
        ("audio", r#"class="om-player""#.to_string()),
        ("video", r#"class="gallery" src="clip.webm""#.to_string()),
        (
            "iframe",
            concat!(
                r#"id="embed" class="om-player" src="https://video.example/embed/42""#,
                r#" width="640" height="360""#,
            )
            .to_string(),
        ),
        ("div", r#"class="om-player""#.to_string()),
    ];
    for (tag, attrs) in markup {
        let node = doc.create_element_with(tag, &attrs);
        doc.tree.append_child(article, node);
    }

    // The audio player gets its sources from <source> children
    if let Some(audio) = doc.tree.query_selector("audio.om-player") {
        for attrs in [r#"src="theme.ogg" type="audio/ogg""#, r#"src="theme.mp3""#] {
            let source = doc.create_element_with("source", attrs);
            doc.tree.append_child(audio, source);
        }
    }
    Ok(doc)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("OM Player v{}", player::VERSION);

    let config = match &args.config {
        Some(path) => PlayerConfig::from_path(path)?,
        None => PlayerConfig::default(),
    };

    let doc = sample_document(&args)?;
    let mut host = PlayerHost::new(doc, config, Arc::new(player::DefaultCollaborators))?;
    host.document_loaded();

    // Iframes are not picked up at load; upgrade the embed by hand
    let (_, outcome) = host.create_player("embed", None);
    info!("embed: {:?}", outcome);

    host.document_mut()
        .resize_viewport(args.width / 2, args.height / 2);

    if let Some(feature) = host.player("feature") {
        let mut feature = feature.write();
        if let Err(e) = feature.play() {
            info!("feature play: {}", e);
        }
        let active = match feature.active_source() {
            Some(ActiveSource::Ads) => "ads",
            Some(ActiveSource::Media) => "media",
            None => "none",
        };
        info!("feature playing, active source: {}", active);
    }

    println!("Players:");
    for (uid, entry) in host.registry().iter() {
        let entry = entry.read();
        let kind = entry.kind().map(|k| k.as_str()).unwrap_or("?");
        println!("  {uid:<16} {kind:<7} {:?}", entry.state());
    }

    println!();
    println!("DOM Tree:");
    let doc = host.document();
    println!("{}", serialize_pretty(&doc.tree, doc.tree.root()));

    Ok(())
}
