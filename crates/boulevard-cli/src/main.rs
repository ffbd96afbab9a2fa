//! boulevard CLI — browse local video and audio with boulevard-core.
//!
//! Commands:
//!   boulevard scan [dir]              Scan a directory, show progress and counts
//!   boulevard list [dir] [options]    List media
//!       --type video|audio            Only one media type
//!       --search <query>              Title/artist/album contains query
//!       --sort title|dateAdded|duration|size|artist
//!       --desc                        Descending order
//!       --favorites                   Only ids in $BOULEVARD_FAVORITES (ignores search/sort)
//!       --json                        Print JSON instead of rows
//!   boulevard info <file> [--json]    Show the asset record for one file
//!
//! `dir` defaults to $BOULEVARD_ROOT, then the current directory.

mod directory;

use std::path::PathBuf;
use std::sync::Arc;

use boulevard_core::library::media_from_scanned;
use boulevard_core::scanner::{classify_filename, format_duration, format_file_size};
use boulevard_core::{
    Error, GetMediaList, GetMediaListParams, LibraryView, Media, MediaFilter, MediaScanner,
    MediaType, MemoryRepository, Result, ScanConfig, SortOption, SortOrder,
};

use directory::{stable_id, DirectorySource};

const ROOT_ENV: &str = "BOULEVARD_ROOT";
const FAVORITES_ENV: &str = "BOULEVARD_FAVORITES";

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        return;
    }

    let result = match args[0].as_str() {
        "scan" => cmd_scan(&args[1..]).await,
        "list" => cmd_list(&args[1..]).await,
        "info" => cmd_info(&args[1..]).await,
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("unknown command: {}", other);
            print_usage();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn cmd_scan(args: &[String]) -> Result<()> {
    let root = resolve_root(args.first().map(String::as_str));
    let source = Arc::new(DirectorySource::new(root.clone()));
    let scanner = scanner_for(&source);

    let scanned = scanner
        .scan_all_media(|p| {
            eprint!("\r\x1b[K[{}/{}] {}", p.current, p.total, p.current_file);
        })
        .await;
    eprintln!();
    let view = LibraryView::from_scan(scanned?);

    let counts = view.counts();
    println!(
        "{}: {} videos, {} audio",
        root.display(),
        counts.videos,
        counts.audios
    );
    for album in scanner.albums().await {
        println!("  {}  ({} items)", album.title, album.asset_count);
    }
    Ok(())
}

async fn cmd_list(args: &[String]) -> Result<()> {
    let opts = match ListOptions::parse(args) {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("{}", msg);
            eprintln!(
                "usage: boulevard list [dir] [--type video|audio] [--search q] \
                 [--sort key] [--desc] [--favorites] [--json]"
            );
            return Ok(());
        }
    };

    let root = resolve_root(opts.dir.as_deref());
    let repository = Arc::new(MemoryRepository::new(load_library(root).await?));
    for id in favorite_ids() {
        if let Err(e) = repository.set_favorite(&id, true) {
            log::warn!("boulevard: {}: {}", FAVORITES_ENV, e);
        }
    }

    let params = opts.params();
    let media = GetMediaList::new(repository).execute(&params).await?;

    if opts.json {
        println!("{}", to_json(&media)?);
        return Ok(());
    }
    if media.is_empty() {
        println!("no media");
        return Ok(());
    }
    for item in &media {
        print_row(item);
    }
    Ok(())
}

async fn cmd_info(args: &[String]) -> Result<()> {
    let Some(file) = args.iter().find(|a| !a.starts_with("--")) else {
        eprintln!("usage: boulevard info <file> [--json]");
        return Ok(());
    };
    let json = args.iter().any(|a| a == "--json");

    let path = PathBuf::from(file);
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        eprintln!("not a file: {}", file);
        return Ok(());
    };
    let parent = if parent.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        parent.to_path_buf()
    };
    let parent = std::fs::canonicalize(&parent)
        .map_err(|e| Error::asset_source(format!("{}: {}", parent.display(), e)))?;

    let source = Arc::new(DirectorySource::new(parent.clone()));
    let scanner = scanner_for(&source);
    let Some(asset) = scanner.asset_info(&stable_id(&parent.join(name))).await else {
        eprintln!("not a supported media file: {}", file);
        return Ok(());
    };

    if json {
        println!("{}", to_json(&asset)?);
        return Ok(());
    }
    let kind = classify_filename(&asset.filename)
        .map(|t| t.as_str())
        .unwrap_or("?");
    println!("{}", asset.filename);
    println!("  id:        {}", asset.id);
    println!("  type:      {}", kind);
    if let Some(tags) = source.metadata(&asset.id) {
        for (label, value) in [("artist", tags.artist), ("album", tags.album)] {
            if let Some(value) = value {
                println!("  {:<10} {}", format!("{}:", label), value);
            }
        }
    }
    println!("  duration:  {}", format_duration(asset.duration));
    println!(
        "  size:      {}",
        asset.size.map(format_file_size).unwrap_or_else(|| "Unknown".into())
    );
    println!("  created:   {}", fmt_time(asset.creation_time));
    println!("  modified:  {}", fmt_time(asset.modification_time));
    println!("  uri:       {}", asset.uri);
    Ok(())
}

// ---------------------------------------------------------------------------
// List options
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq)]
struct ListOptions {
    dir: Option<String>,
    media_type: Option<MediaType>,
    search: Option<String>,
    sort_by: Option<SortOption>,
    desc: bool,
    favorites: bool,
    json: bool,
}

impl ListOptions {
    fn parse(args: &[String]) -> std::result::Result<Self, String> {
        let mut opts = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--type" => {
                    let value = iter.next().ok_or("--type needs a value")?;
                    opts.media_type = Some(
                        MediaType::parse(value)
                            .ok_or_else(|| format!("unknown media type: {}", value))?,
                    );
                }
                "--search" => {
                    opts.search = Some(iter.next().ok_or("--search needs a value")?.clone());
                }
                "--sort" => {
                    let value = iter.next().ok_or("--sort needs a value")?;
                    match SortOption::parse(value) {
                        SortOption::Unrecognized => {
                            return Err(format!("unknown sort key: {}", value))
                        }
                        key => opts.sort_by = Some(key),
                    }
                }
                "--desc" => opts.desc = true,
                "--favorites" => opts.favorites = true,
                "--json" => opts.json = true,
                flag if flag.starts_with("--") => return Err(format!("unknown option: {}", flag)),
                dir if opts.dir.is_none() => opts.dir = Some(dir.to_string()),
                extra => return Err(format!("unexpected argument: {}", extra)),
            }
        }
        Ok(opts)
    }

    fn params(&self) -> GetMediaListParams {
        let order = if self.desc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        let mut filter = MediaFilter::new(self.sort_by.unwrap_or(SortOption::Title), order);
        if let Some(query) = &self.search {
            filter = filter.with_query(query.clone());
        }
        GetMediaListParams {
            filter: Some(filter),
            media_type: self.media_type,
            favorites_only: self.favorites,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_root(arg: Option<&str>) -> PathBuf {
    match arg {
        Some(dir) => PathBuf::from(dir),
        None => std::env::var(ROOT_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn scanner_for(source: &Arc<DirectorySource>) -> MediaScanner {
    MediaScanner::with_config(source.clone(), ScanConfig::from_env())
}

/// Scan `root` and build library entities, with tags where lofty read them.
async fn load_library(root: PathBuf) -> Result<Vec<Media>> {
    let source = Arc::new(DirectorySource::new(root));
    let scanned = scanner_for(&source).scan_all_media(|_| {}).await?;
    Ok(scanned
        .iter()
        .map(|item| media_from_scanned(item, source.metadata(&item.id).as_ref()))
        .collect())
}

fn favorite_ids() -> Vec<String> {
    parse_id_list(&std::env::var(FAVORITES_ENV).unwrap_or_default())
}

fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::Source(e.into()))
}

fn print_row(media: &Media) {
    println!(
        "{}  {:<5}  {:>8}  {:>9}  {}{}",
        media.id,
        media.media_type().as_str(),
        format_duration(media.duration),
        format_file_size(media.size),
        if media.is_favorite { "* " } else { "" },
        media.title,
    );
}

fn fmt_time(secs: Option<i64>) -> String {
    secs.map(|s| s.to_string()).unwrap_or_else(|| "unknown".into())
}

fn print_usage() {
    println!("boulevard — local media browser");
    println!();
    println!("Usage:");
    println!("  boulevard scan [dir]              Scan and show library counts");
    println!("  boulevard list [dir] [options]    List media");
    println!("      --type video|audio  --search <q>  --sort title|dateAdded|duration|size|artist");
    println!("      --desc  --favorites  --json");
    println!("  boulevard info <file> [--json]    Show one file's asset record");
    println!();
    println!("Environment:");
    println!("  {}         Default directory", ROOT_ENV);
    println!("  {}    Comma-separated favorite ids", FAVORITES_ENV);
    println!("  BOULEVARD_PAGE_SIZE    Scan page size (default 100)");
    println!("  RUST_LOG               Log filter (env_logger)");
}
