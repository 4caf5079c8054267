use anyhow::{bail, Context};
use bucketpod_accessor::DataAccessor;
use bucketpod_types::{
    stream_from_bytes, vocab, MetadataSet, ObjectKind, ResourceIdentifier, Term,
};
use colored::Colorize;
use futures::TryStreamExt;
use serde_json::json;
use tokio::io::AsyncWriteExt;

use crate::cli::*;
use crate::config::AppConfig;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let accessor = config.build_accessor().await?;
    execute(&accessor, cli.command, &cli.format).await
}

pub async fn execute(
    accessor: &dyn DataAccessor,
    command: Command,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Command::Cat(args) => cmd_cat(accessor, args).await,
        Command::Stat(args) => cmd_stat(accessor, args, format).await,
        Command::Ls(args) => cmd_ls(accessor, args, format).await,
        Command::Put(args) => cmd_put(accessor, args, format).await,
        Command::Mkdir(args) => cmd_mkdir(accessor, args, format).await,
        Command::Rm(args) => cmd_rm(accessor, args, format).await,
        Command::Meta(args) => cmd_meta(accessor, args, format).await,
    }
}

fn identifier(raw: &str) -> anyhow::Result<ResourceIdentifier> {
    Ok(ResourceIdentifier::new(raw)?)
}

async fn cmd_cat(accessor: &dyn DataAccessor, args: CatArgs) -> anyhow::Result<()> {
    let id = identifier(&args.id)?;
    let mut data = accessor.get_data(&id).await?;
    let mut out = tokio::io::stdout();
    while let Some(chunk) = data.try_next().await? {
        out.write_all(&chunk).await?;
    }
    out.flush().await?;
    Ok(())
}

async fn cmd_stat(
    accessor: &dyn DataAccessor,
    args: StatArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let id = identifier(&args.id)?;
    let metadata = accessor.get_metadata(&id).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&metadata)?),
        OutputFormat::Text => print!("{}", render_stat(&metadata)),
    }
    Ok(())
}

async fn cmd_ls(
    accessor: &dyn DataAccessor,
    args: LsArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let id = identifier(&args.id)?;
    let children: Vec<MetadataSet> = accessor.get_children(&id).await?.try_collect().await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&children)?),
        OutputFormat::Text => {
            if children.is_empty() {
                println!("{} is empty.", id.as_str().bold());
            }
            for child in &children {
                println!("{}", render_listing_line(child));
            }
        }
    }
    Ok(())
}

async fn cmd_put(
    accessor: &dyn DataAccessor,
    args: PutArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let id = identifier(&args.id)?;
    let body = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    let size = body.len();

    let content_type = args
        .content_type
        .or_else(|| mime_guess::from_path(&args.file).first_raw().map(str::to_string));
    let mut metadata = MetadataSet::new(id.clone());
    metadata.set_content_type(content_type.as_deref());

    accessor
        .write_document(&id, stream_from_bytes(body), &metadata)
        .await?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "stored": id.as_str(), "size": size, "contentType": content_type })
        ),
        OutputFormat::Text => println!(
            "{} Stored {} ({} bytes, {})",
            "✓".green().bold(),
            id.as_str().bold(),
            size,
            content_type.as_deref().unwrap_or(vocab::DEFAULT_CONTENT_TYPE).cyan()
        ),
    }
    Ok(())
}

async fn cmd_mkdir(
    accessor: &dyn DataAccessor,
    args: MkdirArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let id = identifier(&args.id)?;
    if !id.is_container() {
        bail!("{id} is not a container path; add a trailing '/'");
    }
    accessor.write_container(&id, &MetadataSet::new(id.clone())).await?;
    match format {
        OutputFormat::Json => println!("{}", json!({ "created": id.as_str() })),
        OutputFormat::Text => println!("{} Created {}", "✓".green().bold(), id.as_str().blue().bold()),
    }
    Ok(())
}

async fn cmd_rm(
    accessor: &dyn DataAccessor,
    args: RmArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let id = identifier(&args.id)?;
    accessor.delete_resource(&id).await?;
    match format {
        OutputFormat::Json => println!("{}", json!({ "deleted": id.as_str() })),
        OutputFormat::Text => println!("{} Deleted {}", "✓".green().bold(), id.as_str().bold()),
    }
    Ok(())
}

async fn cmd_meta(
    accessor: &dyn DataAccessor,
    args: MetaArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let id = identifier(&args.id)?;
    let assignments = args
        .set
        .iter()
        .map(String::as_str)
        .map(parse_assignment)
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut metadata = accessor.get_metadata(&id).await?;
    for (predicate, value) in assignments {
        metadata.set(&predicate, value);
    }
    accessor.write_metadata(&id, &metadata).await?;

    let updated = accessor.get_metadata(&id).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&updated)?),
        OutputFormat::Text => {
            println!("{} Updated {}", "✓".green().bold(), id.as_str().bold());
            print!("{}", render_stat(&updated));
        }
    }
    Ok(())
}

/// Split `PRED=VALUE`. A value in angle brackets is an IRI, anything else a
/// plain literal.
pub fn parse_assignment(raw: &str) -> anyhow::Result<(String, Term)> {
    let Some((predicate, value)) = raw.split_once('=') else {
        bail!("expected PRED=VALUE, got {raw:?}");
    };
    let predicate = predicate.trim();
    if predicate.is_empty() {
        bail!("empty predicate in {raw:?}");
    }
    let predicate = predicate
        .strip_prefix('<')
        .and_then(|p| p.strip_suffix('>'))
        .unwrap_or(predicate);
    let term = match value.strip_prefix('<').and_then(|v| v.strip_suffix('>')) {
        Some(iri) if !iri.is_empty() => Term::named(iri),
        _ => Term::literal(value),
    };
    Ok((predicate.to_string(), term))
}

fn kind_of(metadata: &MetadataSet) -> ObjectKind {
    if metadata.has(vocab::RDF_TYPE, &Term::named(vocab::LDP_CONTAINER)) {
        ObjectKind::Directory
    } else {
        ObjectKind::File
    }
}

fn value_of<'a>(metadata: &'a MetadataSet, predicate: &str) -> &'a str {
    metadata.get(predicate).map(Term::value).unwrap_or("-")
}

/// Live fields first, then every other statement about the resource.
fn render_stat(metadata: &MetadataSet) -> String {
    let mut out = format!("{}\n", metadata.identifier().as_str().bold());
    let kind = match kind_of(metadata) {
        ObjectKind::Directory => "container".blue().to_string(),
        ObjectKind::File => "document".to_string(),
    };
    out.push_str(&format!("  {:<14}{}\n", "kind:", kind));
    if let Some(ct) = metadata.content_type() {
        out.push_str(&format!("  {:<14}{}\n", "content type:", ct.cyan()));
    }
    if metadata.get(vocab::POSIX_SIZE).is_some() {
        out.push_str(&format!("  {:<14}{}\n", "size:", value_of(metadata, vocab::POSIX_SIZE)));
    }
    out.push_str(&format!(
        "  {:<14}{}\n",
        "modified:",
        value_of(metadata, vocab::DC_MODIFIED).dimmed()
    ));

    let subject = metadata.subject();
    for triple in metadata.triples() {
        let live = triple.subject == subject
            && (vocab::STORAGE_DERIVED_PREDICATES.contains(&triple.predicate.as_str())
                || triple.predicate == vocab::CONTENT_TYPE
                || (triple.predicate == vocab::RDF_TYPE
                    && (vocab::STORAGE_DERIVED_TYPES.contains(&triple.object.value())
                        || triple.object.value().starts_with(vocab::IANA_MEDIA_TYPES))));
        if live {
            continue;
        }
        out.push_str(&format!("  {} {}\n", triple.predicate.yellow(), triple.object));
    }
    out
}

fn render_listing_line(child: &MetadataSet) -> String {
    let modified = value_of(child, vocab::DC_MODIFIED);
    match kind_of(child) {
        ObjectKind::Directory => format!(
            "{} {:>10}  {}  {}",
            "d".blue(),
            "-",
            modified.dimmed(),
            child.identifier().as_str().blue().bold()
        ),
        ObjectKind::File => format!(
            "{} {:>10}  {}  {}  {}",
            "-",
            value_of(child, vocab::POSIX_SIZE),
            modified.dimmed(),
            child.identifier().as_str(),
            child.content_type().unwrap_or("").cyan()
        ),
    }
}
