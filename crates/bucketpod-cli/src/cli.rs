use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bucketpod",
    about = "Browse and edit a flat object store as containers and documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with [store], [mapper] and [accessor] sections
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print a document's bytes
    Cat(CatArgs),
    /// Show a resource's metadata
    Stat(StatArgs),
    /// List the children of a container
    Ls(LsArgs),
    /// Store a local file as a document
    Put(PutArgs),
    /// Create a container
    Mkdir(MkdirArgs),
    /// Delete a resource and its metadata
    Rm(RmArgs),
    /// Set metadata statements on a resource
    Meta(MetaArgs),
}

#[derive(Args)]
pub struct CatArgs {
    pub id: String,
}

#[derive(Args)]
pub struct StatArgs {
    pub id: String,
}

#[derive(Args)]
pub struct LsArgs {
    #[arg(default_value = "/")]
    pub id: String,
}

#[derive(Args)]
pub struct PutArgs {
    pub id: String,
    pub file: PathBuf,
    #[arg(short = 't', long)]
    pub content_type: Option<String>,
}

#[derive(Args)]
pub struct MkdirArgs {
    pub id: String,
}

#[derive(Args)]
pub struct RmArgs {
    pub id: String,
}

#[derive(Args)]
pub struct MetaArgs {
    pub id: String,
    /// PREDICATE=VALUE; wrap VALUE in <> for an IRI
    #[arg(long = "set", value_name = "PRED=VALUE", required = true)]
    pub set: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cat() {
        let cli = Cli::try_parse_from(["bucketpod", "cat", "/docs/a.txt"]).unwrap();
        if let Command::Cat(args) = cli.command {
            assert_eq!(args.id, "/docs/a.txt");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_ls_defaults_to_root() {
        let cli = Cli::try_parse_from(["bucketpod", "ls"]).unwrap();
        if let Command::Ls(args) = cli.command {
            assert_eq!(args.id, "/");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_put_with_type() {
        let cli = Cli::try_parse_from([
            "bucketpod", "put", "/docs/a", "a.html", "--content-type", "text/html",
        ])
        .unwrap();
        if let Command::Put(args) = cli.command {
            assert_eq!(args.id, "/docs/a");
            assert_eq!(args.file, PathBuf::from("a.html"));
            assert_eq!(args.content_type, Some("text/html".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_put_without_type() {
        let cli = Cli::try_parse_from(["bucketpod", "put", "/docs/a", "a.bin"]).unwrap();
        if let Command::Put(args) = cli.command {
            assert_eq!(args.content_type, None);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_meta_repeated_set() {
        let cli = Cli::try_parse_from([
            "bucketpod", "meta", "/docs/a",
            "--set", "urn:title=Hello",
            "--set", "urn:owner=<urn:alice>",
        ])
        .unwrap();
        if let Command::Meta(args) = cli.command {
            assert_eq!(args.set, vec!["urn:title=Hello", "urn:owner=<urn:alice>"]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn meta_requires_a_statement() {
        assert!(Cli::try_parse_from(["bucketpod", "meta", "/docs/a"]).is_err());
    }

    #[test]
    fn parse_mkdir_and_rm() {
        let cli = Cli::try_parse_from(["bucketpod", "mkdir", "/docs/"]).unwrap();
        assert!(matches!(cli.command, Command::Mkdir(_)));
        let cli = Cli::try_parse_from(["bucketpod", "rm", "/docs/a"]).unwrap();
        assert!(matches!(cli.command, Command::Rm(_)));
    }

    #[test]
    fn parse_global_flags_after_command() {
        let cli = Cli::try_parse_from([
            "bucketpod", "stat", "/docs/a", "--config", "pod.toml", "--format", "json", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("pod.toml")));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["bucketpod", "--format", "xml", "ls"]).is_err());
    }
}
