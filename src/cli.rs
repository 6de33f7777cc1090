use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::export::ExportFormat;
use crate::reader::ReaderKind;

#[derive(Parser, Debug)]
#[command(
    name = "customs-extract",
    version,
    about = "Invoice line-item extraction and cargo manifest reconciliation"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Reconcile(ReconcileArgs),
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReaderArgs {
    #[arg(long, value_enum)]
    pub reader: Option<ReaderKind>,

    #[arg(long)]
    pub reader_command: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    pub pdf: PathBuf,

    #[arg(long)]
    pub rows_after: Option<usize>,

    #[arg(long)]
    pub line_scale: Option<u32>,

    #[arg(long, default_value_t = false)]
    pub no_item_price: bool,

    #[command(flatten)]
    pub reader: ReaderArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ReconcileArgs {
    #[arg(long = "parent-1")]
    pub parent_1: PathBuf,

    #[arg(long = "parent-2")]
    pub parent_2: PathBuf,

    #[arg(long)]
    pub child: PathBuf,

    #[command(flatten)]
    pub reader: ReaderArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    pub pdf: PathBuf,

    #[arg(long, default_value_t = false)]
    pub first_tables: bool,

    #[arg(long)]
    pub line_scale: Option<u32>,

    #[command(flatten)]
    pub reader: ReaderArgs,

    #[arg(long, short)]
    pub output: Option<PathBuf>,
}
