//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

use streamchunk::record::EntityType;

#[derive(Debug, StructOpt)]
#[structopt(name = "streamchunk", about = "chunk file tool.")]
/// Holds every command that is callable by the `streamchunk` command.
pub enum Streamchunk {
    #[structopt(about = "Read every chunk of a folder and report throughput")]
    Scan(Scan),
    #[structopt(about = "Print the records of a chunk as JSON lines")]
    Dump(Dump),
    #[structopt(about = "Add a word-level annotation layer to every record of a chunk")]
    Tag(Tag),
    #[structopt(about = "Re-chunk a folder of chunks into chunks of bounded size")]
    Roll(Roll),
    #[structopt(about = "Count tokens per entity type and tagger")]
    Stats(Stats),
}

#[derive(Debug, StructOpt)]
/// Scan command and parameters.
///
/// ```sh
/// streamchunk-scan 0.1.0
/// Read every chunk of a folder and report throughput
///
/// USAGE:
///     streamchunk scan [FLAGS] [OPTIONS] <src>
///
/// FLAGS:
///         --abort-on-corruption    stop at the first corrupt chunk instead of skipping it
///     -p, --parallel               scan chunks concurrently
///
/// OPTIONS:
///     -e, --every <every>      records between two progress reports [default: 100]
///         --suffix <suffix>    chunk file extension [default: sc]
///     -t, --target <target>    corpus size used to project the remaining time [default: 500000000]
///
/// ARGS:
///     <src>    folder containing chunk files
/// ```
pub struct Scan {
    #[structopt(parse(from_os_str), help = "folder containing chunk files")]
    pub src: PathBuf,
    #[structopt(long = "suffix", help = "chunk file extension", default_value = "sc")]
    pub suffix: String,
    #[structopt(
        short = "e",
        long = "every",
        help = "records between two progress reports",
        default_value = "100"
    )]
    pub every: u64,
    #[structopt(
        short = "t",
        long = "target",
        help = "corpus size used to project the remaining time",
        default_value = "500000000"
    )]
    pub target: u64,
    #[structopt(
        long = "abort-on-corruption",
        help = "stop at the first corrupt chunk instead of skipping it"
    )]
    pub abort_on_corruption: bool,
    #[structopt(short = "p", long = "parallel", help = "scan chunks concurrently")]
    pub parallel: bool,
}

#[derive(Debug, StructOpt)]
pub struct Dump {
    #[structopt(parse(from_os_str), help = "chunk file")]
    pub src: PathBuf,
    #[structopt(short = "c", long = "count", help = "only print the number of records")]
    pub count: bool,
    #[structopt(short = "l", long = "limit", help = "stop after this many records")]
    pub limit: Option<u64>,
}

#[derive(Debug, StructOpt)]
pub struct Tag {
    #[structopt(parse(from_os_str), help = "source chunk file")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "destination chunk file (must not exist)")]
    pub dst: PathBuf,
    #[structopt(long = "tagger", help = "name of the annotation layer", default_value = "words")]
    pub tagger: String,
    #[structopt(
        long = "no-overwrite",
        help = "fail on records that already have a layer with this name"
    )]
    pub no_overwrite: bool,
}

#[derive(Debug, StructOpt)]
pub struct Roll {
    #[structopt(parse(from_os_str), help = "folder containing chunk files")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "destination folder")]
    pub dst: PathBuf,
    #[structopt(
        short = "m",
        long = "chunk-max",
        help = "maximum number of records per chunk",
        default_value = "500"
    )]
    pub chunk_max: u64,
    #[structopt(long = "suffix", help = "chunk file extension", default_value = "sc")]
    pub suffix: String,
}

#[derive(Debug, StructOpt)]
pub struct Stats {
    #[structopt(
        parse(from_os_str),
        help = "chunk files, or folders containing chunk files"
    )]
    pub src: Vec<PathBuf>,
    #[structopt(
        short = "e",
        long = "entity-type",
        help = "entity type to count (e.g. PER), can be repeated. Counts every type if absent"
    )]
    pub entity_types: Vec<EntityType>,
    #[structopt(long = "suffix", help = "chunk file extension", default_value = "sc")]
    pub suffix: String,
    #[structopt(short = "p", long = "parallel", help = "read chunks concurrently")]
    pub parallel: bool,
}
