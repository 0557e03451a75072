//! # streamchunk
//!
//! Reading, writing and scanning of chunk files.
//!
//! ## Getting started
//!
//! ```sh
//! streamchunk 0.1.0
//! chunk file tool.
//!
//! USAGE:
//!     streamchunk <SUBCOMMAND>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! SUBCOMMANDS:
//!     dump    Print the records of a chunk as JSON lines
//!     help    Prints this message or the help of the given subcommand(s)
//!     roll    Re-chunk a folder of chunks into chunks of bounded size
//!     scan    Read every chunk of a folder and report throughput
//!     stats   Count tokens per entity type and tagger
//!     tag     Add a word-level annotation layer to every record of a chunk
//! ```
//!
//! Logging is configured with `RUST_LOG` (e.g. `RUST_LOG=info` to see progress reports).
use structopt::StructOpt;

use streamchunk::annotate::{AnnotationMerge, MergePolicy, Validation};
use streamchunk::error::Error;
use streamchunk::processing;
use streamchunk::scan::{CorpusScanner, CorruptionPolicy, ScanConfig};

#[macro_use]
extern crate log;

mod cli;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::Streamchunk::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::Streamchunk::Scan(s) => {
            let on_corruption = if s.abort_on_corruption {
                CorruptionPolicy::Abort
            } else {
                CorruptionPolicy::Skip
            };
            let scanner = CorpusScanner::new(ScanConfig {
                suffix: s.suffix,
                report_every: s.every,
                target_records: s.target,
                on_corruption,
                parallel: s.parallel,
            });
            let report = scanner.scan_dir(&s.src)?;

            for failure in &report.failures {
                warn!(
                    "{:?}: stopped at record #{} (byte {}): {}",
                    failure.path, failure.record_index, failure.byte_offset, failure.reason
                );
            }
            println!(
                "{} chunks, {} records, {} bytes in {:.3} seconds ({} corrupt chunks)",
                report.files,
                report.records,
                report.bytes,
                report.elapsed.as_secs_f64(),
                report.failures.len()
            );
        }

        cli::Streamchunk::Dump(d) => {
            let stdout = std::io::stdout();
            let mut out = std::io::BufWriter::new(stdout.lock());
            processing::dump(&d.src, d.count, d.limit, &mut out)?;
        }

        cli::Streamchunk::Tag(t) => {
            let policy = if t.no_overwrite {
                MergePolicy::Reject
            } else {
                MergePolicy::Overwrite
            };
            let merge = AnnotationMerge::new(policy, Validation::Strict);
            let summary = processing::tag(&t.src, &t.dst, &t.tagger, merge)?;
            println!("{} records, sha256 {}", summary.count, summary.hexdigest);
        }

        cli::Streamchunk::Roll(r) => {
            let scanner = CorpusScanner::new(ScanConfig {
                suffix: r.suffix,
                ..Default::default()
            });
            let rolled = processing::roll(&scanner, &r.src, &r.dst, r.chunk_max)?;
            for path in rolled {
                println!("{}", path.display());
            }
        }

        cli::Streamchunk::Stats(s) => {
            let scanner = CorpusScanner::new(ScanConfig {
                suffix: s.suffix,
                parallel: s.parallel,
                ..Default::default()
            });
            let mut paths = Vec::new();
            for src in &s.src {
                if src.is_dir() {
                    paths.extend(scanner.chunk_paths(src)?);
                } else {
                    paths.push(src.clone());
                }
            }

            let stats = processing::stats(&scanner, &paths, &s.entity_types)?;
            for (tagger, counts) in &stats.per_tagger {
                println!("{}", tagger);
                for (entity_type, nb) in counts {
                    println!("\t{}\t{}", entity_type, nb);
                }
            }
            println!(
                "{} chunks, {} records ({} corrupt chunks)",
                stats.report.files,
                stats.report.records,
                stats.report.failures.len()
            );
        }
    };
    Ok(())
}
