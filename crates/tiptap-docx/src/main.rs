#![doc = include_str!("../README.md")]

use std::{
    path::{Path, PathBuf},
    process::exit,
};

use clap::Parser;
use log::{error, info, warn};
use tiptap_docx::{DocumentNode, DocxExporter, DocxOptions, Error, Result};

/// Converts editor document trees to DOCX files.
#[derive(Debug, Clone, Parser)]
#[clap(name = "tiptap-docx", version)]
pub struct ConvertArgs {
    /// A `.json` document tree, or a directory of them
    #[clap(value_name = "INPUT")]
    pub input: PathBuf,

    /// Path to the output file, or directory when converting a directory
    #[clap(value_name = "OUTPUT", default_value = None)]
    pub output: Option<PathBuf>,

    /// Path to a JSON file of conversion options
    #[clap(long, value_name = "FILE", default_value = None)]
    pub options: Option<PathBuf>,

    /// Document title, defaults to the title in the options file, then the input file stem
    #[clap(long, value_name = "TITLE", default_value = None)]
    pub title: Option<String>,

    /// Number of images fetched at once
    #[clap(long, value_name = "N", default_value_t = tiptap_docx::DEFAULT_FETCH_CONCURRENCY)]
    pub fetch_concurrency: usize,
}

fn main() -> Result<()> {
    let args = ConvertArgs::parse();

    let _ = env_logger::builder()
        .filter_module("tiptap_docx", log::LevelFilter::Info)
        .try_init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let failed = runtime.block_on(run(args))?;
    if failed > 0 {
        error!("{failed} file(s) failed to convert");
        exit(1);
    }
    Ok(())
}

/// Converts every input file, returning the number of failed files.
async fn run(args: ConvertArgs) -> Result<usize> {
    let options = match &args.options {
        Some(path) => DocxOptions::from_json(&std::fs::read_to_string(path)?)?,
        None => DocxOptions::default(),
    };

    let jobs = if args.input.is_dir() {
        let output_dir = args.output.clone().unwrap_or_else(|| args.input.clone());
        std::fs::create_dir_all(&output_dir)?;
        let mut jobs = Vec::new();
        for entry in std::fs::read_dir(&args.input)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let output = output_dir.join(path.with_extension("docx").file_name().unwrap_or_default());
                jobs.push((path, output));
            }
        }
        jobs.sort();
        jobs
    } else {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| args.input.with_extension("docx"));
        vec![(args.input.clone(), output)]
    };

    if jobs.is_empty() {
        warn!("no `.json` files found in {:?}", args.input);
    }

    let mut failed = 0;
    for (input, output) in jobs {
        let options = match &args.title {
            Some(title) => options.clone().with_title(title.clone()),
            None => options.clone().or_title(|| file_stem(&input)),
        };
        match convert_file(&input, &output, options, args.fetch_concurrency).await {
            Ok(()) => info!("converted {input:?} to {output:?}"),
            Err(err) => {
                error!("failed to convert {input:?}: {err}");
                failed += 1;
            }
        }
    }
    Ok(failed)
}

async fn convert_file(
    input: &Path,
    output: &Path,
    options: DocxOptions,
    fetch_concurrency: usize,
) -> Result<()> {
    let json = std::fs::read_to_string(input)?;
    let tree = DocumentNode::from_json(&json)?;

    let exporter = DocxExporter::new(options)?.with_fetch_concurrency(fetch_concurrency);
    let conversion = exporter.convert(&tree).await;
    if !conversion.degradations.is_empty() {
        warn!(
            "{input:?} converted with {} degradation(s)",
            conversion.degradations.len()
        );
    }

    let bytes = tiptap_docx::write_docx(&conversion, exporter.options())?;
    std::fs::write(output, bytes)
        .map_err(|err| Error::from(format!("failed to write file {output:?}: {err}")))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| tiptap_docx::writer::docx::DEFAULT_TITLE.to_owned())
}
