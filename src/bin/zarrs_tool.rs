//! Convert raw binary data to a Zarr array and view Zarr hierarchies.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use zarrs_core::{
    array::{
        codec::{Codec, GzipCodec},
        ArrayBuilder, ChunkGrid, ChunkShape, DataType,
    },
    array_subset::ArraySubset,
    metadata::FillValueMetadata,
    node::{Node, NodeMetadata},
    storage::store::FilesystemStore,
};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "zarrs_tool")]
#[command(about = "Convert raw data to a Zarr V3 array, or view a Zarr V3 hierarchy")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a raw binary file of native endian elements in C order to an array at the root of a filesystem store.
    Convert {
        /// The raw input file.
        raw_file: PathBuf,
        /// The output store directory.
        #[arg(long, default_value = "output.zarr")]
        output: PathBuf,
        /// The array shape.
        #[arg(long, value_delimiter = ',', default_value = "64,64,64")]
        shape: Vec<u64>,
        /// The chunk shape.
        #[arg(long, value_delimiter = ',', default_value = "32,32,32")]
        chunk_shape: Vec<u64>,
        /// The data type.
        #[arg(long, default_value = "uint8")]
        data_type: String,
        /// Compress chunks with gzip.
        #[arg(long)]
        gzip: bool,
    },
    /// Print a summary of the root node of a store and the hierarchy below it.
    View {
        /// The store directory.
        #[arg(default_value = ".")]
        store: PathBuf,
    },
}

/// Convert `raw_file` to an array at the root of a filesystem store at `output`, returning a description of the array.
fn convert(
    raw_file: &Path,
    output: &Path,
    shape: Vec<u64>,
    chunk_shape: Vec<u64>,
    data_type: &str,
    gzip: bool,
) -> anyhow::Result<String> {
    let data_type = DataType::from_name(data_type)?;
    let element_size = data_type.chunk_element_size()?;
    let chunk_shape = ChunkShape::try_from(chunk_shape)?;
    let bytes = std::fs::read(raw_file)
        .with_context(|| format!("failed to read {}", raw_file.display()))?;

    let subset = ArraySubset::new_with_shape(shape.clone());
    let expected = subset.num_elements_usize()? * element_size;
    if bytes.len() != expected {
        bail!(
            "{} is {} bytes, but shape {shape:?} with data type {data_type} requires {expected} bytes",
            raw_file.display(),
            bytes.len()
        );
    }

    let codecs: Vec<Codec> = if gzip {
        vec![Arc::new(GzipCodec::default())]
    } else {
        vec![]
    };
    let store = Arc::new(FilesystemStore::new(output)?);
    let fill_value = if matches!(data_type, DataType::FixedString(_)) {
        FillValueMetadata::Null
    } else {
        FillValueMetadata::Int(0)
    };
    let array = ArrayBuilder::new(shape, data_type, chunk_shape, fill_value)
        .codecs(codecs)
        .create(store, "/")?;
    array.store_array_subset(&subset, &bytes)?;
    Ok(format!("Wrote {array} to {}", output.display()))
}

fn summary(node: &Node) -> anyhow::Result<String> {
    let mut lines = vec![format!("node type: {}", node.node_type())];
    if let NodeMetadata::Array(metadata) = node.metadata() {
        let chunk_grid = ChunkGrid::from_metadata(&metadata.chunk_grid)?;
        let codecs = metadata
            .codecs
            .iter()
            .map(|codec| codec.name().to_string())
            .collect::<Vec<_>>();
        lines.push(format!("shape: {:?}", metadata.shape));
        lines.push(format!("data type: {}", metadata.data_type));
        lines.push(format!(
            "chunk shape: {:?}",
            chunk_grid.chunk_shape().to_array_shape()
        ));
        lines.push(format!("codecs: {codecs:?}"));
    }
    let children = node
        .children()
        .iter()
        .map(|child| child.name().to_string())
        .collect::<Vec<_>>();
    lines.push(format!("children: {children:?}"));
    Ok(lines.join("\n"))
}

/// Summarise the hierarchy of the filesystem store at `store` without modifying it.
fn view(store: &Path) -> anyhow::Result<String> {
    if !store.is_dir() {
        bail!("{} is not a directory", store.display());
    }
    let store = FilesystemStore::new(store)?;
    let node = Node::open_hierarchy(&store, "/")?;
    Ok(format!("{}\n\n{}", summary(&node)?, node.hierarchy_tree()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let output = match args.command {
        Command::Convert {
            raw_file,
            output,
            shape,
            chunk_shape,
            data_type,
            gzip,
        } => convert(&raw_file, &output, shape, chunk_shape, &data_type, gzip)?,
        Command::View { store } => view(&store)?,
    };
    println!("{output}");
    Ok(())
}
