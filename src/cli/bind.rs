use std::fs;
use std::path::{Path, PathBuf};

use crate::bind::{bind_horcruxes, BindOptions, BindResult};
use crate::discover::auto_bind;
use crate::error::Result;
use crate::shard::read_horcrux_file;

/// Bind explicitly listed shard files and write the payload to `output`
/// (or to the recorded filename in the current directory).
pub fn bind_files(
    paths: &[PathBuf],
    output: Option<&Path>,
    options: &BindOptions,
) -> Result<(BindResult, PathBuf)> {
    let mut horcruxes = Vec::with_capacity(paths.len());
    for path in paths {
        horcruxes.push(read_horcrux_file(path)?);
    }
    let result = bind_horcruxes(&horcruxes, options)?;
    let out_path = resolve_output(output, &result);
    fs::write(&out_path, &result.data)?;
    Ok((result, out_path))
}

/// Discover the shard set in a directory, bind it, and write the payload.
pub fn bind_directory(
    directory: &Path,
    output: Option<&Path>,
) -> Result<(BindResult, PathBuf)> {
    let result = auto_bind(directory)?;
    let out_path = resolve_output(output, &result);
    fs::write(&out_path, &result.data)?;
    Ok((result, out_path))
}

fn resolve_output(output: Option<&Path>, result: &BindResult) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&result.filename))
}
