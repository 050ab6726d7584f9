use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{PoemError, Result};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Reads a whole text file that may not be UTF-8.
///
/// Invalid UTF-8 is decoded as Latin-1, the encoding of the older word
/// lists (the Moby part-of-speech separator is byte `0xD7`, `×`).
pub(crate) fn read_text<P: AsRef<Path>>(path: P) -> io::Result<String> {
	let bytes = fs::read(path)?;
	Ok(match String::from_utf8(bytes) {
		Ok(text) => text,
		Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
	})
}

/// Deserializes a postcard-encoded value from `path`.
pub(crate) fn read_binary<T, P>(path: P) -> Result<T>
where
	T: DeserializeOwned,
	P: AsRef<Path>,
{
	let bytes = fs::read(path)?;
	postcard::from_bytes(&bytes).map_err(PoemError::Decode)
}

/// Serializes `value` with postcard and writes it to `path`.
pub(crate) fn write_binary<T, P>(value: &T, path: P) -> Result<()>
where
	T: Serialize,
	P: AsRef<Path>,
{
	let bytes = postcard::to_stdvec(value).map_err(PoemError::Encode)?;
	fs::write(path, bytes)?;
	Ok(())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/shakespeare.txt` + `"bin"` → `data/shakespeare.bin`
pub(crate) fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Whether `derived` exists and was written after `source` last changed.
///
/// Any metadata error (missing file, no mtime support) counts as not fresh.
pub(crate) fn is_up_to_date<P: AsRef<Path>, Q: AsRef<Path>>(source: P, derived: Q) -> bool {
	let modified = |path: &Path| fs::metadata(path).and_then(|metadata| metadata.modified());
	match (modified(source.as_ref()), modified(derived.as_ref())) {
		(Ok(source), Ok(derived)) => derived > source,
		_ => false,
	}
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/shakespeare.txt"` → `"shakespeare"`
/// - `"sonnets.txt"` → `"sonnets"`
pub(crate) fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder<P: AsRef<Path>>(input: P) -> PathBuf {
	let input = input.as_ref();
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}
