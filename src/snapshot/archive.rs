// ABOUTME: Project-tree archiving for deployment snapshots.
// ABOUTME: Packs the tree into a gzip'd tar, filtering housekeeping dirs.

use std::fs::File;
use std::io;
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

/// Directory names never captured in a snapshot: version-control metadata,
/// virtual environments, bytecode caches, and the store's own state dir.
pub const EXCLUDED_DIRS: &[&str] = &[".deployment", ".git", ".venv", "__pycache__"];

/// Compiled-artifact suffixes skipped during archiving.
pub const EXCLUDED_SUFFIXES: &[&str] = &[".pyc", ".pyo"];

/// Archive the project tree rooted at `project_root` into `dest`.
///
/// Excluded directory names are filtered at every level of the walk; this is
/// an exact-name match against [`EXCLUDED_DIRS`], not a glob. Entries are
/// stored with paths relative to the project root.
pub fn pack_tree(project_root: &Path, dest: &Path) -> io::Result<()> {
    let file = File::create(dest)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    append_dir(&mut builder, project_root, project_root)?;

    let encoder = builder.into_inner()?;
    encoder.finish()?;
    Ok(())
}

fn append_dir(
    builder: &mut tar::Builder<GzEncoder<File>>,
    project_root: &Path,
    dir: &Path,
) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            if EXCLUDED_DIRS.contains(&name.as_ref()) {
                continue;
            }
            append_dir(builder, project_root, &path)?;
        } else if file_type.is_file() {
            if EXCLUDED_SUFFIXES.iter().any(|s| name.ends_with(s)) {
                continue;
            }
            let relative = path
                .strip_prefix(project_root)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            builder.append_path_with_name(&path, relative)?;
        }
        // Symlinks and other special files are not snapshot material.
    }
    Ok(())
}

/// Extract `archive` over the live tree at `project_root`.
///
/// Files present in the archive overwrite their on-disk counterparts; files
/// on disk but absent from the archive are left untouched. Restore is
/// additive and overwriting, never destructive of untracked files.
pub fn unpack_over(archive: &Path, project_root: &Path) -> io::Result<()> {
    let file = File::open(archive)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    archive.set_overwrite(true);
    archive.unpack(project_root)
}
