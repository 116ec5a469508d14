use {
    crate::instance::BenchmarkInstance,
    log::{debug, warn},
    std::path::PathBuf,
    walkdir::WalkDir,
};

/// Collect the instances under `paths`, sorted by path with duplicates removed.
/// Directories are searched recursively; plain files are taken if they look like a CNF.
pub fn discover<I, P>(paths: I) -> Vec<BenchmarkInstance>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut found: Vec<PathBuf> = Vec::new();
    for path in paths {
        let path = path.into();
        if path.is_dir() {
            for entry in WalkDir::new(&path).follow_links(true) {
                match entry {
                    Ok(e) if e.file_type().is_file() => found.push(e.into_path()),
                    Ok(_) => (),
                    Err(e) => warn!("skip {}", e),
                }
            }
        } else if path.is_file() {
            found.push(path);
        } else {
            warn!("{} does not exist", path.display());
        }
    }
    found.sort();
    found.dedup();
    found
        .into_iter()
        .filter_map(|p| {
            let instance = BenchmarkInstance::new(&p);
            if instance.is_none() {
                debug!("not an instance: {}", p.display());
            }
            instance
        })
        .collect()
}
