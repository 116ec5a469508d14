use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

/// Compression container of a stored instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Codec {
    Xz,
    Gzip,
}

/// How an instance is stored on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Raw,
    Compressed(Codec),
}

const SUFFIXES: [(&str, Format); 3] = [
    (".cnf.xz", Format::Compressed(Codec::Xz)),
    (".cnf.gz", Format::Compressed(Codec::Gzip)),
    (".cnf", Format::Raw),
];

impl Format {
    /// Classify a path by its extension; `None` for anything that isn't a CNF.
    pub fn of(path: &Path) -> Option<Format> {
        Self::split(path).map(|(_, format)| format)
    }
    fn split(path: &Path) -> Option<(String, Format)> {
        let name = path.file_name()?.to_string_lossy();
        let lower = name.to_ascii_lowercase();
        SUFFIXES.iter().find_map(|(suffix, format)| {
            lower
                .ends_with(suffix)
                .then(|| (name[..name.len() - suffix.len()].to_string(), *format))
        })
    }
}

/// One problem file to be fed to the solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchmarkInstance {
    path: PathBuf,
    stem: String,
    name: String,
    format: Format,
}

impl BenchmarkInstance {
    pub fn new<P: Into<PathBuf>>(path: P) -> Option<BenchmarkInstance> {
        let path = path.into();
        let (stem, format) = Format::split(&path)?;
        Some(BenchmarkInstance {
            path,
            name: stem.clone(),
            stem,
            format,
        })
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// file name without the format extension(s)
    pub fn stem(&self) -> &str {
        &self.stem
    }
    /// base name of the log, output and scratch files; the stem unless renamed
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn with_name<S: Into<String>>(mut self, name: S) -> BenchmarkInstance {
        self.name = name.into();
        self
    }
    pub fn format(&self) -> Format {
        self.format
    }
    pub fn is_compressed(&self) -> bool {
        matches!(self.format, Format::Compressed(_))
    }
}

/// Copies of `instances` whose artifact names are pairwise distinct, ignoring
/// case. A name shared by several instances becomes `<name>_<n>`, numbered in
/// slice order and skipping any name already in use.
pub fn distinct_names(instances: &[BenchmarkInstance]) -> Vec<BenchmarkInstance> {
    let mut count: HashMap<String, usize> = HashMap::new();
    for i in instances {
        *count.entry(i.name.to_lowercase()).or_default() += 1;
    }
    let mut taken: HashSet<String> = count.keys().cloned().collect();
    instances
        .iter()
        .map(|i| {
            if count[&i.name.to_lowercase()] == 1 {
                return i.clone();
            }
            let name = (1..)
                .map(|n| format!("{}_{}", i.name, n))
                .find(|name| taken.insert(name.to_lowercase()))
                .unwrap_or_default();
            i.clone().with_name(name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_extensions() {
        assert_eq!(Format::of(Path::new("a/b.cnf")), Some(Format::Raw));
        assert_eq!(
            Format::of(Path::new("b.cnf.xz")),
            Some(Format::Compressed(Codec::Xz))
        );
        assert_eq!(
            Format::of(Path::new("B.CNF.GZ")),
            Some(Format::Compressed(Codec::Gzip))
        );
        assert_eq!(Format::of(Path::new("b.txt")), None);
        assert_eq!(Format::of(Path::new("b.xz")), None);
    }

    #[test]
    fn stem_drops_format_suffix() {
        let i = BenchmarkInstance::new("bench/uf250-01.cnf.xz").unwrap();
        assert_eq!(i.stem(), "uf250-01");
        assert!(i.is_compressed());
        let i = BenchmarkInstance::new("bench/x.y.cnf").unwrap();
        assert_eq!(i.stem(), "x.y");
        assert_eq!(i.format(), Format::Raw);
        assert!(BenchmarkInstance::new("bench/readme.md").is_none());
    }

    #[test]
    fn shared_stems_get_numbered_names() {
        let paths = ["x/foo.cnf", "x/foo.cnf.gz", "y/FOO.cnf.xz", "y/foo_1.cnf", "z/bar.cnf"];
        let instances: Vec<_> = paths
            .into_iter()
            .filter_map(BenchmarkInstance::new)
            .collect();
        let names: Vec<_> = distinct_names(&instances)
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        assert_eq!(names, ["foo_2", "foo_3", "FOO_4", "foo_1", "bar"]);
        let renamed = distinct_names(&instances);
        assert_eq!(renamed[2].stem(), "FOO");
        assert_eq!(renamed[2].path(), Path::new("y/FOO.cnf.xz"));
    }

    #[test]
    fn unique_names_are_left_alone() {
        let instances: Vec<_> = ["a.cnf", "b.cnf.xz"]
            .into_iter()
            .filter_map(BenchmarkInstance::new)
            .collect();
        assert_eq!(distinct_names(&instances), instances);
    }
}
