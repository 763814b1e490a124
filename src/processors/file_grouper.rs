use crate::error::Result;
use crate::models::SoilFamily;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Soil files of a directory grouped by family
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileGroups {
    dir: PathBuf,
    groups: BTreeMap<SoilFamily, Vec<PathBuf>>,
}

impl FileGroups {
    /// Group the regular files of `dir` by the family names their file names contain
    pub fn scan(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        if dir.is_dir() {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    files.push(entry.path());
                }
            }
        }

        let groups = Self::group_paths(files);
        debug!(
            dir = %dir.display(),
            families = groups.len(),
            "scanned soil files"
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            groups,
        })
    }

    pub fn from_paths(dir: &Path, paths: Vec<PathBuf>) -> Self {
        Self {
            dir: dir.to_path_buf(),
            groups: Self::group_paths(paths),
        }
    }

    fn group_paths(mut paths: Vec<PathBuf>) -> BTreeMap<SoilFamily, Vec<PathBuf>> {
        paths.sort();
        let mut groups: BTreeMap<SoilFamily, Vec<PathBuf>> = BTreeMap::new();

        for path in paths {
            let Some(filename) = path.file_name().and_then(|f| f.to_str()) else {
                continue;
            };
            for family in SoilFamily::ALL {
                if family.matches_file(filename) {
                    groups.entry(family).or_default().push(path.clone());
                }
            }
        }

        groups
    }

    /// Re-read the directory after files were added or removed
    pub fn refresh(&mut self) -> Result<()> {
        *self = Self::scan(&self.dir)?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files of `family`, sorted by path
    pub fn files(&self, family: SoilFamily) -> &[PathBuf] {
        self.groups.get(&family).map(|files| files.as_slice()).unwrap_or(&[])
    }

    pub fn families(&self) -> impl Iterator<Item = SoilFamily> + '_ {
        self.groups.keys().copied()
    }

    pub fn total_files(&self) -> usize {
        self.groups.values().map(|f| f.len()).sum()
    }

    /// Files that processing `families` reads (all families when `None`)
    pub fn selected_files(&self, families: Option<&[SoilFamily]>) -> usize {
        match families {
            Some(families) => {
                let mut selected = families.to_vec();
                selected.sort();
                selected.dedup();
                selected.iter().map(|f| self.files(*f).len()).sum()
            }
            None => self.total_files(),
        }
    }
}
