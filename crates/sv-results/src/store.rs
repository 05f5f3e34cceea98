//! Study storage API.
//!
//! Layout: `<root>/<study_id>/manifest.json` and `<root>/<study_id>/cases.csv`.

use crate::schema::{CaseRecord, SCHEMA_VERSION, StudyManifest};
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const MANIFEST_FILE: &str = "manifest.json";
const CASES_FILE: &str = "cases.csv";

#[derive(Debug, Clone)]
pub struct StudyStore {
    root_dir: PathBuf,
}

impl StudyStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn study_dir(&self, study_id: &str) -> PathBuf {
        self.root_dir.join(study_id)
    }

    pub fn has_study(&self, study_id: &str) -> bool {
        self.study_dir(study_id).join(MANIFEST_FILE).exists()
    }

    /// Writes a study, replacing any previous study with the same id.
    pub fn save_study(&self, manifest: &StudyManifest, cases: &[CaseRecord]) -> ResultsResult<()> {
        if self.has_study(&manifest.study_id) {
            warn!(study_id = %manifest.study_id, "overwriting existing study");
        }
        let study_dir = self.study_dir(&manifest.study_id);
        fs::create_dir_all(&study_dir)?;

        let mut writer = csv::Writer::from_path(study_dir.join(CASES_FILE))?;
        for case in cases {
            writer.serialize(case)?;
        }
        writer.flush()?;

        // Manifest last: a study without one is not listed
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(study_dir.join(MANIFEST_FILE), manifest_json)?;

        debug!(study_id = %manifest.study_id, cases = cases.len(), "study saved");
        Ok(())
    }

    pub fn load_manifest(&self, study_id: &str) -> ResultsResult<StudyManifest> {
        let manifest_path = self.study_dir(study_id).join(MANIFEST_FILE);
        if !manifest_path.exists() {
            return Err(ResultsError::StudyNotFound {
                study_id: study_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest: StudyManifest = serde_json::from_str(&content)?;
        if manifest.schema_version != SCHEMA_VERSION {
            return Err(ResultsError::SchemaMismatch {
                found: manifest.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        Ok(manifest)
    }

    pub fn load_cases(&self, study_id: &str) -> ResultsResult<Vec<CaseRecord>> {
        let cases_path = self.study_dir(study_id).join(CASES_FILE);
        if !cases_path.exists() {
            return Err(ResultsError::StudyNotFound {
                study_id: study_id.to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(cases_path)?;
        let mut cases = Vec::new();
        for record in reader.deserialize() {
            cases.push(record?);
        }
        Ok(cases)
    }

    /// All readable studies, oldest first.
    pub fn list_studies(&self) -> ResultsResult<Vec<StudyManifest>> {
        let mut studies = Vec::new();

        if !self.root_dir.exists() {
            return Ok(studies);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let study_id = entry.file_name().to_string_lossy().to_string();
            match self.load_manifest(&study_id) {
                Ok(manifest) => studies.push(manifest),
                Err(e) => debug!(%study_id, error = %e, "skipping directory"),
            }
        }

        studies.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(studies)
    }

    pub fn delete_study(&self, study_id: &str) -> ResultsResult<()> {
        let study_dir = self.study_dir(study_id);
        if study_dir.exists() {
            fs::remove_dir_all(study_dir)?;
        }
        Ok(())
    }
}
